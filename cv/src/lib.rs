//! # `cv`
//!
//! Batteries-included pure-Rust perception crate
//!
//! This crate should only be used for documentation/reference and for quickly creating and
//! running a perception sample/routine. It stores all of the pieces of the perception pipeline
//! in one place for discoverability. If you are making a production application, import the
//! dependencies from this crate individually so that you don't have an explosive number of
//! dependencies. Although not recommended, you can also disable default features on this crate
//! and enable specific features on this crate just to get the functionality you want.
//!
//! All of the basic types (points, poses, camera model traits) are included in the root of the crate.
//!
//! ## Modules
//! * [`camera`] - camera models to convert pixels with depth into camera-frame points
//! * [`geom`] - oriented bounding boxes
//! * [`pointclouds`] - point clouds, their denoising and PLY export
//! * [`perception`] - per-object pose estimation from RGB-D and segmentation renders
//! * [`image`] - the array types images are stored in

#![no_std]

pub use cv_core::*;

/// Camera models
pub mod camera {
    /// The pinhole camera model
    #[cfg(feature = "cv-pinhole")]
    pub use cv_pinhole as pinhole;
}

/// Computational geometry
pub mod geom {
    #[cfg(feature = "cv-geom")]
    pub use cv_geom::*;
}

/// Point clouds
pub mod pointclouds {
    #[cfg(feature = "cv-pointclouds")]
    pub use cv_pointclouds::*;
}

/// Object pose estimation from simulated renders
pub mod perception {
    #[cfg(feature = "cv-perception")]
    pub use cv_perception::*;
}

/// Image storage
pub mod image {
    /// Re-export of [`ndarray`], which frames are stored in
    #[cfg(feature = "ndarray")]
    pub mod ndarray {
        pub use ndarray::*;
    }
}
