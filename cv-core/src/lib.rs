//! # Rust CV Core
//!
//! This library provides the common abstractions and types shared by the perception crates in
//! this workspace. This includes camera model traits, pixel keypoints, homogeneous points and the
//! poses that relate the camera frame to the world frame. The crate is designed to be very small
//! so that it adds negligable build time. It pulls in some dependencies that will probably be
//! brought in by writing computer vision code normally.
//!
//! The crate is designed to work with `#![no_std]`, even without an allocator.
//!
//! ## Frames
//!
//! Two coordinate frames appear everywhere in this workspace:
//!
//! * The camera frame: origin at the optical center, positive X right, positive Y down and
//!   positive Z forwards along the optical axis. Points in this frame are [`CameraPoint`]s.
//! * The world frame: a fixed scene origin. Points in this frame are [`WorldPoint`]s.
//!
//! A renderer usually hands out a view matrix, which maps world coordinates into camera
//! coordinates. That is a [`WorldToCamera`]. Its inverse is a [`CameraToWorld`], which is what
//! perception needs to express what the camera saw in the world frame.
//!
//! ```text
//!        world                          camera
//!          Z                               Z (forwards)
//!          |        WorldToCamera         /
//!          |     ------------------>     O---- X
//!          O---- Y                       |
//!         /      <------------------     Y (down)
//!        X        CameraToWorld
//! ```

#![no_std]

mod camera;
mod keypoint;
mod point;
mod pose;

pub use camera::*;
pub use keypoint::*;
pub use nalgebra;
pub use point::*;
pub use pose::*;
