//! This crate contains computational geometry algorithms for [Rust CV](https://github.com/rust-cv/).
//!
//! ## Oriented bounding boxes
//!
//! Given the points observed on the surface of an object, we want a box that encloses them and
//! whose edges follow the object rather than the camera axes. The box gives both an orientation
//! and an extent for the object.
//!
//! - `c` the center of the box
//! - `u` the primary axis (direction of largest spread)
//! - `v` the secondary axis
//! - `.` observed points
//!
//! ```text
//!            v
//!           /    .
//!      +---/----------+
//!     /  ./   .  .   /
//!    / .  c-----------u
//!   /  .   .  .  .  /
//!  +---------------+
//! ```

pub mod obb;

pub use obb::*;
