//! # Rust CV Perception
//!
//! Turns the renders of a simulated camera into per-object poses in the world frame.
//!
//! For every frame the pipeline takes an RGB image, a depth image and an instance segmentation
//! image of identical size (see [`FrameInputs`]) and, for every object id greater than zero:
//!
//! 1. builds a mask of the object's pixels ([`object_mask`])
//! 2. zeroes everything outside the mask ([`mask_rgbd`])
//! 3. back-projects the remaining pixels through the pinhole intrinsics ([`reconstruct_cloud`])
//! 4. voxel down-samples and removes statistical outliers ([`filter_cloud`])
//! 5. computes the centroid and fits an oriented box in the camera frame ([`estimate_pose`])
//! 6. moves the result into the world frame with the inverse view matrix ([`ObjectPoseRecord`])
//!
//! [`Perception::process_frame`] runs all of this and collects the records in a [`FrameResult`].
//! Objects that fail a step are left out of the result and reported next to it instead.
//! [`run_experiment`] drives a [`Simulation`] through a schedule and gathers a [`RunResult`].
//!
//! Enable the `rayon` feature to process the objects of a frame in parallel.

mod error;
mod estimate;
mod experiment;
mod extract;
mod filter;
mod frame;
mod perception;
mod reconstruct;
mod result;
mod segment;
mod settings;
mod transform;
mod visualize;

pub use error::*;
pub use estimate::*;
pub use experiment::*;
pub use extract::*;
pub use filter::*;
pub use frame::*;
pub use perception::*;
pub use reconstruct::*;
pub use result::*;
pub use segment::*;
pub use settings::*;
pub use transform::*;
pub use visualize::*;
