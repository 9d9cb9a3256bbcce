#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The settings for the perception pass.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerceptionSettings {
    /// The width in pixels of the rendered images
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_width"))]
    pub width: u32,
    /// The height in pixels of the rendered images
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_height"))]
    pub height: u32,
    /// Raw depth values are divided by this to get scene units
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_depth_scale"))]
    pub depth_scale: f64,
    /// Pixels deeper than this (in scene units) are discarded
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_depth_trunc"))]
    pub depth_trunc: f64,
    /// The minimum number of reconstructed points for an object to be considered at all
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_minimum_points"))]
    pub minimum_points: usize,
    /// The edge length of a voxel used for down-sampling
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_voxel_size"))]
    pub voxel_size: f64,
    /// The neighborhood size used for statistical outlier removal
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_outlier_neighbors"))]
    pub outlier_neighbors: usize,
    /// The number of standard deviations above the mean neighbor distance where points become outliers
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_outlier_std_ratio"))]
    pub outlier_std_ratio: f64,
    /// The ratio of smallest to largest principal spread below which a box fit is rejected as degenerate
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_obb_planarity_epsilon")
    )]
    pub obb_planarity_epsilon: f64,
    /// The axis length of the coordinate frame drawn at the world origin
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_world_frame_size"))]
    pub world_frame_size: f64,
    /// The axis length of the coordinate frame drawn at each object
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_object_frame_size"))]
    pub object_frame_size: f64,
}

impl Default for PerceptionSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            depth_scale: default_depth_scale(),
            depth_trunc: default_depth_trunc(),
            minimum_points: default_minimum_points(),
            voxel_size: default_voxel_size(),
            outlier_neighbors: default_outlier_neighbors(),
            outlier_std_ratio: default_outlier_std_ratio(),
            obb_planarity_epsilon: default_obb_planarity_epsilon(),
            world_frame_size: default_world_frame_size(),
            object_frame_size: default_object_frame_size(),
        }
    }
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_depth_scale() -> f64 {
    1.0
}

fn default_depth_trunc() -> f64 {
    1000.0
}

fn default_minimum_points() -> usize {
    10
}

fn default_voxel_size() -> f64 {
    0.01
}

fn default_outlier_neighbors() -> usize {
    20
}

fn default_outlier_std_ratio() -> f64 {
    2.0
}

fn default_obb_planarity_epsilon() -> f64 {
    1e-9
}

fn default_world_frame_size() -> f64 {
    0.5
}

fn default_object_frame_size() -> f64 {
    0.2
}

/// The schedule the experiment driver runs the simulation on.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExperimentSettings {
    /// The number of times each scene is reset and run
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_trials"))]
    pub trials: usize,
    /// The number of simulation steps per trial
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_steps"))]
    pub steps: usize,
    /// Perception runs on every step that is a multiple of this
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_perception_interval")
    )]
    pub perception_interval: usize,
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            steps: default_steps(),
            perception_interval: default_perception_interval(),
        }
    }
}

fn default_trials() -> usize {
    10
}

fn default_steps() -> usize {
    10000
}

fn default_perception_interval() -> usize {
    100
}
