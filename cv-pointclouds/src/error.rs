use thiserror::Error;

/// Errors raised while building, filtering or exporting a [`PointCloud`](crate::PointCloud).
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("cloud has {points} points but {colors} colors")]
    ColorCountMismatch { points: usize, colors: usize },
    #[error("voxel size must be finite and positive, got {0}")]
    InvalidVoxelSize(f64),
    #[error("voxel size {voxel_size} is too small for a cloud spanning {extent}")]
    VoxelSizeTooSmall { voxel_size: f64, extent: f64 },
    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),
    #[error("neighbor count must be at least 1")]
    InvalidNeighborCount,
    #[error("standard deviation ratio must be finite and positive, got {0}")]
    InvalidStdRatio(f64),
    #[error("need at least {minimum} points, got {points}")]
    TooFewPoints { points: usize, minimum: usize },
    #[error("neighbor distance statistics are not finite")]
    NonFiniteStatistics,
    #[error("no points survived filtering")]
    EmptyResult,
    #[error("failed to write ply: {0}")]
    Export(#[from] std::io::Error),
}
