use crate::PerceptionSettings;
use cv_pointclouds::{CloudError, PointCloud};
use log::*;

/// Voxel down-samples the cloud and then removes statistical outliers, keeping colors throughout.
///
/// An empty result is reported as [`CloudError::EmptyResult`] so a partial cloud never reaches the estimator.
pub fn filter_cloud(
    cloud: &PointCloud,
    settings: &PerceptionSettings,
) -> Result<PointCloud, CloudError> {
    let downsampled = cloud.voxel_down_sample(settings.voxel_size)?;
    debug!(
        "voxel down-sampling reduced {} points to {}",
        cloud.len(),
        downsampled.len()
    );
    let (filtered, inliers) = downsampled
        .remove_statistical_outliers(settings.outlier_neighbors, settings.outlier_std_ratio)?;
    debug!(
        "outlier removal kept {} of {} points",
        inliers.len(),
        downsampled.len()
    );
    if filtered.is_empty() {
        return Err(CloudError::EmptyResult);
    }
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::nalgebra::{Point3, Vector3};
    use itertools::iproduct;

    fn plate_with_outlier() -> PointCloud {
        iproduct!(0..10, 0..10)
            .map(|(x, y)| {
                (
                    Point3::new(x as f64 * 0.02, y as f64 * 0.02, 1.0),
                    Vector3::new(0.5, 0.25, 0.0),
                )
            })
            .chain(std::iter::once((
                Point3::new(5.0, 5.0, 5.0),
                Vector3::new(1.0, 1.0, 1.0),
            )))
            .collect()
    }

    #[test]
    fn outlier_is_dropped_and_colors_kept() {
        let filtered = filter_cloud(&plate_with_outlier(), &PerceptionSettings::default()).unwrap();
        assert_eq!(filtered.len(), 100);
        assert!(filtered
            .colors()
            .unwrap()
            .iter()
            .all(|&c| c == Vector3::new(0.5, 0.25, 0.0)));
    }

    #[test]
    fn voxel_failure_is_propagated() {
        let settings = PerceptionSettings {
            voxel_size: 0.0,
            ..PerceptionSettings::default()
        };
        assert!(matches!(
            filter_cloud(&plate_with_outlier(), &settings),
            Err(CloudError::InvalidVoxelSize(_))
        ));
    }

    #[test]
    fn single_voxel_is_too_few_for_statistics() {
        let cloud = PointCloud::from_points(
            (0..20)
                .map(|i| Point3::new(i as f64 * 1e-4, 0.0, 1.0))
                .collect(),
        );
        assert!(matches!(
            filter_cloud(&cloud, &PerceptionSettings::default()),
            Err(CloudError::TooFewPoints { .. })
        ));
    }
}
