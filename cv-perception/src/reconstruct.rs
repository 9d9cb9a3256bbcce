use crate::MaskedRgbd;
use cv_core::nalgebra::Vector3;
use cv_core::Projective;
use cv_pinhole::CameraIntrinsics;
use cv_pointclouds::PointCloud;

/// Back-projects every pixel of a masked RGB-D pair into a colored camera-frame cloud.
///
/// Raw depth is divided by `depth_scale`. Pixels whose depth is not finite, negative, or deeper than
/// `depth_trunc` are skipped. Masked-out pixels have zero depth and land on the origin, so every
/// point at exactly `(0, 0, 0)` is removed afterwards.
///
/// Colors are scaled to `[0, 1]`.
pub fn reconstruct_cloud(
    masked: &MaskedRgbd,
    intrinsics: &CameraIntrinsics,
    depth_scale: f64,
    depth_trunc: f64,
) -> PointCloud {
    let mut cloud: PointCloud = masked
        .depth
        .indexed_iter()
        .filter_map(|((row, column), &raw)| {
            let depth = f64::from(raw) / depth_scale;
            if !depth.is_finite() || depth < 0.0 || depth > depth_trunc {
                return None;
            }
            let point = intrinsics.back_project(column, row, depth).point()?;
            let color = Vector3::from_fn(|channel, _| {
                f64::from(masked.color[[row, column, channel]]) / 255.0
            });
            Some((point, color))
        })
        .collect();
    cloud.remove_origin_points();
    cloud
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cv_core::nalgebra::{Point2, Point3};
    use ndarray::{Array2, Array3};

    fn intrinsics() -> CameraIntrinsics {
        CameraIntrinsics::identity(4, 4)
            .focal(500.0)
            .principal_point(Point2::new(2.0, 2.0))
    }

    #[test]
    fn single_pixel_lands_on_pinhole_point() {
        let mut depth = Array2::zeros((4, 4));
        depth[[1, 3]] = 2.0;
        let mut color = Array3::zeros((4, 4, 3));
        color[[1, 3, 0]] = 255;
        let masked = MaskedRgbd { color, depth };

        let cloud = reconstruct_cloud(&masked, &intrinsics(), 1.0, 1000.0);
        assert_eq!(cloud.len(), 1);
        assert_relative_eq!(
            cloud.points()[0],
            Point3::new((3.0 - 2.0) * 2.0 / 500.0, (1.0 - 2.0) * 2.0 / 500.0, 2.0),
            epsilon = 1e-12
        );
        assert_eq!(cloud.colors().unwrap()[0], Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn truncated_and_invalid_depths_are_skipped() {
        let mut depth = Array2::from_elem((4, 4), 1.0f32);
        depth[[0, 0]] = 1500.0;
        depth[[0, 1]] = f32::NAN;
        depth[[0, 2]] = -1.0;
        let masked = MaskedRgbd {
            color: Array3::zeros((4, 4, 3)),
            depth,
        };
        let cloud = reconstruct_cloud(&masked, &intrinsics(), 1.0, 1000.0);
        assert_eq!(cloud.len(), 13);
    }

    #[test]
    fn depth_scale_divides_raw_depth() {
        let mut depth = Array2::zeros((4, 4));
        depth[[2, 2]] = 1000.0;
        let masked = MaskedRgbd {
            color: Array3::zeros((4, 4, 3)),
            depth,
        };
        let cloud = reconstruct_cloud(&masked, &intrinsics(), 1000.0, 3.0);
        assert_eq!(cloud.points(), &[Point3::new(0.0, 0.0, 1.0)]);
    }
}
