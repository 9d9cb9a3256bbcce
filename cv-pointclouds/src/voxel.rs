use crate::{CloudError, PointCloud};
use cv_core::nalgebra::{Point3, Vector3};
use log::*;
use std::collections::BTreeMap;

#[derive(Default)]
struct Cell {
    position: Vector3<f64>,
    color: Vector3<f64>,
    count: usize,
}

impl PointCloud {
    /// Replaces all the points that fall in the same cubic cell of edge `voxel_size` with
    /// their mean position (and mean color, if the cloud is colored).
    ///
    /// The grid is anchored half a voxel below the minimum corner of the cloud's bounds.
    /// The output is ordered by voxel index so the result is deterministic.
    pub fn voxel_down_sample(&self, voxel_size: f64) -> Result<PointCloud, CloudError> {
        if !voxel_size.is_finite() || voxel_size <= 0.0 {
            return Err(CloudError::InvalidVoxelSize(voxel_size));
        }
        if let Some(ix) = self.first_non_finite() {
            return Err(CloudError::NonFinitePoint(ix));
        }
        if self.is_empty() {
            return Ok(PointCloud::new());
        }

        let (min, max) = bounds(self.points());
        let extent = (max - min).max();
        if voxel_size * f64::from(i32::MAX) < extent {
            return Err(CloudError::VoxelSizeTooSmall { voxel_size, extent });
        }
        let origin = min.coords - Vector3::repeat(0.5 * voxel_size);

        let mut cells: BTreeMap<[i64; 3], Cell> = BTreeMap::new();
        for (ix, point) in self.points().iter().enumerate() {
            let index = ((point.coords - origin) / voxel_size).map(|c| c.floor() as i64);
            let cell = cells.entry([index.x, index.y, index.z]).or_default();
            cell.position += point.coords;
            if let Some(colors) = self.colors() {
                cell.color += colors[ix];
            }
            cell.count += 1;
        }

        debug!(
            "voxel down-sampled {} points into {} cells of size {}",
            self.len(),
            cells.len(),
            voxel_size
        );

        let (points, colors): (Vec<_>, Vec<_>) = cells
            .into_values()
            .map(|cell| {
                let n = cell.count as f64;
                (Point3::from(cell.position / n), cell.color / n)
            })
            .unzip();
        if self.has_colors() {
            PointCloud::from_colored_points(points, colors)
        } else {
            Ok(PointCloud::from_points(points))
        }
    }
}

/// The minimum and maximum corner of the axis-aligned bounds of a non-empty slice.
fn bounds(points: &[Point3<f64>]) -> (Point3<f64>, Point3<f64>) {
    points.iter().skip(1).fold((points[0], points[0]), |(min, max), p| {
        (min.inf(p), max.sup(p))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn points_in_one_cell_merge_into_their_mean() {
        let cloud = PointCloud::from_colored_points(
            vec![
                Point3::new(0.001, 0.001, 0.001),
                Point3::new(0.003, 0.002, 0.001),
                Point3::new(0.002, 0.003, 0.004),
            ],
            vec![
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ],
        )
        .unwrap();
        let down = cloud.voxel_down_sample(0.01).unwrap();
        assert_eq!(down.len(), 1);
        assert_relative_eq!(down.points()[0], Point3::new(0.002, 0.002, 0.002), epsilon = 1e-12);
        assert_relative_eq!(
            down.colors().unwrap()[0],
            Vector3::repeat(1.0 / 3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn separated_points_stay_separate() {
        let points: Vec<_> = (0..10)
            .map(|i| Point3::new(i as f64 * 0.05, 0.0, 1.0))
            .collect();
        let down = PointCloud::from_points(points.clone())
            .voxel_down_sample(0.01)
            .unwrap();
        assert_eq!(down.len(), 10);
        assert!(down.colors().is_none());
        for (a, b) in down.points().iter().zip(&points) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn invalid_voxel_sizes_fail() {
        let cloud = PointCloud::from_points(vec![Point3::origin()]);
        assert!(matches!(
            cloud.voxel_down_sample(0.0),
            Err(CloudError::InvalidVoxelSize(_))
        ));
        assert!(matches!(
            cloud.voxel_down_sample(f64::NAN),
            Err(CloudError::InvalidVoxelSize(_))
        ));
    }

    #[test]
    fn degenerate_grid_fails() {
        let cloud = PointCloud::from_points(vec![Point3::origin(), Point3::new(1.0e9, 0.0, 0.0)]);
        assert!(matches!(
            cloud.voxel_down_sample(1.0e-9),
            Err(CloudError::VoxelSizeTooSmall { .. })
        ));
    }

    #[test]
    fn non_finite_points_fail() {
        let cloud = PointCloud::from_points(vec![Point3::origin(), Point3::new(f64::INFINITY, 0.0, 0.0)]);
        assert!(matches!(
            cloud.voxel_down_sample(0.01),
            Err(CloudError::NonFinitePoint(1))
        ));
    }
}
