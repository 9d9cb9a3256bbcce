use crate::{CloudError, PointCloud};
use log::*;
use rstar::RTree;

impl PointCloud {
    /// Removes points whose neighborhood is sparse compared to the rest of the cloud.
    ///
    /// For every point the mean distance to its `nb_neighbors` nearest other points is computed.
    /// Points whose mean distance exceeds `mean + std_ratio * std_dev` of those distances over
    /// the whole cloud are dropped. Clouds with `nb_neighbors` or fewer points use all other points
    /// as the neighborhood. The standard deviation is the sample standard deviation.
    ///
    /// Returns the filtered cloud and the indices of the kept points in the input.
    pub fn remove_statistical_outliers(
        &self,
        nb_neighbors: usize,
        std_ratio: f64,
    ) -> Result<(PointCloud, Vec<usize>), CloudError> {
        if nb_neighbors == 0 {
            return Err(CloudError::InvalidNeighborCount);
        }
        if !std_ratio.is_finite() || std_ratio <= 0.0 {
            return Err(CloudError::InvalidStdRatio(std_ratio));
        }
        if self.len() < 2 {
            return Err(CloudError::TooFewPoints {
                points: self.len(),
                minimum: 2,
            });
        }
        if let Some(ix) = self.first_non_finite() {
            return Err(CloudError::NonFinitePoint(ix));
        }

        let tree = RTree::bulk_load(self.points().iter().map(|p| [p.x, p.y, p.z]).collect());
        let k = nb_neighbors.min(self.len() - 1);

        // The nearest neighbor of every point is the point itself.
        let mean_distances: Vec<f64> = self
            .points()
            .iter()
            .map(|p| {
                let query = [p.x, p.y, p.z];
                let total: f64 = tree
                    .nearest_neighbor_iter(&query)
                    .skip(1)
                    .take(k)
                    .map(|n| distance(n, &query))
                    .sum();
                total / k as f64
            })
            .collect();

        let n = mean_distances.len() as f64;
        let mean = mean_distances.iter().sum::<f64>() / n;
        let variance = mean_distances
            .iter()
            .map(|d| (d - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        let threshold = mean + std_ratio * variance.sqrt();
        if !threshold.is_finite() {
            return Err(CloudError::NonFiniteStatistics);
        }

        let inliers: Vec<usize> = mean_distances
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d <= threshold)
            .map(|(ix, _)| ix)
            .collect();
        debug!(
            "statistical outlier removal kept {} of {} points (threshold {})",
            inliers.len(),
            self.len(),
            threshold
        );
        Ok((self.select(&inliers), inliers))
    }
}

fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt()
}
