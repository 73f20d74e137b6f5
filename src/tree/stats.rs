//! Per-cluster mean and covariance.

use nalgebra::{Matrix3, Vector3};

use super::node::NodeId;
use super::ownership::OwnershipMap;
use crate::Samples;

/// Cached statistics of the pixels a leaf owns.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterStats {
    /// Per-channel mean (R, G, B).
    pub mean: Vector3<f64>,
    /// Sample covariance (divisor `n - 1`), channels as variables.
    pub covariance: Matrix3<f64>,
    pub pixel_count: usize,
}

impl ClusterStats {
    /// Statistics of a one-pixel cluster. Its covariance is undefined and
    /// stored as zero.
    pub fn single(color: Vector3<f64>) -> Self {
        Self {
            mean: color,
            covariance: Matrix3::zeros(),
            pixel_count: 1,
        }
    }

    /// Clusters with fewer than two pixels have no covariance to speak of
    /// and must never be chosen for a split.
    pub fn is_splittable(&self) -> bool {
        self.pixel_count >= 2
    }
}

/// Mean and covariance of the pixels `ownership` assigns to `id`.
///
/// An empty cluster takes `fallback` (its parent's mean) as mean; a
/// single-pixel cluster takes that pixel. Both get a zero covariance.
pub fn compute(
    id: NodeId,
    ownership: &OwnershipMap,
    samples: &Samples,
    fallback: Vector3<f64>,
) -> ClusterStats {
    let mut sum = Vector3::<f64>::zeros();
    let mut count = 0usize;
    for index in ownership.owned_by(id) {
        sum += samples.color(index);
        count += 1;
    }

    match count {
        0 => ClusterStats {
            mean: fallback,
            covariance: Matrix3::zeros(),
            pixel_count: 0,
        },
        1 => ClusterStats::single(sum),
        n => {
            let mean = sum / n as f64;
            let mut scatter = Matrix3::<f64>::zeros();
            for index in ownership.owned_by(id) {
                let d = samples.color(index) - mean;
                scatter += d * d.transpose();
            }
            ClusterStats {
                mean,
                covariance: scatter / (n - 1) as f64,
                pixel_count: n,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::ROOT_ID;

    fn samples(pixels: &[[u8; 3]]) -> Samples {
        Samples::new(pixels.len(), 1, pixels.to_vec()).unwrap()
    }

    #[test]
    fn mean_and_sample_covariance_over_owned_pixels() {
        let s = samples(&[[0, 0, 0], [2, 4, 0], [100, 100, 100]]);
        let mut map = OwnershipMap::new(3, 1);
        map.assign(2, 7);

        let stats = compute(ROOT_ID, &map, &s, Vector3::zeros());
        assert_eq!(stats.pixel_count, 2);
        assert_eq!(stats.mean, Vector3::new(1.0, 2.0, 0.0));
        // deviations (-1,-2,0) and (1,2,0), divisor 1
        assert_eq!(stats.covariance[(0, 0)], 2.0);
        assert_eq!(stats.covariance[(0, 1)], 4.0);
        assert_eq!(stats.covariance[(1, 0)], 4.0);
        assert_eq!(stats.covariance[(1, 1)], 8.0);
        assert_eq!(stats.covariance[(2, 2)], 0.0);
        assert!(stats.is_splittable());
    }

    #[test]
    fn single_pixel_cluster_takes_its_color() {
        let s = samples(&[[0, 0, 0], [9, 8, 7]]);
        let mut map = OwnershipMap::new(2, 1);
        map.assign(1, 3);

        let stats = compute(3, &map, &s, Vector3::zeros());
        assert_eq!(stats.mean, Vector3::new(9.0, 8.0, 7.0));
        assert_eq!(stats.covariance, Matrix3::zeros());
        assert!(!stats.is_splittable());
    }

    #[test]
    fn empty_cluster_inherits_fallback_mean() {
        let s = samples(&[[5, 5, 5]]);
        let map = OwnershipMap::new(1, 1);
        let parent = Vector3::new(1.0, 2.0, 3.0);

        let stats = compute(42, &map, &s, parent);
        assert_eq!(stats.pixel_count, 0);
        assert_eq!(stats.mean, parent);
        assert!(!stats.is_splittable());
    }
}
