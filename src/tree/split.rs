//! Hyperplane cut of a cluster along its principal axis.

use nalgebra::{Matrix3, Vector3};
use tracing::debug;

use super::node::{ClusterNode, NodeId};
use super::ownership::OwnershipMap;
use crate::{PaletteError, Result, Samples};

const EIGEN_EPSILON: f64 = 1.0e-12;
const MAX_EIGEN_ITERATIONS: usize = 1000;
const SIGN_TIE_TOLERANCE: f64 = 1.0e-9;

/// Dominant eigenpair of a covariance matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrincipalAxis {
    /// Largest eigenvalue: the variance along `direction`.
    pub variance: f64,
    /// Unit eigenvector, sign fixed so its largest-magnitude component
    /// (first one on ties) is positive.
    pub direction: Vector3<f64>,
}

/// Dominant eigenpair of a symmetric 3×3 matrix, chosen by eigenvalue and
/// not by the order the decomposition returns them in.
pub fn principal_axis(covariance: &Matrix3<f64>) -> Result<PrincipalAxis> {
    if covariance.iter().any(|v| !v.is_finite()) {
        return Err(PaletteError::numeric("covariance has non-finite entries"));
    }
    let eigen = covariance
        .try_symmetric_eigen(EIGEN_EPSILON, MAX_EIGEN_ITERATIONS)
        .ok_or_else(|| PaletteError::numeric("eigen-decomposition did not converge"))?;

    let mut best = 0;
    for i in 1..3 {
        if eigen.eigenvalues[i] > eigen.eigenvalues[best] {
            best = i;
        }
    }
    let variance = eigen.eigenvalues[best];
    let mut direction: Vector3<f64> = eigen.eigenvectors.column(best).into_owned();
    if !variance.is_finite() || direction.iter().any(|v| !v.is_finite()) {
        return Err(PaletteError::numeric("eigen-decomposition produced non-finite values"));
    }

    // Components equal up to rounding count as a tie.
    let largest = direction.amax();
    let lead = (0..3)
        .find(|&i| direction[i].abs() >= largest - SIGN_TIE_TOLERANCE)
        .unwrap_or(0);
    if direction[lead] < 0.0 {
        direction = -direction;
    }

    Ok(PrincipalAxis {
        variance,
        direction,
    })
}

/// Result of cutting one cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    pub left: NodeId,
    pub right: NodeId,
    pub axis: PrincipalAxis,
    /// Projection of the cluster mean onto the axis.
    pub threshold: f64,
    pub left_pixels: usize,
    pub right_pixels: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SplitOutcome {
    /// Ownership was moved to the two new ids.
    Split(Partition),
    /// Every pixel projected onto the same side; nothing was changed.
    Degenerate,
}

/// Cut `node` through its mean, perpendicular to its principal axis.
///
/// Pixels projecting at or below the mean go to `next_id`, the others to
/// `next_id + 1`. Ownership is only rewritten when both sides are non-empty,
/// so a degenerate cut leaves the map untouched. Attaching the children to
/// the tree is up to the caller.
pub fn split(
    node: &ClusterNode,
    next_id: NodeId,
    ownership: &mut OwnershipMap,
    samples: &Samples,
) -> Result<SplitOutcome> {
    let stats = node
        .stats()
        .ok_or_else(|| PaletteError::invalid("node", format!("{} is already split", node.id())))?;
    let axis = principal_axis(&stats.covariance)?;
    let threshold = axis.direction.dot(&stats.mean);
    let (left, right) = (next_id, next_id + 1);

    let sides: Vec<(usize, bool)> = ownership
        .owned_by(node.id())
        .map(|index| (index, axis.direction.dot(&samples.color(index)) <= threshold))
        .collect();
    let left_pixels = sides.iter().filter(|(_, is_left)| *is_left).count();
    let right_pixels = sides.len() - left_pixels;

    if left_pixels == 0 || right_pixels == 0 {
        debug!(node = node.id(), pixels = sides.len(), "degenerate cut, cluster left intact");
        return Ok(SplitOutcome::Degenerate);
    }

    for (index, is_left) in sides {
        ownership.assign(index, if is_left { left } else { right });
    }
    debug!(
        node = node.id(),
        left,
        right,
        left_pixels,
        right_pixels,
        variance = axis.variance,
        "split cluster"
    );

    Ok(SplitOutcome::Split(Partition {
        left,
        right,
        axis,
        threshold,
        left_pixels,
        right_pixels,
    }))
}
