use super::node::{ClusterNode, NodeId};
use super::split::principal_axis;
use crate::Result;

/// Clusters whose principal variance is at or below this are treated as
/// uniform and never split.
pub const MIN_SPLIT_VARIANCE: f64 = 1.0e-9;

/// The leaf chosen for the next split.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub id: NodeId,
    pub variance: f64,
}

/// Pick the leaf with the largest dominant eigenvalue.
///
/// A root-only tree yields the root itself. Leaves with fewer than two
/// pixels, uniform leaves and leaves whose last cut was degenerate are
/// skipped; `None` means nothing is left to split. Ties go to the first leaf
/// in breadth-first, left-before-right order.
pub fn select(root: &ClusterNode) -> Result<Option<Candidate>> {
    let mut best: Option<Candidate> = None;
    for leaf in root.leaves() {
        let Some(stats) = leaf.stats() else { continue };
        if leaf.is_exhausted() || !stats.is_splittable() {
            continue;
        }
        let variance = principal_axis(&stats.covariance)?.variance;
        if variance <= MIN_SPLIT_VARIANCE {
            continue;
        }
        if best.is_none_or(|b| variance > b.variance) {
            best = Some(Candidate {
                id: leaf.id(),
                variance,
            });
        }
    }
    Ok(best)
}
