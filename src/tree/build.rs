//! Iterative select → split → re-stat loop.

use nalgebra::Vector3;
use tracing::{debug, instrument, warn};

use super::node::{ClusterNode, NodeId, ROOT_ID};
use super::ownership::OwnershipMap;
use super::select::select;
use super::split::{SplitOutcome, split};
use super::stats;
use crate::{PaletteError, Result, Samples};

/// One performed split, as observed at the time it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitRecord {
    pub parent: NodeId,
    pub parent_pixels: usize,
    pub left: NodeId,
    pub left_pixels: usize,
    pub right: NodeId,
    pub right_pixels: usize,
}

/// What a single builder step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Split(SplitRecord),
    /// The selected leaf could not be cut and was retired.
    Retired(NodeId),
    /// No leaf is eligible for splitting.
    Exhausted,
}

/// A finished partition tree together with the final ownership map.
#[derive(Clone, Debug)]
pub struct ClusterTree {
    root: ClusterNode,
    ownership: OwnershipMap,
    splits: Vec<SplitRecord>,
    requested_colors: usize,
}

impl ClusterTree {
    pub fn root(&self) -> &ClusterNode {
        &self.root
    }

    pub fn ownership(&self) -> &OwnershipMap {
        &self.ownership
    }

    /// Splits in the order they were performed.
    pub fn splits(&self) -> &[SplitRecord] {
        &self.splits
    }

    pub fn leaf_count(&self) -> usize {
        self.splits.len() + 1
    }

    pub fn requested_colors(&self) -> usize {
        self.requested_colors
    }

    /// Whether the build produced as many leaves as requested.
    pub fn is_complete(&self) -> bool {
        self.leaf_count() == self.requested_colors
    }
}

/// Build context for one tree: the samples it reads, the ownership map it
/// mutates and the tree grown so far. Nothing is shared between builders.
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    samples: &'a Samples,
    ownership: OwnershipMap,
    root: ClusterNode,
    splits: Vec<SplitRecord>,
}

impl<'a> TreeBuilder<'a> {
    /// Root (id 1) owning every sample, with its statistics computed.
    pub fn new(samples: &'a Samples) -> Result<Self> {
        if samples.is_empty() {
            return Err(PaletteError::invalid("samples", "empty"));
        }
        let ownership = OwnershipMap::new(samples.width(), samples.height());
        let root_stats = stats::compute(ROOT_ID, &ownership, samples, Vector3::zeros());
        Ok(Self {
            samples,
            ownership,
            root: ClusterNode::leaf(ROOT_ID, root_stats),
            splits: Vec::new(),
        })
    }

    pub fn root(&self) -> &ClusterNode {
        &self.root
    }

    pub fn ownership(&self) -> &OwnershipMap {
        &self.ownership
    }

    pub fn leaf_count(&self) -> usize {
        self.splits.len() + 1
    }

    /// Next free id: one past the largest id anywhere in the tree.
    fn next_id(&self) -> NodeId {
        self.root.max_id() + 1
    }

    /// Select the most spread leaf and split it.
    pub fn step(&mut self) -> Result<Step> {
        let Some(candidate) = select(&self.root)? else {
            return Ok(Step::Exhausted);
        };
        let next_id = self.next_id();
        let Some(node) = self.root.find_mut(candidate.id) else {
            return Ok(Step::Exhausted);
        };

        let partition = match split(node, next_id, &mut self.ownership, self.samples)? {
            SplitOutcome::Split(partition) => partition,
            SplitOutcome::Degenerate => {
                node.mark_exhausted();
                return Ok(Step::Retired(candidate.id));
            }
        };

        let parent_pixels = node.stats().map_or(0, |s| s.pixel_count);
        let parent_mean = node.mean();
        let left_stats = stats::compute(partition.left, &self.ownership, self.samples, parent_mean);
        let right_stats = stats::compute(partition.right, &self.ownership, self.samples, parent_mean);
        node.attach_children(
            ClusterNode::leaf(partition.left, left_stats),
            ClusterNode::leaf(partition.right, right_stats),
        );

        let record = SplitRecord {
            parent: candidate.id,
            parent_pixels,
            left: partition.left,
            left_pixels: partition.left_pixels,
            right: partition.right,
            right_pixels: partition.right_pixels,
        };
        self.splits.push(record);
        Ok(Step::Split(record))
    }

    pub fn finish(self, requested_colors: usize) -> ClusterTree {
        ClusterTree {
            root: self.root,
            ownership: self.ownership,
            splits: self.splits,
            requested_colors,
        }
    }
}

/// Grow a partition tree over `samples` until it has `target_colors` leaves
/// or no leaf can be split any further.
///
/// Running out of splittable clusters is not an error: the tree simply has
/// fewer leaves than requested. A numeric failure aborts the build.
#[instrument(skip(samples), fields(pixels = samples.len()))]
pub fn build(samples: &Samples, target_colors: usize) -> Result<ClusterTree> {
    if target_colors < 1 {
        return Err(PaletteError::invalid("target_colors", target_colors));
    }
    let mut builder = TreeBuilder::new(samples)?;

    while builder.leaf_count() < target_colors {
        match builder.step()? {
            Step::Split(_) => {}
            Step::Retired(id) => debug!(node = id, "retired unsplittable cluster"),
            Step::Exhausted => {
                warn!(
                    requested = target_colors,
                    produced = builder.leaf_count(),
                    "no splittable cluster left, stopping early"
                );
                break;
            }
        }
    }

    Ok(builder.finish(target_colors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(n: usize) -> Samples {
        let pixels = (0..n * n)
            .map(|i| {
                let v = (i * 255 / (n * n - 1)) as u8;
                [v, 255 - v, (i % 7) as u8 * 30]
            })
            .collect();
        Samples::new(n, n, pixels).unwrap()
    }

    #[test]
    fn rejects_zero_target() {
        let s = gradient(4);
        assert!(matches!(
            build(&s, 0),
            Err(PaletteError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn single_color_request_performs_no_split() {
        let s = gradient(4);
        let tree = build(&s, 1).unwrap();
        assert!(tree.root().is_leaf());
        assert!(tree.splits().is_empty());
        assert!(tree.is_complete());
    }

    #[test]
    fn ids_follow_the_largest_id_in_the_tree() {
        let s = gradient(8);
        let tree = build(&s, 4).unwrap();
        let ids: Vec<_> = tree.splits().iter().map(|r| (r.left, r.right)).collect();
        assert_eq!(ids, vec![(2, 3), (4, 5), (6, 7)]);
    }

    #[test]
    fn every_step_keeps_map_in_sync_with_leaves() {
        let s = gradient(8);
        let mut builder = TreeBuilder::new(&s).unwrap();
        for _ in 0..6 {
            let step = builder.step().unwrap();
            let leaf_ids: Vec<_> = builder.root().leaves().iter().map(|n| n.id()).collect();
            let histogram = builder.ownership().histogram();
            assert_eq!(histogram.keys().copied().collect::<Vec<_>>(), {
                let mut sorted = leaf_ids.clone();
                sorted.sort();
                sorted
            });
            assert_eq!(histogram.values().sum::<usize>(), s.len());
            if let Step::Split(r) = step {
                assert_eq!(r.left_pixels + r.right_pixels, r.parent_pixels);
            }
        }
    }
}
