use std::collections::VecDeque;

use nalgebra::Vector3;

use super::stats::ClusterStats;

/// Identity of a cluster node. Unique within one tree and never reused.
pub type NodeId = u32;

/// Id of the root of every tree.
pub const ROOT_ID: NodeId = 1;

/// A node of the partition tree.
///
/// Leaf vs internal is carried by [`NodeKind`], so a node always has either
/// no children or exactly two.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterNode {
    id: NodeId,
    kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Owns pixels through the ownership map.
    Leaf {
        stats: ClusterStats,
        /// Set once a split attempt found no usable cut.
        exhausted: bool,
    },
    /// Split; its pixels belong to the children now.
    Internal {
        /// Mean color at the moment of the split.
        centroid: Vector3<f64>,
        left: Box<ClusterNode>,
        right: Box<ClusterNode>,
    },
}

impl ClusterNode {
    pub fn leaf(id: NodeId, stats: ClusterStats) -> Self {
        Self {
            id,
            kind: NodeKind::Leaf {
                stats,
                exhausted: false,
            },
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Statistics of a leaf; `None` for internal nodes, whose cached
    /// statistics would describe pixels they no longer own.
    pub fn stats(&self) -> Option<&ClusterStats> {
        match &self.kind {
            NodeKind::Leaf { stats, .. } => Some(stats),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Mean color: the leaf mean, or the centroid recorded when split.
    pub fn mean(&self) -> Vector3<f64> {
        match &self.kind {
            NodeKind::Leaf { stats, .. } => stats.mean,
            NodeKind::Internal { centroid, .. } => *centroid,
        }
    }

    pub fn children(&self) -> Option<(&ClusterNode, &ClusterNode)> {
        match &self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { left, right, .. } => Some((left, right)),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { exhausted: true, .. })
    }

    pub(crate) fn mark_exhausted(&mut self) {
        if let NodeKind::Leaf { exhausted, .. } = &mut self.kind {
            *exhausted = true;
        }
    }

    /// Turn this leaf into an internal node over `left` and `right`.
    /// Calling it on an internal node is a no-op returning `false`.
    pub(crate) fn attach_children(&mut self, left: ClusterNode, right: ClusterNode) -> bool {
        let centroid = match &self.kind {
            NodeKind::Leaf { stats, .. } => stats.mean,
            NodeKind::Internal { .. } => return false,
        };
        self.kind = NodeKind::Internal {
            centroid,
            left: Box::new(left),
            right: Box::new(right),
        };
        true
    }

    /// Visit every node breadth-first, left before right.
    pub fn visit_breadth_first<'a>(&'a self, mut visit: impl FnMut(&'a ClusterNode)) {
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            visit(node);
            if let Some((left, right)) = node.children() {
                queue.push_back(left);
                queue.push_back(right);
            }
        }
    }

    /// Leaves in breadth-first, left-before-right order.
    pub fn leaves(&self) -> Vec<&ClusterNode> {
        let mut leaves = Vec::new();
        self.visit_breadth_first(|node| {
            if node.is_leaf() {
                leaves.push(node);
            }
        });
        leaves
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit_breadth_first(|_| count += 1);
        count
    }

    pub fn max_id(&self) -> NodeId {
        let mut max = self.id;
        self.visit_breadth_first(|node| max = max.max(node.id));
        max
    }

    pub fn find(&self, id: NodeId) -> Option<&ClusterNode> {
        let mut found = None;
        self.visit_breadth_first(|node| {
            if found.is_none() && node.id == id {
                found = Some(node);
            }
        });
        found
    }

    pub(crate) fn find_mut(&mut self, id: NodeId) -> Option<&mut ClusterNode> {
        if self.id == id {
            return Some(self);
        }
        match &mut self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { left, right, .. } => {
                left.find_mut(id).or_else(move || right.find_mut(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: NodeId, mean: [f64; 3]) -> ClusterNode {
        ClusterNode::leaf(id, ClusterStats::single(Vector3::from(mean)))
    }

    #[test]
    fn attach_children_converts_leaf_to_internal() {
        let mut root = leaf(1, [10.0, 20.0, 30.0]);
        assert!(root.attach_children(leaf(2, [0.0; 3]), leaf(3, [1.0; 3])));
        assert!(!root.is_leaf());
        assert!(root.stats().is_none());
        assert_eq!(root.mean(), Vector3::new(10.0, 20.0, 30.0));
        assert!(!root.attach_children(leaf(4, [0.0; 3]), leaf(5, [0.0; 3])));
    }

    #[test]
    fn breadth_first_order_is_left_before_right() {
        let mut root = leaf(1, [0.0; 3]);
        root.attach_children(leaf(2, [0.0; 3]), leaf(3, [0.0; 3]));
        root.find_mut(2)
            .unwrap()
            .attach_children(leaf(4, [0.0; 3]), leaf(5, [0.0; 3]));

        let mut order = Vec::new();
        root.visit_breadth_first(|n| order.push(n.id()));
        assert_eq!(order, vec![1, 2, 3, 4, 5]);

        let leaves: Vec<_> = root.leaves().iter().map(|n| n.id()).collect();
        assert_eq!(leaves, vec![3, 4, 5]);
        assert_eq!(root.max_id(), 5);
        assert_eq!(root.node_count(), 5);
        assert_eq!(root.find(4).map(ClusterNode::id), Some(4));
        assert!(root.find(9).is_none());
    }
}
