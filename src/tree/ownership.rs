use std::collections::BTreeMap;

use super::node::{NodeId, ROOT_ID};

/// Which node owns each working-image pixel.
///
/// Same row-major layout as [`Samples`](crate::Samples). Only leaf ids ever
/// appear in the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnershipMap {
    width: usize,
    height: usize,
    owners: Vec<NodeId>,
}

impl OwnershipMap {
    /// Every pixel owned by the root.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            owners: vec![ROOT_ID; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn owner_at(&self, x: usize, y: usize) -> NodeId {
        self.owners[y * self.width + x]
    }

    /// Indices of the pixels owned by `id`, in row-major order.
    pub fn owned_by(&self, id: NodeId) -> impl Iterator<Item = usize> + '_ {
        self.owners
            .iter()
            .enumerate()
            .filter(move |(_, owner)| **owner == id)
            .map(|(index, _)| index)
    }

    pub fn count(&self, id: NodeId) -> usize {
        self.owners.iter().filter(|owner| **owner == id).count()
    }

    /// Pixel count per owning id.
    pub fn histogram(&self) -> BTreeMap<NodeId, usize> {
        self.owners.iter().fold(BTreeMap::new(), |mut counts, id| {
            *counts.entry(*id).or_insert(0) += 1;
            counts
        })
    }

    pub(crate) fn assign(&mut self, index: usize, id: NodeId) {
        self.owners[index] = id;
    }
}
