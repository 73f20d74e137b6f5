use nalgebra::Vector3;
use palette::Srgb;

use super::build::ClusterTree;
use super::node::NodeId;

/// One leaf of a finished tree: a raw, unsorted palette entry.
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteEntry {
    pub id: NodeId,
    pub mean: Vector3<f64>,
    pub pixel_count: usize,
}

impl PaletteEntry {
    /// Mean color cast to 8-bit channels (fraction truncated).
    pub fn color(&self) -> Srgb<u8> {
        let channel = |v: f64| v.clamp(0.0, 255.0) as u8;
        Srgb::new(channel(self.mean.x), channel(self.mean.y), channel(self.mean.z))
    }
}

/// Every leaf of `tree`, breadth-first and left before right.
///
/// The order carries no meaning beyond being stable for a given tree.
pub fn collect(tree: &ClusterTree) -> Vec<PaletteEntry> {
    tree.root()
        .leaves()
        .into_iter()
        .filter_map(|leaf| {
            leaf.stats().map(|stats| PaletteEntry {
                id: leaf.id(),
                mean: stats.mean,
                pixel_count: stats.pixel_count,
            })
        })
        .collect()
}
