//! Spectral partition tree.
//!
//! Pixels of the working image are split recursively in RGB space. Each
//! round takes the leaf whose colors vary most, cuts it with a plane through
//! its mean perpendicular to its principal axis, and recomputes statistics
//! for the two halves. Leaves of the finished tree are the palette.
//!
//! ```
//! use palettely::Samples;
//! use palettely::tree::{build, collect};
//!
//! let samples = Samples::from_rows(&[
//!     vec![[255, 0, 0], [255, 0, 0]],
//!     vec![[0, 0, 255], [0, 0, 255]],
//! ])?;
//! let tree = build(&samples, 2)?;
//! assert_eq!(collect(&tree).len(), 2);
//! # Ok::<(), palettely::PaletteError>(())
//! ```

pub mod build;
pub mod collect;
pub mod node;
pub mod ownership;
pub mod select;
pub mod split;
pub mod stats;

pub use build::{ClusterTree, SplitRecord, Step, TreeBuilder, build};
pub use collect::{PaletteEntry, collect};
pub use node::{ClusterNode, NodeId, NodeKind, ROOT_ID};
pub use ownership::OwnershipMap;
pub use select::{Candidate, MIN_SPLIT_VARIANCE, select};
pub use split::{Partition, PrincipalAxis, SplitOutcome, principal_axis, split};
pub use stats::ClusterStats;
