//! Spatial indexing for neighbor queries.
//!
//! [`KdTree`] is a static, read-only KD-tree over a borrowed point set. It is
//! what the density engines use (through
//! [`NeighborStrategy::KdTree`](crate::cluster::NeighborStrategy)) to answer
//! radius queries without materializing an `n × n` distance matrix.

mod kdtree;

pub use kdtree::{KdTree, Nearest};
