//! Density-based clustering algorithms.
//!
//! Everything here is a variation on one idea: a point is *core* when its
//! neighborhood is dense, and core points that are neighbors of each other
//! form a cluster together with their non-core neighbors. Points reached by
//! no core point are noise.
//!
//! ## Crisp vs Fuzzy
//!
//! **Crisp** engines assign each point one integer label: a cluster id
//! starting at 0, or [`NOISE`].
//!
//! **Fuzzy** engines replace the yes/no decisions with degrees in `[0, 1]`.
//! A point near two clusters can belong to both, a little. Each point gets a
//! [`FuzzyLabel`] mapping cluster ids to degrees.
//!
//! ## Algorithms
//!
//! | Type            | Input                        | Output                      |
//! |-----------------|------------------------------|-----------------------------|
//! | [`Dbscan`]      | points                       | crisp labels                |
//! | [`FuzzyDbscan`] | points                       | fuzzy labels                |
//! | [`DensityModel`]| points                       | either, chosen by [`Variant`] |
//! | [`DbPack`], [`BorderPack`], [`CorePack`] | ascending 1-D values | crisp / fuzzy labels |
//! | [`MovingDbscan`]| object × frame × coordinate  | global cluster id per frame |
//! | [`Cmc`]         | object × frame × coordinate  | [`Convoy`]s                 |
//! | [`Tdbscan`]     | time-ordered trajectory      | stop/move segments          |
//!
//! Neighborhoods are strict (`distance < epsilon`) and include the point
//! itself, so `min_pts = 1` makes every point core.
//!
//! ## Usage
//!
//! ```rust
//! use dbclust::cluster::{Clustering, DbPack, Dbscan, FuzzyClustering, FuzzyDbscan, NOISE};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//!     vec![50.0, 50.0],
//! ];
//!
//! // Crisp DBSCAN, with the KD-tree answering neighbor queries
//! let labels = Dbscan::new(0.5, 2).unwrap().with_kdtree().predict(&data).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1, NOISE]);
//!
//! // Fuzzy borders
//! let labels = FuzzyDbscan::border(0.5, 1.0, 2).unwrap().predict(&data).unwrap();
//! assert!(labels[4].is_noise());
//!
//! // Sorted 1-D values
//! let labels = DbPack::new(2.0, 2).unwrap().predict(&[1.0, 2.0, 3.0, 10.0, 11.0, 50.0]).unwrap();
//! assert_eq!(labels, vec![0, 0, 0, 1, 1, NOISE]);
//! ```

mod convoy;
mod dbscan;
mod fuzzy;
mod label;
mod moving;
mod neighbors;
mod pack;
mod tdbscan;
mod traits;
pub mod util;
mod variant;

pub use convoy::{Cmc, Convoy};
pub use dbscan::{Dbscan, DbscanExt};
pub use fuzzy::{core_membership, distance_membership, FuzzyDbscan, FuzzyVariant};
pub use label::{FuzzyLabel, Labels, NOISE, UNCLASSIFIED};
pub use moving::MovingDbscan;
pub use neighbors::{DistanceMatrix, KdNeighbors, NeighborQuery, NeighborStrategy, SortedScan};
pub use pack::{BorderPack, CorePack, DbPack};
pub use tdbscan::{SegmentKind, TrajectoryLabel, Tdbscan};
pub use traits::{Clustering, FuzzyClustering};
pub use variant::{DensityModel, Variant};
