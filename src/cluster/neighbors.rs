//! Radius-neighborhood queries over a fixed dataset.
//!
//! Every density engine asks the same question: "which points lie within
//! radius `r` of point `i`?". [`NeighborQuery`] is that question; the
//! implementations trade memory for speed differently:
//!
//! - [`DistanceMatrix`]: all pairwise distances up front, O(n²) memory, any metric.
//! - [`KdNeighbors`]: KD-tree radius search, O(n) memory, Euclidean only.
//! - [`SortedScan`]: outward scan over an ascending 1-D array, no extra memory.

use std::ops::RangeInclusive;

use rayon::prelude::*;

use super::util;
use crate::distance::{squared_euclidean, Distance};
use crate::error::{Error, Result};
use crate::spatial::KdTree;

/// Neighborhood lookup used by the density engines.
pub trait NeighborQuery: Sync {
    /// Number of points.
    fn len(&self) -> usize;

    /// Whether there are no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ascending indices of points with distance strictly less than `radius`
    /// from point `index`, `index` itself included.
    fn neighbors(&self, index: usize, radius: f32) -> Vec<usize>;

    /// Distance between points `a` and `b`.
    fn distance(&self, a: usize, b: usize) -> f32;
}

/// How an engine answers neighbor queries over a 2-D (or n-D) dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NeighborStrategy {
    /// Materialize the full pairwise distance matrix (any metric).
    #[default]
    Precomputed,
    /// Search a KD-tree (Euclidean metric only).
    KdTree,
}

/// Dense, row-major matrix of pairwise distances.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    dists: Vec<f32>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances of `data` under `metric`.
    ///
    /// The metric is called once per unordered pair, with rows filled in
    /// parallel. Fails with [`Error::AllocationFailure`]
    /// if the `n × n` buffer cannot be reserved.
    pub fn new<D: Distance>(data: &[Vec<f32>], metric: &D) -> Result<Self> {
        util::dimension(data)?;
        let n = data.len();
        let cells = n
            .checked_mul(n)
            .ok_or(Error::AllocationFailure { requested: usize::MAX })?;

        let mut dists: Vec<f32> = Vec::new();
        dists
            .try_reserve_exact(cells)
            .map_err(|_| Error::AllocationFailure { requested: cells })?;
        dists.resize(cells, 0.0);

        if n > 0 {
            // Upper triangle in parallel, then mirrored: one metric call per pair.
            dists.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
                for (j, cell) in row.iter_mut().enumerate().skip(i + 1) {
                    *cell = metric.distance(&data[i], &data[j]);
                }
            });
            for i in 1..n {
                for j in 0..i {
                    dists[i * n + j] = dists[j * n + i];
                }
            }
        }

        Ok(Self { n, dists })
    }

    /// Distance between points `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.dists[i * self.n + j]
    }
}

impl NeighborQuery for DistanceMatrix {
    fn len(&self) -> usize {
        self.n
    }

    fn neighbors(&self, index: usize, radius: f32) -> Vec<usize> {
        let row = &self.dists[index * self.n..(index + 1) * self.n];
        row.iter()
            .enumerate()
            .filter(|(_, &d)| d < radius)
            .map(|(j, _)| j)
            .collect()
    }

    fn distance(&self, a: usize, b: usize) -> f32 {
        self.get(a, b)
    }
}

/// Euclidean neighbor queries backed by a [`KdTree`].
#[derive(Debug)]
pub struct KdNeighbors<'a> {
    tree: KdTree<'a>,
}

impl<'a> KdNeighbors<'a> {
    /// Index `data` in a KD-tree.
    pub fn new(data: &'a [Vec<f32>]) -> Result<Self> {
        Ok(Self {
            tree: KdTree::new(data)?,
        })
    }
}

impl NeighborQuery for KdNeighbors<'_> {
    fn len(&self) -> usize {
        self.tree.len()
    }

    fn neighbors(&self, index: usize, radius: f32) -> Vec<usize> {
        let points = self.tree.points();
        let center = &points[index];
        // Pad the tree search so rounding in `radius²` cannot drop a point the
        // exact check below accepts.
        let padded = radius * (1.0 + 4.0 * f32::EPSILON);
        let mut out: Vec<usize> = self
            .tree
            .neighborhood_of(index, padded)
            .into_iter()
            .filter(|&j| squared_euclidean(center, &points[j]).sqrt() < radius)
            .collect();
        out.sort_unstable();
        out
    }

    fn distance(&self, a: usize, b: usize) -> f32 {
        let points = self.tree.points();
        squared_euclidean(&points[a], &points[b]).sqrt()
    }
}

/// Neighbor queries over an ascending 1-D array.
///
/// The neighborhood of `i` is a contiguous run around `i`, found by scanning
/// outward while the coordinate difference stays below the radius.
#[derive(Debug, Clone, Copy)]
pub struct SortedScan<'a> {
    data: &'a [f32],
}

impl<'a> SortedScan<'a> {
    /// Wrap `data`, which must be sorted ascending.
    pub fn new(data: &'a [f32]) -> Result<Self> {
        util::check_sorted(data)?;
        Ok(Self { data })
    }

    /// Inclusive index range of points within `radius` of `data[index]`.
    pub fn range(&self, index: usize, radius: f32) -> RangeInclusive<usize> {
        let x = self.data[index];
        let mut lo = index;
        while lo > 0 && x - self.data[lo - 1] < radius {
            lo -= 1;
        }
        let mut hi = index;
        while hi + 1 < self.data.len() && self.data[hi + 1] - x < radius {
            hi += 1;
        }
        lo..=hi
    }

    /// Neighborhood size of `data[index]` (self included).
    pub fn count(&self, index: usize, radius: f32) -> usize {
        let r = self.range(index, radius);
        r.end() - r.start() + 1
    }

    /// The underlying values.
    pub fn values(&self) -> &'a [f32] {
        self.data
    }
}

impl NeighborQuery for SortedScan<'_> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn neighbors(&self, index: usize, radius: f32) -> Vec<usize> {
        self.range(index, radius).collect()
    }

    fn distance(&self, a: usize, b: usize) -> f32 {
        (self.data[a] - self.data[b]).abs()
    }
}

/// Neighbor source chosen by a [`NeighborStrategy`].
pub(crate) enum Neighbors<'a> {
    Matrix(DistanceMatrix),
    Tree(KdNeighbors<'a>),
}

impl<'a> Neighbors<'a> {
    /// Build the neighbor source for `data`.
    ///
    /// `NeighborStrategy::KdTree` is only reachable for Euclidean models, so
    /// the tree's geometry agrees with `metric`.
    pub(crate) fn build<D: Distance>(
        data: &'a [Vec<f32>],
        metric: &D,
        strategy: NeighborStrategy,
    ) -> Result<Self> {
        match strategy {
            NeighborStrategy::Precomputed => Ok(Neighbors::Matrix(DistanceMatrix::new(data, metric)?)),
            NeighborStrategy::KdTree => Ok(Neighbors::Tree(KdNeighbors::new(data)?)),
        }
    }
}

impl NeighborQuery for Neighbors<'_> {
    fn len(&self) -> usize {
        match self {
            Neighbors::Matrix(m) => m.len(),
            Neighbors::Tree(t) => t.len(),
        }
    }

    fn neighbors(&self, index: usize, radius: f32) -> Vec<usize> {
        match self {
            Neighbors::Matrix(m) => m.neighbors(index, radius),
            Neighbors::Tree(t) => t.neighbors(index, radius),
        }
    }

    fn distance(&self, a: usize, b: usize) -> f32 {
        match self {
            Neighbors::Matrix(m) => m.distance(a, b),
            Neighbors::Tree(t) => t.distance(a, b),
        }
    }
}
