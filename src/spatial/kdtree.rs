//! KD-tree: binary space partitioning on axes cycled by depth.
//!
//! # Construction
//!
//! At depth `d` the current index range is sorted on axis `d mod dim` and
//! split at its median. The median point becomes the node; the lower half
//! builds the left subtree and the upper half the right subtree. Empty ranges
//! terminate the recursion (`None` children). A zero-dimensional dataset has
//! no axis to split on and gets no nodes; all of its points coincide.
//!
//! Left and right subtrees are independent, so large ranges are built on
//! both sides in parallel with `rayon::join`.
//!
//! # Queries
//!
//! Both queries descend first into the half-space that contains the query
//! point and only then consider the far side:
//!
//! - [`KdTree::nearest`] visits the far side only if the squared distance to
//!   the splitting plane does not exceed the best squared distance so far.
//! - [`KdTree::neighborhood`] visits it only if that plane distance does not
//!   exceed `radius²`.
//!
//! All distances are (squared) Euclidean.
//!
//! ## Complexity
//!
//! - **Build**: O(n log² n) (a sort per level).
//! - **Nearest**: O(log n) expected for well-spread data, O(n) worst case.

use crate::cluster::util;
use crate::distance::squared_euclidean;
use crate::error::{Error, Result};

/// Subtrees at least this large are built in parallel.
const PARALLEL_BUILD_MIN: usize = 1024;

/// Result of a nearest-point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Index of the nearest point in the indexed dataset.
    pub index: usize,
    /// Squared Euclidean distance from the query to that point.
    pub squared_distance: f32,
}

impl Nearest {
    /// Euclidean distance from the query to the nearest point.
    pub fn distance(&self) -> f32 {
        self.squared_distance.sqrt()
    }
}

#[derive(Debug)]
struct KdNode<'a> {
    point: &'a [f32],
    index: usize,
    axis: usize,
    left: Option<Box<KdNode<'a>>>,
    right: Option<Box<KdNode<'a>>>,
}

/// A static KD-tree over a borrowed dataset.
#[derive(Debug)]
pub struct KdTree<'a> {
    points: &'a [Vec<f32>],
    root: Option<Box<KdNode<'a>>>,
    dim: usize,
}

impl<'a> KdTree<'a> {
    /// Build a tree over `points`.
    ///
    /// An empty dataset yields an empty tree whose queries return nothing.
    /// Points of differing dimension are rejected.
    pub fn new(points: &'a [Vec<f32>]) -> Result<Self> {
        let dim = util::dimension(points)?;

        // Zero-dimensional points all coincide; there is no axis to split on.
        let root = if dim == 0 {
            None
        } else {
            let mut order: Vec<usize> = (0..points.len()).collect();
            build(points, &mut order, 0, dim)
        };

        Ok(Self { points, root, dim })
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree indexes no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimensionality of the indexed points (0 for an empty tree).
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// The indexed dataset.
    pub fn points(&self) -> &'a [Vec<f32>] {
        self.points
    }

    /// The closest indexed point to `query`.
    ///
    /// Ties are resolved in favor of the point found first during traversal.
    /// Returns `Ok(None)` on an empty tree.
    pub fn nearest(&self, query: &[f32]) -> Result<Option<Nearest>> {
        if self.is_empty() {
            return Ok(None);
        }
        self.check_query(query)?;
        let Some(root) = &self.root else {
            return Ok(Some(Nearest {
                index: 0,
                squared_distance: 0.0,
            }));
        };

        let mut best = None;
        nearest_in(root, query, &mut best);
        Ok(best)
    }

    /// Index of the closest indexed point to `query`.
    pub fn nearest_index(&self, query: &[f32]) -> Result<Option<usize>> {
        Ok(self.nearest(query)?.map(|n| n.index))
    }

    /// Coordinates of the closest indexed point to `query`.
    pub fn nearest_point(&self, query: &[f32]) -> Result<Option<&'a [f32]>> {
        Ok(self
            .nearest(query)?
            .map(|n| self.points[n.index].as_slice()))
    }

    /// Indices of all points within `radius` of `query` (squared distance ≤ radius²).
    ///
    /// Indices are returned in traversal order.
    pub fn neighborhood(&self, query: &[f32], radius: f32) -> Result<Vec<usize>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        self.check_query(query)?;
        Ok(self.neighborhood_unchecked(query, radius))
    }

    /// Neighborhood of the indexed point `index`, which needs no dimension check.
    pub(crate) fn neighborhood_of(&self, index: usize, radius: f32) -> Vec<usize> {
        self.neighborhood_unchecked(&self.points[index], radius)
    }

    fn neighborhood_unchecked(&self, query: &[f32], radius: f32) -> Vec<usize> {
        let r2 = radius * radius;
        match &self.root {
            Some(root) => {
                let mut out = Vec::new();
                neighborhood_in(root, query, r2, &mut out);
                out
            }
            None => (0..self.points.len()).collect(),
        }
    }

    /// Coordinates of all points within `radius` of `query`.
    pub fn neighborhood_points(&self, query: &[f32], radius: f32) -> Result<Vec<&'a [f32]>> {
        Ok(self
            .neighborhood(query, radius)?
            .into_iter()
            .map(|i| self.points[i].as_slice())
            .collect())
    }

    fn check_query(&self, query: &[f32]) -> Result<()> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                found: query.len(),
            });
        }
        Ok(())
    }
}

fn build<'a>(
    points: &'a [Vec<f32>],
    order: &mut [usize],
    depth: usize,
    dim: usize,
) -> Option<Box<KdNode<'a>>> {
    if order.is_empty() {
        return None;
    }

    let axis = depth % dim;
    order.sort_by(|&a, &b| points[a][axis].total_cmp(&points[b][axis]).then(a.cmp(&b)));

    let len = order.len();
    let mid = len / 2;
    let index = order[mid];
    let (lower, rest) = order.split_at_mut(mid);
    let upper = &mut rest[1..];

    let (left, right) = if len >= PARALLEL_BUILD_MIN {
        rayon::join(
            || build(points, lower, depth + 1, dim),
            || build(points, upper, depth + 1, dim),
        )
    } else {
        (
            build(points, lower, depth + 1, dim),
            build(points, upper, depth + 1, dim),
        )
    };

    Some(Box::new(KdNode {
        point: &points[index],
        index,
        axis,
        left,
        right,
    }))
}

/// Near side first: the child on the query's side of the splitting plane.
#[inline]
fn sides<'n, 'a>(
    node: &'n KdNode<'a>,
    query: &[f32],
) -> (f32, &'n Option<Box<KdNode<'a>>>, &'n Option<Box<KdNode<'a>>>) {
    let dx = node.point[node.axis] - query[node.axis];
    if dx > 0.0 {
        (dx, &node.left, &node.right)
    } else {
        (dx, &node.right, &node.left)
    }
}

fn nearest_in(node: &KdNode<'_>, query: &[f32], best: &mut Option<Nearest>) {
    let d = squared_euclidean(node.point, query);
    if best.map_or(true, |b| d < b.squared_distance) {
        *best = Some(Nearest {
            index: node.index,
            squared_distance: d,
        });
    }

    let (dx, near, far) = sides(node, query);
    if let Some(near) = near {
        nearest_in(near, query, best);
    }
    if let Some(far) = far {
        if best.map_or(true, |b| dx * dx <= b.squared_distance) {
            nearest_in(far, query, best);
        }
    }
}

fn neighborhood_in(node: &KdNode<'_>, query: &[f32], r2: f32, out: &mut Vec<usize>) {
    if squared_euclidean(node.point, query) <= r2 {
        out.push(node.index);
    }

    let (dx, near, far) = sides(node, query);
    if let Some(near) = near {
        neighborhood_in(near, query, r2, out);
    }
    if let Some(far) = far {
        if dx * dx <= r2 {
            neighborhood_in(far, query, r2, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn random_points(n: usize, dim: usize, seed: u64) -> Vec<Vec<f32>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| (0..dim).map(|_| rng.random_range(-10.0f32..10.0)).collect())
            .collect()
    }

    fn brute_nearest(points: &[Vec<f32>], query: &[f32]) -> (usize, f32) {
        let mut best = (usize::MAX, f32::INFINITY);
        for (i, p) in points.iter().enumerate() {
            let d = squared_euclidean(p, query);
            if d < best.1 {
                best = (i, d);
            }
        }
        best
    }

    #[test]
    fn nearest_matches_brute_force() {
        let points = random_points(200, 3, 42);
        let tree = KdTree::new(&points).unwrap();

        for (i, p) in points.iter().enumerate() {
            let found = tree.nearest(p).unwrap().unwrap();
            assert_eq!(found.index, i);
            assert_eq!(found.squared_distance, 0.0);
        }

        let queries = random_points(200, 3, 7);
        for q in &queries {
            let found = tree.nearest(q).unwrap().unwrap();
            let (idx, d) = brute_nearest(&points, q);
            assert_eq!(found.squared_distance, d);
            assert_eq!(found.index, idx);
        }
    }

    #[test]
    fn neighborhood_matches_brute_force() {
        let points = random_points(300, 2, 3);
        let tree = KdTree::new(&points).unwrap();
        let radius = 2.5;

        for q in points.iter().take(50) {
            let mut found = tree.neighborhood(q, radius).unwrap();
            found.sort_unstable();
            let expected: Vec<usize> = points
                .iter()
                .enumerate()
                .filter(|(_, p)| squared_euclidean(p, q) <= radius * radius)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn parallel_build_is_consistent() {
        let points = random_points(3000, 2, 11);
        let tree = KdTree::new(&points).unwrap();
        let q = [0.5, -0.5];
        let found = tree.nearest(&q).unwrap().unwrap();
        let (idx, d) = brute_nearest(&points, &q);
        assert_eq!(found.index, idx);
        assert_eq!(found.squared_distance, d);
    }

    #[test]
    fn empty_tree_returns_nothing() {
        let points: Vec<Vec<f32>> = vec![];
        let tree = KdTree::new(&points).unwrap();
        assert!(tree.is_empty());
        assert!(tree.nearest(&[1.0, 2.0]).unwrap().is_none());
        assert!(tree.neighborhood(&[1.0], 5.0).unwrap().is_empty());
    }

    #[test]
    fn point_accessors() {
        let points = vec![vec![0.0, 0.0], vec![5.0, 5.0], vec![0.5, 0.0]];
        let tree = KdTree::new(&points).unwrap();
        assert_eq!(tree.nearest_index(&[4.0, 4.0]).unwrap(), Some(1));
        assert_eq!(
            tree.nearest_point(&[0.4, 0.1]).unwrap(),
            Some(&[0.5f32, 0.0][..])
        );
        let mut near = tree.neighborhood_points(&[0.0, 0.0], 1.0).unwrap();
        near.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(near, vec![&[0.0f32, 0.0][..], &[0.5f32, 0.0][..]]);
    }

    #[test]
    fn duplicate_points_are_all_found() {
        let points = vec![vec![1.0, 1.0]; 5];
        let tree = KdTree::new(&points).unwrap();
        let mut found = tree.neighborhood(&[1.0, 1.0], 0.0).unwrap();
        found.sort_unstable();
        assert_eq!(found, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn zero_dimensional_points_coincide() {
        let points = vec![Vec::new(); 3];
        let tree = KdTree::new(&points).unwrap();
        assert_eq!(tree.dimension(), 0);
        assert_eq!(tree.nearest_index(&[]).unwrap(), Some(0));
        assert_eq!(tree.neighborhood(&[], 0.5).unwrap(), vec![0, 1, 2]);
        assert_eq!(tree.neighborhood_of(1, 0.5), vec![0, 1, 2]);
        assert!(tree.nearest(&[1.0]).is_err());
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let ragged = vec![vec![0.0, 0.0], vec![1.0]];
        assert!(matches!(
            KdTree::new(&ragged),
            Err(Error::DimensionMismatch { expected: 2, found: 1 })
        ));

        let points = vec![vec![0.0, 0.0]];
        let tree = KdTree::new(&points).unwrap();
        assert!(tree.nearest(&[0.0]).is_err());
    }
}
