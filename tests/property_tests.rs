use dbclust::cluster::{
    Clustering, DbPack, Dbscan, FuzzyClustering, FuzzyDbscan, NOISE, UNCLASSIFIED,
};
use dbclust::distance::{Distance, Euclidean};
use dbclust::spatial::KdTree;
use proptest::prelude::*;

fn points(max_len: usize) -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(prop::collection::vec(-10.0f32..10.0, 2), 0..max_len)
}

fn sorted_ints() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(0i32..60, 0..40).prop_map(|mut v| {
        v.sort_unstable();
        v.into_iter().map(|x| x as f32).collect()
    })
}

fn neighbors(data: &[Vec<f32>], i: usize, eps: f32) -> Vec<usize> {
    (0..data.len())
        .filter(|&j| Euclidean.distance(&data[i], &data[j]) < eps)
        .collect()
}

fn sq_dist(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

proptest! {
    #[test]
    fn prop_dbscan_is_deterministic(
        data in points(40),
        eps in 0.5f32..4.0,
        min_pts in 1usize..6,
    ) {
        let model = Dbscan::new(eps, min_pts).unwrap();
        let first = model.predict(&data).unwrap();
        let second = model.predict(&data).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, model.with_kdtree().predict(&data).unwrap());
    }

    #[test]
    fn prop_core_neighbors_share_cluster(
        data in points(40),
        eps in 0.5f32..4.0,
        min_pts in 1usize..6,
    ) {
        let labels = Dbscan::new(eps, min_pts).unwrap().predict(&data).unwrap();
        let is_core: Vec<bool> = (0..data.len())
            .map(|i| neighbors(&data, i, eps).len() >= min_pts)
            .collect();

        for (p, &core) in is_core.iter().enumerate() {
            if !core {
                continue;
            }
            prop_assert!(labels[p] >= 0);
            for q in neighbors(&data, p, eps) {
                // Borders reachable from two clusters stay with the first.
                prop_assert!(labels[q] >= 0);
                if is_core[q] {
                    prop_assert_eq!(labels[q], labels[p]);
                }
            }
        }
    }

    #[test]
    fn prop_noise_has_no_core_neighbor(
        data in points(40),
        eps in 0.5f32..4.0,
        min_pts in 1usize..6,
    ) {
        let labels = Dbscan::new(eps, min_pts).unwrap().predict(&data).unwrap();
        for (i, &label) in labels.iter().enumerate() {
            prop_assert!(label != UNCLASSIFIED);
            if label == NOISE {
                for j in neighbors(&data, i, eps) {
                    prop_assert!(neighbors(&data, j, eps).len() < min_pts);
                }
            }
        }
    }

    #[test]
    fn prop_fuzzy_degrees_are_bounded(
        data in points(30),
        min_eps in 0.3f32..2.0,
        spread in 0.0f32..2.0,
        min_pts in 1usize..4,
        extra in 0usize..4,
    ) {
        let max_eps = min_eps + spread;
        let models = [
            FuzzyDbscan::core(max_eps, min_pts, min_pts + extra).unwrap(),
            FuzzyDbscan::border(min_eps, max_eps, min_pts).unwrap(),
            FuzzyDbscan::combined(min_eps, max_eps, min_pts, min_pts + extra).unwrap(),
        ];
        for model in models {
            let labels = model.predict(&data).unwrap();
            prop_assert_eq!(labels.len(), data.len());
            for label in &labels {
                prop_assert!(!label.is_empty());
                if label.is_noise() {
                    prop_assert_eq!(label.len(), 1);
                    prop_assert_eq!(label.degree(NOISE), 1.0);
                }
                for (_, degree) in label.iter() {
                    prop_assert!((0.0..=1.0).contains(&degree));
                }
            }
        }
    }

    #[test]
    fn prop_dbpack_matches_dbscan(
        data in sorted_ints(),
        half_eps in 1u8..8,
        min_pts in 1usize..6,
    ) {
        // Integer coordinates and half-integer radii keep distances exact.
        let eps = half_eps as f32 - 0.5;
        let points: Vec<Vec<f32>> = data.iter().map(|&x| vec![x]).collect();
        let expected = Dbscan::new(eps, min_pts).unwrap().predict(&points).unwrap();
        prop_assert_eq!(DbPack::new(eps, min_pts).unwrap().predict(&data).unwrap(), expected);
    }

    #[test]
    fn prop_dbpack_extend(
        data in sorted_ints(),
        split in 0usize..40,
        half_eps in 1u8..8,
        min_pts in 1usize..6,
    ) {
        let eps = half_eps as f32 - 0.5;
        let pack = DbPack::new(eps, min_pts).unwrap();
        let split = split.min(data.len());
        let prior = pack.predict(&data[..split]).unwrap();

        let labels = pack.extend(&data, &prior).unwrap();
        prop_assert_eq!(labels.len(), data.len());
        prop_assert!(labels.iter().all(|&l| l != UNCLASSIFIED));
        for (old, new) in prior.iter().zip(&labels) {
            if *old >= 0 {
                prop_assert_eq!(old, new);
            }
        }
        prop_assert_eq!(pack.extend(&data, &labels).unwrap(), labels);
    }

    #[test]
    fn prop_kdtree_matches_brute_force(
        data in points(60),
        query in prop::collection::vec(-12.0f32..12.0, 2),
        radius in 0.1f32..6.0,
    ) {
        let tree = KdTree::new(&data).unwrap();

        let mut found = tree.neighborhood(&query, radius).unwrap();
        found.sort_unstable();
        let expected: Vec<usize> = (0..data.len())
            .filter(|&i| sq_dist(&query, &data[i]) <= radius * radius)
            .collect();
        prop_assert_eq!(found, expected);

        match tree.nearest(&query).unwrap() {
            None => prop_assert!(data.is_empty()),
            Some(nearest) => {
                let best = data
                    .iter()
                    .map(|p| sq_dist(&query, p))
                    .fold(f32::INFINITY, f32::min);
                prop_assert_eq!(nearest.squared_distance, best);
            }
        }
    }
}
