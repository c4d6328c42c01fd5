//! Label representations shared by all engines.

use std::collections::BTreeMap;

/// Crisp label of a point that belongs to no cluster.
pub const NOISE: i32 = -1;

/// Crisp label of a point not yet visited. Never present in a finished labeling.
pub const UNCLASSIFIED: i32 = -2;

/// Graded cluster membership of a single point.
///
/// Maps cluster ids (and the reserved [`NOISE`] id) to a degree in `[0, 1]`.
/// A point may belong to several clusters at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuzzyLabel {
    degrees: BTreeMap<i32, f32>,
}

impl FuzzyLabel {
    /// A label with full noise membership.
    pub fn noise() -> Self {
        let mut degrees = BTreeMap::new();
        degrees.insert(NOISE, 1.0);
        Self { degrees }
    }

    /// Membership degree for `cluster` (0 when absent).
    pub fn degree(&self, cluster: i32) -> f32 {
        self.degrees.get(&cluster).copied().unwrap_or(0.0)
    }

    /// Whether this point is noise.
    pub fn is_noise(&self) -> bool {
        self.degrees.contains_key(&NOISE)
    }

    /// Cluster ids this point belongs to, ascending, excluding noise.
    pub fn clusters(&self) -> impl Iterator<Item = i32> + '_ {
        self.degrees.keys().copied().filter(|&c| c != NOISE)
    }

    /// Cluster with the highest degree; ties go to the lower id.
    pub fn strongest(&self) -> Option<(i32, f32)> {
        self.iter()
            .filter(|&(c, _)| c != NOISE)
            .fold(None, |best: Option<(i32, f32)>, (c, d)| match best {
                Some((_, bd)) if bd >= d => best,
                _ => Some((c, d)),
            })
    }

    /// `(cluster, degree)` pairs in ascending cluster order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f32)> + '_ {
        self.degrees.iter().map(|(&c, &d)| (c, d))
    }

    /// Number of entries (noise included).
    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    /// Whether no membership has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Record `degree` for `cluster`, keeping the larger of two assignments.
    ///
    /// Joining a cluster clears a previous noise entry.
    pub(crate) fn assign(&mut self, cluster: i32, degree: f32) {
        debug_assert!((0.0..=1.0).contains(&degree));
        self.degrees.remove(&NOISE);
        let entry = self.degrees.entry(cluster).or_insert(degree);
        if degree > *entry {
            *entry = degree;
        }
    }
}

/// Output of a [`DensityModel`](crate::cluster::DensityModel).
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    /// One crisp label per point.
    Crisp(Vec<i32>),
    /// One graded label per point.
    Fuzzy(Vec<FuzzyLabel>),
}

impl Labels {
    /// Number of labeled points.
    pub fn len(&self) -> usize {
        match self {
            Labels::Crisp(l) => l.len(),
            Labels::Fuzzy(l) => l.len(),
        }
    }

    /// Whether no points were labeled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct clusters (noise excluded).
    pub fn cluster_count(&self) -> usize {
        let max = match self {
            Labels::Crisp(l) => l.iter().copied().max(),
            Labels::Fuzzy(l) => l.iter().flat_map(|f| f.clusters()).max(),
        };
        max.map_or(0, |m| (m + 1).max(0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_replaces_noise_and_keeps_max() {
        let mut label = FuzzyLabel::noise();
        assert!(label.is_noise());

        label.assign(0, 0.4);
        assert!(!label.is_noise());
        label.assign(0, 0.2);
        assert_eq!(label.degree(0), 0.4);
        label.assign(0, 0.9);
        assert_eq!(label.degree(0), 0.9);

        label.assign(3, 0.9);
        assert_eq!(label.clusters().collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(label.strongest(), Some((0, 0.9)));
    }

    #[test]
    fn cluster_count() {
        assert_eq!(Labels::Crisp(vec![0, 1, NOISE, 1]).cluster_count(), 2);
        assert_eq!(Labels::Crisp(vec![NOISE]).cluster_count(), 0);
        assert_eq!(Labels::Fuzzy(vec![FuzzyLabel::noise()]).cluster_count(), 0);
    }
}
