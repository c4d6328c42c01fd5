use crate::error::{Error, Result};

/// Common dimension of `data`, or 0 when `data` is empty.
pub(crate) fn dimension(data: &[Vec<f32>]) -> Result<usize> {
    let Some(first) = data.first() else {
        return Ok(0);
    };
    let d = first.len();
    for point in data.iter().skip(1) {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
    }
    Ok(d)
}

/// Index of the first element breaking ascending order (NaN always breaks it).
pub(crate) fn check_sorted(data: &[f32]) -> Result<()> {
    if let Some(i) = data.iter().position(|x| x.is_nan()) {
        return Err(Error::Unsorted { index: i });
    }
    match data.windows(2).position(|w| w[1] < w[0]) {
        Some(i) => Err(Error::Unsorted { index: i + 1 }),
        None => Ok(()),
    }
}

/// Intersection of two ascending index sets.
pub(crate) fn intersection(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|` of two ascending index sets.
///
/// Returns 0 when the intersection is empty (including when both are empty).
pub fn jaccard(a: &[usize], b: &[usize]) -> f64 {
    let common = intersection(a, b).len();
    if common == 0 {
        return 0.0;
    }
    let union = a.len() + b.len() - common;
    common as f64 / union as f64
}

/// Group crisp labels into ascending member lists, one per cluster id.
///
/// Noise (negative labels) is skipped.
pub(crate) fn members(labels: &[i32]) -> Vec<Vec<usize>> {
    let n_clusters = labels.iter().copied().max().map_or(0, |m| (m + 1).max(0)) as usize;
    let mut out = vec![Vec::new(); n_clusters];
    for (i, &l) in labels.iter().enumerate() {
        if l >= 0 {
            out[l as usize].push(i);
        }
    }
    out
}

/// Split an object × frame × coordinate dataset into per-frame point sets.
pub(crate) fn frames(data: &[Vec<Vec<f32>>]) -> Result<Vec<Vec<Vec<f32>>>> {
    let Some(first) = data.first() else {
        return Ok(Vec::new());
    };
    let n_frames = first.len();
    for (object, track) in data.iter().enumerate() {
        if track.len() != n_frames {
            return Err(Error::FrameCountMismatch {
                object,
                expected: n_frames,
                found: track.len(),
            });
        }
    }

    Ok((0..n_frames)
        .map(|t| data.iter().map(|track| track[t].clone()).collect())
        .collect())
}
