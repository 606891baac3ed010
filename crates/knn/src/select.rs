//! Partial selection under a NaN-last ordering.

use std::cmp::Ordering;

/// Total order on `f64` that places NaN after every number.
///
/// Two NaNs compare equal; numbers compare ascending.
#[inline]
pub fn nan_last_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}

/// Reorders `items` so that the first `k` are the `k` smallest under `cmp`.
///
/// Runs in expected linear time. Order inside the first `k` and inside the
/// remainder is unspecified. `k == 0` or `k >= items.len()` leaves the
/// slice untouched.
pub fn partial_select_by<T, F>(items: &mut [T], k: usize, cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if k == 0 || k >= items.len() {
        return;
    }
    items.select_nth_unstable_by(k, cmp);
}

/// Selects the `k` nearest candidates from a list of distances.
///
/// `eligible` filters candidates before selection. Retained pairs end up
/// in `nn_indices` ordered by ascending distance. At equal distance the
/// `preferred` index comes first, then lower indices. With `k == 0` every
/// eligible candidate is kept.
pub(crate) fn select_k_nearest(
    dists: &[f64],
    k: usize,
    preferred: Option<usize>,
    eligible: impl Fn(usize, f64) -> bool,
    pairs: &mut Vec<(f64, usize)>,
    nn_indices: &mut Vec<usize>,
) {
    pairs.clear();
    pairs.extend(
        dists
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, d)| eligible(i, d))
            .map(|(i, d)| (d, i)),
    );

    let by_distance = |a: &(f64, usize), b: &(f64, usize)| {
        nan_last_cmp(a.0, b.0)
            .then_with(|| (Some(a.1) != preferred).cmp(&(Some(b.1) != preferred)))
            .then_with(|| a.1.cmp(&b.1))
    };
    if k > 0 {
        partial_select_by(pairs, k, by_distance);
        pairs.truncate(k);
    }
    pairs.sort_unstable_by(by_distance);

    nn_indices.clear();
    nn_indices.extend(pairs.iter().map(|&(_, i)| i));
}
