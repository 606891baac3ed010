//! Planar Euclidean distances between stations.

/// Computes Euclidean distances from `target` to every candidate.
///
/// # Panics
///
/// Debug-asserts that `out.len() == candidates.len()`.
pub(crate) fn distances(target: (f64, f64), candidates: &[(f64, f64)], out: &mut [f64]) {
    debug_assert_eq!(out.len(), candidates.len());
    let (tx, ty) = target;
    for (o, &(cx, cy)) in out.iter_mut().zip(candidates.iter()) {
        let dx = cx - tx;
        let dy = cy - ty;
        *o = (dx * dx + dy * dy).sqrt();
    }
}
