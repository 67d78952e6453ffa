//! `binarize`: the top-P selection rule shared by the dyadic and
//! triadic query paths.
//!
//! Given an accumulator vector, select the positions holding the `p`
//! largest values, breaking ties by inclusion rather than by
//! truncation — the resulting SDR may therefore be longer than `p`
//! when there are ties at the threshold, and shorter than `p` when
//! fewer than `p` cells are nonzero. Both call sites depend on this
//! exact behavior for recall symmetry, so it is implemented once here.

/// Selects the top-`p` positions of `sums`, ties included.
///
/// `p` is clamped to `sums.len()`. Uses `select_nth_unstable` to find
/// the threshold in expected linear time rather than sorting the whole
/// vector.
pub fn binarize(sums: &[u32], p: usize) -> Vec<u32> {
    let n = sums.len();
    if n == 0 || p == 0 {
        return Vec::new();
    }
    let p = p.min(n);

    // threshval = the p-th largest value == the (n-p)-th smallest
    // (0-indexed) once sorted ascending.
    let mut copy = sums.to_vec();
    let k = n - p;
    let (_, theta, _) = copy.select_nth_unstable(k);
    let theta = *theta;

    if theta == 0 {
        (0..n as u32).filter(|&idx| sums[idx as usize] != 0).collect()
    } else {
        (0..n as u32).filter(|&idx| sums[idx as usize] >= theta).collect()
    }
}
