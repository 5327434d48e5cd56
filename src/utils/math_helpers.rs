/// Smallest `f32` strictly greater than `v`.
///
/// `v` must not be NaN. `f32::MAX` steps to infinity.
#[inline]
pub fn next_up(v: f32) -> f32 {
    if v == 0.0 {
        // covers -0.0 as well
        return f32::from_bits(1);
    }
    let bits = v.to_bits();
    if v > 0.0 {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}

/// Length of the node array reserved for a tree of `max_depth`, `4^(max_depth + 1) - 1`.
///
/// Only the first `(4^(max_depth + 1) - 1) / 3` slots are ever addressed by the 4-ary
/// indexing; the array is kept at the full length so its size matches what GPU consumers
/// allocate for the same depth.
///
/// Returns `None` when the count overflows `usize`.
#[inline]
pub fn tree_length(max_depth: usize) -> Option<usize> {
    let exponent = u32::try_from(max_depth).ok()?.checked_add(1)?;
    4usize.checked_pow(exponent).map(|n| n - 1)
}

/// Index of the first node on `depth`, `(4^depth - 1) / 3`.
#[inline]
pub fn level_start(depth: usize) -> usize {
    let mut start = 0;
    let mut width = 1;
    for _ in 0..depth {
        start += width;
        width *= 4;
    }
    start
}
