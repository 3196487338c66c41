//! Theoretical storage bound for a correlation-matrix associative memory.

/// Maximum number of pairs a BAM with smaller encoded dimension `n` can
/// reliably hold: `floor(n / (2 * log2(n)))`.
///
/// For `n <= 1` the logarithm is zero (or undefined), so the bound is 0.
pub fn max_pairs(n: usize) -> i64 {
    if n <= 1 {
        return 0;
    }
    let n = n as f64;
    let raw = (n / (2.0 * n.log2())).floor();
    if raw < 0.0 {
        0
    } else {
        raw as i64
    }
}
