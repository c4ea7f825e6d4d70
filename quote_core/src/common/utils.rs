/// Price value, quoted with two decimals
pub type Price = f64;

/// Longest moving-average window or RSI period, in simulated days
pub const MAX_LOOKBACK: usize = 100_000;

/// Round to two decimal places
pub fn round2(v: f64) -> f64 {
    let scaled = v * 100.0;
    if !scaled.is_finite() {
        // already integral at this magnitude
        return v;
    }
    scaled.round() / 100.0
}

/// Arithmetic mean, `None` for an empty slice.
///
/// Accumulated incrementally so that a run of identical values averages to
/// exactly that value.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    let mut avg = *first;
    for (i, v) in rest.iter().enumerate() {
        avg += (v - avg) / (i + 2) as f64;
    }
    Some(avg)
}
