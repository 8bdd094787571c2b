//! Min-max normalization to the published 0..=100 scale.

/// Value every node receives when all raw values are equal.
pub const DEGENERATE_MIDPOINT: f64 = 50.0;

/// Rescales `raw` to 0..=100: the minimum maps to 0 and the maximum to 100.
/// When every value is equal, every value maps to [`DEGENERATE_MIDPOINT`].
pub fn min_max(raw: &[f64]) -> Vec<f64> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if raw.is_empty() || max <= min {
        return vec![DEGENERATE_MIDPOINT; raw.len()];
    }
    let span = max - min;
    raw.iter()
        .map(|&v| (100.0 * (v - min) / span).clamp(0.0, 100.0))
        .collect()
}

/// Rounds half up and clamps to 0..=100.
///
/// Rounding half up is `floor(x + 0.5)`, which commutes with integer shifts,
/// so `a >= b - m` for an integer `m` still holds after rounding both sides.
#[inline]
pub fn to_score(value: f64) -> u8 {
    (value + 0.5).floor().clamp(0.0, 100.0) as u8
}
