//! Numeric conversion helpers centralizing the grid-to-float casts.

use num_traits::cast::cast;

/// Convert a column index or count to f64, returning 0.0 if it cannot be represented.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert a row index or count to f64.
#[must_use]
pub fn u16_to_f64(value: u16) -> f64 {
    f64::from(value)
}

/// Clamp a normalized coordinate into `[0, 1]`, mapping non-finite input to 0.0.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
