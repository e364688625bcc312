//! NaN-aware float helpers shared by the style and layout crates.
//!
//! Layout code uses `f64::NAN` as the "undefined" marker, so plain `==` is
//! not enough when comparing two unset values.

/// Tolerance used by [`approx_eq`].
pub const EPSILON: f64 = 0.0001;

/// Compare two values, treating two NaNs as equal.
#[inline]
pub fn approx_eq(lhs: f64, rhs: f64) -> bool {
    if !lhs.is_nan() && !rhs.is_nan() {
        return (lhs - rhs).abs() < EPSILON;
    }
    lhs.is_nan() && rhs.is_nan()
}

/// Clamp `value` into `[min, max]`, with `min` winning when the bounds cross.
#[inline]
pub fn clamp_inner(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
