//! Memoized results of earlier layout requests.

use flex_style::{MeasureMode, approx_eq};

use crate::layout_box::round_value;

/// Measurement entries kept per node before eviction kicks in.
pub(crate) const MAX_CACHED_MEASUREMENTS: usize = 20;
/// Entries dropped from the front once the cap is exceeded.
pub(crate) const EVICTED_MEASUREMENTS: usize = 10;

/// One request/result pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutCache {
    /// Available width of the request.
    pub width: f64,
    /// Available height of the request.
    pub height: f64,
    pub computed_width: f64,
    pub computed_height: f64,
    pub width_mode: MeasureMode,
    pub height_mode: MeasureMode,
}

impl LayoutCache {
    /// Exact match of the request, NaN-aware.
    pub fn is_equal(&self, width: f64, height: f64, width_mode: MeasureMode, height_mode: MeasureMode) -> bool {
        approx_eq(self.width, width)
            && approx_eq(self.height, height)
            && self.width_mode == width_mode
            && self.height_mode == height_mode
    }

    /// Whether this entry answers a new request for a measured leaf.
    ///
    /// Requests match after rounding to the pixel grid, or when the new
    /// constraint provably yields the same computed size.
    #[allow(
        clippy::too_many_arguments,
        reason = "Mirrors the request tuple plus margins and scale"
    )]
    pub fn validate(
        &self,
        width: f64,
        height: f64,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        margin_row: f64,
        margin_column: f64,
        scale: f64,
    ) -> bool {
        if self.computed_width < 0.0 || self.computed_height < 0.0 {
            return false;
        }
        let snap = |value: f64| {
            if scale == 0.0 {
                value
            } else {
                round_value(value, scale, false, false)
            }
        };
        let same_width = self.width_mode == width_mode && approx_eq(snap(width), snap(self.width));
        let same_height = self.height_mode == height_mode && approx_eq(snap(height), snap(self.height));
        let compatible_width = Self::validate_size(
            width_mode,
            width - margin_row,
            self.width_mode,
            self.width,
            self.computed_width,
        );
        let compatible_height = Self::validate_size(
            height_mode,
            height - margin_column,
            self.height_mode,
            self.height,
            self.computed_height,
        );
        (same_width || compatible_width) && (same_height || compatible_height)
    }

    /// Asymmetric reuse rules for one axis.
    fn validate_size(mode: MeasureMode, size: f64, last_mode: MeasureMode, last_size: f64, computed: f64) -> bool {
        match (mode, last_mode) {
            (MeasureMode::Exactly, _) => approx_eq(size, computed),
            (MeasureMode::AtMost, MeasureMode::Undefined) => size >= computed || approx_eq(size, computed),
            (MeasureMode::AtMost, MeasureMode::AtMost) => {
                last_size > size && (computed <= size || approx_eq(size, computed))
            }
            (MeasureMode::AtMost, MeasureMode::Exactly) | (MeasureMode::Undefined, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(width: f64, width_mode: MeasureMode, computed_width: f64) -> LayoutCache {
        LayoutCache {
            width,
            height: 50.0,
            computed_width,
            computed_height: 20.0,
            width_mode,
            height_mode: MeasureMode::Exactly,
        }
    }

    #[test]
    /// An exact request only reuses an entry that computed that exact size.
    ///
    /// # Panics
    /// Panics if exact requests match a different computed size.
    fn exactly_requires_same_computed_size() {
        let cache = LayoutCache {
            height_mode: MeasureMode::Exactly,
            ..entry(100.0, MeasureMode::AtMost, 80.0)
        };
        assert!(cache.validate(80.0, 20.0, MeasureMode::Exactly, MeasureMode::Exactly, 0.0, 0.0, 1.0));
        assert!(!cache.validate(90.0, 20.0, MeasureMode::Exactly, MeasureMode::Exactly, 0.0, 0.0, 1.0));
    }

    #[test]
    /// A larger at-most bound reuses an unconstrained measurement that fits.
    ///
    /// # Panics
    /// Panics if the undefined-to-at-most rule regresses.
    fn at_most_after_undefined() {
        let cache = entry(f64::NAN, MeasureMode::Undefined, 60.0);
        assert!(cache.validate(70.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly, 0.0, 0.0, 1.0));
        assert!(!cache.validate(50.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly, 0.0, 0.0, 1.0));
    }

    #[test]
    /// A tighter at-most bound is fine while the earlier result still fits.
    ///
    /// # Panics
    /// Panics if the at-most-to-at-most rule regresses.
    fn at_most_shrinking_bound() {
        let cache = entry(100.0, MeasureMode::AtMost, 60.0);
        assert!(cache.validate(80.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly, 0.0, 0.0, 1.0));
        assert!(!cache.validate(50.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly, 0.0, 0.0, 1.0));
        // Growing the bound past the previous one is not provably identical.
        assert!(!cache.validate(120.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly, 0.0, 0.0, 1.0));
    }

    #[test]
    /// Undefined requests need an identical earlier request after rounding.
    ///
    /// # Panics
    /// Panics if undefined requests match loosely.
    fn undefined_needs_identical_request() {
        let cache = LayoutCache {
            height: f64::NAN,
            height_mode: MeasureMode::Undefined,
            ..entry(100.2, MeasureMode::Exactly, 100.0)
        };
        assert!(cache.validate(100.4, f64::NAN, MeasureMode::Exactly, MeasureMode::Undefined, 0.0, 0.0, 1.0));
        assert!(!cache.validate(100.0, f64::NAN, MeasureMode::Exactly, MeasureMode::AtMost, 0.0, 0.0, 1.0));
        assert!(cache.is_equal(100.2, f64::NAN, MeasureMode::Exactly, MeasureMode::Undefined));
    }
}
