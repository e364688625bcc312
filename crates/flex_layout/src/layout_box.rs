//! Computed layout of one node, plus the bookkeeping that lets later passes skip work.

use flex_style::{Direction, FlexDirection, approx_eq};

use crate::cache::{EVICTED_MEASUREMENTS, LayoutCache, MAX_CACHED_MEASUREMENTS};
use crate::geometry::{LayoutInsets, LayoutPosition, Rect};

/// Snap `value` to the pixel grid of `scale`.
///
/// Ties round up. `force_ceil`/`force_floor` override rounding for text boxes
/// that must not lose a partial pixel. A NaN scale yields NaN.
pub fn round_value(value: f64, scale: f64, force_ceil: bool, force_floor: bool) -> f64 {
    let mut scaled = value * scale;
    // Fractional part in [0, 1), also for negative values.
    let fractional = scaled.rem_euclid(1.0);
    if approx_eq(fractional, 0.0) {
        scaled -= fractional;
    } else if approx_eq(fractional, 1.0) || force_ceil {
        scaled = scaled - fractional + 1.0;
    } else if force_floor {
        scaled -= fractional;
    } else {
        let round_up = !fractional.is_nan() && (fractional > 0.5 || approx_eq(fractional, 0.5));
        scaled = scaled - fractional + if round_up { 1.0 } else { 0.0 };
    }
    if scale.is_nan() { f64::NAN } else { scaled / scale }
}

/// Whether `size` at `scale` lands between device pixels.
fn is_fractional(size: f64, scale: f64) -> bool {
    let fraction = (size * scale) % 1.0;
    !approx_eq(fraction, 0.0) && !approx_eq(fraction, 1.0)
}

#[derive(Clone, Debug)]
pub struct LayoutBox {
    pub(crate) position: LayoutPosition,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) margin: LayoutInsets,
    pub(crate) border: LayoutInsets,
    pub(crate) padding: LayoutInsets,
    pub(crate) direction: Direction,
    pub(crate) has_overflow: bool,
    /// Set once a full layout has written `width`/`height`.
    pub(crate) has_layout: bool,

    /// Pass in which this box was last touched.
    pub(crate) generation: u32,
    pub(crate) computed_flex_basis: f64,
    pub(crate) measured_width: f64,
    pub(crate) measured_height: f64,
    pub(crate) last_parent_direction: Option<Direction>,
    /// Result of the most recent full layout.
    pub(crate) cached_layout: Option<LayoutCache>,
    /// Results of measure-only requests, oldest first.
    pub(crate) cached_measurements: Vec<LayoutCache>,
}

impl Default for LayoutBox {
    fn default() -> Self {
        Self {
            position: LayoutPosition::default(),
            width: f64::NAN,
            height: f64::NAN,
            margin: LayoutInsets::default(),
            border: LayoutInsets::default(),
            padding: LayoutInsets::default(),
            direction: Direction::Inherit,
            has_overflow: false,
            has_layout: false,
            generation: 0,
            computed_flex_basis: f64::NAN,
            measured_width: f64::NAN,
            measured_height: f64::NAN,
            last_parent_direction: None,
            cached_layout: None,
            cached_measurements: Vec::new(),
        }
    }
}

impl LayoutBox {
    #[inline]
    pub const fn position(&self) -> LayoutPosition {
        self.position
    }

    #[inline]
    pub const fn top(&self) -> f64 {
        self.position.top
    }

    #[inline]
    pub const fn left(&self) -> f64 {
        self.position.left
    }

    #[inline]
    pub const fn bottom(&self) -> f64 {
        self.position.bottom
    }

    #[inline]
    pub const fn right(&self) -> f64 {
        self.position.right
    }

    /// Final width, snapped to the pixel grid.
    #[inline]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Width before pixel-grid rounding.
    #[inline]
    pub const fn measured_width(&self) -> f64 {
        self.measured_width
    }

    #[inline]
    pub const fn measured_height(&self) -> f64 {
        self.measured_height
    }

    #[inline]
    pub const fn margin(&self) -> LayoutInsets {
        self.margin
    }

    #[inline]
    pub const fn border(&self) -> LayoutInsets {
        self.border
    }

    #[inline]
    pub const fn padding(&self) -> LayoutInsets {
        self.padding
    }

    /// Resolved text direction of the node.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether children overflowed the main axis in the last pass.
    #[inline]
    pub const fn has_overflow(&self) -> bool {
        self.has_overflow
    }

    #[inline]
    pub const fn computed_flex_basis(&self) -> f64 {
        self.computed_flex_basis
    }

    /// Position and final size as a rectangle local to the parent.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.left, self.position.top, self.width, self.height)
    }

    /// Reset every field, caches included.
    pub(crate) fn invalidate(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub(crate) fn measured_dimension(&self, axis: FlexDirection) -> f64 {
        if axis.is_row() {
            self.measured_width
        } else {
            self.measured_height
        }
    }

    #[inline]
    pub(crate) fn is_layout_dimension_defined(&self, axis: FlexDirection) -> bool {
        self.measured_dimension(axis) >= 0.0
    }

    /// Remember a measure-only result, evicting the oldest entries past the cap.
    pub(crate) fn push_measurement(&mut self, entry: LayoutCache) {
        if self.cached_measurements.len() > MAX_CACHED_MEASUREMENTS {
            self.cached_measurements.drain(..EVICTED_MEASUREMENTS);
        }
        self.cached_measurements.push(entry);
    }

    /// Snap position and size to the pixel grid.
    ///
    /// Edges are rounded in absolute coordinates so adjacent boxes keep
    /// sharing an edge. Returns this box's unrounded absolute origin for the
    /// children. Text boxes floor their origin and never lose a partial pixel
    /// of size.
    pub(crate) fn round_position(&mut self, scale: f64, absolute_left: f64, absolute_top: f64, text: bool) -> (f64, f64) {
        let node_left = self.position.left;
        let node_top = self.position.top;
        let node_width = self.width;
        let node_height = self.height;

        let left = absolute_left + node_left;
        let top = absolute_top + node_top;
        let right = left + node_width;
        let bottom = top + node_height;

        self.position.left = round_value(node_left, scale, false, text);
        self.position.top = round_value(node_top, scale, false, text);

        let fractional_width = is_fractional(node_width, scale);
        let fractional_height = is_fractional(node_height, scale);

        self.width = round_value(right, scale, text && fractional_width, text && !fractional_width)
            - round_value(left, scale, false, text);
        self.height = round_value(bottom, scale, text && fractional_height, text && !fractional_height)
            - round_value(top, scale, false, text);
        (left, top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Rounding goes to the nearest device pixel, ties away from zero, negatives included.
    ///
    /// # Panics
    /// Panics if a rounded value differs from the expected grid point.
    fn rounds_to_nearest() {
        let cases = [
            (2.2, 1.0, 2.0),
            (2.5, 1.0, 3.0),
            (2.7, 1.0, 3.0),
            (-2.2, 1.0, -2.0),
            (-2.7, 1.0, -3.0),
            (1.3, 2.0, 1.5),
            (1.2, 2.0, 1.0),
        ];
        for (value, scale, expect) in cases {
            let got = round_value(value, scale, false, false);
            assert!((got - expect).abs() < 0.0001, "round({value}, {scale}): got {got} expect {expect}");
        }
        assert!(round_value(1.0, f64::NAN, false, false).is_nan());
    }

    #[test]
    /// Forced ceil/floor win over nearest rounding.
    ///
    /// # Panics
    /// Panics if forced rounding is ignored.
    fn forced_rounding() {
        assert!((round_value(2.2, 1.0, true, false) - 3.0).abs() < 0.0001);
        assert!((round_value(2.7, 1.0, false, true) - 2.0).abs() < 0.0001);
        assert!((round_value(3.0, 1.0, true, false) - 3.0).abs() < 0.0001);
    }

    #[test]
    /// Adjacent boxes keep sharing an edge after rounding.
    ///
    /// # Panics
    /// Panics if rounding opens a gap between neighbours.
    fn neighbours_share_edges() {
        let mut first = LayoutBox {
            width: 10.4,
            height: 10.0,
            ..LayoutBox::default()
        };
        first.position.left = 0.3;
        let mut second = LayoutBox {
            width: 10.4,
            height: 10.0,
            ..LayoutBox::default()
        };
        second.position.left = 10.7;
        first.round_position(1.0, 0.0, 0.0, false);
        second.round_position(1.0, 0.0, 0.0, false);
        let first_right = first.left() + first.width();
        assert!((first_right - second.left()).abs() < 0.0001, "gap: {first_right} vs {}", second.left());
    }

    #[test]
    /// Text boxes keep the fractional pixel by rounding their far edge up.
    ///
    /// # Panics
    /// Panics if a fractional text width is rounded down.
    fn text_keeps_partial_pixels() {
        let mut text = LayoutBox {
            width: 10.2,
            height: 12.0,
            ..LayoutBox::default()
        };
        text.round_position(1.0, 0.0, 0.0, true);
        assert!((text.width() - 11.0).abs() < 0.0001);
        assert!((text.height() - 12.0).abs() < 0.0001);
    }

    #[test]
    /// The measurement list is capped and sheds its oldest entries first.
    ///
    /// # Panics
    /// Panics if eviction keeps more than the cap or drops the newest entries.
    fn measurement_eviction() {
        let mut layout = LayoutBox::default();
        for index in 0..=MAX_CACHED_MEASUREMENTS + 1 {
            layout.push_measurement(LayoutCache {
                width: index as f64,
                height: 0.0,
                computed_width: 0.0,
                computed_height: 0.0,
                width_mode: flex_style::MeasureMode::Exactly,
                height_mode: flex_style::MeasureMode::Exactly,
            });
        }
        assert_eq!(layout.cached_measurements.len(), MAX_CACHED_MEASUREMENTS + 2 - EVICTED_MEASUREMENTS);
        let first = layout.cached_measurements.first().map_or(f64::NAN, |entry| entry.width);
        assert!((first - EVICTED_MEASUREMENTS as f64).abs() < 0.0001);
    }
}
