//! Plain geometry values produced by layout.

use core::fmt;

use flex_style::{Direction, FlexDirection, approx_eq};

#[derive(Copy, Clone, Debug, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl PartialEq for Size {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.width, other.width) && approx_eq(self.height, other.height)
    }
}

/// An origin plus a size, in points.
#[derive(Copy, Clone, Debug, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Copy with every NaN component replaced by zero, for handing to a renderer.
    #[must_use]
    pub fn valid(self) -> Self {
        let sanitize = |value: f64| if value.is_nan() { 0.0 } else { value };
        Self::new(
            sanitize(self.x),
            sanitize(self.y),
            sanitize(self.width),
            sanitize(self.height),
        )
    }
}

impl PartialEq for Rect {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x)
            && approx_eq(self.y, other.y)
            && approx_eq(self.width, other.width)
            && approx_eq(self.height, other.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

/// Resolved physical insets (margin, border or padding) of a laid out box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LayoutInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl LayoutInsets {
    /// Assign logical sides, swapping leading/trailing for right-to-left.
    #[inline]
    pub(crate) fn set_all(&mut self, direction: Direction, top: f64, leading: f64, bottom: f64, trailing: f64) {
        if direction == Direction::Ltr {
            self.left = leading;
            self.right = trailing;
        } else {
            self.right = leading;
            self.left = trailing;
        }
        self.top = top;
        self.bottom = bottom;
    }
}

/// Offsets of a box from its parent's border-box origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LayoutPosition {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl LayoutPosition {
    #[inline]
    pub fn leading(&self, axis: FlexDirection) -> f64 {
        match axis {
            FlexDirection::Column => self.top,
            FlexDirection::Row => self.left,
            FlexDirection::RowReverse => self.right,
            FlexDirection::ColumnReverse => self.bottom,
        }
    }

    #[inline]
    pub fn trailing(&self, axis: FlexDirection) -> f64 {
        match axis {
            FlexDirection::Column => self.bottom,
            FlexDirection::Row => self.right,
            FlexDirection::RowReverse => self.left,
            FlexDirection::ColumnReverse => self.top,
        }
    }

    #[inline]
    pub(crate) fn leading_mut(&mut self, axis: FlexDirection) -> &mut f64 {
        match axis {
            FlexDirection::Column => &mut self.top,
            FlexDirection::Row => &mut self.left,
            FlexDirection::RowReverse => &mut self.right,
            FlexDirection::ColumnReverse => &mut self.bottom,
        }
    }

    #[inline]
    pub(crate) fn trailing_mut(&mut self, axis: FlexDirection) -> &mut f64 {
        match axis {
            FlexDirection::Column => &mut self.bottom,
            FlexDirection::Row => &mut self.right,
            FlexDirection::RowReverse => &mut self.left,
            FlexDirection::ColumnReverse => &mut self.top,
        }
    }

    #[inline]
    pub(crate) fn set_leading(&mut self, axis: FlexDirection, value: f64) {
        *self.leading_mut(axis) = value;
    }

    #[inline]
    pub(crate) fn set_trailing(&mut self, axis: FlexDirection, value: f64) {
        *self.trailing_mut(axis) = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Sanitising a rect replaces NaN components only.
    ///
    /// # Panics
    /// Panics if `valid` touches defined values or keeps NaN.
    fn valid_replaces_nan() {
        let rect = Rect::new(f64::NAN, 4.0, 10.0, f64::NAN).valid();
        assert_eq!(rect, Rect::new(0.0, 4.0, 10.0, 0.0));
        assert!((rect.max_x() - 10.0).abs() < 0.001);
        assert_eq!(rect.to_string(), "(0, 4, 10, 0)");
    }

    #[test]
    /// Right-to-left assignment swaps left and right.
    ///
    /// # Panics
    /// Panics if logical sides land on the wrong physical side.
    fn insets_follow_direction() {
        let mut insets = LayoutInsets::default();
        insets.set_all(Direction::Rtl, 1.0, 2.0, 3.0, 4.0);
        assert!((insets.right - 2.0).abs() < 0.001);
        assert!((insets.left - 4.0).abs() < 0.001);
        insets.set_all(Direction::Ltr, 1.0, 2.0, 3.0, 4.0);
        assert!((insets.left - 2.0).abs() < 0.001);
    }

    #[test]
    /// Leading and trailing accessors address opposite sides of an axis.
    ///
    /// # Panics
    /// Panics if an axis maps to the wrong side.
    fn position_axes() {
        let mut position = LayoutPosition::default();
        position.set_leading(FlexDirection::RowReverse, 5.0);
        position.set_trailing(FlexDirection::ColumnReverse, 7.0);
        assert!((position.right - 5.0).abs() < 0.001);
        assert!((position.top - 7.0).abs() < 0.001);
        *position.leading_mut(FlexDirection::Column) += 1.0;
        assert!((position.leading(FlexDirection::Column) - 8.0).abs() < 0.001);
        assert!((position.trailing(FlexDirection::Row) - 5.0).abs() < 0.001);
    }
}
