//! Four-sided style values with optional logical (leading/trailing) overrides.
//!
//! One type serves margin, padding, border and position offsets.

use core::fmt;
use core::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::enums::FlexDirection;
use crate::value::StyleValue;

/// Set of sides to update.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Edge(u8);

impl Edge {
    pub const TOP: Self = Self(1 << 0);
    pub const LEFT: Self = Self(1 << 1);
    pub const BOTTOM: Self = Self(1 << 2);
    pub const RIGHT: Self = Self(1 << 3);
    /// Start side along a row, left in LTR and right in RTL.
    pub const LEADING: Self = Self(1 << 4);
    /// End side along a row.
    pub const TRAILING: Self = Self(1 << 5);
    pub const VERTICAL: Self = Self(Self::TOP.0 | Self::BOTTOM.0);
    pub const HORIZONTAL: Self = Self(Self::LEFT.0 | Self::RIGHT.0);
    pub const ALL: Self = Self(Self::VERTICAL.0 | Self::HORIZONTAL.0);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Edge {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleInsets {
    pub top: StyleValue,
    pub left: StyleValue,
    pub bottom: StyleValue,
    pub right: StyleValue,
    /// Overrides `left`/`right` on a row axis, depending on direction.
    pub leading: Option<StyleValue>,
    pub trailing: Option<StyleValue>,
}

impl Default for StyleInsets {
    fn default() -> Self {
        Self::ZERO
    }
}

impl StyleInsets {
    pub const ZERO: Self = Self::uniform(StyleValue::ZERO);
    pub const AUTO: Self = Self::uniform(StyleValue::Auto);

    /// Every physical side set to `value`, no logical overrides.
    pub const fn uniform(value: StyleValue) -> Self {
        Self {
            top: value,
            left: value,
            bottom: value,
            right: value,
            leading: None,
            trailing: None,
        }
    }

    pub const fn horizontal_vertical(horizontal: StyleValue, vertical: StyleValue) -> Self {
        Self {
            top: vertical,
            left: horizontal,
            bottom: vertical,
            right: horizontal,
            leading: None,
            trailing: None,
        }
    }

    pub const fn top_left_bottom_right(
        top: StyleValue,
        left: StyleValue,
        bottom: StyleValue,
        right: StyleValue,
    ) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
            leading: None,
            trailing: None,
        }
    }

    /// `value` on the sides named by `edges`, zero elsewhere.
    pub fn with_edges(value: Option<StyleValue>, edges: Edge) -> Self {
        Self::ZERO.with(value, edges)
    }

    /// The value on the start side of `direction`.
    #[inline]
    pub fn leading(&self, direction: FlexDirection) -> StyleValue {
        match direction {
            FlexDirection::Row => self.leading.unwrap_or(self.left),
            FlexDirection::RowReverse => self.leading.unwrap_or(self.right),
            FlexDirection::Column => self.top,
            FlexDirection::ColumnReverse => self.bottom,
        }
    }

    /// The value on the end side of `direction`.
    #[inline]
    pub fn trailing(&self, direction: FlexDirection) -> StyleValue {
        match direction {
            FlexDirection::Row => self.trailing.unwrap_or(self.right),
            FlexDirection::RowReverse => self.trailing.unwrap_or(self.left),
            FlexDirection::Column => self.bottom,
            FlexDirection::ColumnReverse => self.top,
        }
    }

    /// Sum of both sides along `direction`, or `None` when their variants differ.
    pub fn total(&self, direction: FlexDirection) -> Option<StyleValue> {
        self.leading(direction)
            .checked_add(self.trailing(direction))
    }

    /// Set the sides named by `edges`.
    ///
    /// `None` resets physical sides to zero and clears logical ones.
    pub fn update(&mut self, value: Option<StyleValue>, edges: Edge) {
        let physical = value.unwrap_or(StyleValue::ZERO);
        if edges.contains(Edge::TOP) {
            self.top = physical;
        }
        if edges.contains(Edge::LEFT) {
            self.left = physical;
        }
        if edges.contains(Edge::BOTTOM) {
            self.bottom = physical;
        }
        if edges.contains(Edge::RIGHT) {
            self.right = physical;
        }
        if edges.contains(Edge::LEADING) {
            self.leading = value;
        }
        if edges.contains(Edge::TRAILING) {
            self.trailing = value;
        }
    }

    /// Copy with the sides named by `edges` replaced.
    #[must_use]
    pub fn with(mut self, value: Option<StyleValue>, edges: Edge) -> Self {
        self.update(value, edges);
        self
    }
}

impl fmt::Display for StyleInsets {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "StyleInsets(top={},left={},bottom={},right={}",
            self.top, self.left, self.bottom, self.right
        )?;
        match self.leading {
            Some(value) => write!(formatter, ",leading={value}")?,
            None => formatter.write_str(",leading=nil")?,
        }
        match self.trailing {
            Some(value) => write!(formatter, ",trailing={value})"),
            None => formatter.write_str(",trailing=nil)"),
        }
    }
}
