//! Keyword properties of the flex model.

use serde::{Deserialize, Serialize};

/// Inline (text) direction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Take the owner's direction.
    #[default]
    Inherit,
    Ltr,
    Rtl,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    #[default]
    Flex,
    /// Removed from layout; the node and its subtree get a zero box.
    None,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionType {
    #[default]
    Static,
    Relative,
    /// Taken out of flow and placed against the parent's padding box.
    Absolute,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    /// Content may exceed the container; sizing stops clamping children to it.
    Scroll,
}

impl Overflow {
    #[inline]
    pub const fn is_scroll(self) -> bool {
        matches!(self, Self::Scroll)
    }
}

/// Main axis of a container. Defaults to `Column`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    #[default]
    Column,
    ColumnReverse,
    Row,
    RowReverse,
}

impl FlexDirection {
    #[inline]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    #[inline]
    pub const fn is_column(self) -> bool {
        matches!(self, Self::Column | Self::ColumnReverse)
    }

    #[inline]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    /// Flip row axes for right-to-left text.
    #[inline]
    pub const fn resolve(self, direction: Direction) -> Self {
        match (direction, self) {
            (Direction::Rtl, Self::Row) => Self::RowReverse,
            (Direction::Rtl, Self::RowReverse) => Self::Row,
            _ => self,
        }
    }

    /// The perpendicular axis, resolved for `direction`.
    #[inline]
    pub const fn cross(self, direction: Direction) -> Self {
        if self.is_column() {
            Self::Row.resolve(direction)
        } else {
            Self::Column
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexWrap {
    #[default]
    Nowrap,
    Wrap,
    WrapReverse,
}

impl FlexWrap {
    #[inline]
    pub const fn is_wrapped(self) -> bool {
        !matches!(self, Self::Nowrap)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JustifyContent {
    #[default]
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignItems {
    #[default]
    Stretch,
    Start,
    End,
    Center,
    Baseline,
}

/// Per-item override of the container's `AlignItems`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignSelf {
    #[default]
    Auto,
    Start,
    End,
    Center,
    Baseline,
    Stretch,
}

impl AlignSelf {
    /// The explicit alignment, or `None` for `Auto`.
    #[inline]
    pub const fn align_items(self) -> Option<AlignItems> {
        match self {
            Self::Auto => None,
            Self::Start => Some(AlignItems::Start),
            Self::End => Some(AlignItems::End),
            Self::Center => Some(AlignItems::Center),
            Self::Baseline => Some(AlignItems::Baseline),
            Self::Stretch => Some(AlignItems::Stretch),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignContent {
    #[default]
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    Stretch,
}

/// How an available size constrains a measurement.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureMode {
    /// No constraint: size to content.
    #[default]
    Undefined,
    /// The size is fixed.
    Exactly,
    /// The size is an upper bound.
    AtMost,
}

impl MeasureMode {
    #[inline]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    #[inline]
    pub const fn is_exactly(self) -> bool {
        matches!(self, Self::Exactly)
    }

    #[inline]
    pub const fn is_at_most(self) -> bool {
        matches!(self, Self::AtMost)
    }
}

/// Node kind as far as pixel rounding is concerned.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    #[default]
    Default,
    /// A measured leaf, rounded so adjacent text never overlaps.
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Right-to-left text swaps the row axes and leaves columns alone.
    ///
    /// # Panics
    /// Panics if axis resolution changes.
    fn rtl_flips_rows_only() {
        assert_eq!(FlexDirection::Row.resolve(Direction::Rtl), FlexDirection::RowReverse);
        assert_eq!(FlexDirection::RowReverse.resolve(Direction::Rtl), FlexDirection::Row);
        assert_eq!(FlexDirection::Column.resolve(Direction::Rtl), FlexDirection::Column);
        assert_eq!(FlexDirection::Row.resolve(Direction::Ltr), FlexDirection::Row);
    }

    #[test]
    /// The cross axis of a column follows the text direction.
    ///
    /// # Panics
    /// Panics if the cross axis is resolved incorrectly.
    fn cross_axis() {
        assert_eq!(FlexDirection::Column.cross(Direction::Rtl), FlexDirection::RowReverse);
        assert_eq!(FlexDirection::ColumnReverse.cross(Direction::Ltr), FlexDirection::Row);
        assert_eq!(FlexDirection::RowReverse.cross(Direction::Rtl), FlexDirection::Column);
    }

    #[test]
    /// Keyword names serialize in kebab case.
    ///
    /// # Panics
    /// Panics if the serialized names drift.
    fn kebab_case_names() {
        let json = serde_json::to_string(&JustifyContent::SpaceBetween).unwrap_or_default();
        assert_eq!(json, "\"space-between\"");
        let parsed: AlignSelf = serde_json::from_str("\"baseline\"").unwrap_or_default();
        assert_eq!(parsed, AlignSelf::Baseline);
    }
}
