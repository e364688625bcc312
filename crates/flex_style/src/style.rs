//! The per-node style record and the geometry questions the layout pass asks of it.
//!
//! Every query is a pure function of the style plus reference sizes handed in by
//! the caller. Unresolvable inputs degrade to NaN or zero; nothing here fails.

use serde::{Deserialize, Serialize};

use crate::enums::{
    AlignContent, AlignItems, AlignSelf, Direction, Display, FlexDirection, FlexWrap,
    JustifyContent, MeasureMode, Overflow, PositionType,
};
use crate::flex::Flex;
use crate::float::approx_eq;
use crate::insets::StyleInsets;
use crate::value::StyleValue;

/// Replace NaN and negatives with zero (padding and border never go negative).
#[inline]
fn non_negative(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

/// Replace NaN with zero (margins may be negative).
#[inline]
fn or_zero(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

/// Serialize the NaN "unset" marker as `null`.
mod nan_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<Ser: Serializer>(value: &f64, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, De: Deserializer<'de>>(deserializer: De) -> Result<f64, De::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

/// All CSS-like properties of one node.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub justify_content: JustifyContent,
    pub align_content: AlignContent,
    pub align_items: AlignItems,
    pub align_self: AlignSelf,
    pub position_type: PositionType,
    pub flex_wrap: FlexWrap,
    pub overflow: Overflow,
    pub display: Display,
    pub flex: Flex,
    /// Inset offsets (`top`/`left`/...), `auto` when unset.
    pub position: StyleInsets,
    pub margin: StyleInsets,
    pub padding: StyleInsets,
    pub border: StyleInsets,
    pub width: StyleValue,
    pub height: StyleValue,
    pub min_width: StyleValue,
    pub min_height: StyleValue,
    /// `None` means "no maximum", which is distinct from `Some(Auto)` only in intent.
    pub max_width: Option<StyleValue>,
    pub max_height: Option<StyleValue>,
    /// Width divided by height; NaN when unset.
    #[serde(with = "nan_as_none")]
    pub aspect_ratio: f64,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Start,
            align_content: AlignContent::Start,
            align_items: AlignItems::Stretch,
            align_self: AlignSelf::Auto,
            position_type: PositionType::Static,
            flex_wrap: FlexWrap::Nowrap,
            overflow: Overflow::Visible,
            display: Display::Flex,
            flex: Flex::NONE,
            position: StyleInsets::AUTO,
            margin: StyleInsets::ZERO,
            padding: StyleInsets::ZERO,
            border: StyleInsets::ZERO,
            width: StyleValue::Auto,
            height: StyleValue::Auto,
            min_width: StyleValue::ZERO,
            min_height: StyleValue::ZERO,
            max_width: None,
            max_height: None,
            aspect_ratio: f64::NAN,
        }
    }
}

impl PartialEq for NodeStyle {
    fn eq(&self, other: &Self) -> bool {
        self.direction == other.direction
            && self.flex_direction == other.flex_direction
            && self.justify_content == other.justify_content
            && self.align_content == other.align_content
            && self.align_items == other.align_items
            && self.align_self == other.align_self
            && self.position_type == other.position_type
            && self.flex_wrap == other.flex_wrap
            && self.overflow == other.overflow
            && self.display == other.display
            && self.flex == other.flex
            && self.position == other.position
            && self.margin == other.margin
            && self.padding == other.padding
            && self.border == other.border
            && self.width == other.width
            && self.height == other.height
            && self.min_width == other.min_width
            && self.min_height == other.min_height
            && self.max_width == other.max_width
            && self.max_height == other.max_height
            && approx_eq(self.aspect_ratio, other.aspect_ratio)
    }
}

impl NodeStyle {
    /// Browser-like defaults: row direction, stretched lines, shrinkable items.
    pub fn web() -> Self {
        Self {
            flex_direction: FlexDirection::Row,
            align_content: AlignContent::Stretch,
            flex: Flex::DEFAULT,
            ..Self::default()
        }
    }

    #[inline]
    pub fn computed_max_width(&self) -> StyleValue {
        self.max_width.unwrap_or(StyleValue::Auto)
    }

    #[inline]
    pub fn computed_max_height(&self) -> StyleValue {
        self.max_height.unwrap_or(StyleValue::Auto)
    }

    #[inline]
    pub const fn is_absolute(&self) -> bool {
        matches!(self.position_type, PositionType::Absolute)
    }

    #[inline]
    pub const fn is_hidden(&self) -> bool {
        matches!(self.display, Display::None)
    }

    #[inline]
    pub const fn is_wrapped(&self) -> bool {
        self.flex_wrap.is_wrapped()
    }

    #[inline]
    pub const fn resolve_flex_direction(&self, direction: Direction) -> FlexDirection {
        self.flex_direction.resolve(direction)
    }

    /// Own direction, or the owner's when inheriting; LTR as the last resort.
    #[inline]
    pub const fn resolve_direction(&self, owner: Direction) -> Direction {
        match (self.direction, owner) {
            (Direction::Inherit, Direction::Inherit) => Direction::Ltr,
            (Direction::Inherit, inherited) => inherited,
            (own, _) => own,
        }
    }

    /// Alignment of `child` inside this container. Baseline degrades to start in columns.
    #[inline]
    pub fn computed_align_item(&self, child: &Self) -> AlignItems {
        let align = child.align_self.align_items().unwrap_or(self.align_items);
        if align == AlignItems::Baseline && self.flex_direction.is_column() {
            return AlignItems::Start;
        }
        align
    }

    #[inline]
    pub fn has_auto_leading_margin(&self, axis: FlexDirection) -> bool {
        self.margin.leading(axis).is_auto()
    }

    #[inline]
    pub fn has_auto_trailing_margin(&self, axis: FlexDirection) -> bool {
        self.margin.trailing(axis).is_auto()
    }

    #[inline]
    pub fn is_leading_position_defined(&self, axis: FlexDirection) -> bool {
        !self.position.leading(axis).is_auto()
    }

    #[inline]
    pub fn is_trailing_position_defined(&self, axis: FlexDirection) -> bool {
        !self.position.trailing(axis).is_auto()
    }

    #[inline]
    pub fn leading_position(&self, axis: FlexDirection, size: f64) -> f64 {
        let value = self.position.leading(axis);
        if value.is_auto() { 0.0 } else { value.resolve(size) }
    }

    #[inline]
    pub fn trailing_position(&self, axis: FlexDirection, size: f64) -> f64 {
        let value = self.position.trailing(axis);
        if value.is_auto() { 0.0 } else { value.resolve(size) }
    }

    /// Relative offset along `axis`: `+leading` if set, else `-trailing`.
    pub fn relative_position(&self, axis: FlexDirection, size: f64) -> f64 {
        if self.is_leading_position_defined(axis) {
            return self.leading_position(axis, size);
        }
        let trailing = self.trailing_position(axis, size);
        if trailing.is_nan() { trailing } else { -trailing }
    }

    #[inline]
    pub fn leading_margin(&self, axis: FlexDirection, width: f64) -> f64 {
        or_zero(self.margin.leading(axis).resolve(width))
    }

    #[inline]
    pub fn trailing_margin(&self, axis: FlexDirection, width: f64) -> f64 {
        or_zero(self.margin.trailing(axis).resolve(width))
    }

    #[inline]
    pub fn leading_padding(&self, axis: FlexDirection, width: f64) -> f64 {
        non_negative(self.padding.leading(axis).resolve(width))
    }

    #[inline]
    pub fn trailing_padding(&self, axis: FlexDirection, width: f64) -> f64 {
        non_negative(self.padding.trailing(axis).resolve(width))
    }

    /// Borders do not take percentages, so they resolve against zero.
    #[inline]
    pub fn leading_border(&self, axis: FlexDirection) -> f64 {
        non_negative(self.border.leading(axis).resolve(0.0))
    }

    #[inline]
    pub fn trailing_border(&self, axis: FlexDirection) -> f64 {
        non_negative(self.border.trailing(axis).resolve(0.0))
    }

    /// Leading padding plus border.
    #[inline]
    pub fn total_leading_size(&self, axis: FlexDirection, width: f64) -> f64 {
        self.leading_padding(axis, width) + self.leading_border(axis)
    }

    /// Trailing padding plus border.
    #[inline]
    pub fn total_trailing_size(&self, axis: FlexDirection, width: f64) -> f64 {
        self.trailing_padding(axis, width) + self.trailing_border(axis)
    }

    /// Padding plus border on both sides of `axis`.
    #[inline]
    pub fn total_inner_size(&self, axis: FlexDirection, width: f64) -> f64 {
        self.total_leading_size(axis, width) + self.total_trailing_size(axis, width)
    }

    /// Margins on both sides of `axis`.
    #[inline]
    pub fn total_outer_size(&self, axis: FlexDirection, width: f64) -> f64 {
        self.leading_margin(axis, width) + self.trailing_margin(axis, width)
    }

    #[inline]
    pub fn total_padding(&self, axis: FlexDirection, width: f64) -> f64 {
        self.leading_padding(axis, width) + self.trailing_padding(axis, width)
    }

    #[inline]
    pub fn total_border(&self, axis: FlexDirection) -> f64 {
        self.leading_border(axis) + self.trailing_border(axis)
    }

    #[inline]
    pub fn dimension(&self, axis: FlexDirection) -> StyleValue {
        if axis.is_row() { self.width } else { self.height }
    }

    #[inline]
    pub fn min_dimension(&self, axis: FlexDirection) -> StyleValue {
        if axis.is_row() { self.min_width } else { self.min_height }
    }

    #[inline]
    pub fn max_dimension(&self, axis: FlexDirection) -> StyleValue {
        if axis.is_row() {
            self.computed_max_width()
        } else {
            self.computed_max_height()
        }
    }

    /// Clamp `value` to the min/max of `axis` resolved against `size`.
    ///
    /// A limit that resolves to NaN (or a negative number) is skipped. The minimum wins.
    pub fn bound(&self, axis: FlexDirection, value: f64, size: f64) -> f64 {
        let min = self.min_dimension(axis).resolve(size);
        let max = self.max_dimension(axis).resolve(size);
        let mut bound = value;
        if max >= 0.0 && bound > max {
            bound = max;
        }
        if min >= 0.0 && bound < min {
            bound = min;
        }
        bound
    }

    /// [`NodeStyle::bound`], then never smaller than padding plus border.
    pub fn bound_axis(&self, axis: FlexDirection, value: f64, axis_size: f64, width: f64) -> f64 {
        self.bound(axis, value, axis_size)
            .max(self.total_inner_size(axis, width))
    }

    /// Apply the max dimension of `axis` to a requested `(mode, size)` pair.
    ///
    /// A finite maximum turns an undefined request into an at-most one.
    pub fn constrain_max_size(
        &self,
        axis: FlexDirection,
        parent_axis_size: f64,
        parent_width: f64,
        mode: MeasureMode,
        size: f64,
    ) -> (MeasureMode, f64) {
        let max_size = self.max_dimension(axis).resolve(parent_axis_size)
            + self.total_outer_size(axis, parent_width);
        match mode {
            MeasureMode::Exactly | MeasureMode::AtMost => {
                let constrained = if max_size.is_nan() || size < max_size {
                    size
                } else {
                    max_size
                };
                (mode, constrained)
            }
            MeasureMode::Undefined if max_size.is_nan() => (mode, size),
            MeasureMode::Undefined => (MeasureMode::AtMost, max_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insets::Edge;

    #[test]
    /// Padding and border clamp at zero while margins keep their sign.
    ///
    /// # Panics
    /// Panics if the sign handling of the edge accessors changes.
    fn edge_sign_rules() {
        let style = NodeStyle {
            margin: StyleInsets::uniform(StyleValue::Length(-4.0)),
            padding: StyleInsets::uniform(StyleValue::Length(-2.0)),
            border: StyleInsets::uniform(StyleValue::Percentage(50.0)),
            ..NodeStyle::default()
        };
        assert!((style.leading_margin(FlexDirection::Row, 100.0) + 4.0).abs() < 0.001);
        assert!(style.leading_padding(FlexDirection::Row, 100.0).abs() < 0.001);
        assert!(style.leading_border(FlexDirection::Column).abs() < 0.001);
        assert!((style.total_outer_size(FlexDirection::Column, 100.0) + 8.0).abs() < 0.001);
    }

    #[test]
    /// Percentage padding resolves against the given width on both axes.
    ///
    /// # Panics
    /// Panics if padding totals are not resolved against the width.
    fn padding_resolves_against_width() {
        let style = NodeStyle {
            padding: StyleInsets::uniform(StyleValue::Percentage(10.0)),
            border: StyleInsets::ZERO.with(Some(StyleValue::Length(1.0)), Edge::TOP),
            ..NodeStyle::default()
        };
        let column = style.total_inner_size(FlexDirection::Column, 200.0);
        assert!((column - 41.0).abs() < 0.001, "unexpected inner size: got {column} expect 41");
        assert!((style.total_leading_size(FlexDirection::Row, 200.0) - 20.0).abs() < 0.001);
    }

    #[test]
    /// Bounds apply max first and then min, skipping undefined limits.
    ///
    /// # Panics
    /// Panics if clamping order or NaN skipping changes.
    fn bound_respects_limits() {
        let style = NodeStyle {
            min_width: StyleValue::Length(30.0),
            max_width: Some(StyleValue::Percentage(50.0)),
            padding: StyleInsets::uniform(StyleValue::Length(25.0)),
            ..NodeStyle::default()
        };
        assert!((style.bound(FlexDirection::Row, 80.0, 100.0) - 50.0).abs() < 0.001);
        assert!((style.bound(FlexDirection::Row, 10.0, 100.0) - 30.0).abs() < 0.001);
        // Max is a percentage of an unknown size, so only min applies.
        assert!((style.bound(FlexDirection::Row, 500.0, f64::NAN) - 500.0).abs() < 0.001);
        // Padding and border set the floor.
        assert!((style.bound_axis(FlexDirection::Row, 10.0, 100.0, 100.0) - 50.0).abs() < 0.001);
    }

    #[test]
    /// A finite maximum turns an undefined request into at-most.
    ///
    /// # Panics
    /// Panics if `constrain_max_size` returns the wrong mode or size.
    fn constrain_max_promotes_undefined() {
        let style = NodeStyle {
            max_height: Some(StyleValue::Length(40.0)),
            ..NodeStyle::default()
        };
        let (mode, size) =
            style.constrain_max_size(FlexDirection::Column, 100.0, 100.0, MeasureMode::Undefined, f64::NAN);
        assert_eq!(mode, MeasureMode::AtMost);
        assert!((size - 40.0).abs() < 0.001);

        let (mode, size) =
            style.constrain_max_size(FlexDirection::Column, 100.0, 100.0, MeasureMode::Exactly, 60.0);
        assert_eq!(mode, MeasureMode::Exactly);
        assert!((size - 40.0).abs() < 0.001);

        let (mode, size) =
            style.constrain_max_size(FlexDirection::Row, 100.0, 100.0, MeasureMode::Undefined, f64::NAN);
        assert_eq!(mode, MeasureMode::Undefined);
        assert!(size.is_nan());
    }

    #[test]
    /// Inherit falls through to the owner and finally to LTR.
    ///
    /// # Panics
    /// Panics if direction resolution changes.
    fn direction_resolution() {
        let inherit = NodeStyle::default();
        assert_eq!(inherit.resolve_direction(Direction::Rtl), Direction::Rtl);
        assert_eq!(inherit.resolve_direction(Direction::Inherit), Direction::Ltr);
        let rtl = NodeStyle {
            direction: Direction::Rtl,
            ..NodeStyle::default()
        };
        assert_eq!(rtl.resolve_direction(Direction::Ltr), Direction::Rtl);
    }

    #[test]
    /// Relative position prefers leading and negates trailing.
    ///
    /// # Panics
    /// Panics if the relative offset sign is wrong.
    fn relative_position() {
        let mut style = NodeStyle::default();
        style.position.update(Some(StyleValue::Length(7.0)), Edge::RIGHT);
        assert!((style.relative_position(FlexDirection::Row, 0.0) + 7.0).abs() < 0.001);
        style.position.update(Some(StyleValue::Percentage(10.0)), Edge::LEFT);
        assert!((style.relative_position(FlexDirection::Row, 50.0) - 5.0).abs() < 0.001);
        assert!(style.relative_position(FlexDirection::Column, 50.0).abs() < 0.001);
    }

    #[test]
    /// Baseline alignment only applies to row containers.
    ///
    /// # Panics
    /// Panics if the effective alignment is not resolved as described.
    fn align_item_resolution() {
        let column = NodeStyle {
            align_items: AlignItems::Baseline,
            ..NodeStyle::default()
        };
        let child = NodeStyle::default();
        assert_eq!(column.computed_align_item(&child), AlignItems::Start);
        let row = NodeStyle {
            flex_direction: FlexDirection::Row,
            ..column
        };
        assert_eq!(row.computed_align_item(&child), AlignItems::Baseline);
        let centered = NodeStyle {
            align_self: AlignSelf::Center,
            ..NodeStyle::default()
        };
        assert_eq!(row.computed_align_item(&centered), AlignItems::Center);
    }

    #[test]
    /// Style records load from sparse JSON with defaults for the rest.
    ///
    /// # Panics
    /// Panics if the JSON shape of the style record changes.
    fn loads_sparse_json() {
        let json = r#"{"flex_direction":"row","width":{"length":120.0},"margin":{"left":{"percentage":5.0}},"aspect_ratio":null}"#;
        let style: NodeStyle = serde_json::from_str(json).unwrap_or_default();
        assert_eq!(style.flex_direction, FlexDirection::Row);
        assert_eq!(style.width, StyleValue::Length(120.0));
        assert_eq!(style.margin.left, StyleValue::Percentage(5.0));
        assert_eq!(style.margin.top, StyleValue::ZERO);
        assert!(style.aspect_ratio.is_nan());
        assert_eq!(NodeStyle::web().flex, Flex::DEFAULT);
    }
}
