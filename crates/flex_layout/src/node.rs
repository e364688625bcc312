//! Arena entry for one node: style, computed box, children and callbacks.

use std::rc::Rc;

use flex_style::{Direction, FlexDirection, LayoutType, MeasureMode, NodeStyle, PositionType, StyleValue};
use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::config::FlexConfig;
use crate::geometry::Size;
use crate::layout_box::LayoutBox;

new_key_type! {
    /// Handle to a node inside a [`crate::FlexTree`].
    pub struct NodeId;
}

/// Leaf measurement: `(width, width_mode, height, height_mode) -> content size`.
pub type MeasureFunc = Rc<dyn Fn(f64, MeasureMode, f64, MeasureMode) -> Size>;
/// Leaf baseline: `(width, height) -> offset from the top edge`.
pub type BaselineFunc = Rc<dyn Fn(f64, f64) -> f64>;

/// Child list. Cloned nodes share it until one side mutates it.
pub(crate) type ChildList = Rc<SmallVec<NodeId, 4>>;

#[derive(Clone)]
pub(crate) struct FlexNode {
    pub(crate) config: Rc<FlexConfig>,
    /// Owner tag. A child listed under a node whose id differs is shared, not owned.
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: ChildList,
    pub(crate) style: NodeStyle,
    pub(crate) layout: LayoutBox,
    pub(crate) measure: Option<MeasureFunc>,
    pub(crate) baseline: Option<BaselineFunc>,
    /// Flex line this node landed on in its parent's last pass.
    pub(crate) line_index: u32,
    pub(crate) layout_type: LayoutType,
    pub(crate) is_dirty: bool,
    pub(crate) has_new_layout: bool,
    pub(crate) is_reference_baseline: bool,
    pub(crate) resolved_width: StyleValue,
    pub(crate) resolved_height: StyleValue,
}

impl FlexNode {
    pub(crate) fn new(config: Rc<FlexConfig>) -> Self {
        let style = config.default_style();
        Self {
            config,
            parent: None,
            children: Rc::new(SmallVec::new()),
            style,
            layout: LayoutBox::default(),
            measure: None,
            baseline: None,
            line_index: 0,
            layout_type: LayoutType::Default,
            is_dirty: false,
            has_new_layout: false,
            is_reference_baseline: false,
            resolved_width: StyleValue::Auto,
            resolved_height: StyleValue::Auto,
        }
    }

    #[inline]
    pub(crate) fn has_measure(&self) -> bool {
        self.measure.is_some()
    }

    /// Grow factor as used by layout. Roots never grow.
    #[inline]
    pub(crate) fn computed_flex_grow(&self) -> f64 {
        if self.parent.is_none() || self.style.flex.grow.is_nan() {
            0.0
        } else {
            self.style.flex.grow
        }
    }

    /// Shrink factor as used by layout. Roots never shrink.
    #[inline]
    pub(crate) fn computed_flex_shrink(&self) -> f64 {
        if self.parent.is_none() || self.style.flex.shrink.is_nan() {
            0.0
        } else {
            self.style.flex.shrink
        }
    }

    #[inline]
    pub(crate) fn is_flexible(&self) -> bool {
        self.style.position_type != PositionType::Absolute
            && (self.computed_flex_grow() != 0.0 || self.computed_flex_shrink() != 0.0)
    }

    #[inline]
    pub(crate) fn computed_dimension(&self, axis: FlexDirection) -> StyleValue {
        if axis.is_row() {
            self.resolved_width
        } else {
            self.resolved_height
        }
    }

    #[inline]
    pub(crate) fn is_dimension_defined(&self, axis: FlexDirection, size: f64) -> bool {
        self.computed_dimension(axis).is_defined(size)
    }

    /// Measured size along `axis` plus both margins.
    #[inline]
    pub(crate) fn dimension_with_margin(&self, axis: FlexDirection, width: f64) -> f64 {
        self.layout.measured_dimension(axis) + self.style.total_outer_size(axis, width)
    }

    /// Collapse `max == min` into a fixed dimension, otherwise keep width/height.
    pub(crate) fn resolve_dimensions(&mut self) {
        self.resolved_width = match self.style.max_width {
            Some(max) if max == self.style.min_width => max,
            _ => self.style.width,
        };
        self.resolved_height = match self.style.max_height {
            Some(max) if max == self.style.min_height => max,
            _ => self.style.height,
        };
    }

    /// Available size and mode for a root along `axis`.
    pub(crate) fn layout_mode(&self, size: f64, axis: FlexDirection) -> (f64, MeasureMode) {
        let max_size = self.style.max_dimension(axis).resolve(size);
        if self.is_dimension_defined(axis, size) {
            let resolved = self.computed_dimension(axis).resolve(size) + self.style.total_outer_size(axis, size);
            (resolved, MeasureMode::Exactly)
        } else if max_size >= 0.0 {
            (max_size, MeasureMode::AtMost)
        } else if size.is_nan() {
            (size, MeasureMode::Undefined)
        } else {
            (size, MeasureMode::Exactly)
        }
    }

    /// Initial offsets from margins and relative insets.
    pub(crate) fn set_initial_position(&mut self, direction: Direction, main_size: f64, cross_size: f64, owner_width: f64) {
        // Roots always lay out left-to-right so offsets never come out negative.
        let direction = if self.parent.is_some() {
            direction
        } else {
            Direction::Ltr
        };
        let main_axis = self.style.resolve_flex_direction(direction);
        let cross_axis = main_axis.cross(direction);
        let main_position = self.style.relative_position(main_axis, main_size);
        let cross_position = self.style.relative_position(cross_axis, cross_size);

        let position = &mut self.layout.position;
        position.set_leading(main_axis, self.style.leading_margin(main_axis, owner_width) + main_position);
        position.set_trailing(main_axis, self.style.trailing_margin(main_axis, owner_width) + main_position);
        position.set_leading(cross_axis, self.style.leading_margin(cross_axis, owner_width) + cross_position);
        position.set_trailing(cross_axis, self.style.trailing_margin(cross_axis, owner_width) + cross_position);
    }

    /// Resolve margin, border and padding into the box. Returns the row and column margin totals.
    pub(crate) fn resolve_box_edges(&mut self, direction: Direction, width: f64) -> (f64, f64) {
        let row = FlexDirection::Row.resolve(direction);
        let column = FlexDirection::Column.resolve(direction);
        let style = &self.style;
        let layout = &mut self.layout;

        let top = style.leading_margin(column, width);
        let leading = style.leading_margin(row, width);
        let bottom = style.trailing_margin(column, width);
        let trailing = style.trailing_margin(row, width);
        layout.margin.set_all(direction, top, leading, bottom, trailing);

        layout.border.set_all(
            direction,
            style.leading_border(column),
            style.leading_border(row),
            style.trailing_border(column),
            style.trailing_border(row),
        );
        layout.padding.set_all(
            direction,
            style.leading_padding(column, width),
            style.leading_padding(row, width),
            style.trailing_padding(column, width),
            style.trailing_padding(row, width),
        );
        (leading + trailing, top + bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> FlexNode {
        FlexNode::new(Rc::new(FlexConfig::default()))
    }

    #[test]
    /// Equal min and max collapse into a fixed dimension.
    ///
    /// # Panics
    /// Panics if the resolved dimension ignores a collapsed min/max pair.
    fn resolve_collapses_min_max() {
        let mut child = node();
        child.style.width = StyleValue::Length(10.0);
        child.style.min_width = StyleValue::Length(40.0);
        child.style.max_width = Some(StyleValue::Length(40.0));
        child.style.max_height = Some(StyleValue::Length(90.0));
        child.resolve_dimensions();
        assert_eq!(child.resolved_width, StyleValue::Length(40.0));
        assert_eq!(child.resolved_height, StyleValue::Auto);
    }

    #[test]
    /// Root sizing picks exact, at-most or undefined from style and the offered size.
    ///
    /// # Panics
    /// Panics if the root measure modes are resolved incorrectly.
    fn root_layout_modes() {
        let mut root = node();
        root.style.width = StyleValue::Length(120.0);
        root.style.max_height = Some(StyleValue::Length(60.0));
        root.resolve_dimensions();
        let (width, width_mode) = root.layout_mode(f64::NAN, FlexDirection::Row);
        assert_eq!(width_mode, MeasureMode::Exactly);
        assert!((width - 120.0).abs() < 0.001);
        let (height, height_mode) = root.layout_mode(f64::NAN, FlexDirection::Column);
        assert_eq!(height_mode, MeasureMode::AtMost);
        assert!((height - 60.0).abs() < 0.001);

        let free = node();
        assert_eq!(free.layout_mode(f64::NAN, FlexDirection::Row).1, MeasureMode::Undefined);
        assert_eq!(free.layout_mode(80.0, FlexDirection::Row).1, MeasureMode::Exactly);
    }

    #[test]
    /// Flex factors only apply below a parent.
    ///
    /// # Panics
    /// Panics if a root reports a non-zero flex factor.
    fn roots_are_inflexible() {
        let mut child = node();
        child.style.flex.grow = 2.0;
        assert!(!child.is_flexible());
        child.parent = Some(NodeId::default());
        assert!(child.is_flexible());
        assert!((child.computed_flex_grow() - 2.0).abs() < 0.001);
        child.style.position_type = PositionType::Absolute;
        assert!(!child.is_flexible());
    }
}
