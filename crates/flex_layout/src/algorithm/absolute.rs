//! Step 10: out-of-flow children, sized against the container's final box.

use std::rc::Rc;

use flex_style::{AlignItems, FlexDirection, FlexWrap, JustifyContent, MeasureMode, NodeStyle};

use super::{FlexAlgorithm, LayoutReason, LayoutRequest, exact_unless_nan};
use crate::node::NodeId;

impl FlexAlgorithm<'_> {
    /// Step 10.
    pub(super) fn layout_absolute_children(&mut self) {
        if !self.perform_layout {
            return;
        }
        let width_mode = if self.is_main_axis_row() {
            self.main_mode
        } else {
            self.cross_mode
        };
        let children = Rc::clone(&self.children);
        for &child in children.iter() {
            let placed = self
                .tree
                .nodes
                .get(child)
                .is_some_and(|entry| entry.style.is_absolute() && !entry.style.is_hidden());
            if placed {
                self.layout_absolute_child(child, width_mode);
            }
        }
    }

    fn layout_absolute_child(&mut self, child: NodeId, width_mode: MeasureMode) {
        let Some((child_width, child_height)) = self.absolute_child_size(child, width_mode) else {
            return;
        };
        let request = LayoutRequest::new(
            child_width,
            child_height,
            MeasureMode::Exactly,
            MeasureMode::Exactly,
            child_width,
            child_height,
        );
        self.tree
            .layout_internal(child, request, self.direction, true, LayoutReason::AbsoluteLayout);
        self.place_absolute_child(child);
    }

    /// Outer size of an absolute child: explicit, from opposite insets, from the aspect
    /// ratio, or finally measured.
    fn absolute_child_size(&mut self, child: NodeId, width_mode: MeasureMode) -> Option<(f64, f64)> {
        let container = self.container()?;
        let container_width = container.layout.measured_width;
        let container_height = container.layout.measured_height;
        let entry = self.tree.nodes.get(child)?;
        let style = entry.style;
        let width = self.available_inner_width;
        let height = self.available_inner_height;
        let margin_row = style.total_outer_size(FlexDirection::Row, width);
        let margin_column = style.total_outer_size(FlexDirection::Column, width);

        let mut child_width = if entry.is_dimension_defined(FlexDirection::Row, width) {
            entry.resolved_width.resolve(width) + margin_row
        } else {
            self.inset_span(&style, FlexDirection::Row, container_width, width)
        };
        let mut child_height = if entry.is_dimension_defined(FlexDirection::Column, height) {
            entry.resolved_height.resolve(height) + margin_column
        } else {
            self.inset_span(&style, FlexDirection::Column, container_height, height)
        };

        // One known side anchors the other through the aspect ratio.
        let ratio = style.aspect_ratio;
        if child_width.is_nan() != child_height.is_nan() && !ratio.is_nan() {
            if child_width.is_nan() {
                child_width = (child_height - margin_column).mul_add(ratio, margin_row);
            } else {
                child_height = margin_column + (child_width - margin_row) / ratio;
            }
        }
        if !child_width.is_nan() && !child_height.is_nan() {
            return Some((child_width, child_height));
        }

        let mut width_mode_for_child = exact_unless_nan(child_width);
        let height_mode_for_child = exact_unless_nan(child_height);
        // Text in an absolute child wraps at the container's width, as browsers do.
        if !self.is_main_axis_row() && child_width.is_nan() && !width_mode.is_undefined() && width > 0.0 {
            child_width = width;
            width_mode_for_child = MeasureMode::AtMost;
        }
        let probe = LayoutRequest::new(
            child_width,
            child_height,
            width_mode_for_child,
            height_mode_for_child,
            child_width,
            child_height,
        );
        self.tree
            .layout_internal(child, probe, self.direction, false, LayoutReason::AbsoluteMeasureChild);
        let measured = self.tree.nodes.get(child)?;
        Some((
            measured.layout.measured_width + margin_row,
            measured.layout.measured_height + margin_column,
        ))
    }

    /// Size between both insets of `axis`, or NaN unless both are set.
    fn inset_span(&self, style: &NodeStyle, axis: FlexDirection, container_size: f64, reference: f64) -> f64 {
        if !style.is_leading_position_defined(axis) || !style.is_trailing_position_defined(axis) {
            return f64::NAN;
        }
        let spanned = container_size
            - self.style.total_border(axis)
            - style.leading_position(axis, reference)
            - style.trailing_position(axis, reference);
        style.bound_axis(axis, spanned, reference, self.available_inner_width)
    }

    /// Trailing insets, then centering or end alignment, for sides without a leading inset.
    fn place_absolute_child(&mut self, child: NodeId) {
        let Some(container) = self.container() else {
            return;
        };
        let container_main = container.layout.measured_dimension(self.main_axis);
        let container_cross = container.layout.measured_dimension(self.cross_axis);
        let Some(entry) = self.tree.nodes.get(child) else {
            return;
        };
        let style = entry.style;
        let main_axis = self.main_axis;
        let cross_axis = self.cross_axis;
        let width = self.available_inner_width;
        let (main_reference, cross_reference) = if self.is_main_axis_row() {
            (width, self.available_inner_height)
        } else {
            (self.available_inner_height, width)
        };
        let child_main = entry.layout.measured_dimension(main_axis);
        let child_cross = entry.layout.measured_dimension(cross_axis);

        let main_free = container_main - child_main;
        let main_leading = style.is_leading_position_defined(main_axis);
        let main_position = if style.is_trailing_position_defined(main_axis) && !main_leading {
            Some(
                main_free
                    - self.style.trailing_border(main_axis)
                    - style.trailing_margin(main_axis, width)
                    - style.trailing_position(main_axis, main_reference),
            )
        } else if main_leading {
            None
        } else {
            match self.style.justify_content {
                JustifyContent::Center => Some(main_free / 2.0),
                JustifyContent::End => Some(main_free),
                _ => None,
            }
        };

        let cross_free = container_cross - child_cross;
        let cross_leading = style.is_leading_position_defined(cross_axis);
        let align = self.style.computed_align_item(&style);
        let wrap_reverse = self.style.flex_wrap == FlexWrap::WrapReverse;
        let cross_position = if style.is_trailing_position_defined(cross_axis) && !cross_leading {
            Some(
                cross_free
                    - self.style.trailing_border(cross_axis)
                    - style.trailing_margin(cross_axis, width)
                    - style.trailing_position(cross_axis, cross_reference),
            )
        } else if cross_leading {
            None
        } else if align == AlignItems::Center {
            Some(cross_free / 2.0)
        } else if (align == AlignItems::End) != wrap_reverse {
            Some(cross_free)
        } else {
            None
        };

        if let Some(position) = main_position {
            self.set_child_leading(child, main_axis, position);
        }
        if let Some(position) = cross_position {
            self.set_child_leading(child, cross_axis, position);
        }
    }
}
