//! Step 6: main-axis placement within a line and the line's cross size.

use std::rc::Rc;

use flex_style::{FlexDirection, JustifyContent, NodeStyle};

use super::FlexAlgorithm;
use super::lines::FlexLine;
use crate::node::NodeId;

impl FlexAlgorithm<'_> {
    /// Offset every item of the line along the main axis and measure the line.
    ///
    /// Auto margins take all free space; `justify-content` only applies to a line
    /// without them.
    pub(super) fn justify_main_axis(&mut self, line: &mut FlexLine, can_skip_flex: bool) {
        let main_axis = self.main_axis;
        let cross_axis = self.cross_axis;
        let owner_width = self.request.owner_width;
        let width = self.available_inner_width;
        let leading_inner_main = self.style.total_leading_size(main_axis, owner_width);
        let trailing_inner_main = self.style.total_trailing_size(main_axis, owner_width);

        // An at-most container only grows to its min size, never to fill the bound.
        if self.main_mode.is_at_most() && line.remaining_free_space > 0.0 {
            let min_main = self.style.min_dimension(main_axis).resolve(self.main_owner_size);
            line.remaining_free_space = if min_main.is_nan() {
                0.0
            } else {
                let occupied = self.available_inner_main - line.remaining_free_space;
                (min_main - leading_inner_main - trailing_inner_main - occupied).max(0.0)
            };
        }

        let children = Rc::clone(&self.children);
        let members = children.get(line.start..line.end).unwrap_or_default();
        let auto_margins = self.count_auto_margins(members);
        let (leading_main, between_main) = if auto_margins == 0 {
            self.justify_offsets(line)
        } else {
            (0.0, 0.0)
        };
        let auto_margin_share = line.remaining_free_space / f64::from(auto_margins);

        line.main_dim = leading_inner_main + leading_main;
        line.cross_dim = 0.0;
        let baseline_layout = self.tree.is_baseline_layout(self.node);
        let mut max_ascent: f64 = 0.0;
        let mut max_descent: f64 = 0.0;

        for &child in members {
            let Some(entry) = self.tree.nodes.get(child) else {
                continue;
            };
            let style = entry.style;
            if style.is_hidden() {
                continue;
            }
            if style.is_absolute() {
                if self.perform_layout {
                    self.place_absolute_on_main_axis(child, &style, leading_main);
                }
                continue;
            }

            let flex_basis = entry.layout.computed_flex_basis;
            let main_with_margin = entry.dimension_with_margin(main_axis, width);
            let cross_with_margin = entry.dimension_with_margin(cross_axis, width);
            let measured_height = entry.layout.measured_height;

            if style.has_auto_leading_margin(main_axis) {
                line.main_dim += auto_margin_share;
            }
            if self.perform_layout {
                self.shift_child_leading(child, main_axis, line.main_dim);
            }
            if style.has_auto_trailing_margin(main_axis) {
                line.main_dim += auto_margin_share;
            }

            if can_skip_flex {
                line.main_dim += between_main + flex_basis + style.total_outer_size(main_axis, width);
                line.cross_dim = self.available_inner_cross;
            } else if baseline_layout {
                line.main_dim += between_main + main_with_margin;
                let ascent = self.tree.baseline(child) + style.leading_margin(FlexDirection::Column, width);
                let descent = measured_height + style.total_outer_size(FlexDirection::Column, width) - ascent;
                max_ascent = max_ascent.max(ascent);
                max_descent = max_descent.max(descent);
            } else {
                line.main_dim += between_main + main_with_margin;
                line.cross_dim = line.cross_dim.max(cross_with_margin);
            }
        }

        line.main_dim += trailing_inner_main;
        if baseline_layout {
            line.cross_dim = max_ascent + max_descent;
        }
    }

    /// Explicit insets win over justification.
    fn place_absolute_on_main_axis(&mut self, child: NodeId, style: &NodeStyle, leading_main: f64) {
        let main_axis = self.main_axis;
        let leading_border = self.style.leading_border(main_axis);
        if style.is_leading_position_defined(main_axis) {
            let position = leading_border
                + style.leading_position(main_axis, self.available_inner_main)
                + style.leading_margin(main_axis, self.available_inner_width);
            self.set_child_leading(child, main_axis, position);
        } else {
            self.shift_child_leading(child, main_axis, leading_border + leading_main);
        }
    }

    /// Number of auto main-axis margins among the in-flow children of a line.
    fn count_auto_margins(&self, members: &[NodeId]) -> u32 {
        let main_axis = self.main_axis;
        members
            .iter()
            .filter_map(|&child| self.tree.nodes.get(child))
            .filter(|entry| !entry.style.is_absolute())
            .map(|entry| {
                u32::from(entry.style.has_auto_leading_margin(main_axis))
                    + u32::from(entry.style.has_auto_trailing_margin(main_axis))
            })
            .sum()
    }

    /// Leading offset and gap between items from `justify-content`.
    fn justify_offsets(&self, line: &FlexLine) -> (f64, f64) {
        let free_space = line.remaining_free_space;
        let items = f64::from(line.items_on_line);
        match self.style.justify_content {
            JustifyContent::Center => (free_space / 2.0, 0.0),
            JustifyContent::End => (free_space, 0.0),
            JustifyContent::SpaceBetween if line.items_on_line > 1 => {
                (0.0, free_space.max(0.0) / (items - 1.0))
            }
            JustifyContent::SpaceEvenly => {
                let between = free_space / (items + 1.0);
                (between, between)
            }
            JustifyContent::SpaceAround => {
                let between = free_space / items;
                (between / 2.0, between)
            }
            JustifyContent::Start | JustifyContent::SpaceBetween => (0.0, 0.0),
        }
    }

    /// The rest of step 6: the cross size available to the line's items, and the
    /// line's own cross size, both kept inside the container's min/max.
    pub(super) fn resolve_line_cross_size(&mut self, line: &mut FlexLine) {
        self.container_cross_axis = if self.cross_mode.is_exactly() {
            self.available_inner_cross
        } else {
            self.bound_line_cross(line.cross_dim)
        };
        if !self.is_wrapped && self.cross_mode.is_exactly() {
            line.cross_dim = self.available_inner_cross;
        }
        line.cross_dim = self.bound_line_cross(line.cross_dim);
    }

    fn bound_line_cross(&self, cross_dim: f64) -> f64 {
        self.style.bound_axis(
            self.cross_axis,
            cross_dim + self.total_inner_cross,
            self.cross_owner_size,
            self.request.owner_width,
        ) - self.total_inner_cross
    }
}
