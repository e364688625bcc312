//! Steps 7 and 8: cross-axis alignment of items within their line, then of the
//! lines within the container.

use std::rc::Rc;

use flex_style::{AlignContent, AlignItems, FlexDirection, MeasureMode, NodeStyle, approx_eq};

use super::lines::FlexLine;
use super::{FlexAlgorithm, LayoutReason, LayoutRequest, exact_unless_nan};
use crate::node::NodeId;

/// Cross extent of one line, found while walking its children.
struct LineMetrics {
    /// One past the last child index of the line.
    end: usize,
    height: f64,
    max_ascent: f64,
}

/// Offset inside the line for an item that is not stretched.
fn cross_offset(align: AlignItems, auto_leading: bool, auto_trailing: bool, remaining: f64) -> f64 {
    if auto_leading && auto_trailing {
        return (remaining / 2.0).max(0.0);
    }
    if auto_trailing {
        return 0.0;
    }
    if auto_leading {
        return remaining.max(0.0);
    }
    match align {
        AlignItems::Start => 0.0,
        AlignItems::Center => remaining / 2.0,
        AlignItems::End | AlignItems::Stretch | AlignItems::Baseline => remaining,
    }
}

impl FlexAlgorithm<'_> {
    /// Step 7. Positions are only written when laying out; the line totals always are.
    pub(super) fn align_cross_axis(&mut self, line: &FlexLine) {
        if self.perform_layout {
            let children = Rc::clone(&self.children);
            for &child in children.get(line.start..line.end).unwrap_or_default() {
                self.align_child(child, line.cross_dim);
            }
        }
        self.total_line_cross_dim += line.cross_dim;
        self.max_line_main_dim = self.max_line_main_dim.max(line.main_dim);
    }

    fn align_child(&mut self, child: NodeId, line_cross_dim: f64) {
        let Some(entry) = self.tree.nodes.get(child) else {
            return;
        };
        let style = entry.style;
        if style.is_hidden() {
            return;
        }
        let cross_axis = self.cross_axis;
        if style.is_absolute() {
            self.place_absolute_on_cross_axis(child, &style);
            return;
        }

        let align = self.style.computed_align_item(&style);
        let auto_leading = style.has_auto_leading_margin(cross_axis);
        let auto_trailing = style.has_auto_trailing_margin(cross_axis);
        let mut leading_cross = self.total_leading_cross;
        if align == AlignItems::Stretch && !auto_leading && !auto_trailing {
            if !entry.is_dimension_defined(cross_axis, self.available_inner_cross) {
                self.stretch_child(child, line_cross_dim);
            }
        } else {
            let remaining = self.container_cross_axis - entry.dimension_with_margin(cross_axis, self.available_inner_width);
            leading_cross += cross_offset(align, auto_leading, auto_trailing, remaining);
        }
        self.shift_child_leading(child, cross_axis, self.total_line_cross_dim + leading_cross);
    }

    /// An absolute child with a leading inset sits at that inset; otherwise at border plus margin.
    fn place_absolute_on_cross_axis(&mut self, child: NodeId, style: &NodeStyle) {
        let cross_axis = self.cross_axis;
        let border = self.style.leading_border(cross_axis);
        let margin = style.leading_margin(cross_axis, self.available_inner_width);
        let inset = if style.is_leading_position_defined(cross_axis) {
            style.leading_position(cross_axis, self.available_inner_cross)
        } else {
            f64::NAN
        };
        let position = border + inset + margin;
        let position = if position.is_nan() { border + margin } else { position };
        self.set_child_leading(child, cross_axis, position);
    }

    /// Re-lay a child at the line's cross size.
    fn stretch_child(&mut self, child: NodeId, line_cross_dim: f64) {
        let Some(entry) = self.tree.nodes.get(child) else {
            return;
        };
        let style = entry.style;
        let main_axis = self.main_axis;
        let cross_axis = self.cross_axis;
        let is_row = main_axis.is_row();
        let width = self.available_inner_width;
        let measured_main = entry.layout.measured_dimension(main_axis);
        let ratio = style.aspect_ratio;

        let cross_size = if ratio.is_nan() {
            line_cross_dim
        } else {
            let derived = if is_row { measured_main / ratio } else { measured_main * ratio };
            style.total_outer_size(cross_axis, width) + derived
        };
        let main_size = measured_main + style.total_outer_size(main_axis, width);
        let (_, main_size) =
            style.constrain_max_size(main_axis, self.available_inner_main, width, MeasureMode::Exactly, main_size);
        let (_, cross_size) =
            style.constrain_max_size(cross_axis, self.available_inner_cross, width, MeasureMode::Exactly, cross_size);

        let (child_width, child_height) = if is_row {
            (main_size, cross_size)
        } else {
            (cross_size, main_size)
        };
        let request = LayoutRequest::new(
            child_width,
            child_height,
            exact_unless_nan(child_width),
            exact_unless_nan(child_height),
            width,
            self.available_inner_height,
        );
        self.tree
            .layout_internal(child, request, self.direction, true, LayoutReason::Stretch);
    }

    /// Step 8: distribute the container's spare cross space over the lines.
    ///
    /// Runs for multi-line containers and for any baseline layout.
    pub(super) fn align_lines(&mut self, line_count: u32, baseline_layout: bool) {
        if !self.perform_layout || (line_count <= 1 && !baseline_layout) {
            return;
        }
        let (mut current_lead, cross_dim_lead) = self.align_content_offsets(line_count);
        let children = Rc::clone(&self.children);
        let mut start = 0;
        for line_index in 0..line_count {
            let metrics = self.measure_line(&children, start, line_index);
            let line_height = metrics.height + cross_dim_lead;
            for &child in children.get(start..metrics.end).unwrap_or_default() {
                self.align_line_item(child, current_lead, line_height, metrics.max_ascent);
            }
            current_lead += line_height;
            start = metrics.end;
        }
    }

    /// Leading offset of the first line and extra cross size per line from `align-content`.
    fn align_content_offsets(&self, line_count: u32) -> (f64, f64) {
        let mut lead = self.total_leading_cross;
        let available = self.available_inner_cross;
        if available.is_nan() {
            return (lead, 0.0);
        }
        let remaining = available - self.total_line_cross_dim;
        let has_room = available > self.total_line_cross_dim;
        let lines = f64::from(line_count);
        let gap = match self.style.align_content {
            AlignContent::End => {
                lead += remaining;
                0.0
            }
            AlignContent::Center => {
                lead += remaining / 2.0;
                0.0
            }
            AlignContent::Stretch if has_room => remaining / lines,
            AlignContent::SpaceAround if has_room => {
                lead += remaining / (2.0 * lines);
                if line_count > 1 { remaining / lines } else { 0.0 }
            }
            AlignContent::SpaceAround => {
                lead += remaining / 2.0;
                0.0
            }
            AlignContent::SpaceBetween if has_room && line_count > 1 => remaining / (lines - 1.0),
            AlignContent::Start | AlignContent::Stretch | AlignContent::SpaceBetween => 0.0,
        };
        (lead, gap)
    }

    /// Height and end of line `line_index`, whose first child is at `start`.
    fn measure_line(&self, children: &[NodeId], start: usize, line_index: u32) -> LineMetrics {
        let cross_axis = self.cross_axis;
        let width = self.available_inner_width;
        let mut metrics = LineMetrics {
            end: start,
            height: 0.0,
            max_ascent: 0.0,
        };
        let mut max_descent: f64 = 0.0;
        for &child in children.get(start..).unwrap_or_default() {
            let Some(entry) = self.tree.nodes.get(child) else {
                metrics.end += 1;
                continue;
            };
            let style = &entry.style;
            if style.is_hidden() || style.is_absolute() {
                metrics.end += 1;
                continue;
            }
            if entry.line_index != line_index {
                break;
            }
            if entry.layout.is_layout_dimension_defined(cross_axis) {
                metrics.height = metrics
                    .height
                    .max(entry.layout.measured_dimension(cross_axis) + style.total_outer_size(cross_axis, width));
            }
            if self.style.computed_align_item(style) == AlignItems::Baseline {
                let ascent = self.tree.baseline(child) + style.leading_margin(FlexDirection::Column, width);
                let descent =
                    entry.layout.measured_height + style.total_outer_size(FlexDirection::Column, width) - ascent;
                metrics.max_ascent = metrics.max_ascent.max(ascent);
                max_descent = max_descent.max(descent);
                metrics.height = metrics.height.max(metrics.max_ascent + max_descent);
            }
            metrics.end += 1;
        }
        metrics
    }

    /// Place one in-flow item inside a line that starts at `lead`.
    fn align_line_item(&mut self, child: NodeId, lead: f64, line_height: f64, max_ascent: f64) {
        let Some(entry) = self.tree.nodes.get(child) else {
            return;
        };
        let style = entry.style;
        if style.is_hidden() || style.is_absolute() {
            return;
        }
        let cross_axis = self.cross_axis;
        let width = self.available_inner_width;
        let measured_cross = entry.layout.measured_dimension(cross_axis);
        let cross_defined = entry.is_dimension_defined(cross_axis, self.available_inner_cross);

        match self.style.computed_align_item(&style) {
            AlignItems::Start => {
                self.set_child_leading(child, cross_axis, lead + style.leading_margin(cross_axis, width));
            }
            AlignItems::End => {
                let position = lead + line_height - style.trailing_margin(cross_axis, width) - measured_cross;
                self.set_child_leading(child, cross_axis, position);
            }
            AlignItems::Center => {
                self.set_child_leading(child, cross_axis, lead + (line_height - measured_cross) / 2.0);
            }
            AlignItems::Stretch => {
                self.set_child_leading(child, cross_axis, lead + style.leading_margin(cross_axis, width));
                if !cross_defined {
                    self.stretch_line_item(child, line_height);
                }
            }
            AlignItems::Baseline => {
                let top = lead + max_ascent - self.tree.baseline(child)
                    + style.leading_position(FlexDirection::Column, self.available_inner_cross);
                self.set_child_leading(child, FlexDirection::Column, top);
            }
        }
    }

    /// Re-lay an item at the full height of its line.
    fn stretch_line_item(&mut self, child: NodeId, line_height: f64) {
        let Some(entry) = self.tree.nodes.get(child) else {
            return;
        };
        let width = self.available_inner_width;
        let margin_main = entry.style.total_outer_size(self.main_axis, width);
        let measured_width = entry.layout.measured_width;
        let measured_height = entry.layout.measured_height;
        let (child_width, child_height) = if self.is_main_axis_row() {
            (measured_width + margin_main, line_height)
        } else {
            (line_height, measured_height + margin_main)
        };
        if approx_eq(child_width, measured_width) && approx_eq(child_height, measured_height) {
            return;
        }
        let request = LayoutRequest::new(
            child_width,
            child_height,
            MeasureMode::Exactly,
            MeasureMode::Exactly,
            width,
            self.available_inner_height,
        );
        self.tree
            .layout_internal(child, request, self.direction, true, LayoutReason::MultilineStretch);
    }
}
