//! Step 5: distribute a line's free space over its flexible items.
//!
//! Two passes: the first drops every item whose share would break its min/max from
//! the factor totals, the second sizes every item from the corrected totals and lays
//! it out. This is not a fixed-point iteration; a clamp found in the second pass is
//! not redistributed.

use flex_style::{AlignItems, MeasureMode, approx_eq};
use log::trace;

use super::lines::FlexLine;
use super::{FlexAlgorithm, LayoutReason, LayoutRequest};
use crate::node::{FlexNode, NodeId};

impl FlexAlgorithm<'_> {
    /// Step 5.
    pub(super) fn resolve_line_lengths(&mut self, line: &mut FlexLine, can_skip_flex: bool) {
        let size_based_on_content = !self.main_mode.is_exactly() && self.fit_main_to_constraints(line);
        if !size_based_on_content && !self.available_inner_main.is_nan() {
            line.remaining_free_space = self.available_inner_main - line.size_consumed;
        } else if line.size_consumed < 0.0 {
            // Negative margins can leave the consumed size below zero.
            line.remaining_free_space = -line.size_consumed;
        }
        if !can_skip_flex {
            self.resolve_flexible_length(line);
        }
        self.mark_overflow(line.remaining_free_space < 0.0);
    }

    /// Keep an inexact main size inside the container's min/max.
    ///
    /// Returns true when the line's own content decides the main size.
    fn fit_main_to_constraints(&mut self, line: &FlexLine) -> bool {
        let owner_size = self.main_owner_size;
        let min_inner = self.style.min_dimension(self.main_axis).resolve(owner_size) - self.total_inner_main;
        let max_inner = self.style.max_dimension(self.main_axis).resolve(owner_size) - self.total_inner_main;
        if !min_inner.is_nan() && line.size_consumed < min_inner {
            self.available_inner_main = min_inner;
            return false;
        }
        if !max_inner.is_nan() && line.size_consumed > max_inner {
            self.available_inner_main = max_inner;
            return false;
        }
        let container_grows = self
            .container()
            .is_some_and(|container| container.computed_flex_grow() != 0.0);
        if line.total_flex_grow_factors == 0.0 || !container_grows {
            self.available_inner_main = line.size_consumed;
        }
        true
    }

    fn resolve_flexible_length(&mut self, line: &mut FlexLine) {
        let original_free_space = line.remaining_free_space;
        self.distribute_free_space_first_pass(line);
        let distributed = self.distribute_free_space_second_pass(line);
        line.remaining_free_space = original_free_space - distributed;
        trace!(
            target: "flex::algorithm",
            "[FLEX] {:?} distributed {distributed} of {original_free_space}",
            self.node
        );
    }

    /// Remove clamped items from the factor totals and their clamped size from the free space.
    fn distribute_free_space_first_pass(&self, line: &mut FlexLine) {
        let main_axis = self.main_axis;
        let mut delta_free_space = 0.0;
        for &child in &line.relative_children {
            let Some(entry) = self.tree.nodes.get(child) else {
                continue;
            };
            let flex_basis = entry
                .style
                .bound(main_axis, entry.layout.computed_flex_basis, self.main_owner_size);
            let remaining = line.remaining_free_space;
            let (factor, total) = if remaining < 0.0 {
                (
                    -entry.computed_flex_shrink() * flex_basis,
                    line.total_flex_shrink_scaled_factors,
                )
            } else if remaining > 0.0 {
                (entry.computed_flex_grow(), line.total_flex_grow_factors)
            } else {
                continue;
            };
            if factor.is_nan() || factor == 0.0 {
                continue;
            }
            let base_size = (remaining / total).mul_add(factor, flex_basis);
            let bound_size =
                entry
                    .style
                    .bound_axis(main_axis, base_size, self.available_inner_main, self.available_inner_width);
            if base_size.is_nan() || bound_size.is_nan() || approx_eq(base_size, bound_size) {
                continue;
            }
            delta_free_space += bound_size - flex_basis;
            if remaining < 0.0 {
                line.total_flex_shrink_scaled_factors -= factor;
            } else {
                line.total_flex_grow_factors -= factor;
            }
        }
        line.remaining_free_space -= delta_free_space;
    }

    /// Size and lay out every item of the line. Returns the space actually handed out.
    fn distribute_free_space_second_pass(&mut self, line: &FlexLine) -> f64 {
        let mut delta_free_space = 0.0;
        for &child in &line.relative_children {
            let Some(entry) = self.tree.nodes.get(child) else {
                continue;
            };
            let flex_basis = entry
                .style
                .bound(self.main_axis, entry.layout.computed_flex_basis, self.main_owner_size);
            let main_size = self.flexed_main_size(entry, line, flex_basis);
            delta_free_space += main_size - flex_basis;
            self.layout_flexed_child(child, main_size);
        }
        delta_free_space
    }

    /// Main size of one item after its share of the free space, clamped to its min/max.
    fn flexed_main_size(&self, entry: &FlexNode, line: &FlexLine, flex_basis: f64) -> f64 {
        let remaining = line.remaining_free_space;
        let size = if remaining < 0.0 {
            let factor = -entry.computed_flex_shrink() * flex_basis;
            if factor == 0.0 {
                return flex_basis;
            }
            let total = line.total_flex_shrink_scaled_factors;
            if total == 0.0 {
                flex_basis + factor
            } else {
                (remaining / total).mul_add(factor, flex_basis)
            }
        } else if remaining > 0.0 {
            let factor = entry.computed_flex_grow();
            if factor.is_nan() || factor == 0.0 {
                return flex_basis;
            }
            (remaining / line.total_flex_grow_factors).mul_add(factor, flex_basis)
        } else {
            return flex_basis;
        };
        entry
            .style
            .bound_axis(self.main_axis, size, self.available_inner_main, self.available_inner_width)
    }

    /// Lay out one flexed item at its final main size.
    ///
    /// Items that will be stretched later are only measured here.
    fn layout_flexed_child(&mut self, child: NodeId, main_size: f64) {
        let Some(entry) = self.tree.nodes.get(child) else {
            return;
        };
        let style = entry.style;
        let main_axis = self.main_axis;
        let cross_axis = self.cross_axis;
        let is_row = main_axis.is_row();
        let width = self.available_inner_width;
        let available_cross = self.available_inner_cross;
        let margin_main = style.total_outer_size(main_axis, width);
        let margin_cross = style.total_outer_size(cross_axis, width);
        let cross_defined = entry.is_dimension_defined(cross_axis, available_cross);
        let stretches = self.style.computed_align_item(&style) == AlignItems::Stretch
            && !style.has_auto_leading_margin(cross_axis)
            && !style.has_auto_trailing_margin(cross_axis);
        let ratio = style.aspect_ratio;

        let (cross_size, cross_mode) = if !ratio.is_nan() {
            let derived = if is_row { main_size / ratio } else { main_size * ratio };
            (derived + margin_cross, MeasureMode::Exactly)
        } else if !available_cross.is_nan()
            && !cross_defined
            && self.cross_mode.is_exactly()
            && !(self.is_wrapped && self.flex_basis_overflows)
            && stretches
        {
            (available_cross, MeasureMode::Exactly)
        } else if !cross_defined {
            let mode = if available_cross.is_nan() {
                MeasureMode::Undefined
            } else {
                MeasureMode::AtMost
            };
            (available_cross, mode)
        } else {
            let dimension = entry.computed_dimension(cross_axis);
            let size = dimension.resolve(available_cross) + margin_cross;
            // A percentage of an inexact cross size is not a definite size.
            let loose = dimension.is_percentage() && !self.cross_mode.is_exactly();
            let mode = if size.is_nan() || loose {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };
            (size, mode)
        };

        let (main_mode, main_size) = style.constrain_max_size(
            main_axis,
            self.available_inner_main,
            width,
            MeasureMode::Exactly,
            main_size + margin_main,
        );
        let (cross_mode, cross_size) =
            style.constrain_max_size(cross_axis, available_cross, width, cross_mode, cross_size);
        let requires_stretch_layout = !cross_defined && stretches;
        let request = if is_row {
            LayoutRequest::new(main_size, cross_size, main_mode, cross_mode, width, self.available_inner_height)
        } else {
            LayoutRequest::new(cross_size, main_size, cross_mode, main_mode, width, self.available_inner_height)
        };
        self.tree.layout_internal(
            child,
            request,
            self.direction,
            self.perform_layout && !requires_stretch_layout,
            LayoutReason::FlexLayout,
        );
        let child_overflow = self
            .tree
            .nodes
            .get(child)
            .is_some_and(|laid_out| laid_out.layout.has_overflow);
        self.mark_overflow(child_overflow);
    }
}
