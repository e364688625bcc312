//! Step 4: greedy packing of children into flex lines.

use std::rc::Rc;

use log::trace;

use super::FlexAlgorithm;
use crate::node::NodeId;

/// One flex line, filled by [`FlexAlgorithm::collect_line`] and refined by steps 5 through 7.
#[derive(Debug, Default)]
pub(super) struct FlexLine {
    /// Child index range `[start, end)`, hidden and absolute children included.
    pub(super) start: usize,
    pub(super) end: usize,
    pub(super) items_on_line: u32,
    /// Outer flex bases of the in-flow items.
    pub(super) size_consumed: f64,
    pub(super) total_flex_grow_factors: f64,
    /// Sum of `-shrink * basis`.
    pub(super) total_flex_shrink_scaled_factors: f64,
    /// In-flow children of the line, in order.
    pub(super) relative_children: Vec<NodeId>,
    pub(super) remaining_free_space: f64,
    pub(super) main_dim: f64,
    pub(super) cross_dim: f64,
}

impl FlexAlgorithm<'_> {
    /// Steps 4 through 8: every line is flexed, justified and aligned before the next
    /// one is collected.
    pub(super) fn layout_lines(&mut self) {
        // Sizes along the main axis do not matter when only an exact cross size is asked for.
        let can_skip_flex = !self.perform_layout && self.cross_mode.is_exactly();
        let child_count = self.children.len();
        let mut start = 0;
        let mut line_count = 0;
        while start < child_count {
            let mut line = self.collect_line(line_count, start);
            self.resolve_line_lengths(&mut line, can_skip_flex);
            self.justify_main_axis(&mut line, can_skip_flex);
            self.resolve_line_cross_size(&mut line);
            self.align_cross_axis(&line);
            trace!(
                target: "flex::algorithm",
                "[FLEX] {:?} line {line_count}: children {}..{} main={} cross={} free={}",
                self.node,
                line.start,
                line.end,
                line.main_dim,
                line.cross_dim,
                line.remaining_free_space
            );
            line_count += 1;
            start = line.end;
        }
        let baseline_layout = self.tree.is_baseline_layout(self.node);
        self.align_lines(line_count, baseline_layout);
    }

    /// Take children from `start` until the line is full.
    ///
    /// A wrapping container breaks before an item that would overflow a non-empty line.
    pub(super) fn collect_line(&mut self, line_index: u32, start: usize) -> FlexLine {
        let mut line = FlexLine {
            start,
            end: start,
            ..FlexLine::default()
        };
        let main_axis = self.main_axis;
        let width = self.available_inner_width;
        let children = Rc::clone(&self.children);

        for &child in children.get(start..).unwrap_or_default() {
            let Some(entry) = self.tree.nodes.get_mut(child) else {
                line.end += 1;
                continue;
            };
            if entry.style.is_hidden() || entry.style.is_absolute() {
                line.end += 1;
                continue;
            }
            entry.line_index = line_index;
            let margin_main = entry.style.total_outer_size(main_axis, width);
            let flex_basis = entry
                .style
                .bound(main_axis, entry.layout.computed_flex_basis, self.main_owner_size);
            let outer_basis = flex_basis + margin_main;
            if self.is_wrapped
                && line.items_on_line > 0
                && line.size_consumed + outer_basis > self.available_inner_main
            {
                break;
            }
            line.size_consumed += outer_basis;
            line.items_on_line += 1;
            if entry.is_flexible() {
                line.total_flex_grow_factors += entry.computed_flex_grow();
                // Shrinking is weighted by the item's own basis.
                line.total_flex_shrink_scaled_factors -=
                    entry.computed_flex_shrink() * entry.layout.computed_flex_basis;
            }
            line.relative_children.push(child);
            line.end += 1;
        }

        // Fractional totals would blow up the shares handed out per factor.
        if line.total_flex_grow_factors > 0.0 && line.total_flex_grow_factors < 1.0 {
            line.total_flex_grow_factors = 1.0;
        }
        if line.total_flex_shrink_scaled_factors > 0.0 && line.total_flex_shrink_scaled_factors < 1.0 {
            line.total_flex_shrink_scaled_factors = 1.0;
        }
        line
    }
}
