//! Step 3: the hypothetical main size of every child.

use std::rc::Rc;

use flex_style::{AlignItems, FlexDirection, MeasureMode, approx_eq};
use log::trace;

use super::{FlexAlgorithm, LayoutReason, LayoutRequest};
use crate::node::NodeId;
use crate::tree::FlexTree;

impl FlexAlgorithm<'_> {
    /// Step 3. Also places every visible child at its initial offset when laying out.
    pub(super) fn compute_flex_basis(&mut self) {
        // With exactly one child that both grows and shrinks, its basis can start at
        // zero and simply take whatever space remains.
        let single_flex_child = self
            .main_mode
            .is_exactly()
            .then(|| self.tree.find_flex_child(self.node))
            .flatten();
        let main_axis = self.main_axis;
        let width = self.available_inner_width;
        let children = Rc::clone(&self.children);
        let mut total_outer_flex_basis = 0.0;

        for &child in children.iter() {
            let Some(entry) = self.tree.nodes.get_mut(child) else {
                continue;
            };
            entry.resolve_dimensions();
            if entry.style.is_hidden() {
                self.tree.zero_layout(child);
                if let Some(hidden) = self.tree.nodes.get_mut(child) {
                    hidden.has_new_layout = true;
                    hidden.is_dirty = false;
                }
                continue;
            }
            if self.perform_layout {
                let child_direction = entry.style.resolve_direction(self.direction);
                entry.set_initial_position(
                    child_direction,
                    self.available_inner_main,
                    self.available_inner_cross,
                    width,
                );
            }
            if entry.style.is_absolute() {
                continue;
            }
            let margin_main = entry.style.total_outer_size(main_axis, width);
            if single_flex_child == Some(child) {
                entry.layout.computed_flex_basis = 0.0;
            } else {
                self.resolve_flex_basis(child);
            }
            let basis = self
                .tree
                .nodes
                .get(child)
                .map_or(0.0, |resolved| resolved.layout.computed_flex_basis);
            total_outer_flex_basis += basis + margin_main;
        }

        self.total_outer_flex_basis = total_outer_flex_basis;
        self.flex_basis_overflows =
            !self.main_mode.is_undefined() && total_outer_flex_basis > self.available_inner_main;
        // Items that cannot fit have to wrap against a definite line length.
        if self.is_wrapped && self.flex_basis_overflows && self.main_mode.is_at_most() {
            self.main_mode = MeasureMode::Exactly;
        }
        trace!(
            target: "flex::algorithm",
            "[FLEX] {:?} flex basis total={total_outer_flex_basis} overflows={}",
            self.node,
            self.flex_basis_overflows
        );
    }

    /// Flex basis from `flex-basis`, a definite main size, or a measure-only layout.
    fn resolve_flex_basis(&mut self, child: NodeId) {
        let main_axis = self.main_axis;
        let is_row = main_axis.is_row();
        let width = self.available_inner_width;
        let height = self.available_inner_height;
        let main_size = if is_row { width } else { height };
        let Some(entry) = self.tree.nodes.get_mut(child) else {
            return;
        };
        let explicit_basis = entry.style.flex.basis.resolve(main_size);
        let row_defined = entry.is_dimension_defined(FlexDirection::Row, width);
        let column_defined = entry.is_dimension_defined(FlexDirection::Column, height);

        if !explicit_basis.is_nan() && !main_size.is_nan() {
            if entry.layout.computed_flex_basis.is_nan() {
                entry.layout.computed_flex_basis =
                    explicit_basis.max(entry.style.total_inner_size(main_axis, width));
            }
        } else if is_row && row_defined {
            entry.layout.computed_flex_basis = entry
                .resolved_width
                .resolve(width)
                .max(entry.style.total_inner_size(FlexDirection::Row, width));
        } else if !is_row && column_defined {
            entry.layout.computed_flex_basis = entry
                .resolved_height
                .resolve(height)
                .max(entry.style.total_inner_size(FlexDirection::Column, width));
        } else {
            self.measure_flex_basis(child, row_defined, column_defined);
        }
    }

    /// Lay the child out in measure-only mode and take its main size as the basis.
    fn measure_flex_basis(&mut self, child: NodeId, row_defined: bool, column_defined: bool) {
        let main_axis = self.main_axis;
        let is_row = main_axis.is_row();
        let width = self.available_inner_width;
        let height = self.available_inner_height;
        let scroll = self.style.overflow.is_scroll();
        let Some(entry) = self.tree.nodes.get(child) else {
            return;
        };
        let style = entry.style;
        let margin_row = style.total_outer_size(FlexDirection::Row, width);
        let margin_column = style.total_outer_size(FlexDirection::Column, width);
        let ratio = style.aspect_ratio;
        let mut probe = LayoutRequest::new(
            f64::NAN,
            f64::NAN,
            MeasureMode::Undefined,
            MeasureMode::Undefined,
            width,
            height,
        );
        if row_defined {
            probe.width = entry.resolved_width.resolve(width) + margin_row;
            probe.width_mode = MeasureMode::Exactly;
        }
        if column_defined {
            probe.height = entry.resolved_height.resolve(height) + margin_column;
            probe.height_mode = MeasureMode::Exactly;
        }

        // A scroll container does not bound its content along the main axis.
        if (!is_row || !scroll) && probe.width.is_nan() && !width.is_nan() {
            probe.width = width;
            probe.width_mode = MeasureMode::AtMost;
        }
        if (is_row || !scroll) && probe.height.is_nan() && !height.is_nan() {
            probe.height = height;
            probe.height_mode = MeasureMode::AtMost;
        }
        if !ratio.is_nan() {
            if !is_row && probe.width_mode.is_exactly() {
                probe.height = margin_column + (probe.width - margin_row) / ratio;
                probe.height_mode = MeasureMode::Exactly;
            } else if is_row && probe.height_mode.is_exactly() {
                probe.width = (probe.height - margin_column) * ratio;
                probe.width_mode = MeasureMode::Exactly;
            }
        }

        let stretch = self.style.computed_align_item(&style) == AlignItems::Stretch;
        if stretch {
            self.stretch_probe(&mut probe, row_defined, column_defined, (margin_row, margin_column), ratio);
        }

        (probe.width_mode, probe.width) =
            style.constrain_max_size(FlexDirection::Row, width, width, probe.width_mode, probe.width);
        (probe.height_mode, probe.height) =
            style.constrain_max_size(FlexDirection::Column, height, width, probe.height_mode, probe.height);

        self.tree
            .layout_internal(child, probe, self.direction, false, LayoutReason::MeasureChild);
        if let Some(measured) = self.tree.nodes.get_mut(child) {
            measured.layout.computed_flex_basis = measured
                .layout
                .measured_dimension(main_axis)
                .max(measured.style.total_inner_size(main_axis, width));
        }
    }

    /// Stretched children are measured at the container's exact cross size.
    fn stretch_probe(
        &self,
        probe: &mut LayoutRequest,
        row_defined: bool,
        column_defined: bool,
        (margin_row, margin_column): (f64, f64),
        ratio: f64,
    ) {
        let is_row = self.is_main_axis_row();
        let width = self.available_inner_width;
        let height = self.available_inner_height;
        if !is_row
            && !row_defined
            && !width.is_nan()
            && self.request.width_mode.is_exactly()
            && !probe.width_mode.is_exactly()
        {
            probe.width = width;
            probe.width_mode = MeasureMode::Exactly;
            if !ratio.is_nan() {
                probe.height = (probe.width - margin_row) / ratio;
                probe.height_mode = MeasureMode::Exactly;
            }
        }
        if is_row
            && !column_defined
            && !height.is_nan()
            && self.request.height_mode.is_exactly()
            && !probe.height_mode.is_exactly()
        {
            probe.height = height;
            probe.height_mode = MeasureMode::Exactly;
            if !ratio.is_nan() {
                probe.width = (probe.height - margin_column) * ratio;
                probe.width_mode = MeasureMode::Exactly;
            }
        }
    }
}

impl FlexTree {
    /// The only flexible child of `id`, if it both grows and shrinks.
    pub(crate) fn find_flex_child(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        let mut found = None;
        for &child in node.children.iter() {
            let Some(entry) = self.nodes.get(child) else {
                continue;
            };
            if !entry.is_flexible() {
                continue;
            }
            if found.is_some()
                || approx_eq(entry.computed_flex_grow(), 0.0)
                || approx_eq(entry.computed_flex_shrink(), 0.0)
            {
                return None;
            }
            found = Some(child);
        }
        found
    }
}
