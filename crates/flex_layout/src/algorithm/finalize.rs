//! Steps 9 and 11: the container's own size, and trailing offsets on reversed axes.

use std::rc::Rc;

use flex_style::{FlexDirection, FlexWrap, MeasureMode};

use super::FlexAlgorithm;

impl FlexAlgorithm<'_> {
    /// Step 9. Sides that were not given exactly are sized to the content.
    pub(super) fn resolve_final_dimensions(&mut self) {
        let request = self.request;
        let owner_width = request.owner_width;
        let style = self.style;
        let mut measured_width = style.bound_axis(
            FlexDirection::Row,
            request.width - self.margin_row,
            owner_width,
            owner_width,
        );
        let mut measured_height = style.bound_axis(
            FlexDirection::Column,
            request.height - self.margin_column,
            request.owner_height,
            owner_width,
        );

        let main_content = self.content_size(
            self.main_axis,
            self.main_mode,
            self.max_line_main_dim,
            self.main_owner_size,
            self.available_inner_main,
            self.total_inner_main,
        );
        let cross_content = self.content_size(
            self.cross_axis,
            self.cross_mode,
            self.total_line_cross_dim + self.total_inner_cross,
            self.cross_owner_size,
            self.available_inner_cross,
            self.total_inner_cross,
        );
        let (main_slot, cross_slot) = if self.is_main_axis_row() {
            (&mut measured_width, &mut measured_height)
        } else {
            (&mut measured_height, &mut measured_width)
        };
        if let Some(size) = main_content {
            *main_slot = size;
        }
        if let Some(size) = cross_content {
            *cross_slot = size;
        }

        let Some(entry) = self.tree.nodes.get_mut(self.node) else {
            return;
        };
        entry.layout.measured_width = measured_width;
        entry.layout.measured_height = measured_height;

        if self.perform_layout && style.flex_wrap == FlexWrap::WrapReverse {
            self.mirror_cross_positions();
        }
    }

    /// Size along `axis` taken from the content, or `None` when the request already fixed it.
    ///
    /// A scrolling container never grows past what it was offered.
    fn content_size(
        &self,
        axis: FlexDirection,
        mode: MeasureMode,
        content: f64,
        owner_size: f64,
        available_inner: f64,
        total_inner: f64,
    ) -> Option<f64> {
        if mode.is_exactly() {
            return None;
        }
        if mode.is_at_most() && self.style.overflow.is_scroll() {
            let bounded = self.style.bound(axis, content, owner_size);
            return Some((available_inner + total_inner).min(bounded).max(total_inner));
        }
        Some(
            self.style
                .bound_axis(axis, content, owner_size, self.request.owner_width),
        )
    }

    /// `wrap-reverse` stacks lines from the cross end.
    fn mirror_cross_positions(&mut self) {
        let cross_axis = self.cross_axis;
        let Some(container_cross) = self
            .container()
            .map(|container| container.layout.measured_dimension(cross_axis))
        else {
            return;
        };
        let children = Rc::clone(&self.children);
        for &child in children.iter() {
            let Some(entry) = self.tree.nodes.get_mut(child) else {
                continue;
            };
            if entry.style.is_absolute() {
                continue;
            }
            let leading = entry.layout.position.leading(cross_axis);
            let size = entry.layout.measured_dimension(cross_axis);
            entry
                .layout
                .position
                .set_leading(cross_axis, container_cross - leading - size);
        }
    }

    /// Step 11: reversed axes also need the offset from the trailing edge.
    pub(super) fn set_trailing_positions(&mut self) {
        if !self.perform_layout {
            return;
        }
        let main_reversed = self.main_axis.is_reversed();
        let cross_reversed = self.cross_axis.is_reversed();
        if !main_reversed && !cross_reversed {
            return;
        }
        let Some((container_width, container_height)) = self
            .container()
            .map(|container| (container.layout.measured_width, container.layout.measured_height))
        else {
            return;
        };
        let children = Rc::clone(&self.children);
        for &child in children.iter() {
            let Some(entry) = self.tree.nodes.get_mut(child) else {
                continue;
            };
            if entry.style.is_hidden() {
                continue;
            }
            for (axis, reversed) in [(self.main_axis, main_reversed), (self.cross_axis, cross_reversed)] {
                if !reversed {
                    continue;
                }
                let container_size = if axis.is_row() { container_width } else { container_height };
                let layout = &mut entry.layout;
                let trailing = container_size - layout.measured_dimension(axis) - layout.position.leading(axis);
                layout.position.set_trailing(axis, trailing);
            }
        }
    }
}
