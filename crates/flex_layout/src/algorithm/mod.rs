//! The flexbox pass.
//!
//! [`FlexTree::layout_internal`] is the recursive, cached entry point. When a node
//! with children needs real work it builds a [`FlexAlgorithm`], which runs the
//! numbered steps below over the node and its direct children, recursing into
//! `layout_internal` for every child it has to size.
//!
//! 1. setup of axes, inner sizes and measure modes ([`FlexAlgorithm::new`])
//! 2. available inner size
//! 3. flex basis of every child
//! 4. collect children into lines, and per line:
//!    5. resolve flexible lengths,
//!    6. justify along the main axis,
//!    7. align along the cross axis
//! 8. align the lines themselves (`align-content`, baselines)
//! 9. final dimensions of the container
//! 10. absolutely positioned children
//! 11. trailing positions for reversed axes

mod absolute;
mod baseline;
mod cross;
mod finalize;
mod flex_basis;
mod flexible;
mod internal;
mod justify;
mod lines;

use std::rc::Rc;

use flex_style::{Direction, FlexDirection, MeasureMode, NodeStyle, clamp_inner};

pub use internal::{LayoutReason, LayoutRequest};

use crate::node::{ChildList, FlexNode, NodeId};
use crate::tree::FlexTree;

/// A known size is requested exactly, an unknown one is left to the child.
#[inline]
fn exact_unless_nan(size: f64) -> MeasureMode {
    if size.is_nan() {
        MeasureMode::Undefined
    } else {
        MeasureMode::Exactly
    }
}

/// Working state of one flex pass over a single container.
pub struct FlexAlgorithm<'tree> {
    tree: &'tree mut FlexTree,
    node: NodeId,
    /// Snapshot of the container's style; layout never writes styles.
    style: NodeStyle,
    children: ChildList,
    request: LayoutRequest,
    perform_layout: bool,

    direction: Direction,
    main_axis: FlexDirection,
    cross_axis: FlexDirection,
    is_wrapped: bool,
    main_owner_size: f64,
    cross_owner_size: f64,
    total_leading_cross: f64,
    total_inner_main: f64,
    total_inner_cross: f64,
    total_inner_row: f64,
    total_inner_column: f64,
    margin_row: f64,
    margin_column: f64,
    main_mode: MeasureMode,
    cross_mode: MeasureMode,

    available_inner_width: f64,
    available_inner_height: f64,
    available_inner_main: f64,
    available_inner_cross: f64,

    total_outer_flex_basis: f64,
    flex_basis_overflows: bool,

    total_line_cross_dim: f64,
    max_line_main_dim: f64,
    container_cross_axis: f64,
}

impl<'tree> FlexAlgorithm<'tree> {
    /// Step 1. Returns `None` if `node` is not in the tree.
    pub fn new(
        tree: &'tree mut FlexTree,
        node: NodeId,
        request: LayoutRequest,
        owner_direction: Direction,
        perform_layout: bool,
    ) -> Option<Self> {
        let entry = tree.nodes.get(node)?;
        let style = entry.style;
        let children = Rc::clone(&entry.children);

        let direction = style.resolve_direction(owner_direction);
        let main_axis = style.resolve_flex_direction(direction);
        let cross_axis = main_axis.cross(direction);
        let is_row = main_axis.is_row();
        let owner_width = request.owner_width;

        let total_leading_cross = style.total_leading_size(cross_axis, owner_width);
        let total_inner_main = style.total_inner_size(main_axis, owner_width);
        let total_inner_cross = total_leading_cross + style.total_trailing_size(cross_axis, owner_width);
        let (total_inner_row, total_inner_column) = if is_row {
            (total_inner_main, total_inner_cross)
        } else {
            (total_inner_cross, total_inner_main)
        };
        let (main_owner_size, cross_owner_size) = if is_row {
            (request.owner_width, request.owner_height)
        } else {
            (request.owner_height, request.owner_width)
        };
        let (main_mode, cross_mode) = if is_row {
            (request.width_mode, request.height_mode)
        } else {
            (request.height_mode, request.width_mode)
        };

        Some(Self {
            tree,
            node,
            style,
            children,
            request,
            perform_layout,
            direction,
            main_axis,
            cross_axis,
            is_wrapped: style.is_wrapped(),
            main_owner_size,
            cross_owner_size,
            total_leading_cross,
            total_inner_main,
            total_inner_cross,
            total_inner_row,
            total_inner_column,
            margin_row: style.total_outer_size(FlexDirection::Row, owner_width),
            margin_column: style.total_outer_size(FlexDirection::Column, owner_width),
            main_mode,
            cross_mode,
            available_inner_width: 0.0,
            available_inner_height: 0.0,
            available_inner_main: 0.0,
            available_inner_cross: 0.0,
            total_outer_flex_basis: 0.0,
            flex_basis_overflows: false,
            total_line_cross_dim: 0.0,
            max_line_main_dim: 0.0,
            container_cross_axis: 0.0,
        })
    }

    /// Steps 2 through 11.
    pub fn run(mut self) {
        self.resolve_available_inner_size();
        self.compute_flex_basis();
        self.layout_lines();
        self.resolve_final_dimensions();
        self.layout_absolute_children();
        self.set_trailing_positions();
    }

    #[inline]
    fn is_main_axis_row(&self) -> bool {
        self.main_axis.is_row()
    }

    #[inline]
    fn container(&self) -> Option<&FlexNode> {
        self.tree.nodes.get(self.node)
    }

    #[inline]
    fn set_child_leading(&mut self, child: NodeId, axis: FlexDirection, value: f64) {
        if let Some(entry) = self.tree.nodes.get_mut(child) {
            entry.layout.position.set_leading(axis, value);
        }
    }

    #[inline]
    fn shift_child_leading(&mut self, child: NodeId, axis: FlexDirection, offset: f64) {
        if let Some(entry) = self.tree.nodes.get_mut(child) {
            *entry.layout.position.leading_mut(axis) += offset;
        }
    }

    /// Fold an overflow into the container's flag.
    #[inline]
    fn mark_overflow(&mut self, overflow: bool) {
        if let Some(entry) = self.tree.nodes.get_mut(self.node) {
            entry.layout.has_overflow |= overflow;
        }
    }

    /// Step 2: the size budget handed to children.
    fn resolve_available_inner_size(&mut self) {
        let request = self.request;
        self.available_inner_width = self.available_inner_size(
            FlexDirection::Row,
            request.width - self.margin_row,
            self.total_inner_row,
            request.owner_width,
        );
        self.available_inner_height = self.available_inner_size(
            FlexDirection::Column,
            request.height - self.margin_column,
            self.total_inner_column,
            request.owner_height,
        );
        if self.is_main_axis_row() {
            self.available_inner_main = self.available_inner_width;
            self.available_inner_cross = self.available_inner_height;
        } else {
            self.available_inner_main = self.available_inner_height;
            self.available_inner_cross = self.available_inner_width;
        }
    }

    /// Available size minus padding and border, kept inside the container's own min/max.
    fn available_inner_size(&self, axis: FlexDirection, available: f64, inner: f64, owner_size: f64) -> f64 {
        let available_inner = available - inner;
        if available_inner.is_nan() {
            return available_inner;
        }
        let min = self.style.min_dimension(axis).resolve(owner_size);
        let min_inner = if min.is_nan() { 0.0 } else { min - inner };
        let max = self.style.max_dimension(axis).resolve(owner_size);
        let max_inner = if max.is_nan() { f64::MAX } else { max - inner };
        clamp_inner(available_inner, min_inner, max_inner)
    }
}
