//! Cached entry point of the recursive layout, and the leaf shortcuts that never
//! need the full algorithm.

use flex_style::{Direction, FlexDirection, MeasureMode};
use log::{trace, warn};

use super::FlexAlgorithm;
use crate::cache::LayoutCache;
use crate::node::{FlexNode, NodeId};
use crate::tree::FlexTree;

/// Space offered to a node, plus its owner's content box for percentages.
///
/// A NaN size must come with [`MeasureMode::Undefined`].
#[derive(Copy, Clone, Debug)]
pub struct LayoutRequest {
    pub width: f64,
    pub height: f64,
    pub width_mode: MeasureMode,
    pub height_mode: MeasureMode,
    pub owner_width: f64,
    pub owner_height: f64,
}

impl LayoutRequest {
    pub const fn new(
        width: f64,
        height: f64,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        owner_width: f64,
        owner_height: f64,
    ) -> Self {
        Self {
            width,
            height,
            width_mode,
            height_mode,
            owner_width,
            owner_height,
        }
    }

    fn matches(self, entry: &LayoutCache) -> bool {
        entry.is_equal(self.width, self.height, self.width_mode, self.height_mode)
    }
}

/// Why a node is being laid out. Only reported in traces.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutReason {
    Initial,
    AbsoluteLayout,
    Stretch,
    MultilineStretch,
    FlexLayout,
    MeasureChild,
    AbsoluteMeasureChild,
}

impl FlexTree {
    /// Size `id` under `request`, and position its subtree when `perform_layout` is set.
    ///
    /// Reuses a cached result when the node is clean and an earlier request
    /// matches. Returns whether anything was recomputed.
    pub(crate) fn layout_internal(
        &mut self,
        id: NodeId,
        request: LayoutRequest,
        direction: Direction,
        perform_layout: bool,
        reason: LayoutReason,
    ) -> bool {
        let generation = self.generation;
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let layout_needed = (node.is_dirty && node.layout.generation != generation)
            || node.layout.last_parent_direction != Some(direction);
        if layout_needed {
            node.layout.cached_layout = None;
            node.layout.cached_measurements.clear();
        }
        let cached = node.cached_result(request, perform_layout);

        if let Some(result) = cached
            && !layout_needed
        {
            node.layout.measured_width = result.computed_width;
            node.layout.measured_height = result.computed_height;
            trace!(
                target: "flex::cache",
                "[CACHE] hit {id:?} ({reason:?}) {}x{}",
                result.computed_width,
                result.computed_height
            );
        } else {
            trace!(
                target: "flex::cache",
                "[CACHE] miss {id:?} ({reason:?}) {}x{} {:?}/{:?} layout={perform_layout}",
                request.width,
                request.height,
                request.width_mode,
                request.height_mode
            );
            self.layout_impl(id, request, direction, perform_layout);
            if let Some(node) = self.nodes.get_mut(id) {
                node.layout.last_parent_direction = Some(direction);
                if cached.is_none() {
                    let entry = LayoutCache {
                        width: request.width,
                        height: request.height,
                        computed_width: node.layout.measured_width,
                        computed_height: node.layout.measured_height,
                        width_mode: request.width_mode,
                        height_mode: request.height_mode,
                    };
                    if perform_layout {
                        node.layout.cached_layout = Some(entry);
                    } else {
                        node.layout.push_measurement(entry);
                        self.stats.max_measure_cache =
                            self.stats.max_measure_cache.max(node.layout.cached_measurements.len());
                    }
                }
            }
        }
        self.stats.record(perform_layout, cached.is_some() && !layout_needed);

        if let Some(node) = self.nodes.get_mut(id) {
            if perform_layout {
                node.layout.width = node.layout.measured_width;
                node.layout.height = node.layout.measured_height;
                node.layout.has_layout = true;
                node.has_new_layout = true;
                node.is_dirty = false;
            }
            node.layout.generation = generation;
        }
        layout_needed || cached.is_none()
    }

    /// Resolve the box edges, then pick the cheapest way to size the node.
    fn layout_impl(&mut self, id: NodeId, request: LayoutRequest, owner_direction: Direction, perform_layout: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let direction = node.style.resolve_direction(owner_direction);
        node.layout.direction = direction;
        let (margin_row, margin_column) = node.resolve_box_edges(direction, request.owner_width);
        let inner_request = LayoutRequest {
            width: request.width - margin_row,
            height: request.height - margin_column,
            ..request
        };

        if node.has_measure() {
            if node.measure_leaf(inner_request) {
                self.stats.measure_callbacks += 1;
            }
            return;
        }
        if node.children.is_empty() {
            node.empty_container(request);
            return;
        }
        // A measure-only request can often be answered from the constraints alone.
        if !perform_layout && node.fixed_size(inner_request) {
            return;
        }
        self.flex_layout(id, request, direction, perform_layout);
    }

    fn flex_layout(&mut self, id: NodeId, request: LayoutRequest, direction: Direction, perform_layout: bool) {
        // Every child must be owned by this node before its box is written.
        if let Err(error) = self.copy_children_if_needed(id) {
            warn!(target: "flex::algorithm", "[FLEX] skipping {id:?}: {error}");
            return;
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.layout.has_overflow = false;
        }
        if let Some(algorithm) = FlexAlgorithm::new(self, id, request, direction, perform_layout) {
            algorithm.run();
        }
    }
}

impl FlexNode {
    /// Entry of the cache that answers `request`, if any.
    ///
    /// Measured leaves accept compatible entries; everything else needs an exact match.
    fn cached_result(&self, request: LayoutRequest, perform_layout: bool) -> Option<LayoutCache> {
        let layout = &self.layout;
        if self.children.is_empty() && self.has_measure() {
            let margin_row = self.style.total_outer_size(FlexDirection::Row, request.owner_width);
            let margin_column = self.style.total_outer_size(FlexDirection::Column, request.owner_width);
            let scale = self.config.scale;
            let fits = |entry: &LayoutCache| {
                entry.validate(
                    request.width,
                    request.height,
                    request.width_mode,
                    request.height_mode,
                    margin_row,
                    margin_column,
                    scale,
                )
            };
            return layout
                .cached_layout
                .filter(&fits)
                .or_else(|| layout.cached_measurements.iter().copied().find(&fits));
        }
        if perform_layout {
            layout.cached_layout.filter(|entry| request.matches(entry))
        } else {
            layout
                .cached_measurements
                .iter()
                .copied()
                .find(|entry| request.matches(entry))
        }
    }

    /// Size a leaf through its measure callback. Returns whether the callback ran.
    fn measure_leaf(&mut self, request: LayoutRequest) -> bool {
        let width = if request.width_mode.is_undefined() {
            f64::NAN
        } else {
            request.width
        };
        let height = if request.height_mode.is_undefined() {
            f64::NAN
        } else {
            request.height
        };
        let inner_row = self.style.total_inner_size(FlexDirection::Row, width);
        let inner_column = self.style.total_inner_size(FlexDirection::Column, width);
        let owner_width = request.owner_width;

        if request.width_mode.is_exactly() && request.height_mode.is_exactly() {
            self.layout.measured_width = self.style.bound_axis(FlexDirection::Row, width, owner_width, owner_width);
            self.layout.measured_height =
                self.style
                    .bound_axis(FlexDirection::Column, height, request.owner_height, owner_width);
            return false;
        }
        let Some(measure) = self.measure.as_ref() else {
            return false;
        };
        // Callbacks never see a negative size.
        let inner_width = if width.is_nan() { width } else { (width - inner_row).max(0.0) };
        let inner_height = if height.is_nan() {
            height
        } else {
            (height - inner_column).max(0.0)
        };
        let size = measure(inner_width, request.width_mode, inner_height, request.height_mode);

        let measured_width = if request.width_mode.is_exactly() {
            width
        } else {
            size.width + inner_row
        };
        let measured_height = if request.height_mode.is_exactly() {
            height
        } else {
            size.height + inner_column
        };
        self.layout.measured_width = self
            .style
            .bound_axis(FlexDirection::Row, measured_width, owner_width, owner_width);
        self.layout.measured_height =
            self.style
                .bound_axis(FlexDirection::Column, measured_height, request.owner_height, owner_width);
        true
    }

    /// A container without children is as large as its padding and border allow.
    fn empty_container(&mut self, request: LayoutRequest) {
        let owner_width = request.owner_width;
        let width = if request.width_mode.is_exactly() {
            request.width - self.style.total_outer_size(FlexDirection::Row, owner_width)
        } else {
            self.style.total_inner_size(FlexDirection::Row, owner_width)
        };
        let height = if request.height_mode.is_exactly() {
            request.height - self.style.total_outer_size(FlexDirection::Column, owner_width)
        } else {
            self.style.total_inner_size(FlexDirection::Column, owner_width)
        };
        self.layout.measured_width = self.style.bound_axis(FlexDirection::Row, width, owner_width, owner_width);
        self.layout.measured_height =
            self.style
                .bound_axis(FlexDirection::Column, height, request.owner_height, owner_width);
    }

    /// Size without looking at children when both sides are exact or one is squeezed to nothing.
    ///
    /// `request` carries sizes with margins already removed.
    fn fixed_size(&mut self, request: LayoutRequest) -> bool {
        let squeezed = |size: f64, mode: MeasureMode| !size.is_nan() && mode.is_at_most() && size <= 0.0;
        let fixed = squeezed(request.width, request.width_mode)
            || squeezed(request.height, request.height_mode)
            || (request.width_mode.is_exactly() && request.height_mode.is_exactly());
        if !fixed {
            return false;
        }
        let clamped = |size: f64, mode: MeasureMode| {
            if size.is_nan() || (mode.is_at_most() && size < 0.0) {
                0.0
            } else {
                size
            }
        };
        let owner_width = request.owner_width;
        self.layout.measured_width = self.style.bound_axis(
            FlexDirection::Row,
            clamped(request.width, request.width_mode),
            owner_width,
            owner_width,
        );
        self.layout.measured_height = self.style.bound_axis(
            FlexDirection::Column,
            clamped(request.height, request.height_mode),
            request.owner_height,
            owner_width,
        );
        true
    }
}
