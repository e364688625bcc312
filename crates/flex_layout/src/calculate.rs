//! Top-level layout pass.

use std::rc::Rc;

use anyhow::Result as AnyhowResult;
use flex_style::{Direction, FlexDirection, LayoutType};
use log::debug;
use tracing::info_span;

use crate::algorithm::{LayoutReason, LayoutRequest};
use crate::node::NodeId;
use crate::stats::LayoutStats;
use crate::tree::FlexTree;

impl FlexTree {
    /// Lay out the subtree under `root` in a `width` x `height` box.
    ///
    /// NaN leaves a side unconstrained. Afterwards every box is snapped to the pixel
    /// grid of the root's config, unless its scale is zero.
    ///
    /// # Errors
    /// Returns an error if `root` is not in the tree.
    pub fn calculate(&mut self, root: NodeId, width: f64, height: f64, direction: Direction) -> AnyhowResult<()> {
        let _span = info_span!("flex.calculate").entered();
        self.generation = self.generation.wrapping_add(1);
        self.stats = LayoutStats::default();

        let node = self.node_mut(root)?;
        node.resolve_dimensions();
        let (root_width, width_mode) = node.layout_mode(width, FlexDirection::Row);
        let (root_height, height_mode) = node.layout_mode(height, FlexDirection::Column);
        let request = LayoutRequest::new(root_width, root_height, width_mode, height_mode, width, height);
        let recomputed = self.layout_internal(root, request, direction, true, LayoutReason::Initial);

        let laid_out = self.node_mut(root)?;
        let style_direction = laid_out.style.direction;
        laid_out.set_initial_position(style_direction, width, height, width);
        let scale = laid_out.config.scale;
        if scale != 0.0 {
            self.round_subtree(root, scale, 0.0, 0.0);
        }

        debug!(
            target: "flex::calculate",
            "[CALC] {root:?} in {width}x{height} recomputed={recomputed} {}",
            self.stats
        );
        Ok(())
    }

    fn round_subtree(&mut self, id: NodeId, scale: f64, absolute_left: f64, absolute_top: f64) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let text = node.layout_type == LayoutType::Text;
        let (left, top) = node
            .layout
            .round_position(scale, absolute_left, absolute_top, text);
        let children = Rc::clone(&node.children);
        for &child in children.iter() {
            self.round_subtree(child, scale, left, top);
        }
    }
}
