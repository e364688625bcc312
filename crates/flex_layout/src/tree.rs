//! The node arena and its structural API.
//!
//! Every node lives in one [`SlotMap`]; parents and children refer to each other by
//! [`NodeId`]. A child records the node that owns it. Copying a node shares its child
//! list, and the first layout or mutation of the copy deep-copies every child it does
//! not own yet.

use core::mem;
use core::ops::Range;
use std::rc::Rc;

use anyhow::{Result as AnyhowResult, anyhow};
use flex_style::{LayoutType, MeasureMode, NodeStyle};
use log::{debug, trace};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::config::FlexConfig;
use crate::geometry::{Rect, Size};
use crate::layout_box::LayoutBox;
use crate::node::{BaselineFunc, FlexNode, MeasureFunc, NodeId};
use crate::stats::LayoutStats;

/// Owner of every node, plus the per-pass state shared by a layout.
pub struct FlexTree {
    pub(crate) nodes: SlotMap<NodeId, FlexNode>,
    /// Bumped once per `calculate`; boxes stamped with an older value are stale.
    pub(crate) generation: u32,
    config: Rc<FlexConfig>,
    pub(crate) stats: LayoutStats,
}

impl Default for FlexTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexTree {
    pub fn new() -> Self {
        Self::with_config(FlexConfig::default())
    }

    /// Tree whose new nodes share `config`.
    pub fn with_config(config: FlexConfig) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            generation: 0,
            config: Rc::new(config),
            stats: LayoutStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &FlexConfig {
        &self.config
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Counters from the most recent `calculate`.
    #[inline]
    pub fn last_stats(&self) -> LayoutStats {
        self.stats
    }

    pub(crate) fn node(&self, id: NodeId) -> AnyhowResult<&FlexNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| anyhow!("unknown or disposed node {id:?}"))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> AnyhowResult<&mut FlexNode> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| anyhow!("unknown or disposed node {id:?}"))
    }

    // Creation

    /// New detached node using the tree's config.
    pub fn new_node(&mut self) -> NodeId {
        self.new_node_with_config(Rc::clone(&self.config))
    }

    /// New detached node with its own config.
    pub fn new_node_with_config(&mut self, config: Rc<FlexConfig>) -> NodeId {
        self.nodes.insert(FlexNode::new(config))
    }

    /// New detached leaf sized by `measure`.
    pub fn new_leaf<Measure>(&mut self, measure: Measure) -> NodeId
    where
        Measure: Fn(f64, MeasureMode, f64, MeasureMode) -> Size + 'static,
    {
        let id = self.new_node();
        if let Some(node) = self.nodes.get_mut(id) {
            node.measure = Some(Rc::new(measure));
            node.layout_type = LayoutType::Text;
        }
        id
    }

    // Style

    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn style(&self, id: NodeId) -> AnyhowResult<&NodeStyle> {
        Ok(&self.node(id)?.style)
    }

    /// Replace the whole style record, marking the node dirty when it changed.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn set_style(&mut self, id: NodeId, style: NodeStyle) -> AnyhowResult<()> {
        let node = self.node_mut(id)?;
        if node.style != style {
            node.style = style;
            self.mark_dirty_internal(id);
        }
        Ok(())
    }

    /// Take over the style of `from`.
    ///
    /// # Errors
    /// Returns an error if either node is not in the tree.
    pub fn copy_style(&mut self, id: NodeId, from: NodeId) -> AnyhowResult<()> {
        let style = self.node(from)?.style;
        self.set_style(id, style)
    }

    // Structure

    fn ensure_attachable(&self, parent: NodeId, child: NodeId) -> AnyhowResult<()> {
        if parent == child {
            return Err(anyhow!("cannot attach node {child:?} to itself"));
        }
        if self.node(parent)?.has_measure() {
            return Err(anyhow!(
                "cannot add child to {parent:?}: nodes with measure functions cannot have children"
            ));
        }
        if let Some(owner) = self.node(child)?.parent {
            return Err(anyhow!(
                "child {child:?} already has owner {owner:?}, it must be removed first"
            ));
        }
        self.ensure_not_ancestor(parent, child)
    }

    /// Fails if `candidate` is `id` or one of its ancestors.
    fn ensure_not_ancestor(&self, id: NodeId, candidate: NodeId) -> AnyhowResult<()> {
        let mut current = Some(id);
        while let Some(ancestor) = current {
            if ancestor == candidate {
                return Err(anyhow!("cannot attach {candidate:?} below its own descendant {id:?}"));
            }
            current = self.node(ancestor)?.parent;
        }
        Ok(())
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// # Errors
    /// Returns an error if either node is unknown, `child` already has a parent,
    /// or `parent` has a measure function.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> AnyhowResult<()> {
        let index = self.node(parent)?.children.len();
        self.insert(parent, child, index)
    }

    /// Attach `child` at `index` (clamped to the child count).
    ///
    /// # Errors
    /// Same as [`FlexTree::append`].
    pub fn insert(&mut self, parent: NodeId, child: NodeId, index: usize) -> AnyhowResult<()> {
        self.ensure_attachable(parent, child)?;
        let node = self.node_mut(parent)?;
        let children = Rc::make_mut(&mut node.children);
        let at = index.min(children.len());
        children.insert(at, child);
        self.node_mut(child)?.parent = Some(parent);
        trace!(target: "flex::tree", "[TREE] insert {child:?} into {parent:?} at {index}");
        self.mark_dirty_internal(parent);
        Ok(())
    }

    /// Detach `child` from `parent`.
    ///
    /// The child's box is only reset when `parent` owns it; a shared child keeps its
    /// layout for the node that still lists it.
    ///
    /// # Errors
    /// Returns an error if `parent` is not in the tree.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> AnyhowResult<()> {
        let node = self.node_mut(parent)?;
        let Some(position) = node.children.iter().position(|&candidate| candidate == child) else {
            return Ok(());
        };
        Rc::make_mut(&mut node.children).remove(position);
        if let Some(removed) = self.nodes.get_mut(child)
            && removed.parent == Some(parent)
        {
            removed.layout.invalidate();
            removed.parent = None;
        }
        trace!(target: "flex::tree", "[TREE] remove {child:?} from {parent:?}");
        self.mark_dirty_internal(parent);
        Ok(())
    }

    /// Detach every child of `parent`.
    ///
    /// # Errors
    /// Returns an error if `parent` is not in the tree.
    pub fn remove_all(&mut self, parent: NodeId) -> AnyhowResult<()> {
        let node = self.node_mut(parent)?;
        if node.children.is_empty() {
            return Ok(());
        }
        let children = mem::replace(&mut node.children, Rc::new(SmallVec::new()));
        // A list whose first child is owned elsewhere belongs to another node.
        let owned = children
            .first()
            .and_then(|&first| self.nodes.get(first))
            .is_some_and(|first| first.parent == Some(parent));
        if owned {
            for &child in children.iter() {
                if let Some(removed) = self.nodes.get_mut(child) {
                    removed.layout.invalidate();
                    removed.parent = None;
                }
            }
        }
        trace!(target: "flex::tree", "[TREE] remove all {} children from {parent:?}", children.len());
        self.mark_dirty_internal(parent);
        Ok(())
    }

    /// Replace the children in `range` with `nodes`. Out-of-range requests are ignored.
    ///
    /// # Errors
    /// Returns an error if a node is unknown, appears twice in `nodes`, or already has a
    /// parent other than the slots being replaced.
    pub fn replace_range(&mut self, parent: NodeId, range: Range<usize>, nodes: &[NodeId]) -> AnyhowResult<()> {
        let count = self.node(parent)?.children.len();
        if range.start > range.end || range.end > count {
            return Ok(());
        }
        for (index, &new) in nodes.iter().enumerate() {
            if nodes.iter().take(index).any(|&earlier| earlier == new) {
                return Err(anyhow!("node {new:?} is listed twice in replacement for {parent:?}"));
            }
            // Nodes moving within the replaced slots are detached before reattaching.
            let reused = self.node(new)?.parent == Some(parent)
                && self
                    .node(parent)?
                    .children
                    .get(range.clone())
                    .is_some_and(|slots| slots.contains(&new));
            if !reused {
                self.ensure_attachable(parent, new)?;
            }
        }
        let node = self.node_mut(parent)?;
        let old: SmallVec<NodeId, 4> = Rc::make_mut(&mut node.children)
            .drain(range.clone())
            .collect();
        let children = Rc::make_mut(&mut node.children);
        for (offset, &new) in nodes.iter().enumerate() {
            children.insert(range.start + offset, new);
        }
        for &removed in old.iter() {
            if let Some(node) = self.nodes.get_mut(removed) {
                node.layout.invalidate();
                node.parent = None;
            }
        }
        for &new in nodes {
            self.node_mut(new)?.parent = Some(parent);
        }
        trace!(
            target: "flex::tree",
            "[TREE] replace {range:?} of {parent:?}: {} out, {} in",
            old.len(),
            nodes.len()
        );
        self.mark_dirty_internal(parent);
        Ok(())
    }

    /// Replace the child at `index` with `node`. Out-of-range indices are ignored.
    ///
    /// # Errors
    /// Same as [`FlexTree::replace_range`].
    pub fn replace_at(&mut self, parent: NodeId, index: usize, node: NodeId) -> AnyhowResult<()> {
        self.replace_range(parent, index..index.saturating_add(1), &[node])
    }

    /// Replace every child of `parent`.
    ///
    /// # Errors
    /// Same as [`FlexTree::replace_range`].
    pub fn replace_all(&mut self, parent: NodeId, nodes: &[NodeId]) -> AnyhowResult<()> {
        let count = self.node(parent)?.children.len();
        self.replace_range(parent, 0..count, nodes)
    }

    /// Detach `id` from its owner, if it has one.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn remove_from_parent(&mut self, id: NodeId) -> AnyhowResult<()> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        self.remove(parent, id)
    }

    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn children(&self, id: NodeId) -> AnyhowResult<&[NodeId]> {
        Ok(self.node(id)?.children.as_slice())
    }

    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn child_at(&self, id: NodeId, index: usize) -> AnyhowResult<Option<NodeId>> {
        Ok(self.node(id)?.children.get(index).copied())
    }

    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn child_count(&self, id: NodeId) -> AnyhowResult<usize> {
        Ok(self.node(id)?.children.len())
    }

    /// Owner of `id`, if attached.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn parent(&self, id: NodeId) -> AnyhowResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    // Copying

    /// Detached clone of `id` that shares its child list until either side changes it.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn copy(&mut self, id: NodeId) -> AnyhowResult<NodeId> {
        let mut clone = self.node(id)?.clone();
        clone.parent = None;
        let copy = self.nodes.insert(clone);
        debug!(target: "flex::tree", "[TREE] copy {id:?} -> {copy:?}");
        Ok(copy)
    }

    /// Give `id` its own copy of every child it lists but does not own.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn copy_children_if_needed(&mut self, id: NodeId) -> AnyhowResult<()> {
        let children = Rc::clone(&self.node(id)?.children);
        for (index, &child) in children.iter().enumerate() {
            if self.node(child)?.parent == Some(id) {
                continue;
            }
            let copy = self.copy(child)?;
            self.node_mut(copy)?.parent = Some(id);
            if let Some(slot) = Rc::make_mut(&mut self.node_mut(id)?.children).get_mut(index) {
                *slot = copy;
            }
        }
        Ok(())
    }

    // Flags and callbacks

    /// Flag a measured leaf for re-measurement, along with all of its ancestors.
    ///
    /// # Errors
    /// Returns an error if `id` is unknown or has no measure function.
    pub fn mark_dirty(&mut self, id: NodeId) -> AnyhowResult<()> {
        if !self.node(id)?.has_measure() {
            return Err(anyhow!(
                "only leaf nodes with custom measure functions should manually mark themselves as dirty"
            ));
        }
        self.mark_dirty_internal(id);
        Ok(())
    }

    /// Flag `id` and its ancestors, stopping at the first one that is already dirty.
    pub(crate) fn mark_dirty_internal(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|key| self.nodes.get_mut(key)) {
            if node.is_dirty {
                break;
            }
            node.is_dirty = true;
            node.layout.computed_flex_basis = f64::NAN;
            current = node.parent;
        }
    }

    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn is_dirty(&self, id: NodeId) -> AnyhowResult<bool> {
        Ok(self.node(id)?.is_dirty)
    }

    /// Whether a pass wrote a new layout since the flag was last cleared.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn has_new_layout(&self, id: NodeId) -> AnyhowResult<bool> {
        Ok(self.node(id)?.has_new_layout)
    }

    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn set_has_new_layout(&mut self, id: NodeId, value: bool) -> AnyhowResult<()> {
        self.node_mut(id)?.has_new_layout = value;
        Ok(())
    }

    /// Install or clear the measure function of a leaf.
    ///
    /// # Errors
    /// Returns an error if `id` is unknown or already has children.
    pub fn set_measure(&mut self, id: NodeId, measure: Option<MeasureFunc>) -> AnyhowResult<()> {
        let node = self.node_mut(id)?;
        if measure.is_some() && !node.children.is_empty() {
            return Err(anyhow!(
                "cannot set measure function on {id:?}: nodes with measure functions cannot have children"
            ));
        }
        node.layout_type = if measure.is_some() {
            LayoutType::Text
        } else {
            LayoutType::Default
        };
        node.measure = measure;
        Ok(())
    }

    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn set_baseline(&mut self, id: NodeId, baseline: Option<BaselineFunc>) -> AnyhowResult<()> {
        self.node_mut(id)?.baseline = baseline;
        Ok(())
    }

    /// Make `id` the child its parent takes its baseline from.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn set_is_reference_baseline(&mut self, id: NodeId, value: bool) -> AnyhowResult<()> {
        let node = self.node_mut(id)?;
        if node.is_reference_baseline != value {
            node.is_reference_baseline = value;
            self.mark_dirty_internal(id);
        }
        Ok(())
    }

    // Lifecycle

    /// Free a detached node and every descendant it exclusively owns.
    ///
    /// Children still listed by a copy stay alive for that copy.
    ///
    /// # Errors
    /// Returns an error if `id` is unknown or still attached.
    pub fn dispose(&mut self, id: NodeId) -> AnyhowResult<()> {
        if let Some(owner) = self.node(id)?.parent {
            return Err(anyhow!("node {id:?} is still attached to {owner:?}, remove it first"));
        }
        self.dispose_subtree(id);
        Ok(())
    }

    fn dispose_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        if Rc::strong_count(&node.children) > 1 {
            return;
        }
        for &child in node.children.iter() {
            if self.nodes.get(child).is_some_and(|entry| entry.parent == Some(id)) {
                self.dispose_subtree(child);
            }
        }
    }

    // Results

    /// Computed box of `id`.
    ///
    /// # Errors
    /// Returns an error if `id` is unknown or has not been laid out yet.
    pub fn layout(&self, id: NodeId) -> AnyhowResult<&LayoutBox> {
        let layout = &self.node(id)?.layout;
        if !layout.has_layout {
            return Err(anyhow!("node {id:?} has not been laid out, call calculate first"));
        }
        Ok(layout)
    }

    /// Rectangle of `id` offset by a caller-supplied origin.
    ///
    /// # Errors
    /// Same as [`FlexTree::layout`].
    pub fn frame(&self, id: NodeId, left: f64, top: f64) -> AnyhowResult<Rect> {
        let layout = self.layout(id)?;
        Ok(Rect::new(left + layout.left(), top + layout.top(), layout.width(), layout.height()))
    }

    /// Reset the computed box of `id` and drop its caches.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn invalidate(&mut self, id: NodeId) -> AnyhowResult<()> {
        self.node_mut(id)?.layout.invalidate();
        Ok(())
    }

    /// Zero the box of a hidden subtree.
    pub(crate) fn zero_layout(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.layout.invalidate();
        node.layout.width = 0.0;
        node.layout.height = 0.0;
        node.layout.has_layout = true;
        node.has_new_layout = true;
        if self.copy_children_if_needed(id).is_err() {
            return;
        }
        if let Some(children) = self.nodes.get(id).map(|node| Rc::clone(&node.children)) {
            for &child in children.iter() {
                self.zero_layout(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Attaching a node twice is a contract violation, not a silent re-parent.
    ///
    /// # Panics
    /// Panics if a second owner is accepted.
    fn second_owner_is_rejected() -> AnyhowResult<()> {
        let mut tree = FlexTree::new();
        let first = tree.new_node();
        let second = tree.new_node();
        let child = tree.new_node();
        tree.append(first, child)?;
        assert!(tree.append(second, child).is_err());
        assert!(tree.append(first, first).is_err());
        assert_eq!(tree.parent(child)?, Some(first));
        Ok(())
    }

    #[test]
    /// Leaves with a measure function cannot take children and vice versa.
    ///
    /// # Panics
    /// Panics if a measured node accepts a child.
    fn measured_leaves_stay_leaves() -> AnyhowResult<()> {
        let mut tree = FlexTree::new();
        let leaf = tree.new_leaf(|_, _, _, _| Size::new(10.0, 10.0));
        let child = tree.new_node();
        assert!(tree.append(leaf, child).is_err());
        let parent = tree.new_node();
        tree.append(parent, child)?;
        let measure: MeasureFunc = Rc::new(|_, _, _, _| Size::ZERO);
        assert!(tree.set_measure(parent, Some(measure)).is_err());
        Ok(())
    }

    #[test]
    /// Dirtiness climbs to the root and stops at nodes that are already dirty.
    ///
    /// # Panics
    /// Panics if an ancestor is not flagged.
    fn dirty_climbs_ancestors() -> AnyhowResult<()> {
        let mut tree = FlexTree::new();
        let root = tree.new_node();
        let middle = tree.new_node();
        let leaf = tree.new_leaf(|_, _, _, _| Size::new(1.0, 1.0));
        tree.append(root, middle)?;
        tree.append(middle, leaf)?;
        for id in [root, middle, leaf] {
            tree.node_mut(id)?.is_dirty = false;
        }
        tree.mark_dirty(leaf)?;
        assert!(tree.is_dirty(root)?);
        assert!(tree.is_dirty(middle)?);
        assert!(tree.mark_dirty(middle).is_err());
        Ok(())
    }

    #[test]
    /// Disposing frees owned descendants and refuses attached nodes.
    ///
    /// # Panics
    /// Panics if disposal leaks owned children or frees an attached node.
    fn dispose_frees_owned_subtree() -> AnyhowResult<()> {
        let mut tree = FlexTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        let grandchild = tree.new_node();
        tree.append(root, child)?;
        tree.append(child, grandchild)?;
        assert!(tree.dispose(child).is_err());
        tree.dispose(root)?;
        assert!(tree.is_empty());
        assert!(tree.style(grandchild).is_err());
        Ok(())
    }

    #[test]
    /// Reading a box before any layout is an error.
    ///
    /// # Panics
    /// Panics if an unlaid node reports a layout.
    fn layout_requires_calculate() {
        let mut tree = FlexTree::new();
        let node = tree.new_node();
        assert!(tree.layout(node).is_err());
        assert!(tree.frame(node, 0.0, 0.0).is_err());
    }
}
