//! Baselines for `align-items: baseline`.

use flex_style::{AlignItems, AlignSelf};

use crate::node::NodeId;
use crate::tree::FlexTree;

impl FlexTree {
    /// Distance from the top edge of `id` to its first baseline.
    ///
    /// A baseline callback wins. Otherwise the baseline comes from the first child on
    /// the first line that is baseline aligned or marked as the reference, falling back
    /// to the first in-flow child, and finally to the node's own height.
    pub(crate) fn baseline(&self, id: NodeId) -> f64 {
        let Some(node) = self.nodes.get(id) else {
            return 0.0;
        };
        if let Some(baseline) = node.baseline.as_ref() {
            return baseline(node.layout.measured_width, node.layout.measured_height);
        }
        let mut reference = None;
        for &child in node.children.iter() {
            let Some(entry) = self.nodes.get(child) else {
                continue;
            };
            if entry.line_index > 0 {
                break;
            }
            if entry.style.is_absolute() {
                continue;
            }
            if node.style.computed_align_item(&entry.style) == AlignItems::Baseline || entry.is_reference_baseline {
                reference = Some(child);
                break;
            }
            reference = reference.or(Some(child));
        }
        reference
            .and_then(|child| self.nodes.get(child).map(|entry| (child, entry.layout.position.top)))
            .map_or(node.layout.measured_height, |(child, top)| self.baseline(child) + top)
    }

    /// Whether a container lines its children up on their baselines.
    ///
    /// Only row containers do; a column has no shared baseline.
    pub(crate) fn is_baseline_layout(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        if node.style.flex_direction.is_column() {
            return false;
        }
        if node.style.align_items == AlignItems::Baseline {
            return true;
        }
        node.children.iter().filter_map(|&child| self.nodes.get(child)).any(|entry| {
            !entry.style.is_absolute() && entry.style.align_self == AlignSelf::Baseline
        })
    }
}
