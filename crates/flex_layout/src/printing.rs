use core::fmt::{self, Write as _};

use anyhow::Result as AnyhowResult;
use log::debug;

use crate::node::NodeId;
use crate::tree::FlexTree;

fn write_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

impl FlexTree {
    /// Render the boxes under `root` as an indented tree, one rect per line.
    ///
    /// Boxes that were never laid out print as all-NaN rects.
    ///
    /// # Errors
    /// Returns an error if `root` is not in the tree.
    pub fn dump(&self, root: NodeId) -> AnyhowResult<String> {
        self.node(root)?;
        let mut out = String::new();
        self.write_node(&mut out, root, 0)?;
        debug!(target: "flex::tree", "[TREE] dump of {root:?}\n{out}");
        Ok(out)
    }

    fn write_node(&self, out: &mut String, id: NodeId, depth: usize) -> fmt::Result {
        let Some(node) = self.nodes.get(id) else {
            return Ok(());
        };
        write_indent(out, depth);
        writeln!(out, "{}", node.layout.rect())?;
        for &child in node.children.iter() {
            self.write_node(out, child, depth + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Children are indented four spaces per level.
    ///
    /// # Panics
    /// Panics if the dump layout changes.
    fn dump_indents_children() -> AnyhowResult<()> {
        let mut tree = FlexTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        tree.append(root, child)?;
        tree.node_mut(root)?.layout.width = 10.0;
        let dump = tree.dump(root)?;
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.first().is_some_and(|line| !line.starts_with(' ')));
        assert!(lines.get(1).is_some_and(|line| line.starts_with("    (")));
        Ok(())
    }
}
