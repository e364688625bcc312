//! Flexbox layout engine.
//!
//! Build a tree of nodes in a [`FlexTree`], give them [`NodeStyle`]s (or use the
//! per-property setters), then call [`FlexTree::calculate`] on the root and read
//! every node's [`LayoutBox`] back. Leaves whose size depends on content, such as
//! text, report it through a measure callback.
//!
//! Results are cached per node; a second `calculate` only recomputes what was
//! marked dirty since the previous one.

mod algorithm;
pub mod cache;
mod calculate;
pub mod config;
pub mod geometry;
pub mod layout_box;
pub mod node;
mod printing;
mod setters;
pub mod stats;
pub mod tree;

pub use cache::LayoutCache;
pub use config::FlexConfig;
pub use flex_style::*;
pub use geometry::{LayoutInsets, LayoutPosition, Rect, Size};
pub use layout_box::{LayoutBox, round_value};
pub use node::{BaselineFunc, MeasureFunc, NodeId};
pub use stats::LayoutStats;
pub use tree::FlexTree;
