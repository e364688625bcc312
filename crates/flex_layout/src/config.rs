//! Per-tree layout configuration.

use flex_style::NodeStyle;

/// Settings shared (by `Rc`) between the nodes of a tree.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlexConfig {
    /// Device pixels per point. Zero disables pixel-grid rounding.
    pub scale: f64,
    /// Start new nodes from browser defaults instead of the classic column defaults.
    pub use_web_defaults: bool,
}

impl Default for FlexConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            use_web_defaults: false,
        }
    }
}

impl FlexConfig {
    #[must_use]
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn web() -> Self {
        Self {
            use_web_defaults: true,
            ..Self::default()
        }
    }

    /// Style a freshly created node starts from.
    pub fn default_style(&self) -> NodeStyle {
        if self.use_web_defaults {
            NodeStyle::web()
        } else {
            NodeStyle::default()
        }
    }
}
