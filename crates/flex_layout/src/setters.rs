//! One mutator per style property.
//!
//! Every setter leaves the node untouched when the value does not change, and
//! otherwise marks it and its ancestors dirty.

use anyhow::Result as AnyhowResult;
use flex_style::{
    AlignContent, AlignItems, AlignSelf, Direction, Display, Edge, Flex, FlexDirection, FlexWrap,
    JustifyContent, NodeStyle, Overflow, PositionType, StyleValue,
};

use crate::node::NodeId;
use crate::tree::FlexTree;

// Setter for a plain style field.
macro_rules! style_setter {
    ($(#[$meta:meta])* $name:ident, $field:ident: $value:ty) => {
        $(#[$meta])*
        ///
        /// # Errors
        /// Returns an error if `id` is not in the tree.
        pub fn $name(&mut self, id: NodeId, value: $value) -> AnyhowResult<()> {
            self.update_style(id, |style| style.$field = value)
        }
    };
}

// Setter for one or more sides of an inset field.
macro_rules! inset_setter {
    ($(#[$meta:meta])* $name:ident, $field:ident) => {
        $(#[$meta])*
        ///
        /// `None` resets the physical sides in `edges` to zero and clears the logical ones.
        ///
        /// # Errors
        /// Returns an error if `id` is not in the tree.
        pub fn $name(&mut self, id: NodeId, value: Option<StyleValue>, edges: Edge) -> AnyhowResult<()> {
            self.update_style(id, |style| style.$field.update(value, edges))
        }
    };
}

impl FlexTree {
    fn update_style<Update>(&mut self, id: NodeId, update: Update) -> AnyhowResult<()>
    where
        Update: FnOnce(&mut NodeStyle),
    {
        let mut style = *self.style(id)?;
        update(&mut style);
        self.set_style(id, style)
    }

    style_setter!(
        /// Text direction; `Inherit` takes the owner's.
        set_direction, direction: Direction
    );
    style_setter!(set_flex_direction, flex_direction: FlexDirection);
    style_setter!(set_justify_content, justify_content: JustifyContent);
    style_setter!(set_align_content, align_content: AlignContent);
    style_setter!(set_align_items, align_items: AlignItems);
    style_setter!(set_align_self, align_self: AlignSelf);
    style_setter!(set_flex_wrap, flex_wrap: FlexWrap);
    style_setter!(set_overflow, overflow: Overflow);
    style_setter!(
        /// `Display::None` removes the node and its subtree from layout.
        set_display, display: Display
    );
    style_setter!(
        /// Grow, shrink and basis at once.
        set_flex, flex: Flex
    );
    style_setter!(set_position_type, position_type: PositionType);
    style_setter!(
        /// Width divided by height. NaN clears it.
        set_aspect_ratio, aspect_ratio: f64
    );
    style_setter!(set_width, width: StyleValue);
    style_setter!(set_height, height: StyleValue);
    style_setter!(set_min_width, min_width: StyleValue);
    style_setter!(set_min_height, min_height: StyleValue);
    style_setter!(
        /// `None` removes the maximum.
        set_max_width, max_width: Option<StyleValue>
    );
    style_setter!(set_max_height, max_height: Option<StyleValue>);

    inset_setter!(set_margin, margin);
    inset_setter!(set_padding, padding);
    inset_setter!(set_border, border);
    inset_setter!(
        /// Insets from the containing box, used by relative and absolute positioning.
        set_position, position
    );

    /// NaN is stored as zero.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn set_flex_grow(&mut self, id: NodeId, value: f64) -> AnyhowResult<()> {
        let grow = if value.is_nan() { 0.0 } else { value };
        self.update_style(id, |style| style.flex.grow = grow)
    }

    /// NaN is stored as zero.
    ///
    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn set_flex_shrink(&mut self, id: NodeId, value: f64) -> AnyhowResult<()> {
        let shrink = if value.is_nan() { 0.0 } else { value };
        self.update_style(id, |style| style.flex.shrink = shrink)
    }

    /// # Errors
    /// Returns an error if `id` is not in the tree.
    pub fn set_flex_basis(&mut self, id: NodeId, value: StyleValue) -> AnyhowResult<()> {
        self.update_style(id, |style| style.flex.basis = value)
    }
}
