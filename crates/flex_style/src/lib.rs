//! Style vocabulary for the flex layout engine.
//!
//! Lengths, insets, keyword enums and the per-node [`NodeStyle`] record, together
//! with the pure geometry queries the layout pass runs against a style.

pub mod enums;
pub mod flex;
pub mod float;
pub mod insets;
pub mod style;
pub mod value;

pub use enums::{
    AlignContent, AlignItems, AlignSelf, Direction, Display, FlexDirection, FlexWrap,
    JustifyContent, LayoutType, MeasureMode, Overflow, PositionType,
};
pub use flex::Flex;
pub use float::{approx_eq, clamp_inner};
pub use insets::{Edge, StyleInsets};
pub use style::NodeStyle;
pub use value::{Percent, StyleValue};
