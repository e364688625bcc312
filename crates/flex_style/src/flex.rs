//! The `flex` shorthand: grow, shrink and basis together.

use serde::{Deserialize, Serialize};

use crate::float::approx_eq;
use crate::value::StyleValue;

/// How an item grows or shrinks to fit its container.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Flex {
    pub grow: f64,
    pub shrink: f64,
    /// Hypothetical main size before flexing. `Auto` falls back to width/height.
    pub basis: StyleValue,
}

impl Flex {
    /// Fully inflexible, sized by width/height: `0 0 auto`.
    pub const NONE: Self = Self::new(0.0, 0.0, StyleValue::Auto);
    /// Shrinks but never grows: `0 1 auto`.
    pub const DEFAULT: Self = Self::new(0.0, 1.0, StyleValue::Auto);
    /// Grows and shrinks: `1 1 auto`.
    pub const AUTO: Self = Self::new(1.0, 1.0, StyleValue::Auto);

    pub const fn new(grow: f64, shrink: f64, basis: StyleValue) -> Self {
        Self {
            grow,
            shrink,
            basis,
        }
    }
}

impl Default for Flex {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<f64> for Flex {
    /// The single-number form: `n` is `n 1 0`, a negative `n` is `0 -n auto`.
    fn from(value: f64) -> Self {
        if value < 0.0 {
            Self::new(0.0, -value, StyleValue::Auto)
        } else {
            Self::new(value, 1.0, StyleValue::ZERO)
        }
    }
}

impl From<i32> for Flex {
    fn from(value: i32) -> Self {
        Self::from(f64::from(value))
    }
}

impl PartialEq for Flex {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.grow, other.grow)
            && approx_eq(self.shrink, other.shrink)
            && self.basis == other.basis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// The number shorthand follows the CSS single-value form.
    ///
    /// # Panics
    /// Panics if the number conversions change.
    fn number_shorthand() {
        assert_eq!(Flex::from(2), Flex::new(2.0, 1.0, StyleValue::ZERO));
        assert_eq!(Flex::from(-3.0), Flex::new(0.0, 3.0, StyleValue::Auto));
        assert_eq!(Flex::default(), Flex::NONE);
        assert_ne!(Flex::DEFAULT, Flex::AUTO);
    }
}
