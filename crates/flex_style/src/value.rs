//! Style lengths: absolute, percentage or `auto`.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::float::approx_eq;

/// A length-like style value.
///
/// `Auto` resolves to NaN, which the layout code treats as "undefined".
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleValue {
    /// Absolute length in points.
    Length(f64),
    /// Percentage of a reference size (`50.0` means half).
    Percentage(f64),
    /// Let the layout pick a value.
    #[default]
    Auto,
}

impl StyleValue {
    /// `Length(0)`.
    pub const ZERO: Self = Self::Length(0.0);
    /// `Percentage(100)`, i.e. fill the reference size.
    pub const MATCH: Self = Self::Percentage(100.0);

    /// Resolve against `reference`. `Auto` gives NaN.
    #[inline]
    pub fn resolve(self, reference: f64) -> f64 {
        match self {
            Self::Auto => f64::NAN,
            Self::Length(length) => length,
            Self::Percentage(percent) => percent * reference * 0.01,
        }
    }

    /// Whether the value yields a usable non-negative size against `size`.
    ///
    /// Percentages need a defined reference size to count as defined.
    #[inline]
    pub fn is_defined(self, size: f64) -> bool {
        match self {
            Self::Auto => false,
            Self::Length(length) => !length.is_nan() && length >= 0.0,
            Self::Percentage(percent) => !percent.is_nan() && !size.is_nan() && percent >= 0.0,
        }
    }

    #[inline]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    #[inline]
    pub const fn is_percentage(self) -> bool {
        matches!(self, Self::Percentage(_))
    }

    /// Whether the payload is a real number (`Auto` counts as valid).
    #[inline]
    pub fn is_valid(self) -> bool {
        match self {
            Self::Length(value) | Self::Percentage(value) => !value.is_nan(),
            Self::Auto => true,
        }
    }

    /// Add two values of the same variant.
    ///
    /// Returns `None` when the variants differ, since a length plus a
    /// percentage has no meaning without a reference size.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        match (self, rhs) {
            (Self::Auto, Self::Auto) => Some(Self::Auto),
            (Self::Length(lhs), Self::Length(rhs)) => Some(Self::Length(lhs + rhs)),
            (Self::Percentage(lhs), Self::Percentage(rhs)) => Some(Self::Percentage(lhs + rhs)),
            _ => None,
        }
    }

    /// Subtract two values of the same variant. See [`StyleValue::checked_add`].
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        match (self, rhs) {
            (Self::Auto, Self::Auto) => Some(Self::Auto),
            (Self::Length(lhs), Self::Length(rhs)) => Some(Self::Length(lhs - rhs)),
            (Self::Percentage(lhs), Self::Percentage(rhs)) => Some(Self::Percentage(lhs - rhs)),
            _ => None,
        }
    }
}

impl From<f64> for StyleValue {
    /// NaN becomes `Auto`, anything else a `Length`.
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Self::Auto
        } else {
            Self::Length(value)
        }
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Length(f64::from(value))
    }
}

impl PartialEq for StyleValue {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Auto, Self::Auto) => true,
            (Self::Length(lhs), Self::Length(rhs))
            | (Self::Percentage(lhs), Self::Percentage(rhs)) => approx_eq(lhs, rhs),
            _ => false,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Auto => formatter.write_str("auto"),
            Self::Length(length) => write!(formatter, "{length}p"),
            Self::Percentage(percent) => write!(formatter, "{percent}%"),
        }
    }
}

/// Percentage literal shorthand: `50.percent()` is `StyleValue::Percentage(50.0)`.
pub trait Percent {
    fn percent(self) -> StyleValue;
}

impl Percent for f64 {
    #[inline]
    fn percent(self) -> StyleValue {
        StyleValue::Percentage(self)
    }
}

impl Percent for i32 {
    #[inline]
    fn percent(self) -> StyleValue {
        StyleValue::Percentage(f64::from(self))
    }
}
