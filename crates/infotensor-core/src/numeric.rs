//! Numeric policy shared by every log-based metric.
//!
//! Terms such as `p * log(p / q)` are evaluated without per-element guards
//! and then passed through [`zero_non_finite`]. A term whose mass or marginal
//! is zero therefore contributes exactly 0 instead of NaN or infinity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Absolute tolerance on the total mass of a normalized tensor.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-7;

/// Logarithm base of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogBase {
    /// Bits (`"log2"`, default).
    #[default]
    #[serde(rename = "log2")]
    Two,
    /// Nats (`"log"`).
    #[serde(rename = "log")]
    Natural,
    /// Hartleys (`"log10"`).
    #[serde(rename = "log10")]
    Ten,
}

impl LogBase {
    /// Logarithm of `x` in this base. Zero and negative inputs yield
    /// `-inf`/NaN exactly like the underlying float functions.
    #[inline]
    pub fn log(self, x: f64) -> f64 {
        match self {
            Self::Two => x.log2(),
            Self::Natural => x.ln(),
            Self::Ten => x.log10(),
        }
    }

    /// Name accepted by [`LogBase::from_str`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Two => "log2",
            Self::Natural => "log",
            Self::Ten => "log10",
        }
    }
}

impl fmt::Display for LogBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogBase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log2" => Ok(Self::Two),
            "log" => Ok(Self::Natural),
            "log10" => Ok(Self::Ten),
            other => Err(Error::UnsupportedLogBase(other.to_string())),
        }
    }
}

/// Replace NaN and ±Inf by 0, leave finite values untouched.
#[inline]
pub fn zero_non_finite(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

/// Sum of `terms` after the zero-substitution pass.
pub fn zero_substituted_sum<I: IntoIterator<Item = f64>>(terms: I) -> f64 {
    terms.into_iter().map(zero_non_finite).sum()
}

/// `p * log(p)` summed over a distribution with 0·log 0 = 0, negated.
pub fn shannon_sum<'a, I: IntoIterator<Item = &'a f64>>(mass: I, base: LogBase) -> f64 {
    -zero_substituted_sum(mass.into_iter().map(|&p| p * base.log(p)))
}

/// Check that `fraction` lies in (0, 1].
pub fn check_fraction(fraction: f64) -> crate::Result<f64> {
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(fraction)
    } else {
        Err(Error::InvalidFraction(fraction))
    }
}
