//! # Percentage Module
//!
//! [`Percentage`] is a bounded rate in basis points (1 bp = 0.01%), so
//! `Percentage::from_bps(825)` is 8.25%. Valid values cover the inclusive
//! `[0, 100]` percent range, i.e. 0..=10000 bps; anything outside fails
//! validation at parse time with `PercentageOutOfRange`. Immutable once
//! created.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JobCalcError;
use crate::parse;

/// Upper bound for a percentage, in basis points (100%).
pub const MAX_PERCENT_BPS: u32 = 10_000;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage in the 0-100 range, stored in basis points.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Percentage(u32);

impl Percentage {
    /// Creates a percentage from basis points.
    ///
    /// For untrusted input use [`crate::parse::parse_percentage`], which
    /// range-checks; this constructor is for values already known valid.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The multiplicative factor for a margin: 10% -> 1.10.
    ///
    /// Display only; calculations stay in integer basis points.
    #[inline]
    pub fn factor_up(&self) -> f64 {
        1.0 + self.0 as f64 / 10_000.0
    }

    /// The multiplicative factor for a discount: 10% -> 0.90.
    ///
    /// Display only; calculations stay in integer basis points.
    #[inline]
    pub fn factor_down(&self) -> f64 {
        1.0 - self.0 as f64 / 10_000.0
    }
}

/// Display shows one decimal place, truncated: 1025 bps -> `10.2%`.
impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}%", self.0 / 100, (self.0 % 100) / 10)
    }
}

impl FromStr for Percentage {
    type Err = JobCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_percentage(s)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
