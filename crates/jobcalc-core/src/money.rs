//! # Money Module
//!
//! [`Currency`] and [`Hours`] — the two scaled-integer quantities the
//! calculator works in.
//!
//! ## Why Integer Cents?
//! ```text
//! In floating point:  0.1 + 0.2 = 0.30000000000000004
//! In integer cents:   10 + 20 = 30, always
//! ```
//! All monetary values are stored in cents (`i64`) and all hour counts in
//! hundredths of an hour, so calculations never touch floating point. The
//! only rounding in the system happens in two documented places:
//! percentage application (`(cents × bps + 5000) / 10000`) and labor
//! (`(cents × hundredths + 50) / 100`), both rounding half away from zero
//! in `i128` to avoid overflow.
//!
//! ## Usage
//! ```rust
//! use jobcalc_core::money::Currency;
//! use jobcalc_core::percent::Percentage;
//!
//! let subtotal: Currency = "500".parse().unwrap();
//! let margin: Percentage = "10".parse().unwrap();
//! assert_eq!(subtotal.apply_margin(margin).to_string(), "$550.00");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JobCalcError;
use crate::parse;
use crate::percent::Percentage;

// =============================================================================
// Currency
// =============================================================================

/// A non-negative monetary value in cents.
///
/// Negative amounts are rejected during parsing, and every arithmetic
/// operation the crate exposes keeps the value at or above zero
/// ([`Currency::saturating_sub`] floors at zero instead of going negative).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Currency(i64);

impl Currency {
    /// Creates a Currency value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Currency(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero currency value.
    #[inline]
    pub const fn zero() -> Self {
        Currency(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The given percentage of this amount, rounded half away from zero.
    ///
    /// ```rust
    /// use jobcalc_core::money::Currency;
    /// use jobcalc_core::percent::Percentage;
    ///
    /// let amount = Currency::from_cents(50_000); // $500.00
    /// let ten = Percentage::from_bps(1_000);     // 10%
    /// assert_eq!(amount.percentage_of(ten).cents(), 5_000);
    /// ```
    pub fn percentage_of(&self, rate: Percentage) -> Currency {
        // i128 to prevent overflow on large amounts
        let share = (self.0 as i128 * rate.bps() as i128 + 5_000) / 10_000;
        Currency(share as i64)
    }

    /// Increases the amount by a margin percentage.
    #[inline]
    pub fn apply_margin(&self, margin: Percentage) -> Currency {
        *self + self.percentage_of(margin)
    }

    /// Decreases the amount by a discount percentage.
    ///
    /// The share of a 0-100% rate never exceeds the amount itself, so the
    /// result stays non-negative.
    #[inline]
    pub fn apply_discount(&self, discount: Percentage) -> Currency {
        Currency(self.0 - self.percentage_of(discount).0)
    }

    /// Labor cost: this amount taken as an hourly rate, times `hours`.
    ///
    /// ```rust
    /// use jobcalc_core::money::{Currency, Hours};
    ///
    /// let rate = Currency::from_cents(5_000);    // $50.00/h
    /// let hours = Hours::from_hundredths(1_000); // 10h
    /// assert_eq!(rate.times_hours(hours).cents(), 50_000);
    /// ```
    pub fn times_hours(&self, hours: Hours) -> Currency {
        let cents = (self.0 as i128 * hours.hundredths() as i128 + 50) / 100;
        Currency(cents as i64)
    }

    /// Subtraction floored at zero.
    #[inline]
    pub const fn saturating_sub(&self, other: Currency) -> Currency {
        if other.0 >= self.0 {
            Currency(0)
        } else {
            Currency(self.0 - other.0)
        }
    }
}

/// Display groups thousands: `$1,302.20`.
impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            group_thousands(self.dollars().abs()),
            self.cents_part()
        )
    }
}

impl FromStr for Currency {
    type Err = JobCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_currency(s)
    }
}

impl Add for Currency {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Currency(self.0 + other.0)
    }
}

impl AddAssign for Currency {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for Currency {
    fn sum<I: Iterator<Item = Currency>>(iter: I) -> Currency {
        iter.fold(Currency::zero(), Add::add)
    }
}

// =============================================================================
// Hours
// =============================================================================

/// A non-negative hour count in hundredths of an hour.
///
/// `Hours::from_hundredths(1_050)` is 10.5 hours. Parsing follows the same
/// two-fractional-digit rule as [`Currency`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Hours(i64);

impl Hours {
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Hours(hundredths)
    }

    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Hours(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Display trims trailing zeros: `10`, `10.5`, `10.25`.
impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = (self.0 % 100).abs();
        if frac == 0 {
            write!(f, "{}", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}", whole, frac)
        }
    }
}

impl FromStr for Hours {
    type Err = JobCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_hours(s)
    }
}

impl Add for Hours {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Hours(self.0 + other.0)
    }
}

impl AddAssign for Hours {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Hours>>(iter: I) -> Hours {
        iter.fold(Hours::zero(), Add::add)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn group_thousands(mut value: i64) -> String {
    if value < 1_000 {
        return value.to_string();
    }
    let mut groups = Vec::new();
    while value >= 1_000 {
        groups.push(format!("{:03}", value % 1_000));
        value /= 1_000;
    }
    let mut out = value.to_string();
    for group in groups.iter().rev() {
        out.push(',');
        out.push_str(group);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
