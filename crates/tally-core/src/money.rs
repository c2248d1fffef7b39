//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Order files carry prices like 999.99 or 0.125, and reports sum        │
//! │  thousands of them. Drift shows up in the grand total.                 │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    Full precision is kept through every calculation.                   │
//! │    Rounding to cents happens ONLY when a value is displayed.           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price: Money = "999.99".parse().unwrap();
//! let line_total = price.multiply_quantity(2);
//! assert_eq!(line_total.to_string(), "$1,999.98");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// Decimal places shown when a value is displayed.
const DISPLAY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount with exact decimal precision.
///
/// ## Design Decisions
/// - **Decimal, not f64**: no representation error on prices like `0.10`
/// - **Full precision internally**: `calculate` and `aggregate` never round
/// - **Display rounds**: half away from zero, to 2 places, with `,` grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a whole-unit amount (`Money::from_major(500)` is $500.00).
    #[inline]
    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Returns the exact underlying amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price: Money = "2.99".parse().unwrap();
    /// assert_eq!(unit_price.multiply_quantity(3).to_string(), "$8.97");
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Returns `rate` of this amount, unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// let total = Money::from_major(600);
    /// let ten_percent = Decimal::new(10, 2);
    /// assert_eq!(total.percentage(ten_percent), Money::from_major(60));
    /// ```
    #[inline]
    pub fn percentage(&self, rate: Decimal) -> Self {
        Money(self.0 * rate)
    }

    /// Adds two amounts, `None` when the sum leaves the decimal range.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Rounds to cents (half away from zero). Display-only.
    pub fn round_to_cents(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `$1,234.57`: dollar sign, thousands separators, two decimals.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_cents().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        // `{:.2}` pads the scale, e.g. 600 -> "600.00"
        let plain = format!("{:.2}", rounded.abs());
        let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        write!(f, "{}${}.{}", sign, group_thousands(whole), fraction)
    }
}

/// Inserts `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// Parses a plain decimal literal (`"600"`, `"999.99"`, `"-5.5"`).
impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Money)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn test_display() {
        assert_eq!(money("10.99").to_string(), "$10.99");
        assert_eq!(money("5").to_string(), "$5.00");
        assert_eq!(money("-5.5").to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(money("1234.5").to_string(), "$1,234.50");
        assert_eq!(money("999").to_string(), "$999.00");
        assert_eq!(money("1000").to_string(), "$1,000.00");
        assert_eq!(money("1234567.891").to_string(), "$1,234,567.89");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(money("0.125").to_string(), "$0.13");
        assert_eq!(money("0.124").to_string(), "$0.12");
        assert_eq!(money("999.995").to_string(), "$1,000.00");
    }

    #[test]
    fn test_internal_precision_is_kept() {
        let a = money("0.005");
        let total = a + a + a;
        assert_eq!(total.amount(), Decimal::new(15, 3));
        assert_eq!(total.to_string(), "$0.02");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(10);
        let b = money("2.5");

        assert_eq!(a + b, money("12.5"));
        assert_eq!(a - b, money("7.5"));
        assert_eq!(b.multiply_quantity(4), Money::from_major(10));

        let mut acc = Money::zero();
        acc += a;
        acc += b;
        assert_eq!(acc, money("12.5"));
    }

    #[test]
    fn test_sum() {
        let total: Money = vec![money("0.1"), money("0.2")].into_iter().sum();
        assert_eq!(total, money("0.3"));
    }

    #[test]
    fn test_percentage() {
        let rate = Decimal::new(10, 2);
        assert_eq!(money("999.99").percentage(rate), money("99.999"));
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(money("-0.01").is_negative());
        assert!(!money("0.01").is_negative());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }
}
