//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A sale of 3 × $19.99 must total exactly $59.97, and                    │
//! │  paid + remaining debt must equal that total to the cent.               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1999 cents × 3 = 5997 cents, always                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salesflow_core::money::Money;
//!
//! let price = Money::from_cents(1999); // $19.99
//! let subtotal = price.multiply_quantity(3).unwrap();
//! assert_eq!(subtotal.cents(), 5997);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► SaleItem.unit_price ──► SaleItem.subtotal            │
/// │                                                 │                       │
/// │                                                 ▼                       │
/// │                        Sale.total_amount = Σ subtotal                   │
/// │                                                 │                       │
/// │                    ┌────────────────────────────┴──────────┐            │
/// │                    ▼                                       ▼            │
/// │            Sale.paid_amount          +          Sale.remaining_debt     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use salesflow_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
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

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity. `None` on overflow.
    ///
    /// ```rust
    /// use salesflow_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).unwrap().cents(), 897);
    /// assert!(Money::from_cents(i64::MAX / 2).multiply_quantity(3).is_none());
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts. `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Applies a markup expressed in basis points of the amount, rounding
    /// half-up to the cent.
    ///
    /// `15_000` bps means "150% of cost", which is how a product created
    /// without an explicit price gets its selling price. `None` when the
    /// result does not fit in cents.
    ///
    /// ```rust
    /// use salesflow_core::money::Money;
    ///
    /// let cost = Money::from_cents(333);
    /// // 333 × 1.5 = 499.5 → 500
    /// assert_eq!(cost.apply_markup_bps(15_000).unwrap().cents(), 500);
    /// ```
    pub fn apply_markup_bps(&self, bps: i64) -> Option<Money> {
        let scaled = self.0 as i128 * bps as i128;
        i64::try_from(div_round_half_up(scaled, 10_000))
            .ok()
            .map(Money::from_cents)
    }

    /// Divides the amount into `parts` and rounds half-up.
    ///
    /// Returns zero when `parts` is zero (an empty period).
    pub fn average_over(&self, parts: i64) -> Money {
        if parts == 0 {
            return Money::zero();
        }
        Money::from_cents(div_round_half_up(self.0 as i128, parts as i128) as i64)
    }
}

/// Integer division rounding half away from zero.
fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

/// Profit margin as a fraction of price: `(price - cost) / price`.
///
/// `None` when the price is zero, since no meaningful margin exists.
///
/// ```rust
/// use salesflow_core::money::{profit_margin, Money};
///
/// let margin = profit_margin(Money::from_cents(2000), Money::from_cents(1500));
/// assert_eq!(margin, Some(0.25));
/// ```
pub fn profit_margin(price: Money, cost: Money) -> Option<f64> {
    if price.is_zero() {
        return None;
    }
    Some((price.cents() - cost.cents()) as f64 / price.cents() as f64)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money in a human-readable format for logs and error messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let huge = Money::from_cents(5_000_000_000_000_000_000);
        assert_eq!(huge.multiply_quantity(2), None);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(huge.apply_markup_bps(15_000), None);
        assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(1), Some(Money::from_cents(i64::MAX)));
    }

    #[test]
    fn test_markup_rounds_half_up() {
        assert_eq!(Money::from_cents(1000).apply_markup_bps(15_000).unwrap().cents(), 1500);
        assert_eq!(Money::from_cents(333).apply_markup_bps(15_000).unwrap().cents(), 500);
        assert_eq!(Money::from_cents(1).apply_markup_bps(15_000).unwrap().cents(), 2);
        assert_eq!(Money::zero().apply_markup_bps(15_000).unwrap().cents(), 0);
    }

    #[test]
    fn test_average_over() {
        assert_eq!(Money::from_cents(1000).average_over(3).cents(), 333);
        assert_eq!(Money::from_cents(1001).average_over(2).cents(), 501);
        assert_eq!(Money::from_cents(1000).average_over(0), Money::zero());
    }

    #[test]
    fn test_profit_margin() {
        assert_eq!(profit_margin(Money::from_cents(2000), Money::from_cents(1500)), Some(0.25));
        assert_eq!(profit_margin(Money::zero(), Money::from_cents(1500)), None);

        // Selling below cost gives a negative margin
        let margin = profit_margin(Money::from_cents(1000), Money::from_cents(1500)).unwrap();
        assert!(margin < 0.0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_cents(4200)).unwrap();
        assert_eq!(json, "4200");
    }
}
