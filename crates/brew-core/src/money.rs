//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                 │
//! │                                                             │
//! │  In floating point:                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!               │
//! │                                                             │
//! │  OUR SOLUTION: integer minor units                          │
//! │    Every price, discount, tax and total in the system is an │
//! │    i64 count of the smallest currency unit. Division is     │
//! │    explicit and its rounding is documented.                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Inclusive Tax
//! Menu prices are tax-inclusive: `tax = total × rate / (100 + rate)`,
//! carved out of the total by division, never added on top. See
//! [`Money::inclusive_tax`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for cash-drawer differences
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor currency units.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// let price = Money::from_minor(35_000);
    /// assert_eq!(price.minor(), 35_000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor currency units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the smaller of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(35_000);
    /// assert_eq!(unit_price.multiply_quantity(2).minor(), 70_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Extracts the tax already contained in a tax-inclusive amount.
    ///
    /// ## Pricing Model
    /// ```text
    /// Displayed price 11,000 at 10% inclusive tax
    ///      │
    ///      ▼
    /// tax = 11,000 × 1000 / (10000 + 1000) = 1,000
    ///      │
    ///      ▼
    /// Net 10,000 + tax 1,000 = the same 11,000 the customer paid
    /// ```
    ///
    /// Formula in basis points: `amount × bps / (10000 + bps)`,
    /// rounded half-up using i128 to avoid overflow.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    /// use brew_core::types::TaxRate;
    ///
    /// let total = Money::from_minor(70_000);
    /// let tax = total.inclusive_tax(TaxRate::from_bps(1000));
    /// assert_eq!(tax.minor(), 6364); // 70000 × 10 / 110, rounded
    /// ```
    pub fn inclusive_tax(&self, rate: TaxRate) -> Money {
        if rate.is_zero() {
            return Money::zero();
        }
        let divisor = 10_000_i128 + rate.bps() as i128;
        let tax = (self.0 as i128 * rate.bps() as i128 + divisor / 2) / divisor;
        Money::from_minor(tax as i64)
    }

    /// Computes a percentage of this amount, rounded half-up.
    ///
    /// `pct` is a plain percentage (10.0 = 10%). Used for percentage
    /// promotions whose stored value may be fractional.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// let subtotal = Money::from_minor(70_000);
    /// assert_eq!(subtotal.percentage(10.0).minor(), 7_000);
    /// ```
    pub fn percentage(&self, pct: f64) -> Money {
        Money::from_minor((self.0 as f64 * pct / 100.0).round() as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. UI formatting and localization happen
/// outside this workspace.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(35_000);
        assert_eq!(money.minor(), 35_000);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);
    }

    #[test]
    fn test_inclusive_tax_ten_percent() {
        // 11,000 at 10% inclusive → exactly 1,000 of tax inside
        let total = Money::from_minor(11_000);
        let tax = total.inclusive_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.minor(), 1000);
    }

    #[test]
    fn test_inclusive_tax_rounding() {
        // 70,000 × 1000 / 11000 = 6363.63... → 6364 (half-up)
        let total = Money::from_minor(70_000);
        let tax = total.inclusive_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.minor(), 6364);
    }

    #[test]
    fn test_inclusive_tax_never_added_on_top() {
        let total = Money::from_minor(11_000);
        let tax = total.inclusive_tax(TaxRate::from_bps(1000));
        // Net + tax reconstructs the displayed total
        assert_eq!((total - tax + tax).minor(), total.minor());
        assert!(tax < total);
    }

    #[test]
    fn test_inclusive_tax_zero_rate() {
        let total = Money::from_minor(70_000);
        assert_eq!(total.inclusive_tax(TaxRate::zero()).minor(), 0);
    }

    #[test]
    fn test_percentage() {
        let subtotal = Money::from_minor(70_000);
        assert_eq!(subtotal.percentage(10.0).minor(), 7_000);
        // Fractional percentage rounds half-up
        assert_eq!(Money::from_minor(1000).percentage(7.55).minor(), 76);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_minor(35_000);
        assert_eq!(unit_price.multiply_quantity(2).minor(), 70_000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_minor(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().minor(), 100);
    }

    #[test]
    fn test_min() {
        let a = Money::from_minor(500);
        let b = Money::from_minor(300);
        assert_eq!(a.min(b).minor(), 300);
    }
}
