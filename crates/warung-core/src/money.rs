//! # Money Module
//!
//! Provides the `Money` type for handling rupiah amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  WRONG                           │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Rupiah                                       │
//! │    The rupiah has no subdivision in retail use, so every amount     │
//! │    in the system is a whole-unit i64. Percentage math happens in    │
//! │    basis points with explicit round-half-up.                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use warung_core::money::Money;
//!
//! let price = Money::from_rupiah(15_000);
//! let line = price * 3;                    // Rp45.000
//! let tax = line.percent_bps(1_000);       // 10% = Rp4.500
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: a nominal discount larger than the subtotal produces
///   a negative amount, and the calculator deliberately lets it flow through
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Zero rupiah.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the larger of two amounts.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// Takes a basis-point fraction of this amount with round-half-up.
    ///
    /// ## Why Basis Points?
    /// 1 basis point = 0.01% = 1/10000, so 1000 bps = 10% and a fractional
    /// input such as "7.5%" still becomes an exact integer (750 bps).
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides
    /// the half-up rounding (5000/10000 = 0.5). i128 intermediate prevents
    /// overflow on large carts.
    ///
    /// ## Example
    /// ```rust
    /// use warung_core::money::Money;
    ///
    /// let subtotal = Money::from_rupiah(135_000);
    /// assert_eq!(subtotal.percent_bps(1_000).rupiah(), 13_500); // 10%
    /// ```
    pub fn percent_bps(&self, bps: i64) -> Money {
        // Rounding is applied to the magnitude so negative amounts (discount
        // overshoot) round symmetrically instead of drifting toward zero.
        let product = self.0 as i128 * bps as i128;
        let rounded = (product.abs() + 5000) / 10000;
        Money((rounded as i64) * product.signum() as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in the Indonesian convention with a
/// dot as the thousands separator, e.g. `Rp135.000`.
///
/// This is the format the terminal prints. Anything fancier (locales,
/// currencies other than IDR) is a frontend concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{}Rp{}", sign, grouped)
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing line totals into a cart subtotal.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupiah() {
        let money = Money::from_rupiah(15_000);
        assert_eq!(money.rupiah(), 15_000);
        assert!(!money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(format!("{}", Money::from_rupiah(0)), "Rp0");
        assert_eq!(format!("{}", Money::from_rupiah(500)), "Rp500");
        assert_eq!(format!("{}", Money::from_rupiah(15_000)), "Rp15.000");
        assert_eq!(format!("{}", Money::from_rupiah(1_234_567)), "Rp1.234.567");
        assert_eq!(format!("{}", Money::from_rupiah(-13_500)), "-Rp13.500");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(10_000);
        let b = Money::from_rupiah(4_000);

        assert_eq!((a + b).rupiah(), 14_000);
        assert_eq!((a - b).rupiah(), 6_000);
        assert_eq!((a * 3).rupiah(), 30_000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [10_000, 5_000, 7_500]
            .into_iter()
            .map(Money::from_rupiah)
            .sum();
        assert_eq!(total.rupiah(), 22_500);
    }

    #[test]
    fn test_percent_bps_exact() {
        // 10% of 135.000 = 13.500, no rounding needed
        let tax = Money::from_rupiah(135_000).percent_bps(1_000);
        assert_eq!(tax.rupiah(), 13_500);
    }

    #[test]
    fn test_percent_bps_rounds_half_up() {
        // 10% of 45 = 4.5, rounds up to 5
        assert_eq!(Money::from_rupiah(45).percent_bps(1_000).rupiah(), 5);
        // 10% of 44 = 4.4, rounds down to 4
        assert_eq!(Money::from_rupiah(44).percent_bps(1_000).rupiah(), 4);
    }

    #[test]
    fn test_percent_bps_fractional_rate() {
        // 7.5% (750 bps) of 10.000 = 750
        assert_eq!(Money::from_rupiah(10_000).percent_bps(750).rupiah(), 750);
    }

    #[test]
    fn test_negative_flows_through() {
        let negative = Money::from_rupiah(-5_000);
        assert!(negative.is_negative());
        assert_eq!(negative.percent_bps(1_000).rupiah(), -500);
        assert_eq!(negative.max(Money::zero()), Money::zero());
    }
}
