//! # Pricing Calculator
//!
//! Pure functions from a cart snapshot plus an optional order-level
//! discount to the checkout numbers.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  subtotal            Σ price * quantity                             │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  discount            percentage: round-half-up of subtotal * p%     │
//! │     │                nominal:    the entered amount, literally      │
//! │     ▼                                                               │
//! │  after discount      subtotal - discount   (NOT clamped at zero)    │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  tax                 round-half-up of 10%                           │
//! │     │                                                               │
//! │     ▼                                                               │
//! │  total               after discount + tax                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is referentially transparent: the payment screen
//! and the receipt call the same code with the same snapshot and are
//! guaranteed to show the same numbers.

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::money::Money;
use crate::types::{DiscountKind, DiscountSpec};

/// Fixed tax rate: 10%.
///
/// Store settings carry a configurable tax rate that was never wired into
/// this calculation; pricing matches the observed fixed 10% until that is
/// settled. See DESIGN.md.
pub const TAX_RATE_BPS: i64 = 1_000;

// =============================================================================
// Price Breakdown
// =============================================================================

/// The full set of checkout numbers for one cart snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub discount: Money,
    pub subtotal_after_discount: Money,
    pub tax: Money,
    pub total: Money,
}

impl PriceBreakdown {
    /// Computes the breakdown for a cart snapshot and optional discount.
    pub fn compute(lines: &[CartLine], spec: Option<&DiscountSpec>) -> Self {
        let subtotal = subtotal(lines);
        let discount = discount_amount(spec, subtotal);
        let after = apply_discount(subtotal, discount);
        let tax = after.percent_bps(TAX_RATE_BPS);

        PriceBreakdown {
            subtotal,
            discount,
            subtotal_after_discount: after,
            tax,
            total: after + tax,
        }
    }
}

// =============================================================================
// Calculator Functions
// =============================================================================

/// Cart subtotal: the sum of line subtotals.
pub fn subtotal(lines: &[CartLine]) -> Money {
    lines.iter().map(CartLine::subtotal).sum()
}

/// Order-level discount amount for a given subtotal.
///
/// - Percentage: round-half-up of `subtotal * value%`. The value is taken
///   as entered; the calculator does not clamp it to [0, 100].
/// - Nominal: the entered rupiah amount, literally (not a fraction of
///   the subtotal).
/// - Absent spec or empty/unparseable value: zero.
pub fn discount_amount(spec: Option<&DiscountSpec>, subtotal: Money) -> Money {
    let Some(spec) = spec else {
        return Money::zero();
    };

    match spec.kind {
        DiscountKind::Percentage => match parse_bps(&spec.value) {
            Some(bps) => subtotal.percent_bps(bps),
            None => Money::zero(),
        },
        DiscountKind::Nominal => match parse_rupiah(&spec.value) {
            Some(amount) => amount,
            None => Money::zero(),
        },
    }
}

/// Subtracts the discount from the subtotal.
///
/// Policy point: the result is NOT clamped at zero. A nominal discount
/// larger than the subtotal produces a negative amount that flows through
/// to tax and total, matching the behavior this engine replaces. Clamping
/// would be a one-line change here and nowhere else.
pub fn apply_discount(subtotal: Money, discount: Money) -> Money {
    subtotal - discount
}

/// Change due: `max(0, tendered - total)`.
pub fn change(tendered: Money, total: Money) -> Money {
    (tendered - total).max(Money::zero())
}

/// Parses percentage text ("10", "7.5") into basis points.
fn parse_bps(value: &str) -> Option<i64> {
    let pct: f64 = value.trim().parse().ok()?;
    if !pct.is_finite() {
        return None;
    }
    Some((pct * 100.0).round() as i64)
}

/// Parses nominal rupiah text ("20000", "20000.0") into money.
fn parse_rupiah(value: &str) -> Option<Money> {
    let amount: f64 = value.trim().parse().ok()?;
    if !amount.is_finite() {
        return None;
    }
    Some(Money::from_rupiah(amount.round() as i64))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::types::Product;

    fn product(id: i64, price: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price: Money::from_rupiah(price),
            category: String::new(),
            unit: String::new(),
            is_package: false,
            image: None,
        }
    }

    fn cart_with(prices: &[(i64, i64, i64)]) -> Cart {
        // (product id, unit price, quantity)
        let mut cart = Cart::new();
        for &(id, price, qty) in prices {
            let p = product(id, price);
            for _ in 0..qty {
                cart.add_or_increment(&p);
            }
        }
        cart
    }

    #[test]
    fn test_tax_formula() {
        // Subtotal-after-discount 135.000 => tax 13.500, total 148.500
        let cart = cart_with(&[(1, 135_000, 1)]);
        let b = PriceBreakdown::compute(cart.lines(), None);

        assert_eq!(b.subtotal.rupiah(), 135_000);
        assert_eq!(b.discount.rupiah(), 0);
        assert_eq!(b.tax.rupiah(), 13_500);
        assert_eq!(b.total.rupiah(), 148_500);
    }

    #[test]
    fn test_percentage_discount() {
        // Subtotal 100.000, 10% => discount 10.000, after 90.000,
        // tax 9.000, total 99.000
        let cart = cart_with(&[(1, 50_000, 2)]);
        let spec = DiscountSpec::percentage("10");
        let b = PriceBreakdown::compute(cart.lines(), Some(&spec));

        assert_eq!(b.discount.rupiah(), 10_000);
        assert_eq!(b.subtotal_after_discount.rupiah(), 90_000);
        assert_eq!(b.tax.rupiah(), 9_000);
        assert_eq!(b.total.rupiah(), 99_000);
    }

    #[test]
    fn test_nominal_discount() {
        // Subtotal 50.000, nominal 20.000 => after 30.000, tax 3.000,
        // total 33.000
        let cart = cart_with(&[(1, 25_000, 2)]);
        let spec = DiscountSpec::nominal("20000");
        let b = PriceBreakdown::compute(cart.lines(), Some(&spec));

        assert_eq!(b.discount.rupiah(), 20_000);
        assert_eq!(b.subtotal_after_discount.rupiah(), 30_000);
        assert_eq!(b.tax.rupiah(), 3_000);
        assert_eq!(b.total.rupiah(), 33_000);
    }

    #[test]
    fn test_empty_or_garbage_discount_is_zero() {
        let subtotal = Money::from_rupiah(100_000);

        for value in ["", "  ", "abc", "10%", "NaN", "inf"] {
            let pct = DiscountSpec::percentage(value);
            let nom = DiscountSpec::nominal(value);
            assert_eq!(discount_amount(Some(&pct), subtotal), Money::zero());
            assert_eq!(discount_amount(Some(&nom), subtotal), Money::zero());
        }
        assert_eq!(discount_amount(None, subtotal), Money::zero());
    }

    #[test]
    fn test_fractional_percentage_rounds_half_up() {
        // 12.5% of 10.001 = 1250.125 => 1.250
        let spec = DiscountSpec::percentage("12.5");
        assert_eq!(
            discount_amount(Some(&spec), Money::from_rupiah(10_001)).rupiah(),
            1_250
        );
        // 10% of 5 = 0.5 => rounds up to 1
        let spec = DiscountSpec::percentage("10");
        assert_eq!(
            discount_amount(Some(&spec), Money::from_rupiah(5)).rupiah(),
            1
        );
    }

    #[test]
    fn test_percentage_over_100_not_clamped() {
        let spec = DiscountSpec::percentage("150");
        let cart = cart_with(&[(1, 10_000, 1)]);
        let b = PriceBreakdown::compute(cart.lines(), Some(&spec));

        assert_eq!(b.discount.rupiah(), 15_000);
        assert_eq!(b.subtotal_after_discount.rupiah(), -5_000);
    }

    #[test]
    fn test_nominal_exceeding_subtotal_goes_negative() {
        // Preserved behavior: no clamp, negative flows into tax and total
        let cart = cart_with(&[(1, 10_000, 1)]);
        let spec = DiscountSpec::nominal("25000");
        let b = PriceBreakdown::compute(cart.lines(), Some(&spec));

        assert_eq!(b.subtotal_after_discount.rupiah(), -15_000);
        assert_eq!(b.tax.rupiah(), -1_500);
        assert_eq!(b.total.rupiah(), -16_500);
    }

    #[test]
    fn test_change() {
        let total = Money::from_rupiah(33_000);
        assert_eq!(change(Money::from_rupiah(50_000), total).rupiah(), 17_000);
        assert_eq!(change(Money::from_rupiah(33_000), total).rupiah(), 0);
        // Under-tender never produces negative change
        assert_eq!(change(Money::from_rupiah(30_000), total).rupiah(), 0);
    }

    #[test]
    fn test_determinism() {
        let cart = cart_with(&[(1, 12_345, 3), (2, 6_789, 2)]);
        let spec = DiscountSpec::percentage("7.5");

        let a = PriceBreakdown::compute(cart.lines(), Some(&spec));
        let b = PriceBreakdown::compute(cart.lines(), Some(&spec));

        assert_eq!(a, b);
    }
}
