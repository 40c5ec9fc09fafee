//! # Domain Types
//!
//! Core domain types shared across the Warung POS workspace.
//!
//! `Product` is read-only from this crate's perspective; the catalog is
//! owned by the backend and fetched once per session. `HeldOrder` is a
//! parked cart that lives on the backend as an unpaid order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::CartLine;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product from the catalog.
///
/// Immutable for the lifetime of a sales session. Prices are frozen into
/// cart lines when a product is added, so a catalog update mid-session
/// never changes an in-flight order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier.
    pub id: i64,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Unit price in whole rupiah.
    pub price: Money,

    /// Category used by the catalog filter (e.g. "makanan", "minuman").
    pub category: String,

    /// Sales unit (e.g. "porsi", "gelas").
    pub unit: String,

    /// Whether this product is a bundled package.
    pub is_package: bool,

    /// Optional image path, carried for the frontend.
    pub image: Option<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
///
/// Cash is the only method with a numeric guard (tendered amount must cover
/// the total). QRIS and transfer are settled externally, so the full total
/// is assumed paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    #[default]
    Cash,
    /// QRIS code scanned by the customer.
    Qris,
    /// Bank transfer.
    Transfer,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Qris => write!(f, "qris"),
            PaymentMethod::Transfer => write!(f, "transfer"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" | "tunai" => Ok(PaymentMethod::Cash),
            "qris" => Ok(PaymentMethod::Qris),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(format!(
                "Unknown payment method: '{}'. Valid options: cash, qris, transfer",
                other
            )),
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Settlement state of an order on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Settled; appears in sales reporting.
    Paid,
    /// Parked (held order); recallable from any session.
    Unpaid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Unpaid => write!(f, "unpaid"),
        }
    }
}

// =============================================================================
// Discount Specification
// =============================================================================

/// Which way an order-level discount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of the cart subtotal.
    Percentage,
    /// Flat rupiah amount, taken literally.
    Nominal,
}

/// An order-level discount as entered by the cashier.
///
/// The value is kept as the raw numeric text from the input field. Parsing
/// happens in the pricing calculator: an empty or unparseable value means
/// zero discount, and a percentage is NOT clamped here. The input field
/// enforces 0-100, but the calculator must stay correct without that
/// assumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSpec {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: String,
}

impl DiscountSpec {
    /// A percentage discount, e.g. `DiscountSpec::percentage("10")` for 10%.
    pub fn percentage(value: impl Into<String>) -> Self {
        DiscountSpec {
            kind: DiscountKind::Percentage,
            value: value.into(),
        }
    }

    /// A flat rupiah discount, e.g. `DiscountSpec::nominal("20000")`.
    pub fn nominal(value: impl Into<String>) -> Self {
        DiscountSpec {
            kind: DiscountKind::Nominal,
            value: value.into(),
        }
    }
}

// =============================================================================
// Held Order
// =============================================================================

/// A cart parked on the backend as an unpaid order.
///
/// The backend is authoritative: the store is rebuilt wholesale from
/// `GET /orders?status=unpaid` on refresh. Category and unit are not part
/// of the order-item payload, so products reconstructed from a held order
/// carry empty strings there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldOrder {
    /// Backend order id.
    pub id: String,

    /// The parked cart lines.
    pub items: Vec<CartLine>,

    /// Display timestamp from the backend (`created_at`).
    pub timestamp: String,

    /// Total as recorded when the order was parked.
    pub total: Money,

    /// Sales channel tag (dine-in, GoFood, GrabFood, ...).
    pub customer_type: String,

    /// Discount in effect when the order was parked. Only known for orders
    /// held in this session; the order API does not return it.
    pub discount: Option<DiscountSpec>,
}
