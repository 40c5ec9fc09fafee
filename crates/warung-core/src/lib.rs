//! # warung-core: Pure Business Logic for Warung POS
//!
//! This crate is the heart of the checkout engine. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Warung POS Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  apps/terminal (cashier UI)                   │  │
//! │  └────────────────────────────┬──────────────────────────────────┘  │
//! │                               │                                     │
//! │  ┌────────────────────────────▼──────────────────────────────────┐  │
//! │  │           warung-session (orchestration, held orders)         │  │
//! │  └──────────────┬──────────────────────────────┬─────────────────┘  │
//! │                 │                              │                    │
//! │  ┌──────────────▼───────────────┐  ┌───────────▼─────────────────┐  │
//! │  │  ★ warung-core (THIS CRATE)  │  │  warung-client (REST)       │  │
//! │  │                              │  │                             │  │
//! │  │  money  cart  pricing        │  │  products / orders API      │  │
//! │  │  checkout  types  error      │  │                             │  │
//! │  │                              │  └─────────────────────────────┘  │
//! │  │  NO I/O • PURE FUNCTIONS     │                                   │
//! │  └──────────────────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Whole-rupiah `Money` with basis-point percentage math
//! - [`types`] - Domain types (Product, DiscountSpec, HeldOrder, ...)
//! - [`cart`] - Cart and line mutations, unique by product id
//! - [`pricing`] - Subtotal / discount / tax / total / change
//! - [`checkout`] - The order -> payment -> confirmation -> receipt machine
//! - [`error`] - Typed checkout guards
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same cart snapshot, same numbers. The payment
//!    screen and the receipt can never disagree.
//! 2. **No I/O**: backend calls live in warung-client, never here.
//! 3. **Integer money**: whole rupiah as i64, never floats.

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartLine};
pub use checkout::{Effect, Stage, Transition, CONFIRMATION_PAUSE};
pub use error::{CheckoutError, CheckoutResult};
pub use money::Money;
pub use pricing::{PriceBreakdown, TAX_RATE_BPS};
pub use types::{DiscountKind, DiscountSpec, HeldOrder, PaymentMethod, PaymentStatus, Product};
