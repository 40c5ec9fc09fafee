//! # Checkout State Machine
//!
//! The four-stage flow that gates which cart mutations are legal and when
//! the order is submitted.
//!
//! ## Stages and Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │   Order ──(proceed, cart non-empty)──► Payment                      │
//! │     ▲                                    │  ▲                       │
//! │     │                               back │  │                       │
//! │     │◄───────────────────────────────────┘  │                       │
//! │     │                                       │ confirm (guarded)     │
//! │     │                                       ▼                       │
//! │     │                                  Confirmation                 │
//! │     │                                       │ auto, after 2s        │
//! │     │                                       ▼                       │
//! │     └────────────(new order)─────────── Receipt                     │
//! │                                                                     │
//! │   Cart is LOCKED in Payment, Confirmation and Receipt.              │
//! │   Going back from Payment unlocks; so does starting a new order.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each transition function consumes the current stage and returns a
//! [`Transition`]: the next stage plus a side-effect descriptor for the
//! orchestrator to apply. Keeping the lock/unlock/reset decisions here, as
//! data, makes them single decision points instead of scattered boolean
//! flags. The machine is cyclic by design: `Receipt -> Order` is the only
//! exit, one checkout session after another.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CheckoutError;
use crate::money::Money;
use crate::types::PaymentMethod;

/// How long the confirmation screen shows before auto-advancing to the
/// receipt. A UX pause only; it carries no computation.
pub const CONFIRMATION_PAUSE: Duration = Duration::from_secs(2);

// =============================================================================
// Stage
// =============================================================================

/// The checkout stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Cart fully editable; catalog browsing.
    #[default]
    Order,
    /// Payment method and amount entry. Cart locked.
    Payment,
    /// Transient "payment accepted" screen. Cart locked.
    Confirmation,
    /// Read-only summary of the finalized order. Cart locked.
    Receipt,
}

/// Side effect the orchestrator must apply alongside a stage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// No session state to touch.
    None,
    /// Freeze the cart against further line mutations.
    LockCart,
    /// Release the cart for editing again.
    UnlockCart,
    /// Clear cart, discount, payment inputs and the lock.
    ResetSession,
}

/// The outcome of a legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Stage,
    pub effect: Effect,
}

impl Stage {
    /// Whether cart mutations are rejected in this stage.
    ///
    /// Locked from entry into Payment all the way through Receipt.
    pub const fn locks_cart(&self) -> bool {
        matches!(self, Stage::Payment | Stage::Confirmation | Stage::Receipt)
    }

    /// `Order -> Payment`. Refused while the cart is empty.
    pub fn proceed(self, cart_is_empty: bool) -> Result<Transition, CheckoutError> {
        match self {
            Stage::Order if cart_is_empty => Err(CheckoutError::EmptyCart),
            Stage::Order => Ok(Transition {
                next: Stage::Payment,
                effect: Effect::LockCart,
            }),
            from => Err(CheckoutError::InvalidTransition {
                from,
                action: "proceed",
            }),
        }
    }

    /// `Payment -> Order`.
    ///
    /// Backing out of payment unlocks the cart: the cashier returned to
    /// edit the order, so edits must be legal again.
    pub fn go_back(self) -> Result<Transition, CheckoutError> {
        match self {
            Stage::Payment => Ok(Transition {
                next: Stage::Order,
                effect: Effect::UnlockCart,
            }),
            from => Err(CheckoutError::InvalidTransition {
                from,
                action: "back",
            }),
        }
    }

    /// `Payment -> Confirmation`, guarded by the payment inputs.
    ///
    /// Cash requires a parsed tendered amount covering the total. QRIS and
    /// transfer are settled externally, so they carry no numeric guard.
    pub fn confirm(
        self,
        method: PaymentMethod,
        tendered: Option<Money>,
        total: Money,
    ) -> Result<Transition, CheckoutError> {
        if self != Stage::Payment {
            return Err(CheckoutError::InvalidTransition {
                from: self,
                action: "confirm",
            });
        }

        if method == PaymentMethod::Cash {
            let tendered = tendered.ok_or(CheckoutError::CashNotEntered)?;
            if tendered < total {
                return Err(CheckoutError::InsufficientCash { tendered, total });
            }
        }

        Ok(Transition {
            next: Stage::Confirmation,
            effect: Effect::None,
        })
    }

    /// `Confirmation -> Receipt`, driven by the timer, not the cashier.
    pub fn finish_confirmation(self) -> Result<Transition, CheckoutError> {
        match self {
            Stage::Confirmation => Ok(Transition {
                next: Stage::Receipt,
                effect: Effect::None,
            }),
            from => Err(CheckoutError::InvalidTransition {
                from,
                action: "finish_confirmation",
            }),
        }
    }

    /// `Receipt -> Order`: the only exit, starting the next sale.
    pub fn start_new_order(self) -> Result<Transition, CheckoutError> {
        match self {
            Stage::Receipt => Ok(Transition {
                next: Stage::Order,
                effect: Effect::ResetSession,
            }),
            from => Err(CheckoutError::InvalidTransition {
                from,
                action: "new_order",
            }),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Order => write!(f, "order"),
            Stage::Payment => write!(f, "payment"),
            Stage::Confirmation => write!(f, "confirmation"),
            Stage::Receipt => write!(f, "receipt"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
