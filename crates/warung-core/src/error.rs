//! # Error Types
//!
//! Domain errors for warung-core. These are the validation guards of the
//! checkout flow: they prevent an action rather than report a crash, and
//! the caller renders them to the cashier.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impls)
//! 2. Include context in error messages (amounts, stage names)
//! 3. Errors are enum variants, never bare strings

use thiserror::Error;

use crate::checkout::Stage;
use crate::money::Money;

/// Checkout transition guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Proceeding to payment with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The requested action is not legal from the current stage.
    #[error("Cannot {action} from the {from} stage")]
    InvalidTransition { from: Stage, action: &'static str },

    /// Cash payment confirmed without a parseable tendered amount.
    #[error("Cash amount is required")]
    CashNotEntered,

    /// Cash tendered does not cover the total.
    #[error("Cash received ({tendered}) is less than the total ({total})")]
    InsufficientCash { tendered: Money, total: Money },
}

/// Convenience type alias for Results with CheckoutError.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
