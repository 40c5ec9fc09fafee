//! # Session Error Types
//!
//! What the orchestration layer can report to the cashier. Everything here
//! renders as a single human-readable line (the alert dialog of the
//! original interface).

use thiserror::Error;

use warung_client::ClientError;
use warung_core::CheckoutError;

/// Sales session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A checkout transition guard refused the action.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// A backend call failed. No rollback, no retry: the session state is
    /// whatever it was before the call, and the cashier decides what to do.
    #[error(transparent)]
    Backend(#[from] ClientError),

    /// A line mutation or recall was attempted while the cart is locked.
    #[error("Cart is locked during payment")]
    CartLocked,

    /// Recall or delete referenced an id the store does not hold.
    #[error("No held order with id {0}")]
    HeldOrderNotFound(String),
}

/// Convenience type alias for Results with SessionError.
pub type SessionResult<T> = Result<T, SessionError>;
