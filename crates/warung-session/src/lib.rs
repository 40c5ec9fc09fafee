//! # Warung Session - Sales Orchestration
//!
//! The layer between the pure pricing/checkout core and the embedding
//! interface. One [`SalesSession`] per cashier terminal owns everything the
//! sales screen renders:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         SalesSession                            │
//! │                                                                 │
//! │   catalog ──filter──► product grid                              │
//! │   cart + discount ──compute──► PriceBreakdown (every render)    │
//! │   checkout stage ──gates──► which mutations are allowed         │
//! │   held-order store ◄──refresh── Backend (REST)                  │
//! │   receipt snapshot ──frozen at confirm time                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session talks to the server only through the [`Backend`] trait from
//! `warung-client`, so tests drive the full hold/recall/pay flows against
//! an in-memory fake.
//!
//! [`Backend`]: warung_client::Backend

pub mod catalog;
pub mod error;
pub mod held;
pub mod receipt;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use held::HeldOrderStore;
pub use receipt::Receipt;
pub use session::SalesSession;
