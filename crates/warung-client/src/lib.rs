//! # warung-client: REST Backend Client for Warung POS
//!
//! All backend communication lives here: the product catalog, the order
//! endpoints used for checkout and held orders, and the bearer-token
//! plumbing.
//!
//! ## Module Organization
//! ```text
//! warung_client/
//! ├── client.rs   ◄─── ApiClient (HTTP) + the Backend trait
//! ├── wire.rs     ◄─── JSON DTOs and conversions to core types
//! ├── auth.rs     ◄─── Bearer token `sub` claim extraction
//! └── error.rs    ◄─── ClientError
//! ```
//!
//! The session layer depends on the [`Backend`] trait, not on `ApiClient`,
//! so every session test runs against an in-memory fake with no network.

pub mod auth;
pub mod client;
pub mod error;
pub mod wire;

pub use client::{ApiClient, Backend};
pub use error::{ClientError, ClientResult};
pub use wire::{CreateOrderRequest, SubmittedOrder};
