//! # Client Error Types
//!
//! Everything that can go wrong talking to the backend. There is no retry
//! layer: errors propagate straight up and the session surfaces them to
//! the cashier.

use thiserror::Error;

/// Backend communication errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. The message is best-effort extracted from the
    /// response body (`message` or `error` field), falling back to the
    /// status line.
    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The configured base URL does not parse.
    #[error("Invalid backend URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// The bearer token could not be decoded for its `sub` claim.
    #[error("Could not read user id from token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// A 2xx response did not match the expected shape.
    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

/// Convenience type alias for Results with ClientError.
pub type ClientResult<T> = Result<T, ClientError>;
