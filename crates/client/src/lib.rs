//! Atelier Verde backend client.
//!
//! # Architecture
//!
//! - The backend is an external collaborator consumed through its REST
//!   contract only - this crate defines no server-side behavior
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL)
//! - Authenticated requests carry a bearer token obtained from `login`
//! - Cart mutations are mirrored fire-and-forget: [`RemoteCartMirror`]
//!   implements [`atelier_cart::CartMirror`] by spawning a send per
//!   mutation and logging failures without feeding anything back into
//!   the local store
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_client::ApiClient;
//!
//! let client = ApiClient::new("https://api.atelierverde.example".parse()?);
//! let session = client.login("user@example.com", "secret").await?;
//!
//! let rooms = client.rooms().await?;
//! let extras = client.extras().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod api;
mod cache;
mod mirror;
pub mod types;

pub use api::ApiClient;
pub use mirror::RemoteCartMirror;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed (connection, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot hold path segments.
    #[error("invalid backend base URL: {0}")]
    BaseUrl(String),

    /// Bearer token missing or rejected; re-authentication required.
    /// The local cart is kept so the session can resume after login.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend rejected the request with a non-2xx status.
    #[error("backend error (HTTP {status}): {message}")]
    Status { status: u16, message: String },
}
