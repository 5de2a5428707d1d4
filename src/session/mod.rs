//! Access token storage.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → cookie.rs (CookieTokenStore built from the Cookie header)
//!     → RouteGate reads the token once
//!     → on logout: remove() marks the cookie for clearing
//!     → response carries Set-Cookie with Max-Age=0
//! ```
//!
//! # Design Decisions
//! - The gate only sees the `TokenStore` trait, never cookies directly
//! - After `remove()` resolves, `get()` on the same store returns `None`
//! - Read errors surface as `SessionError`; the gate decides how to treat them

pub mod cookie;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use cookie::CookieTokenStore;
pub use memory::MemoryTokenStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cookie header is not valid UTF-8")]
    MalformedCookieHeader,

    #[error("token store unavailable: {0}")]
    Unavailable(String),
}

/// Where the access token is read from and cleared.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current token, `None` when unauthenticated.
    async fn get(&self) -> Result<Option<String>, SessionError>;

    /// Clear the token.
    async fn remove(&self) -> Result<(), SessionError>;
}
