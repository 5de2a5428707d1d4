//! Locale resolution for delegated requests.
//!
//! # Data Flow
//! ```text
//! Delegate(path) from the gate
//!     → negotiate.rs (locale cookie → Accept-Language → default)
//!     → resolver.rs (prefix mode: redirect, rewrite or forward)
//!     → LocaleOutcome handed to the HTTP layer
//! ```

pub mod negotiate;
pub mod resolver;

pub use negotiate::{negotiate, parse_accept_language};
pub use resolver::{LocaleOutcome, LocaleResolver};
