//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → matcher.rs (ExclusionMatcher: assets, API, framework internals skip the gate)
//!     → locale.rs (strip /{locale} for classification)
//!     → gate.rs (auth/protected/logout rules against PrefixSets)
//!     → Return: Decision (redirect or delegate)
//! ```
//!
//! # Design Decisions
//! - Route tables compiled from config, immutable until the next reload
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same path and token always give the same decision
//! - First matching rule wins

pub mod gate;
pub mod locale;
pub mod matcher;

pub use gate::{decide, Decision, GateRules, RouteGate};
pub use locale::{locale_of, strip_locale, with_locale};
pub use matcher::{ExclusionMatcher, PathMatcher, PathPrefixMatcher, PrefixSet};
