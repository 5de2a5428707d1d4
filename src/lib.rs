//! Request gate for the admin dashboard.
//!
//! Classifies every page request by route and access token, redirects to the
//! dashboard or login page where the rules demand it, resolves the locale
//! prefix, and forwards everything else to the page renderer.

pub mod config;
pub mod http;
pub mod i18n;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod session;

pub use config::schema::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{decide, Decision, GateRules, RouteGate};
