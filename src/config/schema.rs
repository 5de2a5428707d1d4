//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dashboard gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Page renderer that delegated requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Route classification tables and redirect targets.
    pub routes: RoutesConfig,

    /// Paths that bypass the gate entirely.
    pub exclusions: ExclusionConfig,

    /// Supported locales and prefix handling.
    pub i18n: I18nConfig,

    /// Where the access token lives.
    pub session: SessionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Renderer address (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Scheme used when building redirect URLs if the request carries no
    /// `X-Forwarded-Proto`.
    pub public_scheme: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
            public_scheme: "http".to_string(),
        }
    }
}

/// Route classification tables.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Prefixes only unauthenticated users should visit (login, register).
    pub auth_routes: Vec<String>,

    /// Prefixes that require a token.
    pub protected_routes: Vec<String>,

    /// Redirect target for authenticated users on an auth route.
    pub dashboard_path: String,

    /// Redirect target for unauthenticated users and after logout.
    pub login_path: String,

    /// Prefix that clears the token.
    pub logout_prefix: String,

    /// Status used for gate redirects (301, 302, 303, 307 or 308).
    pub redirect_status: u16,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            auth_routes: vec![
                "/auth/login".to_string(),
                "/auth/register".to_string(),
                "/auth/forgot-password".to_string(),
            ],
            protected_routes: vec!["/dashboard".to_string()],
            dashboard_path: "/dashboard".to_string(),
            login_path: "/auth/login".to_string(),
            logout_prefix: "/logout".to_string(),
            redirect_status: 307,
        }
    }
}

/// Path exclusion settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Leading segment prefixes (without the slash) that skip the gate.
    pub segment_prefixes: Vec<String>,

    /// Skip any path containing a dot (static files).
    pub exclude_dotted: bool,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            segment_prefixes: vec![
                "api".to_string(),
                "trpc".to_string(),
                "_next".to_string(),
                "_vercel".to_string(),
            ],
            exclude_dotted: true,
        }
    }
}

/// How locale prefixes appear in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixMode {
    /// Every page URL carries a locale prefix.
    #[default]
    Always,
    /// Only non-default locales carry a prefix.
    AsNeeded,
    /// URLs never carry a prefix; the locale is negotiated per request.
    Never,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Supported locale codes, in preference order.
    pub locales: Vec<String>,

    /// Locale used when negotiation finds nothing better.
    pub default_locale: String,

    /// Cookie remembering the user's locale.
    pub locale_cookie: String,

    pub prefix_mode: PrefixMode,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string(), "fr".to_string()],
            default_locale: "en".to_string(),
            locale_cookie: "NEXT_LOCALE".to_string(),
            prefix_mode: PrefixMode::Always,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the access token.
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "access_token".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
