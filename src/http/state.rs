//! Shared state for the gate's handlers.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::StatusCode;
use hyper_util::client::legacy::{connect::HttpConnector, Client};

use crate::config::GateConfig;
use crate::i18n::LocaleResolver;
use crate::routing::{ExclusionMatcher, GateRules, RouteGate};

/// Everything compiled from one configuration generation.
#[derive(Debug)]
pub struct GateRuntime {
    pub config: GateConfig,
    pub gate: RouteGate,
    pub exclusions: ExclusionMatcher,
    pub locales: LocaleResolver,
    pub redirect_status: StatusCode,
}

impl GateRuntime {
    pub fn new(config: GateConfig) -> Self {
        let redirect_status = StatusCode::from_u16(config.routes.redirect_status)
            .ok()
            .filter(StatusCode::is_redirection)
            .unwrap_or(StatusCode::TEMPORARY_REDIRECT);

        Self {
            gate: RouteGate::new(GateRules::from_config(&config)),
            exclusions: ExclusionMatcher::from_config(&config.exclusions),
            locales: LocaleResolver::from_config(&config.i18n),
            redirect_status,
            config,
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<GateRuntime>>,
    pub client: Client<HttpConnector, Body>,
}

impl AppState {
    pub fn new(config: GateConfig, client: Client<HttpConnector, Body>) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(GateRuntime::new(config))),
            client,
        }
    }

    /// Snapshot of the current configuration generation.
    pub fn runtime(&self) -> Arc<GateRuntime> {
        self.inner.load_full()
    }

    /// Swap in a new configuration; in-flight requests keep their snapshot.
    pub fn reload(&self, config: GateConfig) {
        self.inner.store(Arc::new(GateRuntime::new(config)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_redirect_status_falls_back() {
        let mut config = GateConfig::default();
        config.routes.redirect_status = 200;
        assert_eq!(
            GateRuntime::new(config).redirect_status,
            StatusCode::TEMPORARY_REDIRECT
        );

        let mut config = GateConfig::default();
        config.routes.redirect_status = 302;
        assert_eq!(GateRuntime::new(config).redirect_status, StatusCode::FOUND);
    }
}
