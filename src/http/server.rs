//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gate middleware and catch-all handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Apply configuration reloads
//! - Forward delegated requests to the upstream renderer

use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{uri::Scheme, HeaderValue, Request, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GateConfig;
use crate::http::middleware::{gate_middleware, ResolvedLocale};
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::GateError;
use crate::http::state::AppState;
use crate::observability::metrics;

/// Path of the gate's own liveness probe; never gated or forwarded.
pub const HEALTH_PATH: &str = "/__gate/health";

/// Header telling the renderer which locale the gate resolved.
pub const X_GATE_LOCALE: &str = "x-gate-locale";

/// HTTP server for the dashboard gate.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let state = AppState::new(config, client);
        let router = Self::build_router(state.clone(), request_timeout);

        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        let gated = Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .layer(middleware::from_fn_with_state(state.clone(), gate_middleware));

        Router::new()
            .route(HEALTH_PATH, get(health_handler))
            .merge(gated)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    /// Handle for swapping configuration from outside the server.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations arriving on `config_updates` replace the active one;
    /// the server stops on `shutdown` or Ctrl+C.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GateConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reload_state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                tracing::info!(
                    auth_routes = config.routes.auth_routes.len(),
                    protected_routes = config.routes.protected_routes.len(),
                    locales = ?config.i18n.locales,
                    "Applying reloaded configuration"
                );
                reload_state.reload(config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Forwards a request that passed the gate to the upstream renderer.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            if matches!(e, GateError::Upstream(_)) {
                metrics::record_upstream_error();
            }
            e.into_response()
        }
    }
}

async fn forward(state: &AppState, request: Request<Body>) -> Result<Response, GateError> {
    let runtime = state.runtime();
    let (mut parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers);

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    parts.uri = Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(runtime.config.upstream.address.as_str())
        .path_and_query(path_and_query)
        .build()?;

    // only the gate may tell the renderer which locale was resolved
    parts.headers.remove(X_GATE_LOCALE);
    if let Some(ResolvedLocale(locale)) = parts.extensions.get::<ResolvedLocale>() {
        if let Ok(value) = HeaderValue::from_str(locale) {
            parts.headers.insert(X_GATE_LOCALE, value);
        }
    }

    tracing::debug!(request_id = %request_id, uri = %parts.uri, "Forwarding to upstream");

    let response = state
        .client
        .request(Request::from_parts(parts, body))
        .await
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            GateError::Upstream(e.to_string())
        })?;

    let (parts, body) = response.into_parts();
    Ok(Response::from_parts(parts, Body::new(body)))
}

/// Wait for the shutdown broadcast or Ctrl+C.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = shutdown.recv() => {}
        _ = ctrl_c => {}
    }
    tracing::info!("Shutdown signal received");
}
