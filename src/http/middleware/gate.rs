//! Gate middleware.
//! Applies auth redirects, then locale resolution, before any page is rendered.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, Uri},
    middleware::Next,
    response::Response,
};

use crate::http::request::request_id;
use crate::http::response::{absolute_location, locale_cookie, redirect};
use crate::http::state::{AppState, GateRuntime};
use crate::i18n::LocaleOutcome;
use crate::observability::metrics;
use crate::routing::PathMatcher;
use crate::session::{cookie::read_cookie, CookieTokenStore};

/// Locale chosen for a forwarded request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLocale(pub String);

pub async fn gate_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let runtime = state.runtime();
    let path = req.uri().path().to_string();
    let request_id = request_id(req.headers());

    // 1. Assets, API and framework paths bypass the gate.
    if runtime.exclusions.matches(&path) {
        tracing::trace!(request_id = %request_id, path = %path, "Path excluded from gate");
        metrics::record_decision("excluded");
        let response = next.run(req).await;
        metrics::record_request(response.status().as_u16(), start);
        return response;
    }

    // 2. Auth rules.
    let store = CookieTokenStore::from_headers(req.headers(), &runtime.config.session.cookie_name);
    let decision = runtime.gate.evaluate(&path, &store).await;
    metrics::record_decision(decision.label());

    let response = match runtime.gate.rules().redirect_target(&decision) {
        Some(target) => {
            let location = absolute_location(
                req.headers(),
                &runtime.config.upstream.public_scheme,
                target,
            );
            tracing::info!(
                request_id = %request_id,
                path = %path,
                decision = decision.label(),
                location = %location,
                "Gate redirect"
            );
            let mut response = redirect(runtime.redirect_status, &location);
            if store.was_cleared() {
                if let Some(cookie) = store.clearing_cookie() {
                    response.headers_mut().append(header::SET_COOKIE, cookie);
                }
            }
            response
        }
        // 3. Locale resolution on the original path.
        None => resolve_locale(&runtime, &request_id, &path, req, next).await,
    };

    metrics::record_request(response.status().as_u16(), start);
    response
}

async fn resolve_locale(
    runtime: &GateRuntime,
    request_id: &str,
    path: &str,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let i18n = &runtime.config.i18n;
    let remembered = read_cookie(req.headers(), &i18n.locale_cookie).ok().flatten();
    let accept_language = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let query = req.uri().query().map(str::to_string);

    let outcome = runtime.locales.resolve(
        path,
        query.as_deref(),
        remembered.as_deref(),
        accept_language.as_deref(),
    );
    metrics::record_decision(outcome.label());

    let mut response = match &outcome {
        LocaleOutcome::Redirect { location, .. } => {
            let location = absolute_location(
                req.headers(),
                &runtime.config.upstream.public_scheme,
                location,
            );
            tracing::debug!(request_id = %request_id, path = %path, location = %location, "Locale redirect");
            redirect(runtime.redirect_status, &location)
        }
        LocaleOutcome::Rewrite { path: rewritten, locale } => {
            match Uri::try_from(rewritten.as_str()) {
                Ok(uri) => *req.uri_mut() = uri,
                Err(e) => {
                    tracing::warn!(request_id = %request_id, path = %rewritten, error = %e, "Rewrite produced an invalid URI, forwarding original path");
                }
            }
            req.extensions_mut().insert(ResolvedLocale(locale.clone()));
            next.run(req).await
        }
        LocaleOutcome::Forward { locale } => {
            req.extensions_mut().insert(ResolvedLocale(locale.clone()));
            next.run(req).await
        }
    };

    if remembered.as_deref() != Some(outcome.locale()) {
        if let Some(cookie) = locale_cookie(&i18n.locale_cookie, outcome.locale()) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }

    response
}
