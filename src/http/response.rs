//! Response construction.
//!
//! # Responsibilities
//! - Build redirects whose `Location` is absolute on the current origin
//! - Build the cookies the gate sets (locale) and clears (token)
//! - Map upstream failures to HTTP status codes
//!
//! # Design Decisions
//! - Origin = `X-Forwarded-Proto` (or configured scheme) + `Host`
//! - Without a usable `Host` the `Location` stays origin-relative

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("invalid upstream uri: {0}")]
    UpstreamUri(#[from] axum::http::Error),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        match self {
            GateError::Upstream(_) => {
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
            GateError::UpstreamUri(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid upstream address").into_response()
            }
        }
    }
}

/// Origin the browser used, e.g. `https://admin.example.com/`.
pub fn request_origin(headers: &HeaderMap, default_scheme: &str) -> Option<Url> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_scheme);
    Url::parse(&format!("{scheme}://{host}/")).ok()
}

/// Place `target`'s path and query on the request origin.
///
/// The target is never joined as a URL reference, so `//host/x` or
/// `https://host/x` cannot leave the origin; leading slash runs collapse to
/// one `/`.
pub fn absolute_location(headers: &HeaderMap, default_scheme: &str, target: &str) -> String {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };
    let path = format!("/{}", path.trim_start_matches(['/', '\\']));

    match request_origin(headers, default_scheme) {
        Some(mut origin) => {
            origin.set_path(&path);
            origin.set_query(query);
            origin.into()
        }
        None => match query {
            Some(query) => format!("{path}?{query}"),
            None => path,
        },
    }
}

pub fn redirect(status: StatusCode, location: &str) -> Response {
    let mut response = status.into_response();
    match HeaderValue::from_str(location) {
        Ok(value) => {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Err(_) => {
            tracing::error!(location = %location, "Redirect target is not a valid header value");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    response
}

/// `Set-Cookie` remembering the resolved locale for a year.
pub fn locale_cookie(name: &str, locale: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{name}={locale}; Path=/; Max-Age=31536000; SameSite=Lax"
    ))
    .ok()
}
