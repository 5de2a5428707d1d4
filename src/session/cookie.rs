//! Cookie-backed token store.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderValue};

use super::{SessionError, TokenStore};

/// Token store for a single request.
///
/// Reads the token from the request's `Cookie` header and remembers whether
/// it was removed so the response can clear the browser's copy.
#[derive(Debug)]
pub struct CookieTokenStore {
    cookie_name: String,
    state: Mutex<CookieState>,
}

#[derive(Debug, Default)]
struct CookieState {
    token: Option<String>,
    malformed: bool,
    cleared: bool,
}

impl CookieTokenStore {
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        let state = match read_cookie(headers, cookie_name) {
            Ok(token) => CookieState {
                token,
                ..CookieState::default()
            },
            Err(_) => CookieState {
                malformed: true,
                ..CookieState::default()
            },
        };
        Self {
            cookie_name: cookie_name.to_string(),
            state: Mutex::new(state),
        }
    }

    /// Whether `remove()` was called on this store.
    pub fn was_cleared(&self) -> bool {
        self.state.lock().map(|s| s.cleared).unwrap_or(false)
    }

    /// `Set-Cookie` value that deletes the token cookie.
    pub fn clearing_cookie(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!(
            "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
            self.cookie_name
        ))
        .ok()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CookieState>, SessionError> {
        self.state
            .lock()
            .map_err(|_| SessionError::Unavailable("cookie state lock poisoned".into()))
    }
}

#[async_trait]
impl TokenStore for CookieTokenStore {
    async fn get(&self) -> Result<Option<String>, SessionError> {
        let state = self.lock()?;
        if state.malformed {
            return Err(SessionError::MalformedCookieHeader);
        }
        Ok(state.token.clone())
    }

    async fn remove(&self) -> Result<(), SessionError> {
        let mut state = self.lock()?;
        state.token = None;
        state.malformed = false;
        state.cleared = true;
        Ok(())
    }
}

/// Value of the named cookie across all `Cookie` headers.
///
/// Empty values count as absent.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Result<Option<String>, SessionError> {
    for value in headers.get_all(header::COOKIE) {
        let cookies = value
            .to_str()
            .map_err(|_| SessionError::MalformedCookieHeader)?;
        for cookie in cookies.split(';') {
            let cookie = cookie.trim();
            if let Some(value) = cookie
                .strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('='))
            {
                let value = value.trim_matches('"');
                if value.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(value.to_string()));
            }
        }
    }
    Ok(None)
}
