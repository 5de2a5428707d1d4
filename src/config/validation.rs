//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the locale set is coherent (default is supported, no duplicates)
//! - Check every route prefix and redirect target is an absolute path
//! - Validate value ranges (timeouts > 0, redirect status)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GateConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("i18n.locales must not be empty")]
    NoLocales,

    #[error("locale `{0}` is listed more than once")]
    DuplicateLocale(String),

    #[error("locale `{0}` must be a non-empty code without `/`")]
    InvalidLocale(String),

    #[error("default locale `{0}` is not in i18n.locales")]
    UnknownDefaultLocale(String),

    #[error("{field}: `{value}` must start with `/`")]
    RelativePath { field: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("redirect status {0} is not a redirect (use 301, 302, 303, 307 or 308)")]
    RedirectStatus(u16),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{field}: `{value}` is not a socket address")]
    Address { field: &'static str, value: String },
}

const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let i18n = &config.i18n;
    if i18n.locales.is_empty() {
        errors.push(ValidationError::NoLocales);
    }
    let mut seen = HashSet::new();
    for locale in &i18n.locales {
        if locale.is_empty() || locale.contains('/') {
            errors.push(ValidationError::InvalidLocale(locale.clone()));
        } else if !seen.insert(locale.as_str()) {
            errors.push(ValidationError::DuplicateLocale(locale.clone()));
        }
    }
    if !i18n.locales.is_empty() && !i18n.locales.contains(&i18n.default_locale) {
        errors.push(ValidationError::UnknownDefaultLocale(
            i18n.default_locale.clone(),
        ));
    }
    if i18n.locale_cookie.is_empty() {
        errors.push(ValidationError::Empty("i18n.locale_cookie"));
    }

    let routes = &config.routes;
    for prefix in &routes.auth_routes {
        check_absolute("routes.auth_routes", prefix, &mut errors);
    }
    for prefix in &routes.protected_routes {
        check_absolute("routes.protected_routes", prefix, &mut errors);
    }
    check_absolute("routes.dashboard_path", &routes.dashboard_path, &mut errors);
    check_absolute("routes.login_path", &routes.login_path, &mut errors);
    check_absolute("routes.logout_prefix", &routes.logout_prefix, &mut errors);
    if !REDIRECT_STATUSES.contains(&routes.redirect_status) {
        errors.push(ValidationError::RedirectStatus(routes.redirect_status));
    }

    if config.session.cookie_name.is_empty() {
        errors.push(ValidationError::Empty("session.cookie_name"));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    check_address("upstream.address", &config.upstream.address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_absolute(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if !value.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field,
            value: value.to_string(),
        });
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GateConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = GateConfig::default();
        config.i18n.locales = vec!["en".into(), "en".into(), "fr/ca".into()];
        config.i18n.default_locale = "de".into();
        config.routes.protected_routes.push("dashboard".into());
        config.routes.redirect_status = 200;
        config.timeouts.request_secs = 0;
        config.upstream.address = "renderer".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateLocale("en".into())));
        assert!(errors.contains(&ValidationError::InvalidLocale("fr/ca".into())));
        assert!(errors.contains(&ValidationError::UnknownDefaultLocale("de".into())));
        assert!(errors.contains(&ValidationError::RelativePath {
            field: "routes.protected_routes",
            value: "dashboard".into(),
        }));
        assert!(errors.contains(&ValidationError::RedirectStatus(200)));
        assert!(errors.contains(&ValidationError::ZeroTimeout("timeouts.request_secs")));
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn test_empty_locales() {
        let mut config = GateConfig::default();
        config.i18n.locales.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoLocales]);
    }
}
