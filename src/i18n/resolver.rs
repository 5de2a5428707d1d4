//! Locale prefix handling for page requests that passed the gate.
//!
//! # Design Decisions
//! - Prefixed paths are authoritative; negotiation only runs for unprefixed ones
//! - `/` maps to `/{locale}`, never `/{locale}/`
//! - Query strings survive redirects and rewrites

use crate::config::{I18nConfig, PrefixMode};
use crate::i18n::negotiate::negotiate;
use crate::routing::locale::{strip_locale, with_locale};

/// What to do with a delegated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleOutcome {
    /// Send the browser to `location`.
    Redirect { location: String, locale: String },
    /// Forward to the renderer under a different path; the browser URL stays.
    Rewrite { path: String, locale: String },
    /// Forward unchanged.
    Forward { locale: String },
}

impl LocaleOutcome {
    pub fn locale(&self) -> &str {
        match self {
            LocaleOutcome::Redirect { locale, .. }
            | LocaleOutcome::Rewrite { locale, .. }
            | LocaleOutcome::Forward { locale } => locale,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocaleOutcome::Redirect { .. } => "locale_redirect",
            LocaleOutcome::Rewrite { .. } => "locale_rewrite",
            LocaleOutcome::Forward { .. } => "forward",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocaleResolver {
    locales: Vec<String>,
    default_locale: String,
    mode: PrefixMode,
}

impl LocaleResolver {
    pub fn new(locales: Vec<String>, default_locale: impl Into<String>, mode: PrefixMode) -> Self {
        Self {
            locales,
            default_locale: default_locale.into(),
            mode,
        }
    }

    pub fn from_config(config: &I18nConfig) -> Self {
        Self::new(
            config.locales.clone(),
            config.default_locale.clone(),
            config.prefix_mode,
        )
    }

    /// Resolve the locale for `path`.
    ///
    /// `cookie` is the remembered locale and `accept_language` the raw header;
    /// both are only consulted when the path carries no prefix.
    pub fn resolve(
        &self,
        path: &str,
        query: Option<&str>,
        cookie: Option<&str>,
        accept_language: Option<&str>,
    ) -> LocaleOutcome {
        let (prefix, rest) = strip_locale(path, &self.locales);

        match prefix {
            Some(locale) => {
                let locale = locale.to_string();
                let drop_prefix = match self.mode {
                    PrefixMode::Always => false,
                    PrefixMode::AsNeeded => locale == self.default_locale,
                    PrefixMode::Never => true,
                };
                if drop_prefix {
                    // `/en//host` must not become the scheme-relative `//host`
                    let target = format!("/{}", rest.trim_start_matches(['/', '\\']));
                    LocaleOutcome::Redirect {
                        location: append_query(target, query),
                        locale,
                    }
                } else {
                    LocaleOutcome::Forward { locale }
                }
            }
            None => {
                let preferred =
                    negotiate(&self.locales, &self.default_locale, cookie, accept_language)
                        .to_string();
                let localized = append_query(with_locale(&preferred, path), query);
                let rewrite = match self.mode {
                    PrefixMode::Always => false,
                    PrefixMode::AsNeeded => preferred == self.default_locale,
                    PrefixMode::Never => true,
                };
                if rewrite {
                    LocaleOutcome::Rewrite {
                        path: localized,
                        locale: preferred,
                    }
                } else {
                    LocaleOutcome::Redirect {
                        location: localized,
                        locale: preferred,
                    }
                }
            }
        }
    }
}

fn append_query(mut path: String, query: Option<&str>) -> String {
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        path.push('?');
        path.push_str(q);
    }
    path
}
