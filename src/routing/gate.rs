//! Auth redirect decisions.
//!
//! # Responsibilities
//! - Strip the locale prefix for classification only
//! - Redirect authenticated users away from auth pages
//! - Redirect unauthenticated users away from protected pages
//! - Clear the token on logout
//! - Otherwise delegate the original path to locale resolution
//!
//! # Design Decisions
//! - `decide` is pure; `RouteGate::evaluate` owns the token store I/O
//! - Rule order is fixed and the first match returns
//! - Token read failures count as "no token"

use serde::Serialize;

use crate::config::{GateConfig, RoutesConfig};
use crate::routing::locale::strip_locale;
use crate::routing::matcher::{PathMatcher, PrefixSet};
use crate::session::TokenStore;

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "path", rename_all = "snake_case")]
pub enum Decision {
    /// Authenticated user on an auth page.
    RedirectToDashboard,
    /// Unauthenticated user on a protected page.
    RedirectToLogin,
    /// Logout: the token has been cleared.
    RedirectToLoginClearingToken,
    /// No auth redirect applies; hand the original path on.
    Delegate(String),
}

impl Decision {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::RedirectToDashboard => "redirect_dashboard",
            Decision::RedirectToLogin => "redirect_login",
            Decision::RedirectToLoginClearingToken => "logout",
            Decision::Delegate(_) => "delegate",
        }
    }

    pub fn clears_token(&self) -> bool {
        matches!(self, Decision::RedirectToLoginClearingToken)
    }
}

/// Route tables and redirect targets the gate decides with.
#[derive(Debug, Clone)]
pub struct GateRules {
    pub locales: Vec<String>,
    pub auth_routes: PrefixSet,
    pub protected_routes: PrefixSet,
    pub dashboard_path: String,
    pub login_path: String,
    pub logout_prefix: String,
}

impl GateRules {
    pub fn new(routes: &RoutesConfig, locales: &[String]) -> Self {
        Self {
            locales: locales.to_vec(),
            auth_routes: PrefixSet::new(routes.auth_routes.iter().cloned()),
            protected_routes: PrefixSet::new(routes.protected_routes.iter().cloned()),
            dashboard_path: routes.dashboard_path.clone(),
            login_path: routes.login_path.clone(),
            logout_prefix: routes.logout_prefix.clone(),
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(&config.routes, &config.i18n.locales)
    }

    /// Path a redirecting decision points at.
    pub fn redirect_target(&self, decision: &Decision) -> Option<&str> {
        match decision {
            Decision::RedirectToDashboard => Some(&self.dashboard_path),
            Decision::RedirectToLogin | Decision::RedirectToLoginClearingToken => {
                Some(&self.login_path)
            }
            Decision::Delegate(_) => None,
        }
    }

    /// Route prefix that produced `decision` for `path`, for logging.
    pub fn matched_prefix(&self, decision: &Decision, path: &str) -> Option<&str> {
        let (_, normalized) = strip_locale(path, &self.locales);
        match decision {
            Decision::RedirectToDashboard => self.auth_routes.find(normalized),
            Decision::RedirectToLogin => self.protected_routes.find(normalized),
            Decision::RedirectToLoginClearingToken => Some(&self.logout_prefix),
            Decision::Delegate(_) => None,
        }
    }
}

impl Default for GateRules {
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}

/// Classify `path` for a request holding `token`.
pub fn decide(rules: &GateRules, path: &str, token: Option<&str>) -> Decision {
    let (_, normalized) = strip_locale(path, &rules.locales);
    let authenticated = token.is_some();

    if authenticated && rules.auth_routes.matches(normalized) {
        return Decision::RedirectToDashboard;
    }

    if !authenticated && rules.protected_routes.matches(normalized) {
        return Decision::RedirectToLogin;
    }

    if normalized.starts_with(&rules.logout_prefix) {
        return Decision::RedirectToLoginClearingToken;
    }

    Decision::Delegate(path.to_string())
}

/// The gate with its route tables; performs the token store I/O.
#[derive(Debug, Clone, Default)]
pub struct RouteGate {
    rules: GateRules,
}

impl RouteGate {
    pub fn new(rules: GateRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &GateRules {
        &self.rules
    }

    /// Read the token once, decide, and clear the token on logout.
    ///
    /// The removal is awaited before returning so a following request
    /// cannot observe the old token.
    pub async fn evaluate(&self, path: &str, store: &dyn TokenStore) -> Decision {
        let token = match store.get().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, path = %path, "Token lookup failed, treating request as unauthenticated");
                None
            }
        };

        let decision = decide(&self.rules, path, token.as_deref());

        if decision.clears_token() {
            if let Err(e) = store.remove().await {
                tracing::error!(error = %e, path = %path, "Failed to clear token on logout");
            }
        }

        tracing::debug!(
            path = %path,
            authenticated = token.is_some(),
            decision = decision.label(),
            matched_prefix = self.rules.matched_prefix(&decision, path).unwrap_or("-"),
            "Gate decision"
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::locale::strip_locale;
    use crate::session::MemoryTokenStore;

    fn rules() -> GateRules {
        GateRules::default()
    }

    #[test]
    fn test_unprefixed_paths_normalize_to_themselves() {
        let r = rules();
        for p in ["/", "/dashboard", "/auth/login", "/de/dashboard", "/english"] {
            assert_eq!(strip_locale(p, &r.locales).1, p);
        }
    }

    #[test]
    fn test_localized_protected_without_token_redirects_to_login() {
        let r = rules();
        for locale in &r.locales {
            for prefix in ["/dashboard"] {
                let path = format!("/{locale}{prefix}");
                assert_eq!(decide(&r, &path, None), Decision::RedirectToLogin, "{path}");
            }
        }
    }

    #[test]
    fn test_localized_auth_route_with_token_redirects_to_dashboard() {
        let r = rules();
        for locale in &r.locales {
            for prefix in ["/auth/login", "/auth/register", "/auth/forgot-password"] {
                let path = format!("/{locale}{prefix}");
                assert_eq!(
                    decide(&r, &path, Some("present")),
                    Decision::RedirectToDashboard,
                    "{path}"
                );
            }
        }
    }

    #[test]
    fn test_authenticated_on_protected_delegates() {
        assert_eq!(
            decide(&rules(), "/dashboard/products", Some("present")),
            Decision::Delegate("/dashboard/products".into())
        );
    }

    #[test]
    fn test_unauthenticated_on_auth_page_delegates_original_path() {
        assert_eq!(
            decide(&rules(), "/en/auth/login", None),
            Decision::Delegate("/en/auth/login".into())
        );
    }

    #[test]
    fn test_logout_clears_regardless_of_token() {
        let r = rules();
        assert_eq!(decide(&r, "/logout", Some("t")), Decision::RedirectToLoginClearingToken);
        assert_eq!(decide(&r, "/fr/logout", None), Decision::RedirectToLoginClearingToken);
    }

    #[test]
    fn test_priority_when_tables_overlap() {
        let mut routes = RoutesConfig::default();
        routes.auth_routes = vec!["/shared".into()];
        routes.protected_routes = vec!["/shared".into()];
        routes.logout_prefix = "/shared".into();
        let r = GateRules::new(&routes, &["en".to_string()]);

        assert_eq!(decide(&r, "/shared", Some("t")), Decision::RedirectToDashboard);
        assert_eq!(decide(&r, "/en/shared", None), Decision::RedirectToLogin);
    }

    #[test]
    fn test_plain_prefix_matches_sibling() {
        assert_eq!(decide(&rules(), "/dashboardX", None), Decision::RedirectToLogin);
    }

    #[test]
    fn test_bare_locale_and_root_delegate() {
        let r = rules();
        assert_eq!(decide(&r, "/en", None), Decision::Delegate("/en".into()));
        assert_eq!(decide(&r, "/", Some("t")), Decision::Delegate("/".into()));
    }

    #[test]
    fn test_unknown_locale_is_not_stripped() {
        assert_eq!(
            decide(&rules(), "/de/dashboard", None),
            Decision::Delegate("/de/dashboard".into())
        );
    }

    #[test]
    fn test_decide_is_idempotent() {
        let r = rules();
        for (path, token) in [("/fr/dashboard", None), ("/auth/login", Some("t")), ("/x", None)] {
            assert_eq!(decide(&r, path, token), decide(&r, path, token));
        }
    }

    #[test]
    fn test_redirect_targets() {
        let r = rules();
        assert_eq!(r.redirect_target(&Decision::RedirectToDashboard), Some("/dashboard"));
        assert_eq!(r.redirect_target(&Decision::RedirectToLogin), Some("/auth/login"));
        assert_eq!(
            r.redirect_target(&Decision::RedirectToLoginClearingToken),
            Some("/auth/login")
        );
        assert_eq!(r.redirect_target(&Decision::Delegate("/".into())), None);
    }

    #[test]
    fn test_matched_prefix() {
        let r = rules();
        let d = decide(&r, "/fr/auth/register/step", Some("t"));
        assert_eq!(r.matched_prefix(&d, "/fr/auth/register/step"), Some("/auth/register"));
        let d = decide(&r, "/en/dashboard/products", None);
        assert_eq!(r.matched_prefix(&d, "/en/dashboard/products"), Some("/dashboard"));
        let d = decide(&r, "/logout", None);
        assert_eq!(r.matched_prefix(&d, "/logout"), Some("/logout"));
        let d = decide(&r, "/en", None);
        assert_eq!(r.matched_prefix(&d, "/en"), None);
    }

    #[tokio::test]
    async fn test_logout_then_protected_redirects_to_login() {
        let gate = RouteGate::default();
        let store = MemoryTokenStore::with_token("present");

        assert_eq!(
            gate.evaluate("/logout", &store).await,
            Decision::RedirectToLoginClearingToken
        );
        assert_eq!(store.get().await.unwrap(), None);
        assert_eq!(
            gate.evaluate("/dashboard", &store).await,
            Decision::RedirectToLogin
        );
    }

    #[tokio::test]
    async fn test_read_failure_fails_open_to_unauthenticated() {
        let gate = RouteGate::default();
        let store = MemoryTokenStore::with_token("present");
        store.fail_reads(true);

        assert_eq!(gate.evaluate("/dashboard", &store).await, Decision::RedirectToLogin);
        assert_eq!(
            gate.evaluate("/auth/login", &store).await,
            Decision::Delegate("/auth/login".into())
        );
    }

    #[tokio::test]
    async fn test_evaluate_without_mutation_is_stable() {
        let gate = RouteGate::default();
        let store = MemoryTokenStore::with_token("present");
        let first = gate.evaluate("/en/auth/login", &store).await;
        let second = gate.evaluate("/en/auth/login", &store).await;
        assert_eq!(first, second);
        assert_eq!(first, Decision::RedirectToDashboard);
    }
}
