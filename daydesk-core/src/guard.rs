//! Route guarding and the navigation seam.
//!
//! The guard runs once per navigation against a synchronous read of the
//! auth state. It must only be evaluated in a client context where the
//! persisted identity has been restored; running it during a
//! server-side render would redirect before the identity is known.

use crate::auth::AuthUser;

/// Path prefixes that require a present identity.
pub const PROTECTED_PATHS: &[&str] = &["/dashboard", "/calendar", "/notes", "/settings", "/profile"];

/// Paths only reachable while signed out (exact match).
pub const AUTH_PATHS: &[&str] = &["/login", "/register"];

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/login";

/// Outcome of a navigation-time check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Navigation proceeds; the resolved path is the loaded data.
    Allow { path: String },
    /// Navigation aborts and the client redirects.
    Redirect { to: &'static str },
}

/// Decide whether navigation to `path` is allowed for the given
/// identity.
pub fn check_route(path: &str, user: Option<&AuthUser>) -> RouteDecision {
    let is_protected = PROTECTED_PATHS.iter().any(|route| path.starts_with(route));
    if is_protected && user.is_none() {
        return RouteDecision::Redirect { to: LOGIN_PATH };
    }

    let is_auth_route = AUTH_PATHS.iter().any(|route| path == *route);
    if is_auth_route && user.is_some() {
        return RouteDecision::Redirect { to: DASHBOARD_PATH };
    }

    RouteDecision::Allow {
        path: path.to_string(),
    }
}

/// Programmatic navigation. The auth store navigates after sign-in and
/// sign-out; the host application decides what "going to a path" means.
pub trait Navigator: Send + Sync {
    fn goto(&self, path: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> AuthUser {
        AuthUser {
            uid: "user-1".to_string(),
            email: None,
            display_name: None,
        }
    }

    #[test]
    fn test_protected_path_without_identity_redirects_to_login() {
        assert_eq!(
            check_route("/dashboard", None),
            RouteDecision::Redirect { to: "/login" }
        );
        // Prefix match covers nested paths.
        assert_eq!(
            check_route("/notes/42", None),
            RouteDecision::Redirect { to: "/login" }
        );
    }

    #[test]
    fn test_auth_path_with_identity_redirects_to_dashboard() {
        let user = signed_in();
        assert_eq!(
            check_route("/login", Some(&user)),
            RouteDecision::Redirect { to: "/dashboard" }
        );
        assert_eq!(
            check_route("/register", Some(&user)),
            RouteDecision::Redirect { to: "/dashboard" }
        );
    }

    #[test]
    fn test_unprotected_path_never_redirects() {
        let user = signed_in();
        assert_eq!(
            check_route("/about", None),
            RouteDecision::Allow { path: "/about".to_string() }
        );
        assert_eq!(
            check_route("/about", Some(&user)),
            RouteDecision::Allow { path: "/about".to_string() }
        );
    }

    #[test]
    fn test_protected_path_with_identity_is_allowed() {
        let user = signed_in();
        assert_eq!(
            check_route("/dashboard", Some(&user)),
            RouteDecision::Allow { path: "/dashboard".to_string() }
        );
    }

    #[test]
    fn test_auth_path_match_is_exact() {
        // "/login/help" is not an auth path, so identity doesn't redirect it.
        let user = signed_in();
        assert_eq!(
            check_route("/login/help", Some(&user)),
            RouteDecision::Allow { path: "/login/help".to_string() }
        );
    }
}
