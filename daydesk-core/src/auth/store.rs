//! Auth state store.
//!
//! Holds the current identity, a loading flag and the last user-facing
//! error message as observable cells, and runs the auth operations
//! against the identity provider. The store is constructed explicitly
//! and passed to consumers; the watch receivers are the
//! identity-change subscription, and dropping a receiver deregisters
//! it.
//!
//! Operations are not mutually excluded: two concurrent calls interleave
//! with last-write-wins on the cells. Accepted limitation.

use tokio::sync::watch;

use crate::auth::{AuthUser, IdentityProvider};
use crate::error::{AuthCode, AuthError};
use crate::guard::{DASHBOARD_PATH, LOGIN_PATH, Navigator};
use crate::logger;

pub struct AuthStore<P: IdentityProvider> {
    provider: P,
    navigator: Box<dyn Navigator>,
    user: watch::Sender<Option<AuthUser>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
}

impl<P: IdentityProvider> AuthStore<P> {
    /// A fresh store: no identity, loading until [`initialize`] has
    /// restored the persisted session, no error.
    ///
    /// [`initialize`]: AuthStore::initialize
    pub fn new(provider: P, navigator: Box<dyn Navigator>) -> Self {
        AuthStore {
            provider,
            navigator,
            user: watch::Sender::new(None),
            loading: watch::Sender::new(true),
            error: watch::Sender::new(None),
        }
    }

    /// Restore the provider's persisted identity into the user cell and
    /// clear the loading flag. Call once at application startup.
    pub async fn initialize(&self) {
        match self.provider.current_user().await {
            Ok(user) => self.user.send_replace(user),
            Err(err) => {
                logger::error("Failed to restore session", Some(&err));
                self.user.send_replace(None)
            }
        };
        self.loading.send_replace(false);
    }

    pub fn subscribe_user(&self) -> watch::Receiver<Option<AuthUser>> {
        self.user.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    /// Synchronous read of the current identity, for navigation-time
    /// checks.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.user.borrow().clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Create an account with email and password. On success sets the
    /// identity and navigates to the dashboard; on failure surfaces a
    /// user-facing message through the error cell and returns None.
    pub async fn register(&self, email: &str, password: &str) -> Option<AuthUser> {
        self.error.send_replace(None);
        self.loading.send_replace(true);

        let outcome = match self.provider.register(email, password).await {
            Ok(user) => {
                self.user.send_replace(Some(user.clone()));
                self.navigator.goto(DASHBOARD_PATH);
                Some(user)
            }
            Err(err) => {
                logger::error("Registration error", Some(&err));
                self.error.send_replace(Some(register_error_message(&err)));
                None
            }
        };

        self.loading.send_replace(false);
        outcome
    }

    /// Sign in with email and password. Same shape as [`register`].
    ///
    /// [`register`]: AuthStore::register
    pub async fn login(&self, email: &str, password: &str) -> Option<AuthUser> {
        self.error.send_replace(None);
        self.loading.send_replace(true);

        let outcome = match self.provider.sign_in(email, password).await {
            Ok(user) => {
                self.user.send_replace(Some(user.clone()));
                self.navigator.goto(DASHBOARD_PATH);
                Some(user)
            }
            Err(err) => {
                logger::error("Login error", Some(&err));
                self.error.send_replace(Some(login_error_message(&err)));
                None
            }
        };

        self.loading.send_replace(false);
        outcome
    }

    /// Sign in through the provider's federated browser flow.
    pub async fn sign_in_federated(&self) -> Option<AuthUser> {
        self.error.send_replace(None);
        self.loading.send_replace(true);

        let outcome = match self.provider.sign_in_federated().await {
            Ok(user) => {
                self.user.send_replace(Some(user.clone()));
                self.navigator.goto(DASHBOARD_PATH);
                Some(user)
            }
            Err(err) => {
                logger::error("Federated sign-in error", Some(&err));
                self.error.send_replace(Some(federated_error_message(&err)));
                None
            }
        };

        self.loading.send_replace(false);
        outcome
    }

    /// End the session. On success clears the identity and navigates to
    /// the login path; on failure surfaces the provider's raw message
    /// and stays put.
    pub async fn sign_out(&self) {
        match self.provider.sign_out().await {
            Ok(()) => {
                self.user.send_replace(None);
                self.navigator.goto(LOGIN_PATH);
            }
            Err(err) => {
                logger::error("Sign out error", Some(&err));
                self.error.send_replace(Some(err.message));
            }
        }
    }
}

/// Map a provider error to the registration message shown to the user.
fn register_error_message(err: &AuthError) -> String {
    match err.code {
        AuthCode::EmailAlreadyInUse => {
            "This email is already in use. Please try logging in instead.".to_string()
        }
        AuthCode::InvalidEmail => "Invalid email address format.".to_string(),
        AuthCode::WeakPassword => {
            "Password is too weak. Please use a stronger password.".to_string()
        }
        AuthCode::NetworkRequestFailed => network_error_message(),
        _ => fallback_message(err, "Failed to register. Please try again."),
    }
}

/// Map a provider error to the login message shown to the user.
/// User-not-found and wrong-password collapse into one message so the
/// response doesn't reveal which half was wrong.
fn login_error_message(err: &AuthError) -> String {
    match err.code {
        AuthCode::UserNotFound | AuthCode::WrongPassword => {
            "Invalid email or password. Please try again.".to_string()
        }
        AuthCode::InvalidEmail => "Invalid email address format.".to_string(),
        AuthCode::UserDisabled => {
            "This account has been disabled. Please contact support.".to_string()
        }
        AuthCode::TooManyRequests => {
            "Too many failed login attempts. Please try again later.".to_string()
        }
        AuthCode::NetworkRequestFailed => network_error_message(),
        _ => fallback_message(err, "Failed to login. Please try again."),
    }
}

/// Map a provider error to the federated sign-in message.
fn federated_error_message(err: &AuthError) -> String {
    match err.code {
        AuthCode::PopupClosedByUser => {
            "Sign-in popup was closed before completing the sign-in.".to_string()
        }
        AuthCode::PopupBlocked => {
            "Sign-in popup was blocked by the browser. Please allow popups for this site."
                .to_string()
        }
        AuthCode::CancelledPopupRequest => "Sign-in popup request was cancelled.".to_string(),
        AuthCode::NetworkRequestFailed => network_error_message(),
        _ => fallback_message(err, "Failed to sign in with Google. Please try again."),
    }
}

fn network_error_message() -> String {
    "Network error. Please check your internet connection.".to_string()
}

/// Unmapped codes surface the provider's own message when it has one.
fn fallback_message(err: &AuthError, generic: &str) -> String {
    if err.message.is_empty() {
        generic.to_string()
    } else {
        err.message.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn test_user() -> AuthUser {
        AuthUser {
            uid: "user-1".to_string(),
            email: Some("user@example.com".to_string()),
            display_name: None,
        }
    }

    /// Provider that either succeeds with a fixed user or fails every
    /// operation with a fixed error.
    #[derive(Default)]
    struct FakeProvider {
        fail_with: Option<AuthError>,
        persisted: Option<AuthUser>,
    }

    impl FakeProvider {
        fn failing(code: AuthCode, message: &str) -> Self {
            FakeProvider {
                fail_with: Some(AuthError::new(code, message)),
                persisted: None,
            }
        }

        fn outcome(&self) -> Result<AuthUser, AuthError> {
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(test_user()),
            }
        }
    }

    impl IdentityProvider for FakeProvider {
        async fn register(&self, _email: &str, _password: &str) -> Result<AuthUser, AuthError> {
            self.outcome()
        }

        async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthUser, AuthError> {
            self.outcome()
        }

        async fn sign_in_federated(&self) -> Result<AuthUser, AuthError> {
            self.outcome()
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            self.outcome().map(|_| ())
        }

        async fn current_user(&self) -> Result<Option<AuthUser>, AuthError> {
            Ok(self.persisted.clone())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNavigator {
        paths: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNavigator {
        fn visited(&self) -> Vec<String> {
            self.paths.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn goto(&self, path: &str) {
            self.paths.lock().unwrap().push(path.to_string());
        }
    }

    fn store_with(provider: FakeProvider) -> (AuthStore<FakeProvider>, RecordingNavigator) {
        let navigator = RecordingNavigator::default();
        let store = AuthStore::new(provider, Box::new(navigator.clone()));
        (store, navigator)
    }

    #[tokio::test]
    async fn test_register_success_sets_user_and_navigates() {
        let (store, navigator) = store_with(FakeProvider::default());

        let user = store.register("user@example.com", "hunter22").await;

        assert_eq!(user, Some(test_user()));
        assert_eq!(store.current_user(), Some(test_user()));
        assert_eq!(navigator.visited(), vec!["/dashboard"]);
        assert!(!store.is_loading());
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_register_maps_email_in_use() {
        let (store, navigator) = store_with(FakeProvider::failing(
            AuthCode::EmailAlreadyInUse,
            "EMAIL_EXISTS",
        ));

        let user = store.register("user@example.com", "hunter22").await;

        assert!(user.is_none());
        assert_eq!(
            store.last_error().as_deref(),
            Some("This email is already in use. Please try logging in instead.")
        );
        assert!(navigator.visited().is_empty());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_register_maps_weak_password_and_invalid_email() {
        let (store, _) = store_with(FakeProvider::failing(AuthCode::WeakPassword, ""));
        store.register("a@b.c", "123").await;
        assert_eq!(
            store.last_error().as_deref(),
            Some("Password is too weak. Please use a stronger password.")
        );

        let (store, _) = store_with(FakeProvider::failing(AuthCode::InvalidEmail, ""));
        store.register("not-an-email", "hunter22").await;
        assert_eq!(
            store.last_error().as_deref(),
            Some("Invalid email address format.")
        );
    }

    #[tokio::test]
    async fn test_login_collapses_credential_errors() {
        for code in [AuthCode::UserNotFound, AuthCode::WrongPassword] {
            let (store, _) = store_with(FakeProvider::failing(code, "raw provider text"));
            let user = store.login("user@example.com", "nope").await;
            assert!(user.is_none());
            assert_eq!(
                store.last_error().as_deref(),
                Some("Invalid email or password. Please try again.")
            );
        }
    }

    #[tokio::test]
    async fn test_login_maps_disabled_throttled_and_network() {
        let cases = [
            (
                AuthCode::UserDisabled,
                "This account has been disabled. Please contact support.",
            ),
            (
                AuthCode::TooManyRequests,
                "Too many failed login attempts. Please try again later.",
            ),
            (
                AuthCode::NetworkRequestFailed,
                "Network error. Please check your internet connection.",
            ),
        ];

        for (code, expected) in cases {
            let (store, _) = store_with(FakeProvider::failing(code, ""));
            store.login("user@example.com", "pw").await;
            assert_eq!(store.last_error().as_deref(), Some(expected));
            assert!(!store.is_loading());
        }
    }

    #[tokio::test]
    async fn test_federated_maps_popup_codes() {
        let cases = [
            (
                AuthCode::PopupClosedByUser,
                "Sign-in popup was closed before completing the sign-in.",
            ),
            (
                AuthCode::PopupBlocked,
                "Sign-in popup was blocked by the browser. Please allow popups for this site.",
            ),
            (
                AuthCode::CancelledPopupRequest,
                "Sign-in popup request was cancelled.",
            ),
        ];

        for (code, expected) in cases {
            let (store, _) = store_with(FakeProvider::failing(code, ""));
            assert!(store.sign_in_federated().await.is_none());
            assert_eq!(store.last_error().as_deref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_unmapped_code_falls_back_to_provider_message_then_generic() {
        let (store, _) = store_with(FakeProvider::failing(
            AuthCode::Other("operation-not-allowed".to_string()),
            "Password sign-in is disabled for this project.",
        ));
        store.login("user@example.com", "pw").await;
        assert_eq!(
            store.last_error().as_deref(),
            Some("Password sign-in is disabled for this project.")
        );

        let (store, _) = store_with(FakeProvider::failing(
            AuthCode::Other("operation-not-allowed".to_string()),
            "",
        ));
        store.login("user@example.com", "pw").await;
        assert_eq!(
            store.last_error().as_deref(),
            Some("Failed to login. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_error_cell_clears_on_next_attempt() {
        let (store, _) = store_with(FakeProvider::failing(AuthCode::WrongPassword, ""));
        store.login("user@example.com", "bad").await;
        assert!(store.last_error().is_some());

        let (store, _) = store_with(FakeProvider::default());
        store.login("user@example.com", "good").await;
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_user_and_navigates_to_login() {
        let (store, navigator) = store_with(FakeProvider::default());
        store.login("user@example.com", "pw").await;

        store.sign_out().await;

        assert!(store.current_user().is_none());
        assert_eq!(navigator.visited(), vec!["/dashboard", "/login"]);
    }

    #[tokio::test]
    async fn test_sign_out_failure_keeps_user_and_surfaces_raw_message() {
        let provider = FakeProvider {
            fail_with: Some(AuthError::new(
                AuthCode::NetworkRequestFailed,
                "connection reset",
            )),
            persisted: Some(test_user()),
        };
        let (store, navigator) = store_with(provider);
        store.initialize().await;

        store.sign_out().await;

        // Raw provider message, no code mapping, no navigation.
        assert_eq!(store.last_error().as_deref(), Some("connection reset"));
        assert_eq!(store.current_user(), Some(test_user()));
        assert!(navigator.visited().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_restores_persisted_session() {
        let provider = FakeProvider {
            fail_with: None,
            persisted: Some(test_user()),
        };
        let (store, _) = store_with(provider);
        assert!(store.is_loading());

        store.initialize().await;

        assert_eq!(store.current_user(), Some(test_user()));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_initialize_without_session_clears_loading() {
        let (store, _) = store_with(FakeProvider::default());
        store.initialize().await;
        assert!(store.current_user().is_none());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_subscribers_observe_updates() {
        let (store, _) = store_with(FakeProvider::default());
        let mut user_rx = store.subscribe_user();
        let mut loading_rx = store.subscribe_loading();

        store.login("user@example.com", "pw").await;

        assert!(user_rx.has_changed().unwrap());
        assert_eq!(user_rx.borrow_and_update().clone(), Some(test_user()));
        assert!(loading_rx.has_changed().unwrap());
        assert!(!*loading_rx.borrow_and_update());
    }
}
