//! Authentication: the identity-provider seam and the auth state store.

mod store;

pub use store::AuthStore;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// An authenticated identity as issued by the external provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The external identity provider: credential issuance, session
/// lifecycle and federated sign-in. [`Remote`](crate::remote::Remote)
/// implements this over a provider binary.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Create an account with email and password and sign it in.
    async fn register(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Sign in through the provider's browser/popup federated flow.
    async fn sign_in_federated(&self) -> Result<AuthUser, AuthError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The identity of the persisted session, if any.
    async fn current_user(&self) -> Result<Option<AuthUser>, AuthError>;
}
