//! Remote backend access via a provider binary.
//!
//! `Remote` implements both seams — the document store and the identity
//! provider — by issuing protocol commands to the configured provider.

use serde_json::json;

use crate::auth::{AuthUser, IdentityProvider};
use crate::error::{AuthCode, AuthError, DaydeskError, DaydeskResult};
use crate::protocol::Command as ProviderCommand;
use crate::provider::Provider;
use crate::store::{Document, DocumentStore, QueryFilter};

pub struct Remote {
    provider: Provider,
}

impl Remote {
    pub fn new(provider_name: &str) -> Self {
        Remote {
            provider: Provider::from_name(provider_name),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Transport and store faults become coded auth errors so the auth
    /// store's message mapping has one error shape to work with.
    fn to_auth_error(err: DaydeskError) -> AuthError {
        match err {
            DaydeskError::Auth(auth) => auth,
            other => AuthError::new(
                AuthCode::Other("provider-failure".to_string()),
                other.to_string(),
            ),
        }
    }
}

impl DocumentStore for Remote {
    async fn query(
        &self,
        collection: &str,
        filter: &QueryFilter,
    ) -> DaydeskResult<Vec<Document>> {
        let filter = serde_json::to_value(filter)
            .map_err(|e| DaydeskError::Serialization(e.to_string()))?;
        self.provider
            .call_with_timeout(
                ProviderCommand::QueryDocuments,
                json!({ "collection": collection, "filter": filter }),
            )
            .await
    }

    async fn add(&self, collection: &str, fields: serde_json::Value) -> DaydeskResult<String> {
        self.provider
            .call_with_timeout(
                ProviderCommand::AddDocument,
                json!({ "collection": collection, "fields": fields }),
            )
            .await
    }

    async fn update(
        &self,
        collection: &str,
        document_id: &str,
        fields: serde_json::Value,
    ) -> DaydeskResult<()> {
        self.provider
            .call_with_timeout(
                ProviderCommand::UpdateDocument,
                json!({
                    "collection": collection,
                    "document_id": document_id,
                    "fields": fields,
                }),
            )
            .await
    }

    async fn delete(&self, collection: &str, document_id: &str) -> DaydeskResult<()> {
        self.provider
            .call_with_timeout(
                ProviderCommand::DeleteDocument,
                json!({ "collection": collection, "document_id": document_id }),
            )
            .await
    }
}

impl IdentityProvider for Remote {
    async fn register(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.provider
            .call_with_timeout(
                ProviderCommand::Register,
                json!({ "email": email, "password": password }),
            )
            .await
            .map_err(Self::to_auth_error)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.provider
            .call_with_timeout(
                ProviderCommand::SignIn,
                json!({ "email": email, "password": password }),
            )
            .await
            .map_err(Self::to_auth_error)
    }

    // No timeout wrapper: the user may sit in the browser consent
    // screen for as long as they like.
    async fn sign_in_federated(&self) -> Result<AuthUser, AuthError> {
        self.provider
            .call(ProviderCommand::SignInFederated, json!({}))
            .await
            .map_err(Self::to_auth_error)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider
            .call_with_timeout(ProviderCommand::SignOut, json!({}))
            .await
            .map_err(Self::to_auth_error)
    }

    async fn current_user(&self) -> Result<Option<AuthUser>, AuthError> {
        self.provider
            .call_with_timeout(ProviderCommand::CurrentUser, json!({}))
            .await
            .map_err(Self::to_auth_error)
    }
}
