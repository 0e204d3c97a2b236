//! Provider protocol types.
//!
//! Defines the JSON protocol used for communication between daydesk
//! clients and provider binaries over stdin/stdout.

use serde::{Deserialize, Serialize};

/// Commands that providers must implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    // Identity
    Register,
    SignIn,
    SignInFederated,
    SignOut,
    CurrentUser,
    // Document store
    QueryDocuments,
    AddDocument,
    UpdateDocument,
    DeleteDocument,
}

/// Request sent from the client to the provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A provider-side failure. Identity failures carry the discriminated
/// auth code (e.g. `auth/email-already-in-use`); store failures carry
/// only a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderFault {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

/// Response sent from the provider to the client.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: ProviderFault },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data }).unwrap()
    }
}

impl Response<()> {
    pub fn error(message: &str) -> String {
        serde_json::to_string(&Response::<()>::Error {
            error: ProviderFault {
                code: None,
                message: message.to_string(),
            },
        })
        .unwrap()
    }

    pub fn auth_error(code: &str, message: &str) -> String {
        serde_json::to_string(&Response::<()>::Error {
            error: ProviderFault {
                code: Some(code.to_string()),
                message: message.to_string(),
            },
        })
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_names_are_snake_case() {
        let json = serde_json::to_string(&Command::SignInFederated).unwrap();
        assert_eq!(json, "\"sign_in_federated\"");
        let json = serde_json::to_string(&Command::QueryDocuments).unwrap();
        assert_eq!(json, "\"query_documents\"");
    }

    #[test]
    fn test_auth_error_round_trips_with_code() {
        let raw = Response::auth_error("auth/weak-password", "WEAK_PASSWORD");
        let parsed: Response<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        match parsed {
            Response::Error { error } => {
                assert_eq!(error.code.as_deref(), Some("auth/weak-password"));
                assert_eq!(error.message, "WEAK_PASSWORD");
            }
            Response::Success { .. } => panic!("expected error"),
        }
    }

    #[test]
    fn test_store_error_has_no_code() {
        let raw = Response::error("PERMISSION_DENIED");
        let parsed: Response<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        match parsed {
            Response::Error { error } => assert!(error.code.is_none()),
            Response::Success { .. } => panic!("expected error"),
        }
    }
}
