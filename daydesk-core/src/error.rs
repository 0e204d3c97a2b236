//! Error types for the daydesk ecosystem.

use thiserror::Error;

/// Errors that can occur in daydesk operations.
#[derive(Error, Debug)]
pub enum DaydeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for daydesk operations.
pub type DaydeskResult<T> = Result<T, DaydeskError>;

/// An identity-provider failure: a discriminated code plus the
/// provider's human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} [{}]", code.as_code())]
pub struct AuthError {
    pub code: AuthCode,
    pub message: String,
}

impl AuthError {
    pub fn new(code: AuthCode, message: impl Into<String>) -> Self {
        AuthError {
            code,
            message: message.into(),
        }
    }
}

/// Machine-readable identity-provider error codes.
///
/// Wire form is the provider's code string, with or without the
/// `auth/` prefix (e.g. `auth/email-already-in-use`). Codes the
/// provider may emit that we don't map keep their raw string in
/// `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCode {
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    UserNotFound,
    WrongPassword,
    UserDisabled,
    TooManyRequests,
    PopupClosedByUser,
    PopupBlocked,
    CancelledPopupRequest,
    NetworkRequestFailed,
    Other(String),
}

impl AuthCode {
    pub fn from_code(code: &str) -> Self {
        match code.strip_prefix("auth/").unwrap_or(code) {
            "email-already-in-use" => AuthCode::EmailAlreadyInUse,
            "invalid-email" => AuthCode::InvalidEmail,
            "weak-password" => AuthCode::WeakPassword,
            "user-not-found" => AuthCode::UserNotFound,
            "wrong-password" => AuthCode::WrongPassword,
            "user-disabled" => AuthCode::UserDisabled,
            "too-many-requests" => AuthCode::TooManyRequests,
            "popup-closed-by-user" => AuthCode::PopupClosedByUser,
            "popup-blocked" => AuthCode::PopupBlocked,
            "cancelled-popup-request" => AuthCode::CancelledPopupRequest,
            "network-request-failed" => AuthCode::NetworkRequestFailed,
            other => AuthCode::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            AuthCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthCode::InvalidEmail => "auth/invalid-email",
            AuthCode::WeakPassword => "auth/weak-password",
            AuthCode::UserNotFound => "auth/user-not-found",
            AuthCode::WrongPassword => "auth/wrong-password",
            AuthCode::UserDisabled => "auth/user-disabled",
            AuthCode::TooManyRequests => "auth/too-many-requests",
            AuthCode::PopupClosedByUser => "auth/popup-closed-by-user",
            AuthCode::PopupBlocked => "auth/popup-blocked",
            AuthCode::CancelledPopupRequest => "auth/cancelled-popup-request",
            AuthCode::NetworkRequestFailed => "auth/network-request-failed",
            AuthCode::Other(code) => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_code_parses_with_and_without_prefix() {
        assert_eq!(
            AuthCode::from_code("auth/email-already-in-use"),
            AuthCode::EmailAlreadyInUse
        );
        assert_eq!(
            AuthCode::from_code("email-already-in-use"),
            AuthCode::EmailAlreadyInUse
        );
        assert_eq!(
            AuthCode::from_code("auth/wrong-password"),
            AuthCode::WrongPassword
        );
    }

    #[test]
    fn test_unknown_auth_code_keeps_raw_string() {
        let code = AuthCode::from_code("auth/requires-recent-login");
        assert_eq!(
            code,
            AuthCode::Other("requires-recent-login".to_string())
        );
        assert_eq!(code.as_code(), "requires-recent-login");
    }
}
