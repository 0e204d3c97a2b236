//! Firebase Auth REST calls (Identity Toolkit + Secure Token).

use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::config::FirebaseConfig;
use crate::session::Session;

const IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_BASE: &str = "https://securetoken.googleapis.com/v1";

/// An identity failure: the discriminated `auth/...` code plus the
/// backend's message.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        ApiError {
            code: code.to_string(),
            message: message.into(),
        }
    }

    fn network(err: &reqwest::Error) -> Self {
        ApiError::new("auth/network-request-failed", err.to_string())
    }
}

/// Map an Identity Toolkit error message (e.g. `EMAIL_EXISTS`) to the
/// `auth/...` code the client-side mapping understands. Messages can
/// carry a trailing explanation (`WEAK_PASSWORD : Password should
/// be...`), so match on the leading token.
fn code_for_backend_message(message: &str) -> String {
    let token = message.split(&[' ', ':'][..]).next().unwrap_or(message);
    let code = match token {
        "EMAIL_EXISTS" => "email-already-in-use",
        "INVALID_EMAIL" | "MISSING_EMAIL" => "invalid-email",
        "WEAK_PASSWORD" | "MISSING_PASSWORD" => "weak-password",
        "EMAIL_NOT_FOUND" => "user-not-found",
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => "wrong-password",
        "USER_DISABLED" => "user-disabled",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "too-many-requests",
        other => return format!("auth/{}", other.to_lowercase().replace('_', "-")),
    };
    format!("auth/{code}")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    /// Lifetime of the id token in seconds, as a decimal string.
    expires_in: String,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let ttl = self.expires_in.parse::<i64>().unwrap_or(3600);
        Session {
            local_id: self.local_id,
            email: self.email,
            display_name: self.display_name.filter(|n| !n.is_empty()),
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at: Utc::now() + Duration::seconds(ttl),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BackendError {
    error: BackendErrorBody,
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: String,
}

async fn post_identity(
    config: &FirebaseConfig,
    endpoint: &str,
    body: serde_json::Value,
) -> Result<TokenResponse, ApiError> {
    let url = format!(
        "{IDENTITY_BASE}/accounts:{endpoint}?key={}",
        config.api_key
    );

    let response = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::network(&e))?;

    if !response.status().is_success() {
        let message = response
            .json::<BackendError>()
            .await
            .map(|e| e.error.message)
            .unwrap_or_else(|_| "UNKNOWN_ERROR".to_string());
        return Err(ApiError {
            code: code_for_backend_message(&message),
            message,
        });
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| ApiError::network(&e))
}

/// Create an account with email and password (`accounts:signUp`).
pub async fn sign_up(
    config: &FirebaseConfig,
    email: &str,
    password: &str,
) -> Result<Session, ApiError> {
    let response = post_identity(
        config,
        "signUp",
        json!({ "email": email, "password": password, "returnSecureToken": true }),
    )
    .await?;
    Ok(response.into_session())
}

/// Sign in with email and password (`accounts:signInWithPassword`).
pub async fn sign_in(
    config: &FirebaseConfig,
    email: &str,
    password: &str,
) -> Result<Session, ApiError> {
    let response = post_identity(
        config,
        "signInWithPassword",
        json!({ "email": email, "password": password, "returnSecureToken": true }),
    )
    .await?;
    Ok(response.into_session())
}

/// Exchange a Google id token for a Firebase session
/// (`accounts:signInWithIdp`).
pub async fn sign_in_with_google(
    config: &FirebaseConfig,
    google_id_token: &str,
) -> Result<Session, ApiError> {
    let response = post_identity(
        config,
        "signInWithIdp",
        json!({
            "postBody": format!("id_token={google_id_token}&providerId=google.com"),
            "requestUri": "http://localhost",
            "returnSecureToken": true,
            "returnIdpCredential": true,
        }),
    )
    .await?;
    Ok(response.into_session())
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
    expires_in: String,
}

/// Refresh an expired id token against the Secure Token service.
pub async fn refresh_session(
    config: &FirebaseConfig,
    session: &Session,
) -> Result<Session, ApiError> {
    let url = format!("{SECURE_TOKEN_BASE}/token?key={}", config.api_key);

    let response = reqwest::Client::new()
        .post(&url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", &session.refresh_token),
        ])
        .send()
        .await
        .map_err(|e| ApiError::network(&e))?;

    if !response.status().is_success() {
        let message = response
            .json::<BackendError>()
            .await
            .map(|e| e.error.message)
            .unwrap_or_else(|_| "TOKEN_REFRESH_FAILED".to_string());
        return Err(ApiError {
            code: code_for_backend_message(&message),
            message,
        });
    }

    let refreshed = response
        .json::<RefreshResponse>()
        .await
        .map_err(|e| ApiError::network(&e))?;

    let ttl = refreshed.expires_in.parse::<i64>().unwrap_or(3600);
    Ok(Session {
        local_id: refreshed.user_id,
        email: session.email.clone(),
        display_name: session.display_name.clone(),
        id_token: refreshed.id_token,
        refresh_token: refreshed.refresh_token,
        expires_at: Utc::now() + Duration::seconds(ttl),
    })
}

/// The stored session with a currently-valid id token, refreshing and
/// re-persisting it if needed. None when nobody is signed in.
pub async fn valid_session(config: &FirebaseConfig) -> anyhow::Result<Option<Session>> {
    let Some(session) = Session::load()? else {
        return Ok(None);
    };

    if !session.needs_refresh() {
        return Ok(Some(session));
    }

    let refreshed = refresh_session(config, &session)
        .await
        .map_err(|e| anyhow::anyhow!("{} [{}]", e.message, e.code))?;
    refreshed.save()?;
    Ok(Some(refreshed))
}
