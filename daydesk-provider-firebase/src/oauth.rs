//! Browser-based Google OAuth flow for federated sign-in.
//!
//! Opens the consent URL in the user's browser, receives the redirect
//! on a localhost listener and exchanges the authorization code for a
//! Google id token. Flow outcomes map to the popup error codes the
//! client understands: a callback timeout means the user abandoned the
//! consent screen, a bind failure means nothing could listen for the
//! redirect, a state mismatch means the response belongs to some other
//! request.

use serde::Deserialize;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::timeout;

use crate::config::OAuthConfig;
use crate::identity::ApiError;

const REDIRECT_PORT: u16 = 8085;
const SCOPES: &str = "openid email profile";

/// How long the user gets to finish the consent screen.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

fn redirect_uri() -> String {
    format!("http://localhost:{REDIRECT_PORT}/callback")
}

/// Run the full flow and return a Google id token suitable for
/// `accounts:signInWithIdp`.
pub async fn obtain_google_id_token(oauth: &OAuthConfig) -> Result<String, ApiError> {
    let state = uuid::Uuid::new_v4().to_string();

    let listener = TcpListener::bind(format!("127.0.0.1:{REDIRECT_PORT}"))
        .await
        .map_err(|e| {
            ApiError::new(
                "auth/popup-blocked",
                format!("Could not listen on port {REDIRECT_PORT}: {e}"),
            )
        })?;

    let consent_url = format!(
        "https://accounts.google.com/o/oauth2/v2/auth\
        ?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
        oauth.client_id,
        urlencode(&redirect_uri()),
        urlencode(SCOPES),
        state,
    );

    if open::that(&consent_url).is_err() {
        eprintln!("Open this URL in your browser:\n  {consent_url}");
    }

    let code = match timeout(CALLBACK_TIMEOUT, wait_for_callback(&listener, &state)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(ApiError::new(
                "auth/popup-closed-by-user",
                "Sign-in was not completed in the browser",
            ));
        }
    };

    exchange_code(oauth, &code).await
}

/// Accept one connection on the listener and pull the authorization
/// code out of the callback request.
async fn wait_for_callback(listener: &TcpListener, expected_state: &str) -> Result<String, ApiError> {
    let (stream, _) = listener
        .accept()
        .await
        .map_err(|e| ApiError::new("auth/network-request-failed", e.to_string()))?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .map_err(|e| ApiError::new("auth/network-request-failed", e.to_string()))?;

    // "GET /callback?code=...&state=... HTTP/1.1"
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| ApiError::new("auth/network-request-failed", "Invalid callback request"))?;
    let url = url::Url::parse(&format!("http://localhost{url_part}"))
        .map_err(|e| ApiError::new("auth/network-request-failed", e.to_string()))?;

    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.to_string())
    };

    let outcome = if query("error").is_some() {
        Err(ApiError::new(
            "auth/popup-closed-by-user",
            "Consent was denied in the browser",
        ))
    } else if query("state").as_deref() != Some(expected_state) {
        Err(ApiError::new(
            "auth/cancelled-popup-request",
            "OAuth state mismatch",
        ))
    } else {
        query("code").ok_or_else(|| {
            ApiError::new("auth/network-request-failed", "No code in callback")
        })
    };

    let body = match &outcome {
        Ok(_) => "<h1>Signed in.</h1><p>You can close this window and return to the terminal.</p>",
        Err(_) => "<h1>Sign-in failed.</h1><p>Return to the terminal for details.</p>",
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n<html><body>{body}</body></html>"
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.flush().await;

    outcome
}

#[derive(Debug, Deserialize)]
struct CodeExchangeResponse {
    id_token: String,
}

async fn exchange_code(oauth: &OAuthConfig, code: &str) -> Result<String, ApiError> {
    let response = reqwest::Client::new()
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("code", code),
            ("client_id", &oauth.client_id),
            ("client_secret", &oauth.client_secret),
            ("redirect_uri", &redirect_uri()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| ApiError::new("auth/network-request-failed", e.to_string()))?;

    if !response.status().is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(ApiError::new(
            "auth/network-request-failed",
            format!("Code exchange failed: {detail}"),
        ));
    }

    response
        .json::<CodeExchangeResponse>()
        .await
        .map(|r| r.id_token)
        .map_err(|e| ApiError::new("auth/network-request-failed", e.to_string()))
}

fn urlencode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
