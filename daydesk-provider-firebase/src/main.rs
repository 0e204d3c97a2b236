//! daydesk-provider-firebase - Firebase backend provider for daydesk
//!
//! This binary implements the daydesk provider protocol, communicating
//! with daydesk clients via JSON over stdin/stdout.
//!
//! The provider manages its own configuration and session:
//!   ~/.config/daydesk/providers/firebase/config.toml
//!   ~/.config/daydesk/providers/firebase/session.toml

mod config;
mod convert;
mod firestore;
mod identity;
mod oauth;
mod session;

use std::io::{self, BufRead, Write};

use serde::Deserialize;
use serde_json::Value;

use daydesk_core::auth::AuthUser;
use daydesk_core::protocol::{Command, Request, Response};
use daydesk_core::store::QueryFilter;

use crate::config::FirebaseConfig;
use crate::identity::ApiError;
use crate::session::Session;

#[tokio::main]
async fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                break;
            }
        };

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = Response::error(&format!("Failed to parse request: {}", e));
                writeln!(stdout, "{}", response).unwrap();
                stdout.flush().unwrap();
                continue;
            }
        };

        let response = handle_request(request).await;

        writeln!(stdout, "{}", response).unwrap();
        stdout.flush().unwrap();
    }
}

async fn handle_request(request: Request) -> String {
    match request.command {
        Command::Register => handle_register(&request.params).await,
        Command::SignIn => handle_sign_in(&request.params).await,
        Command::SignInFederated => handle_sign_in_federated().await,
        Command::SignOut => handle_sign_out(),
        Command::CurrentUser => handle_current_user(),
        Command::QueryDocuments => handle_query(&request.params).await,
        Command::AddDocument => handle_add(&request.params).await,
        Command::UpdateDocument => handle_update(&request.params).await,
        Command::DeleteDocument => handle_delete(&request.params).await,
    }
}

fn load_config() -> Result<FirebaseConfig, String> {
    FirebaseConfig::load().map_err(|e| format!("{:#}", e))
}

fn user_from_session(session: &Session) -> AuthUser {
    AuthUser {
        uid: session.local_id.clone(),
        email: session.email.clone(),
        display_name: session.display_name.clone(),
    }
}

fn auth_failure(err: &ApiError) -> String {
    Response::auth_error(&err.code, &err.message)
}

fn persist_and_respond(session: Session) -> String {
    if let Err(e) = session.save() {
        return Response::error(&format!("{:#}", e));
    }
    Response::success(user_from_session(&session))
}

#[derive(Debug, Deserialize)]
struct CredentialParams {
    email: String,
    password: String,
}

async fn handle_register(params: &Value) -> String {
    let params: CredentialParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => return Response::error(&e),
    };

    match identity::sign_up(&config, &params.email, &params.password).await {
        Ok(session) => persist_and_respond(session),
        Err(e) => auth_failure(&e),
    }
}

async fn handle_sign_in(params: &Value) -> String {
    let params: CredentialParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => return Response::error(&e),
    };

    match identity::sign_in(&config, &params.email, &params.password).await {
        Ok(session) => persist_and_respond(session),
        Err(e) => auth_failure(&e),
    }
}

async fn handle_sign_in_federated() -> String {
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => return Response::error(&e),
    };
    let Some(oauth_config) = config.oauth.clone() else {
        return Response::error(
            "Federated sign-in needs an [oauth] section (client_id, client_secret) \
            in the provider config",
        );
    };

    let google_id_token = match oauth::obtain_google_id_token(&oauth_config).await {
        Ok(token) => token,
        Err(e) => return auth_failure(&e),
    };

    match identity::sign_in_with_google(&config, &google_id_token).await {
        Ok(session) => persist_and_respond(session),
        Err(e) => auth_failure(&e),
    }
}

fn handle_sign_out() -> String {
    match Session::clear() {
        Ok(()) => Response::success(()),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}

fn handle_current_user() -> String {
    match Session::load() {
        Ok(session) => Response::success(session.as_ref().map(user_from_session)),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}

/// Config plus a session with a fresh id token, or the error response
/// to hand straight back.
async fn store_context() -> Result<(FirebaseConfig, Session), String> {
    let config = load_config()?;
    match identity::valid_session(&config).await {
        Ok(Some(session)) => Ok((config, session)),
        Ok(None) => Err("Not signed in".to_string()),
        Err(e) => Err(format!("{:#}", e)),
    }
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    collection: String,
    filter: QueryFilter,
}

async fn handle_query(params: &Value) -> String {
    let params: QueryParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };
    let (config, session) = match store_context().await {
        Ok(ctx) => ctx,
        Err(e) => return Response::error(&e),
    };

    match firestore::query(&config, &session.id_token, &params.collection, &params.filter).await {
        Ok(documents) => Response::success(documents),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}

#[derive(Debug, Deserialize)]
struct AddParams {
    collection: String,
    fields: Value,
}

async fn handle_add(params: &Value) -> String {
    let params: AddParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };
    let (config, session) = match store_context().await {
        Ok(ctx) => ctx,
        Err(e) => return Response::error(&e),
    };

    match firestore::add(&config, &session.id_token, &params.collection, &params.fields).await {
        Ok(id) => Response::success(id),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}

#[derive(Debug, Deserialize)]
struct UpdateParams {
    collection: String,
    document_id: String,
    fields: Value,
}

async fn handle_update(params: &Value) -> String {
    let params: UpdateParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };
    let (config, session) = match store_context().await {
        Ok(ctx) => ctx,
        Err(e) => return Response::error(&e),
    };

    match firestore::update(
        &config,
        &session.id_token,
        &params.collection,
        &params.document_id,
        &params.fields,
    )
    .await
    {
        Ok(()) => Response::success(()),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    collection: String,
    document_id: String,
}

async fn handle_delete(params: &Value) -> String {
    let params: DeleteParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };
    let (config, session) = match store_context().await {
        Ok(ctx) => ctx,
        Err(e) => return Response::error(&e),
    };

    match firestore::delete(
        &config,
        &session.id_token,
        &params.collection,
        &params.document_id,
    )
    .await
    {
        Ok(()) => Response::success(()),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}
