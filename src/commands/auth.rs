use anyhow::Result;
use daydesk_core::{AuthStore, Remote};
use daydesk_core::guard::Navigator;

use crate::render::Render;

/// The auth store navigates to an app path after sign-in/sign-out; in
/// the terminal there is no page to go to, so just trace it.
struct TraceNavigator;

impl Navigator for TraceNavigator {
    fn goto(&self, path: &str) {
        tracing::debug!(path, "navigation requested");
    }
}

fn auth_store() -> AuthStore<Remote> {
    AuthStore::new(super::remote(), Box::new(TraceNavigator))
}

fn prompt_password() -> Result<String> {
    Ok(rpassword::prompt_password("Password: ")?)
}

pub async fn register(email: &str) -> Result<()> {
    let password = prompt_password()?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match.");
    }

    let store = auth_store();
    match store.register(email, &password).await {
        Some(user) => {
            println!("Registered and signed in as {}", user.render());
            Ok(())
        }
        None => anyhow::bail!(failure_message(&store)),
    }
}

pub async fn login(email: &str) -> Result<()> {
    let password = prompt_password()?;

    let store = auth_store();
    match store.login(email, &password).await {
        Some(user) => {
            println!("Signed in as {}", user.render());
            Ok(())
        }
        None => anyhow::bail!(failure_message(&store)),
    }
}

pub async fn google() -> Result<()> {
    println!("Opening Google sign-in in your browser...");

    let store = auth_store();
    match store.sign_in_federated().await {
        Some(user) => {
            println!("Signed in as {}", user.render());
            Ok(())
        }
        None => anyhow::bail!(failure_message(&store)),
    }
}

pub async fn logout() -> Result<()> {
    let store = auth_store();
    store.sign_out().await;

    match store.last_error() {
        Some(message) => anyhow::bail!(message),
        None => {
            println!("Signed out.");
            Ok(())
        }
    }
}

pub async fn whoami() -> Result<()> {
    let store = auth_store();
    store.initialize().await;

    match store.current_user() {
        Some(user) => println!("{}", user.render()),
        None => println!("Not logged in."),
    }

    Ok(())
}

fn failure_message(store: &AuthStore<Remote>) -> String {
    store
        .last_error()
        .unwrap_or_else(|| "Something went wrong. Please try again.".to_string())
}
