//! Provider configuration.
//!
//! The Firebase project's web API key and project id live at:
//!   ~/.config/daydesk/providers/firebase/config.toml
//!
//! The optional `[oauth]` section holds a Google OAuth client for the
//! federated sign-in flow.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const PROVIDER_NAME: &str = "firebase";

pub fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("daydesk")
        .join("providers")
        .join(PROVIDER_NAME))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project.
    pub api_key: String,
    /// Firebase/GCP project id, used in Firestore document paths.
    pub project_id: String,
    #[serde(default)]
    pub oauth: Option<OAuthConfig>,
}

/// Google OAuth client used for federated sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl FirebaseConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            anyhow::bail!(
                "Firebase provider is not configured.\n\n\
                Create {} with:\n\n\
                api_key = \"<web API key>\"\n\
                project_id = \"<project id>\"\n\n\
                # Optional, for `daydesk auth google`:\n\
                # [oauth]\n\
                # client_id = \"...\"\n\
                # client_secret = \"...\"",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: FirebaseConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }
}
