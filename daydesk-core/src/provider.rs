//! Provider subprocess transport.
//!
//! This module handles communication with external provider binaries
//! (e.g. `daydesk-provider-firebase`) using JSON over stdin/stdout.
//!
//! The protocol is language-agnostic: any executable that speaks the
//! JSON protocol can be a provider. Providers manage their own
//! credentials, sessions and tokens; the client never sees them.

use crate::error::{AuthCode, AuthError, DaydeskError, DaydeskResult};
use crate::protocol::{Command as ProviderCommand, Request, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    fn binary_path(&self) -> DaydeskResult<std::path::PathBuf> {
        let binary_name = format!("daydesk-provider-{}", self.0);
        let binary_path = which::which(&binary_name).map_err(|_| {
            DaydeskError::ProviderNotInstalled(format!(
                "Provider '{}' not found. Install it with:\n  cargo install {}",
                self.0, binary_name
            ))
        })?;
        Ok(binary_path)
    }

    /// Call a provider command, bounded by the provider timeout.
    ///
    /// The timeout covers every non-interactive command; federated
    /// sign-in goes through [`call`](Provider::call) directly, since
    /// the user may keep the browser open for a while.
    pub async fn call_with_timeout<R: DeserializeOwned>(
        &self,
        command: ProviderCommand,
        params: serde_json::Value,
    ) -> DaydeskResult<R> {
        timeout(PROVIDER_TIMEOUT, self.call(command, params))
            .await
            .map_err(|_| DaydeskError::ProviderTimeout(PROVIDER_TIMEOUT.as_secs()))?
    }

    pub async fn call<R: DeserializeOwned>(
        &self,
        command: ProviderCommand,
        params: serde_json::Value,
    ) -> DaydeskResult<R> {
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| DaydeskError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;

        let mut child = Command::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| {
                DaydeskError::Provider(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        // Write request to stdin (unwrap safe: we piped stdin above)
        let mut stdin = child.stdin.take().unwrap();
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        // Wait for process and collect output
        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(DaydeskError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.is_empty() {
            return Err(DaydeskError::Provider(
                "Provider returned no response".into(),
            ));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| DaydeskError::Provider(format!("Failed to parse response: {}", e)))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => match error.code {
                Some(code) => Err(DaydeskError::Auth(AuthError::new(
                    AuthCode::from_code(&code),
                    error.message,
                ))),
                None => Err(DaydeskError::Provider(error.message)),
            },
        }
    }
}
