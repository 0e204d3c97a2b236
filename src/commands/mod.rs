pub mod auth;
pub mod event;
pub mod note;
pub mod task;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use daydesk_core::Remote;
use daydesk_core::auth::{AuthUser, IdentityProvider};

/// Provider binary the CLI talks to (`daydesk-provider-firebase`).
pub const PROVIDER_NAME: &str = "firebase";

pub fn remote() -> Remote {
    Remote::new(PROVIDER_NAME)
}

/// The signed-in identity, or a hint to sign in first.
pub async fn require_user(remote: &Remote) -> Result<AuthUser> {
    let user = remote.current_user().await?;

    user.ok_or_else(|| {
        anyhow::anyhow!(
            "Not logged in.\n\n\
            Sign in with:\n  \
            daydesk auth login <email>\n\n\
            Or create an account:\n  \
            daydesk auth register <email>"
        )
    })
}

/// Parse a date/time argument. A bare date means start of day UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    anyhow::bail!("Invalid date/time '{s}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM")
}
