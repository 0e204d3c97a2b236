//! Calendar event records (`events` collection).
//!
//! The start instant is stored under the wire name `date` and the end
//! under `endDate`; the in-memory names are `start`/`end`. Recurrence
//! is a stored descriptor only — expansion into instances is the UI's
//! concern, not this layer's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known event type tags. The field itself is free-form text, so
/// providers and future UIs can introduce new tags without a schema
/// change.
pub mod event_type {
    pub const TASK: &str = "TASK";
    pub const ROUTINE: &str = "ROUTINE";
    pub const APPOINTMENT: &str = "APPOINTMENT";
    pub const EVENT: &str = "EVENT";
    pub const ALL_DAY: &str = "ALL_DAY";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Store-assigned document id.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Start date and time.
    #[serde(rename = "date")]
    pub start: DateTime<Utc>,
    /// End date and time.
    #[serde(rename = "endDate")]
    pub end: DateTime<Utc>,
    /// Specific color override (e.g. "blue", "green").
    pub color_key: String,
    /// Free-form event type tag, see [`event_type`].
    pub event_type: String,
    pub is_all_day: bool,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new calendar event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCalendarEvent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "date")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end: DateTime<Utc>,
    pub color_key: String,
    pub event_type: String,
    pub is_all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl NewCalendarEvent {
    pub(crate) fn into_event(
        self,
        id: String,
        user_id: String,
        created_at: DateTime<Utc>,
    ) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            color_key: self.color_key,
            event_type: self.event_type,
            is_all_day: self.is_all_day,
            recurrence: self.recurrence,
            user_id,
            created_at,
        }
    }
}

/// Partial update: only supplied fields are written. A supplied
/// `recurrence` replaces the whole descriptor.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "date", skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

/// Recurrence descriptor for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub rule: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Weekday tags for weekly rules (e.g. "MON", "WED").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<String>>,
    /// End of recurrence; None means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurrenceRule {
    None,
    Daily,
    Weekly,
}
