//! Note records (`notes` collection).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Store-assigned document id.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub content: String,
    /// Color tag used by the UI when rendering the note.
    pub color: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new note.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub color: String,
}

impl NewNote {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        NewNote {
            title: title.into(),
            content: content.into(),
            color: color.into(),
        }
    }

    pub(crate) fn into_note(
        self,
        id: String,
        user_id: String,
        created_at: DateTime<Utc>,
    ) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            color: self.color,
            user_id,
            created_at,
        }
    }
}

/// Partial update: only supplied fields are written.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
