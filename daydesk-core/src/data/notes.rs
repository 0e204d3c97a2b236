//! Note CRUD operations.

use chrono::Utc;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::{DaydeskError, DaydeskResult};
use crate::logger;
use crate::note::{NewNote, Note, NotePatch};
use crate::store::collections::NOTES;
use crate::store::{Document, DocumentStore, QueryFilter};

/// All notes owned by `user`, newest first. Fail-soft on store errors.
pub async fn get_notes<S: DocumentStore>(store: &S, user: &AuthUser) -> Vec<Note> {
    let filter = QueryFilter::for_user(&user.uid);

    match store.query(NOTES, &filter).await {
        Ok(docs) => docs.into_iter().filter_map(note_from_document).collect(),
        Err(err) => {
            logger::error("Error getting notes", Some(&err));
            Vec::new()
        }
    }
}

fn note_from_document(doc: Document) -> Option<Note> {
    match serde_json::from_value::<Note>(doc.fields) {
        Ok(mut note) => {
            note.id = doc.id;
            Some(note)
        }
        Err(err) => {
            logger::warn(&format!("Skipping malformed note document {}: {err}", doc.id));
            None
        }
    }
}

/// Write a new note owned by `user`.
pub async fn add_note<S: DocumentStore>(
    store: &S,
    user: &AuthUser,
    note: NewNote,
) -> DaydeskResult<Note> {
    let created_at = Utc::now();

    let mut fields = serde_json::to_value(&note)
        .map_err(|e| DaydeskError::Serialization(e.to_string()))?;
    if let Some(obj) = fields.as_object_mut() {
        obj.insert("userId".to_string(), json!(user.uid));
        obj.insert("createdAt".to_string(), json!(created_at));
    }

    match store.add(NOTES, fields).await {
        Ok(id) => Ok(note.into_note(id, user.uid.clone(), created_at)),
        Err(err) => {
            logger::error("Error adding note", Some(&err));
            Err(err)
        }
    }
}

/// Write only the supplied fields onto an existing note.
pub async fn update_note<S: DocumentStore>(
    store: &S,
    note_id: &str,
    patch: &NotePatch,
) -> DaydeskResult<bool> {
    let fields = serde_json::to_value(patch)
        .map_err(|e| DaydeskError::Serialization(e.to_string()))?;

    match store.update(NOTES, note_id, fields).await {
        Ok(()) => Ok(true),
        Err(err) => {
            logger::error("Error updating note", Some(&err));
            Err(err)
        }
    }
}

/// Remove a note by id.
pub async fn delete_note<S: DocumentStore>(store: &S, note_id: &str) -> DaydeskResult<bool> {
    match store.delete(NOTES, note_id).await {
        Ok(()) => Ok(true),
        Err(err) => {
            logger::error("Error deleting note", Some(&err));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::MemoryStore;

    fn user() -> AuthUser {
        AuthUser {
            uid: "user-1".to_string(),
            email: None,
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_note_round_trip() {
        let store = MemoryStore::new();
        let me = user();

        let added = add_note(&store, &me, NewNote::new("Ideas", "ship it", "yellow"))
            .await
            .unwrap();

        let notes = get_notes(&store, &me).await;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, added.id);
        assert_eq!(notes[0].color, "yellow");
        assert_eq!(notes[0].user_id, "user-1");
    }

    #[tokio::test]
    async fn test_get_notes_fails_soft() {
        let store = MemoryStore::new();
        store.fail_next_calls();
        assert!(get_notes(&store, &user()).await.is_empty());
    }

    #[tokio::test]
    async fn test_note_writes_propagate_failures() {
        let store = MemoryStore::new();
        let added = add_note(&store, &user(), NewNote::new("a", "b", "red"))
            .await
            .unwrap();

        store.fail_next_calls();
        assert!(update_note(&store, &added.id, &NotePatch::default()).await.is_err());
        assert!(delete_note(&store, &added.id).await.is_err());
    }
}
