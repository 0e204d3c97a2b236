//! Calendar event CRUD operations.

use chrono::Utc;
use serde_json::json;

use crate::auth::AuthUser;
use crate::calendar_event::{CalendarEvent, CalendarEventPatch, NewCalendarEvent, RecurrenceRule};
use crate::date_range::DateRange;
use crate::error::{DaydeskError, DaydeskResult};
use crate::logger;
use crate::store::collections::EVENTS;
use crate::store::{Document, DocumentStore, QueryFilter};

/// All events owned by `user`, ordered by start time ascending. A
/// supplied range restricts results to events starting within it
/// (inclusive), except recurring masters whose rule is still active:
/// their instances can fall inside the window even when the master's
/// start predates it. Fail-soft on store errors.
///
/// Recurring events are returned as their master records; expanding a
/// recurrence descriptor into instances is the caller's concern. The
/// range is applied here rather than in the store query so those
/// masters are never dropped.
pub async fn get_calendar_events<S: DocumentStore>(
    store: &S,
    user: &AuthUser,
    range: Option<&DateRange>,
) -> Vec<CalendarEvent> {
    let filter = QueryFilter::for_user(&user.uid).order_asc("date");

    match store.query(EVENTS, &filter).await {
        Ok(docs) => docs
            .into_iter()
            .filter_map(event_from_document)
            .filter(|event| match range {
                Some(range) => range.contains(event.start) || recurs_into(event, range),
                None => true,
            })
            .collect(),
        Err(err) => {
            logger::error("Error getting calendar events", Some(&err));
            Vec::new()
        }
    }
}

/// True if instances of a recurring master can fall inside the range:
/// the master starts no later than the window's end and its rule has
/// not ended before the window's start.
fn recurs_into(event: &CalendarEvent, range: &DateRange) -> bool {
    let Some(recurrence) = &event.recurrence else {
        return false;
    };
    if recurrence.rule == RecurrenceRule::None {
        return false;
    }

    let starts_by_window_end = range.to.is_none_or(|to| event.start <= to);
    let active_at_window_start = match (recurrence.until, range.from) {
        (Some(until), Some(from)) => until >= from,
        _ => true,
    };
    starts_by_window_end && active_at_window_start
}

fn event_from_document(doc: Document) -> Option<CalendarEvent> {
    match serde_json::from_value::<CalendarEvent>(doc.fields) {
        Ok(mut event) => {
            event.id = doc.id;
            Some(event)
        }
        Err(err) => {
            logger::warn(&format!("Skipping malformed event document {}: {err}", doc.id));
            None
        }
    }
}

/// Write a new calendar event owned by `user`.
pub async fn add_calendar_event<S: DocumentStore>(
    store: &S,
    user: &AuthUser,
    event: NewCalendarEvent,
) -> DaydeskResult<CalendarEvent> {
    let created_at = Utc::now();

    let mut fields = serde_json::to_value(&event)
        .map_err(|e| DaydeskError::Serialization(e.to_string()))?;
    if let Some(obj) = fields.as_object_mut() {
        obj.insert("userId".to_string(), json!(user.uid));
        obj.insert("createdAt".to_string(), json!(created_at));
    }

    match store.add(EVENTS, fields).await {
        Ok(id) => Ok(event.into_event(id, user.uid.clone(), created_at)),
        Err(err) => {
            logger::error("Error adding calendar event", Some(&err));
            Err(err)
        }
    }
}

/// Write only the supplied fields onto an existing event.
pub async fn update_calendar_event<S: DocumentStore>(
    store: &S,
    event_id: &str,
    patch: &CalendarEventPatch,
) -> DaydeskResult<bool> {
    let fields = serde_json::to_value(patch)
        .map_err(|e| DaydeskError::Serialization(e.to_string()))?;

    match store.update(EVENTS, event_id, fields).await {
        Ok(()) => Ok(true),
        Err(err) => {
            logger::error("Error updating calendar event", Some(&err));
            Err(err)
        }
    }
}

/// Remove a calendar event by id.
pub async fn delete_calendar_event<S: DocumentStore>(
    store: &S,
    event_id: &str,
) -> DaydeskResult<bool> {
    match store.delete(EVENTS, event_id).await {
        Ok(()) => Ok(true),
        Err(err) => {
            logger::error("Error deleting calendar event", Some(&err));
            Err(err)
        }
    }
}
