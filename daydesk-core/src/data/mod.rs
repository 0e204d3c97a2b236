//! Data access layer: stateless CRUD over the document store.
//!
//! Four operations per record kind. Failure policy is asymmetric by
//! design: reads log and return an empty sequence so the UI can render
//! an empty state, writes log and propagate so the caller can surface
//! the failure instead of silently losing user intent.

pub mod events;
pub mod notes;
pub mod tasks;

pub use events::{add_calendar_event, delete_calendar_event, get_calendar_events, update_calendar_event};
pub use notes::{add_note, delete_note, get_notes, update_note};
pub use tasks::{add_task, delete_task, get_tasks, update_task};
