//! Core types and client logic for the daydesk ecosystem.
//!
//! This crate provides everything the application surfaces share:
//! - record models (`Task`, `Note`, `CalendarEvent`) and their
//!   new/patch forms
//! - the `data` module: CRUD over the external document store
//! - the `auth` module: identity seam and the observable auth state
//!   store
//! - the `guard` module: navigation-time route checks
//! - the `protocol`/`provider`/`remote` modules: JSON protocol to
//!   provider binaries

pub mod auth;
pub mod calendar_event;
pub mod data;
pub mod date_range;
pub mod error;
pub mod guard;
pub mod logger;
pub mod note;
pub mod protocol;
pub mod provider;
pub mod remote;
pub mod store;
pub mod task;

pub use auth::{AuthStore, AuthUser};
pub use calendar_event::{CalendarEvent, CalendarEventPatch, NewCalendarEvent, Recurrence, RecurrenceRule};
pub use date_range::DateRange;
pub use error::{AuthCode, AuthError, DaydeskError, DaydeskResult};
pub use note::{NewNote, Note, NotePatch};
pub use remote::Remote;
pub use task::{NewTask, Priority, Task, TaskPatch};
