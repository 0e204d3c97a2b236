use anyhow::Result;
use chrono::Duration;
use daydesk_core::data::{add_calendar_event, delete_calendar_event, get_calendar_events};
use daydesk_core::{DateRange, NewCalendarEvent};

use crate::render::Render;

pub async fn list(range: DateRange) -> Result<()> {
    let remote = super::remote();
    let user = super::require_user(&remote).await?;

    let events = get_calendar_events(&remote, &user, Some(&range)).await;

    if events.is_empty() {
        println!("No events in this window.");
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }

    Ok(())
}

pub async fn add(
    title: String,
    start: &str,
    end: Option<&str>,
    event_type: String,
    color: String,
    all_day: bool,
) -> Result<()> {
    let remote = super::remote();
    let user = super::require_user(&remote).await?;

    let start = super::parse_instant(start)?;
    let end = match end {
        Some(end) => super::parse_instant(end)?,
        None => start + Duration::hours(1),
    };
    if end < start {
        anyhow::bail!("End must not be before start.");
    }

    let event = NewCalendarEvent {
        title,
        description: None,
        start,
        end,
        color_key: color,
        event_type,
        is_all_day: all_day,
        recurrence: None,
    };

    let event = add_calendar_event(&remote, &user, event).await?;
    println!("{}", event.render());

    Ok(())
}

pub async fn rm(id: &str) -> Result<()> {
    let remote = super::remote();
    super::require_user(&remote).await?;

    delete_calendar_event(&remote, id).await?;
    println!("Event {id} deleted.");

    Ok(())
}
