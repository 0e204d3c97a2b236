//! Terminal rendering for daydesk records.
//!
//! Extension trait that adds colored one-line (or few-line) rendering
//! to daydesk-core types using owo_colors.

use daydesk_core::auth::AuthUser;
use daydesk_core::{CalendarEvent, Note, Priority, Task};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Priority {
    fn render(&self) -> String {
        match self {
            Priority::Low => self.as_str().green().to_string(),
            Priority::Medium => self.as_str().yellow().to_string(),
            Priority::High => self.as_str().red().to_string(),
        }
    }
}

impl Render for Task {
    fn render(&self) -> String {
        let marker = if self.completed {
            "✓".green().to_string()
        } else {
            "○".dimmed().to_string()
        };

        let mut line = format!("{} {} {}", marker, self.title, self.id.dimmed());

        if let Some(priority) = &self.priority {
            line.push_str(&format!(" [{}]", priority.render()));
        }
        if let Some(due) = &self.due_date {
            let due = format!("due {}", due.format("%Y-%m-%d"));
            line.push_str(&format!(" {}", due.dimmed()));
        }
        if let Some(category) = &self.category {
            line.push_str(&format!(" {}", format!("#{category}").cyan()));
        }

        line
    }
}

impl Render for Note {
    fn render(&self) -> String {
        format!(
            "{} {} {}\n   {}",
            "▪".color(note_color(&self.color)),
            self.title.bold(),
            self.id.dimmed(),
            self.content
        )
    }
}

/// Map stored color tags onto terminal colors; unknown tags stay
/// uncolored-ish by falling back to white.
fn note_color(tag: &str) -> owo_colors::AnsiColors {
    match tag {
        "red" => owo_colors::AnsiColors::Red,
        "green" => owo_colors::AnsiColors::Green,
        "blue" => owo_colors::AnsiColors::Blue,
        "yellow" => owo_colors::AnsiColors::Yellow,
        "purple" => owo_colors::AnsiColors::Magenta,
        _ => owo_colors::AnsiColors::White,
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let time = if self.is_all_day {
            format!("{} (all day)", self.start.format("%Y-%m-%d"))
        } else {
            format!(
                "{} - {}",
                self.start.format("%Y-%m-%d %H:%M"),
                self.end.format("%H:%M")
            )
        };

        let mut line = format!(
            "📅 {} {} {}",
            time.color(note_color(&self.color_key)),
            self.title,
            self.id.dimmed()
        );

        if self.recurrence.is_some() {
            line.push_str(&format!(" {}", "(recurring)".dimmed()));
        }

        line
    }
}

impl Render for AuthUser {
    fn render(&self) -> String {
        let identity = self
            .email
            .as_deref()
            .unwrap_or(&self.uid)
            .bold()
            .to_string();

        match &self.display_name {
            Some(name) => format!("{} ({})", identity, name),
            None => identity,
        }
    }
}
