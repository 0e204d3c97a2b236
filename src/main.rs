mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use daydesk_core::date_range::DateRange;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daydesk")]
#[command(about = "Manage your daydesk tasks, notes and calendar from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account and session management
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Notes
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Calendar events
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Create an account with email and password
    Register { email: String },
    /// Sign in with email and password
    Login { email: String },
    /// Sign in with Google in the browser
    Google,
    /// End the current session
    Logout,
    /// Show who is signed in
    Whoami,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List your tasks, newest first
    List,
    Add {
        title: String,

        /// Due date (YYYY-MM-DD or YYYY-MM-DDTHH:MM)
        #[arg(short, long)]
        due: Option<String>,

        /// Priority: low, medium or high
        #[arg(short, long)]
        priority: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },
    /// Mark a task as completed
    Done { id: String },
    Rm { id: String },
}

#[derive(Subcommand)]
enum NoteCommands {
    /// List your notes, newest first
    List,
    Add {
        title: String,
        content: String,

        /// Color tag (e.g. "yellow", "blue")
        #[arg(short, long, default_value = "yellow")]
        color: String,
    },
    Rm { id: String },
}

#[derive(Subcommand)]
enum EventCommands {
    /// List events in a date window
    List {
        /// Show events from this date (YYYY-MM-DD, or "start" for all past events)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    Add {
        title: String,

        /// Start date/time (e.g., "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time; defaults to one hour after the start
        #[arg(short, long)]
        end: Option<String>,

        /// Event type tag (e.g. EVENT, APPOINTMENT, ROUTINE)
        #[arg(short = 't', long = "type", default_value = "EVENT")]
        event_type: String,

        /// Color key (e.g. "blue", "green")
        #[arg(short, long, default_value = "blue")]
        color: String,

        #[arg(long)]
        all_day: bool,
    },
    Rm { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Auth { command } => match command {
            AuthCommands::Register { email } => commands::auth::register(&email).await,
            AuthCommands::Login { email } => commands::auth::login(&email).await,
            AuthCommands::Google => commands::auth::google().await,
            AuthCommands::Logout => commands::auth::logout().await,
            AuthCommands::Whoami => commands::auth::whoami().await,
        },
        Commands::Task { command } => match command {
            TaskCommands::List => commands::task::list().await,
            TaskCommands::Add {
                title,
                due,
                priority,
                category,
            } => commands::task::add(title, due.as_deref(), priority.as_deref(), category).await,
            TaskCommands::Done { id } => commands::task::done(&id).await,
            TaskCommands::Rm { id } => commands::task::rm(&id).await,
        },
        Commands::Note { command } => match command {
            NoteCommands::List => commands::note::list().await,
            NoteCommands::Add {
                title,
                content,
                color,
            } => commands::note::add(title, content, color).await,
            NoteCommands::Rm { id } => commands::note::rm(&id).await,
        },
        Commands::Event { command } => match command {
            EventCommands::List { from, to } => {
                let range = DateRange::from_args(from.as_deref(), to.as_deref())
                    .map_err(|e| anyhow::anyhow!(e))?;
                commands::event::list(range).await
            }
            EventCommands::Add {
                title,
                start,
                end,
                event_type,
                color,
                all_day,
            } => {
                commands::event::add(title, &start, end.as_deref(), event_type, color, all_day)
                    .await
            }
            EventCommands::Rm { id } => commands::event::rm(&id).await,
        },
    }
}
