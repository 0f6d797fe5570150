use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "checktrail",
    version,
    about = "Checklist task lifecycle tracker with an append-only audit trail",
    after_help = "\
NOTE:
  Requires a git repository. DB is stored at <git-root>/.checktrail/checktrail.db
  Run `checktrail init` before any other command.

LIFECYCLE:
  not_started → in_progress → completed | deviation
  not_started may also go straight to completed or deviation.
  completed and deviation are terminal; further transitions are rejected.

AUDIT:
  Every transition appends an entry to the task's audit log. Entries are
  ordered by a per-task sequence number and are never rewritten."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Scope to a single client (default: all clients)
    #[arg(long, global = true)]
    pub client: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize checktrail in this repository
    Init,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show progress summary for the scope
    Status,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a checklist task (starts as not_started)
    Add {
        /// Task name
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// External documentation link
        #[arg(long)]
        url: Option<String>,
    },
    /// List tasks in the scope with progress
    List,
    /// Show task details
    Show {
        /// Task ID or prefix
        id: String,
    },
    /// Start a task (not_started → in_progress)
    Start {
        id: String,
        /// Who performs the transition
        #[arg(long)]
        actor: String,
        /// RFC 3339 timestamp (default: now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Complete a task (not_started|in_progress → completed)
    Done {
        id: String,
        #[arg(long)]
        actor: String,
        #[arg(long)]
        at: Option<String>,
    },
    /// Flag a task as a procedural deviation (terminal)
    Deviate {
        id: String,
        #[arg(long)]
        actor: String,
        /// Reviewer commentary explaining the deviation
        #[arg(long)]
        comment: Option<String>,
        #[arg(long)]
        at: Option<String>,
    },
    /// Show the audit trail of a task
    History {
        id: String,
    },
}
