use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("taskdeck v", env!("CARGO_PKG_VERSION"), " - your tasks in one JSON file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different store file
    #[arg(short = 's', long = "store", global = true)]
    pub store: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show all lists with their progress
    Lists,
    /// Manage lists
    List(ListCmd),
    /// Switch the active list
    Use(UseArgs),
    /// Add a task to the active list
    Add(AddArgs),
    /// Show tasks in the active list
    Ls(LsArgs),
    /// Toggle a task complete (recurring tasks spawn their next occurrence)
    Done(TaskRefArgs),
    /// Toggle a task archived
    Archive(TaskRefArgs),
    /// Toggle a task pinned
    Pin(TaskRefArgs),
    /// Delete a task
    Rm(TaskRefArgs),
    /// Edit task fields
    Edit(EditArgs),
    /// Manage a task's subtasks
    Sub(SubCmd),
    /// Remove completed (non-archived) tasks from the active list
    ClearCompleted,
    /// Show per-list progress and urgency counts
    Stats,
    /// Show tags in use on the active list
    Tags,
    /// Set the color theme
    Theme(ThemeArgs),
    /// Write a JSON backup of the whole document
    Export(ExportArgs),
    /// Write a CSV of every task
    ExportCsv(ExportArgs),
    /// Replace the document with an imported JSON backup
    Import(ImportArgs),
    /// Delete the store and start fresh
    Reset(ResetArgs),
}

// ---------------------------------------------------------------------------
// List management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListCmd {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Create a list and make it active
    New(ListNameArgs),
    /// Rename the active list
    Rename(ListNameArgs),
    /// Delete the active list and all its tasks
    Rm(ListRmArgs),
}

#[derive(Args)]
pub struct ListNameArgs {
    /// List name
    pub name: String,
}

#[derive(Args)]
pub struct ListRmArgs {
    /// Skip confirmation
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct UseArgs {
    /// List name, or a unique prefix of its name or id
    pub list: String,
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Due date (YYYY-MM-DD, or a full RFC 3339 timestamp)
    #[arg(long)]
    pub due: Option<String>,
    /// Priority (low, med, high)
    #[arg(long)]
    pub priority: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
    /// Notes
    #[arg(long)]
    pub note: Option<String>,
    /// Recurrence (daily, weekly, monthly, custom)
    #[arg(long)]
    pub repeat: Option<String>,
    /// Interval in days for custom recurrence
    #[arg(long, value_name = "DAYS")]
    pub every: Option<u32>,
}

#[derive(Args)]
pub struct LsArgs {
    /// Status to show (active, completed, archived, all)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by priority (low, med, high)
    #[arg(long)]
    pub priority: Option<String>,
    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Filter by due bucket (overdue, today, week, nodue)
    #[arg(long)]
    pub due: Option<String>,
    /// Free-text search over text, notes, tags, and subtasks
    #[arg(long)]
    pub search: Option<String>,
    /// Sort mode (pinned_due, created_desc, due_asc, priority_desc,
    /// alpha_asc, priority_due)
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Args)]
pub struct TaskRefArgs {
    /// Task: 1-based position in the current view, or an id prefix
    pub task: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task: 1-based position in the current view, or an id prefix
    pub task: String,
    /// New text
    #[arg(long)]
    pub text: Option<String>,
    /// New due date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub due: Option<String>,
    /// Clear the due date
    #[arg(long)]
    pub clear_due: bool,
    /// New priority (low, med, high)
    #[arg(long)]
    pub priority: Option<String>,
    /// Replace tags (comma-separated)
    #[arg(long)]
    pub tags: Option<String>,
    /// New notes
    #[arg(long)]
    pub note: Option<String>,
    /// New recurrence (daily, weekly, monthly, custom)
    #[arg(long)]
    pub repeat: Option<String>,
    /// Interval in days for custom recurrence
    #[arg(long, value_name = "DAYS")]
    pub every: Option<u32>,
    /// Clear the recurrence
    #[arg(long)]
    pub clear_repeat: bool,
}

#[derive(Args)]
pub struct SubCmd {
    /// Parent task: 1-based position in the current view, or an id prefix
    pub task: String,
    #[command(subcommand)]
    pub action: SubAction,
}

#[derive(Subcommand)]
pub enum SubAction {
    /// Add a subtask
    Add(SubAddArgs),
    /// Toggle a subtask done
    Done(SubRefArgs),
    /// Remove a subtask
    Rm(SubRefArgs),
}

#[derive(Args)]
pub struct SubAddArgs {
    /// Subtask text
    pub text: String,
}

#[derive(Args)]
pub struct SubRefArgs {
    /// Subtask position (1-based)
    pub n: usize,
}

// ---------------------------------------------------------------------------
// Settings and maintenance
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ThemeArgs {
    /// Theme (light, dark); omit to toggle
    pub theme: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output path (default: date-stamped file in the current directory)
    pub path: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file to import
    pub file: String,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Skip confirmation
    #[arg(long)]
    pub yes: bool,
}
