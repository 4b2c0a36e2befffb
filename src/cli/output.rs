use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::model::document::Document;
use crate::model::task::{Priority, Recurrence, Task};
use crate::view::summary::ListSummary;
use crate::view::urgency;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub pinned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<SubtaskJson>,
    pub overdue: bool,
    pub due_soon: bool,
    #[serde(rename = "new")]
    pub is_new: bool,
}

#[derive(Serialize)]
pub struct SubtaskJson {
    pub id: String,
    pub text: String,
    pub done: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRowJson {
    pub id: String,
    pub name: String,
    pub active: bool,
    #[serde(flatten)]
    pub summary: ListSummary,
}

impl TaskJson {
    pub fn from_task(task: &Task, now: DateTime<Utc>) -> Self {
        TaskJson {
            id: task.id.clone(),
            text: task.text.clone(),
            notes: task.notes.clone(),
            priority: task.priority,
            tags: task.tags.clone(),
            pinned: task.pinned,
            due_at: task.due_at,
            created_at: task.created_at,
            completed_at: task.completed_at,
            archived_at: task.archived_at,
            recurrence: task.recurrence.clone(),
            subtasks: task
                .subtasks
                .iter()
                .map(|s| SubtaskJson {
                    id: s.id.clone(),
                    text: s.text.clone(),
                    done: s.done,
                })
                .collect(),
            overdue: urgency::is_overdue(task, now),
            due_soon: urgency::is_due_soon(task, now),
            is_new: urgency::is_new(task, now),
        }
    }
}

pub fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("error: could not serialize output: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Plain output
// ---------------------------------------------------------------------------

/// One task row: position, checkbox, markers, text, then badges.
pub fn print_task_line(position: usize, task: &Task, now: DateTime<Utc>) {
    let check = if task.is_completed() { "x" } else { " " };
    let pin = if task.pinned { "* " } else { "" };

    let mut badges = Vec::new();
    badges.push(format!("!{}", task.priority.as_str()));
    if let Some(due) = task.due_at {
        let when = due.to_rfc3339_opts(SecondsFormat::Secs, true);
        if urgency::is_overdue(task, now) {
            badges.push(format!("due {} (overdue)", when));
        } else if urgency::is_due_soon(task, now) {
            badges.push(format!("due {} (soon)", when));
        } else {
            badges.push(format!("due {}", when));
        }
    }
    for tag in &task.tags {
        badges.push(format!("#{}", tag));
    }
    if let Some(recurrence) = &task.recurrence {
        badges.push(match recurrence {
            Recurrence::Daily => "repeats daily".to_string(),
            Recurrence::Weekly => "repeats weekly".to_string(),
            Recurrence::Monthly => "repeats monthly".to_string(),
            Recurrence::Custom { every_days } => format!("repeats every {}d", every_days),
        });
    }
    if !task.subtasks.is_empty() {
        let done = task.subtasks.iter().filter(|s| s.done).count();
        badges.push(format!("[{}/{}]", done, task.subtasks.len()));
    }
    if task.is_archived() {
        badges.push("(archived)".to_string());
    }

    println!(
        "{:>3}. [{}] {}{}  {}",
        position,
        check,
        pin,
        task.text,
        badges.join("  ")
    );
    if !task.notes.is_empty() {
        println!("       {}", task.notes);
    }
}

pub fn print_list_row(doc: &Document, list_id: &str, name: &str, summary: &ListSummary) {
    let marker = if doc.active_list_id == list_id {
        "*"
    } else {
        " "
    };
    let mut extra = String::new();
    if summary.overdue > 0 {
        extra.push_str(&format!("  {} overdue", summary.overdue));
    }
    if summary.due_soon > 0 {
        extra.push_str(&format!("  {} due soon", summary.due_soon));
    }
    println!(
        "{} {}  {} remaining / {} total ({}%){}",
        marker, name, summary.remaining, summary.total, summary.pct, extra
    );
}
