use chrono::{DateTime, Duration, Utc};

use crate::model::document::{Document, Settings, StatusFilter};
use crate::model::task::{Priority, Task};

/// Due-date bucket a view can be narrowed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    /// Due strictly before now, not completed
    Overdue,
    /// Due on the same calendar day as now
    Today,
    /// Due within the next seven days, inclusive
    Week,
    /// No due date at all
    NoDue,
}

impl DueFilter {
    pub fn parse(s: &str) -> Option<DueFilter> {
        match s {
            "overdue" => Some(DueFilter::Overdue),
            "today" => Some(DueFilter::Today),
            "week" => Some(DueFilter::Week),
            "nodue" => Some(DueFilter::NoDue),
            _ => None,
        }
    }
}

/// Everything a view narrows tasks by. A default criteria (from settings)
/// restricts by status only.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub status: StatusFilter,
    pub priority: Option<Priority>,
    pub tag: Option<String>,
    pub due: Option<DueFilter>,
    pub search: String,
}

impl FilterCriteria {
    /// The persisted view: the settings' status filter, nothing else.
    pub fn from_settings(settings: &Settings) -> Self {
        FilterCriteria {
            status: settings.status_filter,
            ..Default::default()
        }
    }
}

/// Whether a task passes every active criterion for the given list.
pub fn passes(
    task: &Task,
    active_list_id: &str,
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> bool {
    if task.list_id != active_list_id {
        return false;
    }

    match criteria.status {
        StatusFilter::Active => {
            if task.is_archived() || task.is_completed() {
                return false;
            }
        }
        StatusFilter::Completed => {
            if task.is_archived() || !task.is_completed() {
                return false;
            }
        }
        StatusFilter::Archived => {
            if !task.is_archived() {
                return false;
            }
        }
        StatusFilter::All => {}
    }

    if let Some(priority) = criteria.priority
        && task.priority != priority
    {
        return false;
    }

    if let Some(tag) = &criteria.tag
        && !task.tags.iter().any(|t| t == tag)
    {
        return false;
    }

    if let Some(due_filter) = criteria.due
        && !passes_due(task, due_filter, now)
    {
        return false;
    }

    let query = criteria.search.trim().to_lowercase();
    if !query.is_empty() && !search_blob(task).contains(&query) {
        return false;
    }

    true
}

/// Filter the document's tasks for one list, preserving sequence order.
pub fn filter_tasks<'a>(
    doc: &'a Document,
    active_list_id: &str,
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<&'a Task> {
    doc.tasks
        .iter()
        .filter(|t| passes(t, active_list_id, criteria, now))
        .collect()
}

fn passes_due(task: &Task, due_filter: DueFilter, now: DateTime<Utc>) -> bool {
    match due_filter {
        DueFilter::Overdue => task
            .due_at
            .is_some_and(|due| due < now && !task.is_completed()),
        DueFilter::Today => task
            .due_at
            .is_some_and(|due| due.date_naive() == now.date_naive()),
        DueFilter::Week => task
            .due_at
            .is_some_and(|due| due >= now && due <= now + Duration::days(7)),
        DueFilter::NoDue => task.due_at.is_none(),
    }
}

/// Lowercased text searched by the free-text query: title, notes, tags,
/// and subtask text.
fn search_blob(task: &Task) -> String {
    let mut blob = String::new();
    blob.push_str(&task.text);
    blob.push(' ');
    blob.push_str(&task.notes);
    for tag in &task.tags {
        blob.push(' ');
        blob.push_str(tag);
    }
    for subtask in &task.subtasks {
        blob.push(' ');
        blob.push_str(&subtask.text);
    }
    blob.to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
