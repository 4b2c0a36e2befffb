use chrono::{DateTime, Utc};

use crate::model::clip;
use crate::model::document::Document;
use crate::model::new_id;
use crate::model::task::{Priority, Recurrence, Subtask, Task, NOTES_MAX, TAGS_MAX, TASK_TEXT_MAX};
use crate::ops::recur;

/// Error type for task operations. Every operation leaves the document
/// unchanged when it errors.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("subtask not found: {0}")]
    SubtaskNotFound(String),
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error("task text cannot be empty")]
    EmptyText,
}

/// User-editable task fields, as accepted by add and edit.
#[derive(Debug, Clone, Default)]
pub struct TaskFields {
    pub text: String,
    pub notes: String,
    pub due_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub recurrence: Option<Recurrence>,
}

/// A deleted task captured for undo: the task itself and the index it
/// occupied in the task sequence.
#[derive(Debug, Clone)]
pub struct DeletedTask {
    pub task: Task,
    pub index: usize,
}

/// Split a comma-separated tag string into trimmed, non-empty tags,
/// capped at the tag limit. Duplicates are kept as typed.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .take(TAGS_MAX)
        .collect()
}

// ---------------------------------------------------------------------------
// Task CRUD
// ---------------------------------------------------------------------------

/// Add a task to the front of the task sequence (newest first).
/// Returns the new task's id.
pub fn add_task(
    doc: &mut Document,
    list_id: &str,
    fields: TaskFields,
    now: DateTime<Utc>,
) -> Result<String, TaskError> {
    if fields.text.trim().is_empty() {
        return Err(TaskError::EmptyText);
    }
    if doc.list(list_id).is_none() {
        return Err(TaskError::ListNotFound(list_id.to_string()));
    }

    let mut task = Task::new(list_id, &fields.text, now);
    apply_fields(&mut task, fields);
    let id = task.id.clone();
    doc.tasks.insert(0, task);
    Ok(id)
}

/// Overwrite a task's editable fields from validated input.
pub fn edit_task(doc: &mut Document, task_id: &str, fields: TaskFields) -> Result<(), TaskError> {
    if fields.text.trim().is_empty() {
        return Err(TaskError::EmptyText);
    }
    let task = doc
        .task_mut(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    task.text = clip(&fields.text, TASK_TEXT_MAX);
    apply_fields(task, fields);
    Ok(())
}

/// Remove a task, returning it together with its original index so the
/// caller can offer a timed undo.
pub fn delete_task(doc: &mut Document, task_id: &str) -> Result<DeletedTask, TaskError> {
    let index = doc
        .tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    let task = doc.tasks.remove(index);
    Ok(DeletedTask { task, index })
}

/// Re-insert a previously deleted task at its captured index — the undo
/// half of delete.
pub fn restore_task(doc: &mut Document, deleted: DeletedTask) {
    let index = deleted.index.min(doc.tasks.len());
    doc.tasks.insert(index, deleted.task);
}

/// Remove every completed, non-archived task in the given list.
/// Completed-and-archived tasks are preserved. Returns the removed count.
pub fn clear_completed(doc: &mut Document, list_id: &str) -> usize {
    let before = doc.tasks.len();
    doc.tasks
        .retain(|t| !(t.list_id == list_id && t.is_completed() && !t.is_archived()));
    before - doc.tasks.len()
}

// ---------------------------------------------------------------------------
// Toggles
// ---------------------------------------------------------------------------

/// Flip a task between incomplete and complete.
///
/// Completing a task that carries a recurrence spawns its next occurrence:
/// a sibling with fresh ids, cleared completion/archival/pinned state,
/// reset subtasks, and the due date advanced from the previous due date
/// (or from now when there was none). Returns the sibling's id when one
/// was spawned.
pub fn toggle_complete(
    doc: &mut Document,
    task_id: &str,
    now: DateTime<Utc>,
) -> Result<Option<String>, TaskError> {
    let task = doc
        .task_mut(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;

    let was_completed = task.is_completed();
    task.completed_at = if was_completed { None } else { Some(now) };

    if was_completed || task.recurrence.is_none() {
        return Ok(None);
    }

    let next = next_occurrence(task, now);
    let next_id = next.id.clone();
    doc.tasks.insert(0, next);
    Ok(Some(next_id))
}

/// Flip a task between archived and not. Independent of completion.
pub fn toggle_archive(
    doc: &mut Document,
    task_id: &str,
    now: DateTime<Utc>,
) -> Result<(), TaskError> {
    let task = doc
        .task_mut(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    task.archived_at = if task.is_archived() { None } else { Some(now) };
    Ok(())
}

pub fn toggle_pinned(doc: &mut Document, task_id: &str) -> Result<(), TaskError> {
    let task = doc
        .task_mut(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    task.pinned = !task.pinned;
    Ok(())
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

/// Append a subtask. Returns the new subtask's id.
pub fn add_subtask(doc: &mut Document, task_id: &str, text: &str) -> Result<String, TaskError> {
    if text.trim().is_empty() {
        return Err(TaskError::EmptyText);
    }
    let task = doc
        .task_mut(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    let subtask = Subtask::new(text);
    let id = subtask.id.clone();
    task.subtasks.push(subtask);
    Ok(id)
}

pub fn toggle_subtask(
    doc: &mut Document,
    task_id: &str,
    subtask_id: &str,
) -> Result<(), TaskError> {
    let task = doc
        .task_mut(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    let subtask = task
        .subtasks
        .iter_mut()
        .find(|s| s.id == subtask_id)
        .ok_or_else(|| TaskError::SubtaskNotFound(subtask_id.to_string()))?;
    subtask.done = !subtask.done;
    Ok(())
}

pub fn remove_subtask(
    doc: &mut Document,
    task_id: &str,
    subtask_id: &str,
) -> Result<(), TaskError> {
    let task = doc
        .task_mut(task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    let before = task.subtasks.len();
    task.subtasks.retain(|s| s.id != subtask_id);
    if task.subtasks.len() == before {
        return Err(TaskError::SubtaskNotFound(subtask_id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn apply_fields(task: &mut Task, fields: TaskFields) {
    task.notes = clip(&fields.notes, NOTES_MAX);
    task.due_at = fields.due_at;
    task.priority = fields.priority;
    task.tags = fields.tags.into_iter().take(TAGS_MAX).collect();
    task.recurrence = fields.recurrence;
}

/// Build the next occurrence of a recurring task that was just completed.
fn next_occurrence(task: &Task, now: DateTime<Utc>) -> Task {
    let mut next = task.clone();
    next.id = new_id();
    next.created_at = now;
    next.completed_at = None;
    next.archived_at = None;
    next.pinned = false;
    if let Some(recurrence) = &task.recurrence {
        let base = task.due_at.unwrap_or(now);
        next.due_at = Some(recur::next_due(recurrence, base));
    }
    for subtask in &mut next.subtasks {
        subtask.id = new_id();
        subtask.done = false;
    }
    next
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
