//! Normalization of arbitrary stored JSON into a well-formed [`Document`].
//!
//! This is the only place in the crate that looks at untrusted data.
//! Everything downstream treats the document shape as statically known.
//! All failure paths degrade to safe defaults; nothing here ever errors.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::document::{
    Document, Settings, SortMode, StatusFilter, Theme, DEFAULT_LIST_NAME, SCHEMA_VERSION,
};
use crate::model::list::List;
use crate::model::new_id;
use crate::model::task::{Priority, Recurrence, Subtask, Task};

/// Fallback interval for a custom recurrence missing its day count
const CUSTOM_INTERVAL_FALLBACK: u32 = 7;

/// Normalize an arbitrary stored value into a well-formed document.
///
/// Idempotent on already-valid documents: ids are only generated where
/// absent, so re-running on a valid document is a no-op. Tasks whose
/// `listId` no longer names an existing list are kept as-is — orphans are
/// tolerated, not repaired.
pub fn migrate(raw: Value, now: DateTime<Utc>) -> Document {
    let Value::Object(map) = raw else {
        return Document::new_default(now);
    };

    let settings = settings_from(map.get("settings"));

    let mut lists: Vec<List> = map
        .get("lists")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|v| list_from(v, now)).collect())
        .unwrap_or_default();

    let mut active_list_id = map
        .get("activeListId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    // At least one list must exist; the synthesized one becomes active.
    if lists.is_empty() {
        let list = List::new(DEFAULT_LIST_NAME, now);
        active_list_id = list.id.clone();
        lists.push(list);
    }
    if !lists.iter().any(|l| l.id == active_list_id) {
        active_list_id = lists[0].id.clone();
    }

    let tasks: Vec<Task> = map
        .get("tasks")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| task_from(v, &active_list_id, now))
                .collect()
        })
        .unwrap_or_default();

    Document {
        schema_version: SCHEMA_VERSION,
        settings,
        active_list_id,
        lists,
        tasks,
    }
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

fn settings_from(value: Option<&Value>) -> Settings {
    let Some(Value::Object(map)) = value else {
        return Settings::default();
    };
    Settings {
        theme: map
            .get("theme")
            .and_then(Value::as_str)
            .and_then(Theme::parse)
            .unwrap_or_default(),
        status_filter: map
            .get("statusFilter")
            .and_then(Value::as_str)
            .and_then(StatusFilter::parse)
            .unwrap_or_default(),
        sort_mode: map
            .get("sortMode")
            .and_then(Value::as_str)
            .and_then(SortMode::parse)
            .unwrap_or_default(),
    }
}

fn list_from(value: &Value, now: DateTime<Utc>) -> Option<List> {
    let map = value.as_object()?;
    Some(List {
        id: string_or_id(map.get("id")),
        name: match coerce_string(map.get("name")) {
            s if s.is_empty() => DEFAULT_LIST_NAME.to_string(),
            s => s,
        },
        created_at: timestamp_or(map.get("createdAt"), now),
    })
}

fn task_from(value: &Value, active_list_id: &str, now: DateTime<Utc>) -> Option<Task> {
    let map = value.as_object()?;
    Some(Task {
        id: string_or_id(map.get("id")),
        // A missing listId falls back to the active list. A listId that no
        // longer matches any list is left alone (orphans survive).
        list_id: match map.get("listId").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => active_list_id.to_string(),
        },
        // Some exports name the text field "title"
        text: match coerce_string(map.get("text")) {
            s if s.is_empty() => coerce_string(map.get("title")),
            s => s,
        },
        notes: coerce_string(map.get("notes")),
        due_at: timestamp(map.get("dueAt")),
        created_at: timestamp_or(map.get("createdAt"), now),
        priority: map
            .get("priority")
            .and_then(Value::as_str)
            .and_then(Priority::parse)
            .unwrap_or_default(),
        tags: map
            .get("tags")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
        pinned: map.get("pinned").and_then(Value::as_bool).unwrap_or(false),
        completed_at: timestamp(map.get("completedAt")),
        archived_at: timestamp(map.get("archivedAt")),
        recurrence: recurrence_from(map.get("recurrence")),
        subtasks: map
            .get("subtasks")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(subtask_from).collect())
            .unwrap_or_default(),
    })
}

fn subtask_from(value: &Value) -> Option<Subtask> {
    let map = value.as_object()?;
    Some(Subtask {
        id: string_or_id(map.get("id")),
        text: coerce_string(map.get("text")),
        done: map.get("done").and_then(Value::as_bool).unwrap_or(false),
    })
}

fn recurrence_from(value: Option<&Value>) -> Option<Recurrence> {
    let map = value?.as_object()?;
    match map.get("type").and_then(Value::as_str)? {
        "daily" => Some(Recurrence::Daily),
        "weekly" => Some(Recurrence::Weekly),
        "monthly" => Some(Recurrence::Monthly),
        "custom" => {
            let every_days = map
                .get("everyDays")
                .and_then(Value::as_u64)
                .filter(|n| *n >= 1)
                .map(|n| n as u32)
                .unwrap_or(CUSTOM_INTERVAL_FALLBACK);
            Some(Recurrence::Custom { every_days })
        }
        _ => None,
    }
}

/// Existing string id, or a freshly generated one
fn string_or_id(value: Option<&Value>) -> String {
    match value.and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => new_id(),
    }
}

/// Coerce a scalar to a string; null, missing, and structured values
/// become the empty string.
fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse an RFC 3339 timestamp; anything unparsable becomes `None`.
fn timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn timestamp_or(value: Option<&Value>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    timestamp(value).unwrap_or(fallback)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
