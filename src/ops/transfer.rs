//! Whole-document import/export: JSON backup, JSON restore, and a flat
//! CSV rendering of every task.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::migrate::migrate;
use crate::model::document::{Document, SCHEMA_VERSION};

/// Error type for import/export operations
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The JSON backup envelope
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportEnvelope<'a> {
    schema_version: u32,
    exported_at: DateTime<Utc>,
    data: &'a Document,
}

/// Serialize the whole document into a pretty-printed backup payload.
/// Returns the date-stamped filename and the file contents.
pub fn export_json(doc: &Document, now: DateTime<Utc>) -> Result<(String, String), TransferError> {
    let envelope = ExportEnvelope {
        schema_version: SCHEMA_VERSION,
        exported_at: now,
        data: doc,
    };
    let filename = format!("taskdeck-backup-{}.json", now.format("%Y-%m-%d"));
    Ok((filename, serde_json::to_string_pretty(&envelope)?))
}

/// Parse an imported payload into a document. Accepts either a backup
/// envelope (the `data` field is used) or a bare document. All-or-nothing:
/// a parse failure changes nothing for the caller.
pub fn import_json(text: &str, now: DateTime<Utc>) -> Result<Document, TransferError> {
    let payload: Value = serde_json::from_str(text)?;
    let incoming = match &payload {
        Value::Object(map) => match map.get("data") {
            Some(data) if !data.is_null() => data.clone(),
            _ => payload,
        },
        _ => payload,
    };
    Ok(migrate(incoming, now))
}

/// Render every task as one CSV row. Values are quoted with doubled
/// internal quotes; tags are space-joined, subtasks pipe-joined.
pub fn export_csv(doc: &Document, now: DateTime<Utc>) -> (String, String) {
    let mut lines = vec![
        "list,task,notes,priority,tags,dueAt,pinned,completedAt,archivedAt,subtasks".to_string(),
    ];

    let list_names: HashMap<&str, &str> = doc
        .lists
        .iter()
        .map(|l| (l.id.as_str(), l.name.as_str()))
        .collect();

    for task in &doc.tasks {
        let subtasks = task
            .subtasks
            .iter()
            .map(|s| format!("{} {}", if s.done { "[x]" } else { "[ ]" }, s.text))
            .collect::<Vec<_>>()
            .join(" | ");
        let tags = task.tags.join(" ");
        let due = stamp(task.due_at);
        let completed = stamp(task.completed_at);
        let archived = stamp(task.archived_at);
        let row = [
            list_names.get(task.list_id.as_str()).copied().unwrap_or(""),
            task.text.as_str(),
            task.notes.as_str(),
            task.priority.as_str(),
            tags.as_str(),
            due.as_str(),
            if task.pinned { "true" } else { "false" },
            completed.as_str(),
            archived.as_str(),
            subtasks.as_str(),
        ]
        .map(csv_escape)
        .join(",");
        lines.push(row);
    }

    let filename = format!("taskdeck-{}.csv", now.format("%Y-%m-%d"));
    (filename, lines.join("\n"))
}

fn stamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn csv_escape(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
