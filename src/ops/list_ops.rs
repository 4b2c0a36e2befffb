use chrono::{DateTime, Utc};

use crate::model::document::Document;
use crate::model::list::{List, LIST_NAME_MAX};
use crate::model::clip;

/// Error type for list operations. Every operation leaves the document
/// unchanged when it errors.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("list not found: {0}")]
    NotFound(String),
    #[error("list name cannot be empty")]
    EmptyName,
    #[error("cannot delete the last remaining list")]
    LastList,
}

/// Create a list and make it active. Returns the new list's id.
pub fn create_list(
    doc: &mut Document,
    name: &str,
    now: DateTime<Utc>,
) -> Result<String, ListError> {
    if name.trim().is_empty() {
        return Err(ListError::EmptyName);
    }
    let list = List::new(name, now);
    let id = list.id.clone();
    doc.lists.push(list);
    doc.active_list_id = id.clone();
    Ok(id)
}

pub fn rename_list(doc: &mut Document, list_id: &str, name: &str) -> Result<(), ListError> {
    if name.trim().is_empty() {
        return Err(ListError::EmptyName);
    }
    let list = doc
        .list_mut(list_id)
        .ok_or_else(|| ListError::NotFound(list_id.to_string()))?;
    list.name = clip(name, LIST_NAME_MAX);
    Ok(())
}

/// Delete a list and every task in it. Refuses to delete the last list.
/// If the deleted list was active, the first remaining list becomes active.
pub fn delete_list(doc: &mut Document, list_id: &str) -> Result<(), ListError> {
    if doc.list(list_id).is_none() {
        return Err(ListError::NotFound(list_id.to_string()));
    }
    if doc.lists.len() <= 1 {
        return Err(ListError::LastList);
    }

    doc.tasks.retain(|t| t.list_id != list_id);
    doc.lists.retain(|l| l.id != list_id);
    if doc.active_list_id == list_id {
        doc.active_list_id = doc.lists[0].id.clone();
    }
    Ok(())
}

pub fn set_active_list(doc: &mut Document, list_id: &str) -> Result<(), ListError> {
    if doc.list(list_id).is_none() {
        return Err(ListError::NotFound(list_id.to_string()));
    }
    doc.active_list_id = list_id.to_string();
    Ok(())
}

/// Find a list by exact name, then by unique case-insensitive prefix of
/// name or id. Used by callers that accept human list references.
pub fn resolve_list<'a>(doc: &'a Document, reference: &str) -> Option<&'a List> {
    if let Some(list) = doc.lists.iter().find(|l| l.name == reference) {
        return Some(list);
    }
    let needle = reference.to_lowercase();
    let mut matches = doc
        .lists
        .iter()
        .filter(|l| l.name.to_lowercase().starts_with(&needle) || l.id.starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(list), None) => Some(list),
        _ => None,
    }
}
