use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::list::List;
use super::task::Task;

/// Current schema version stamped on every persisted document
pub const SCHEMA_VERSION: u32 = 2;

/// Name given to the list synthesized when none exists
pub const DEFAULT_LIST_NAME: &str = "My Tasks";

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(s: &str) -> Option<Theme> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Which completion/archival states a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Neither completed nor archived
    #[default]
    Active,
    /// Completed, not archived
    Completed,
    /// Archived (completed or not)
    Archived,
    /// No status restriction
    All,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<StatusFilter> {
        match s {
            "active" => Some(StatusFilter::Active),
            "completed" => Some(StatusFilter::Completed),
            "archived" => Some(StatusFilter::Archived),
            "all" => Some(StatusFilter::All),
            _ => None,
        }
    }
}

/// Task ordering for views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Pinned first, then due date, then newest
    PinnedDue,
    /// Newest first
    CreatedDesc,
    /// Earliest due first, undated last
    DueAsc,
    /// High priority first
    PriorityDesc,
    /// Title, case-aware
    AlphaAsc,
    /// Incomplete first, then urgency, priority, due date, newest
    #[default]
    PriorityDue,
}

impl SortMode {
    pub fn parse(s: &str) -> Option<SortMode> {
        match s {
            "pinned_due" => Some(SortMode::PinnedDue),
            "created_desc" => Some(SortMode::CreatedDesc),
            "due_asc" => Some(SortMode::DueAsc),
            "priority_desc" => Some(SortMode::PriorityDesc),
            "alpha_asc" => Some(SortMode::AlphaAsc),
            "priority_due" => Some(SortMode::PriorityDue),
            _ => None,
        }
    }
}

/// Persisted presentation state: theme plus the active filter and sort
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub status_filter: StatusFilter,
    #[serde(default)]
    pub sort_mode: SortMode,
}

/// The entire persisted application state — the sole unit of persistence
/// and of import/export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub schema_version: u32,
    pub settings: Settings,
    pub active_list_id: String,
    pub lists: Vec<List>,
    pub tasks: Vec<Task>,
}

impl Document {
    /// A fresh document: one default list, no tasks, default settings.
    pub fn new_default(now: DateTime<Utc>) -> Self {
        let list = List::new(DEFAULT_LIST_NAME, now);
        Document {
            schema_version: SCHEMA_VERSION,
            settings: Settings::default(),
            active_list_id: list.id.clone(),
            lists: vec![list],
            tasks: Vec::new(),
        }
    }

    pub fn list(&self, list_id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    pub fn list_mut(&mut self, list_id: &str) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| l.id == list_id)
    }

    pub fn active_list(&self) -> Option<&List> {
        self.list(&self.active_list_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn default_document_has_one_list() {
        let doc = Document::new_default(now());
        assert_eq!(doc.schema_version, SCHEMA_VERSION);
        assert_eq!(doc.lists.len(), 1);
        assert_eq!(doc.lists[0].name, DEFAULT_LIST_NAME);
        assert_eq!(doc.active_list_id, doc.lists[0].id);
        assert!(doc.tasks.is_empty());
        assert!(doc.active_list().is_some());
    }

    #[test]
    fn settings_defaults_from_empty_object() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.status_filter, StatusFilter::Active);
        assert_eq!(settings.sort_mode, SortMode::PriorityDue);
    }

    #[test]
    fn sort_mode_keywords_round_trip() {
        for (keyword, mode) in [
            ("pinned_due", SortMode::PinnedDue),
            ("created_desc", SortMode::CreatedDesc),
            ("due_asc", SortMode::DueAsc),
            ("priority_desc", SortMode::PriorityDesc),
            ("alpha_asc", SortMode::AlphaAsc),
            ("priority_due", SortMode::PriorityDue),
        ] {
            assert_eq!(SortMode::parse(keyword), Some(mode));
            assert_eq!(
                serde_json::to_string(&mode).unwrap(),
                format!("\"{}\"", keyword)
            );
        }
        assert_eq!(SortMode::parse("bogus"), None);
    }

    #[test]
    fn document_serde_uses_camel_case() {
        let doc = Document::new_default(now());
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("schemaVersion").is_some());
        assert!(value.get("activeListId").is_some());
        assert!(value["settings"].get("statusFilter").is_some());
        assert!(value["settings"].get("sortMode").is_some());
    }
}
