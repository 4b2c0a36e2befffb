use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a task's text, in characters
pub const TASK_TEXT_MAX: usize = 140;
/// Maximum length of a task's notes
pub const NOTES_MAX: usize = 300;
/// Maximum length of a subtask's text
pub const SUBTASK_TEXT_MAX: usize = 120;
/// Maximum number of tags on a task
pub const TAGS_MAX: usize = 20;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Med,
    High,
}

impl Priority {
    /// Numeric rank used by priority sorts (higher sorts first)
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Med => 2,
            Priority::Low => 1,
        }
    }

    /// Parse a priority keyword (`low`, `med`, `high`)
    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "low" => Some(Priority::Low),
            "med" => Some(Priority::Med),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Med => "med",
            Priority::High => "high",
        }
    }
}

/// A recurrence rule. Completing a task carrying one spawns the next
/// occurrence with the due date advanced by the rule's interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Custom {
        #[serde(rename = "everyDays")]
        every_days: u32,
    },
}

/// A checklist entry inside a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Subtask {
    pub fn new(text: &str) -> Self {
        Subtask {
            id: super::new_id(),
            text: super::clip(text, SUBTASK_TEXT_MAX),
            done: false,
        }
    }
}

/// A single task. Completion and archival are independent timestamp axes:
/// a task may be both completed and archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    /// Id of the list this task belongs to
    pub list_id: String,
    pub text: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Create a new task with a generated id and creation timestamp.
    /// The text is trimmed and capped.
    pub fn new(list_id: &str, text: &str, now: DateTime<Utc>) -> Self {
        Task {
            id: super::new_id(),
            list_id: list_id.to_string(),
            text: super::clip(text, TASK_TEXT_MAX),
            notes: String::new(),
            due_at: None,
            created_at: now,
            priority: Priority::default(),
            tags: Vec::new(),
            pinned: false,
            completed_at: None,
            archived_at: None,
            recurrence: None,
            subtasks: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }
}
