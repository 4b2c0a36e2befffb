use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a list name, in characters
pub const LIST_NAME_MAX: usize = 60;

/// A named container for tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl List {
    /// Create a new list with a generated id. The name is trimmed and capped.
    pub fn new(name: &str, now: DateTime<Utc>) -> Self {
        List {
            id: super::new_id(),
            name: super::clip(name, LIST_NAME_MAX),
            created_at: now,
        }
    }
}
