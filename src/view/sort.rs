use std::cmp::Ordering;

use chrono::{DateTime, TimeZone, Utc};

use crate::model::document::SortMode;
use crate::model::task::Task;
use crate::view::urgency;

/// Order two tasks under the given sort mode. Later keys in a mode's
/// tie-break chain only apply when the earlier keys compare equal.
pub fn compare(a: &Task, b: &Task, mode: SortMode, now: DateTime<Utc>) -> Ordering {
    match mode {
        SortMode::PinnedDue => b
            .pinned
            .cmp(&a.pinned)
            .then_with(|| due_key(a).cmp(&due_key(b)))
            .then_with(|| b.created_at.cmp(&a.created_at)),
        SortMode::CreatedDesc => b.created_at.cmp(&a.created_at),
        SortMode::DueAsc => due_key(a).cmp(&due_key(b)),
        SortMode::PriorityDesc => b.priority.rank().cmp(&a.priority.rank()),
        SortMode::AlphaAsc => title_key(a)
            .cmp(&title_key(b))
            .then_with(|| a.text.cmp(&b.text)),
        SortMode::PriorityDue => a
            .is_completed()
            .cmp(&b.is_completed())
            .then_with(|| urgency::urgency_bucket(b, now).cmp(&urgency::urgency_bucket(a, now)))
            .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
            .then_with(|| due_key(a).cmp(&due_key(b)))
            .then_with(|| b.created_at.cmp(&a.created_at)),
    }
}

/// Sort a view in place.
pub fn sort_tasks(tasks: &mut [&Task], mode: SortMode, now: DateTime<Utc>) {
    tasks.sort_by(|a, b| compare(a, b, mode, now));
}

/// Due date for ordering; undated tasks sort after every dated one via a
/// far-future sentinel rather than a special case at each comparison.
fn due_key(task: &Task) -> DateTime<Utc> {
    task.due_at.unwrap_or_else(far_future)
}

fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Case-aware title ordering: case-insensitive first, exact case breaks ties.
fn title_key(task: &Task) -> String {
    task.text.to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
