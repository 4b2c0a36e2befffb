use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};

use crate::model::document::Document;
use crate::view::urgency;

/// Per-list aggregate counts. Progress counts archived tasks out entirely;
/// the urgency counts classify every non-completed task in the list.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    /// Completion percentage, 0–100
    pub pct: u32,
    pub overdue: usize,
    pub due_soon: usize,
}

/// Compute aggregates for one list.
pub fn list_summary(doc: &Document, list_id: &str, now: DateTime<Utc>) -> ListSummary {
    let mut summary = ListSummary::default();
    for task in doc.tasks.iter().filter(|t| t.list_id == list_id) {
        if !task.is_archived() {
            summary.total += 1;
            if task.is_completed() {
                summary.completed += 1;
            }
        }
        if !task.is_completed() {
            if urgency::is_overdue(task, now) {
                summary.overdue += 1;
            } else if urgency::is_due_soon(task, now) {
                summary.due_soon += 1;
            }
        }
    }
    summary.remaining = summary.total - summary.completed;
    summary.pct = if summary.total == 0 {
        0
    } else {
        (summary.completed * 100 / summary.total) as u32
    };
    summary
}

/// Aggregates for every list, keyed by list id in document order.
pub fn all_summaries(doc: &Document, now: DateTime<Utc>) -> IndexMap<String, ListSummary> {
    doc.lists
        .iter()
        .map(|l| (l.id.clone(), list_summary(doc, &l.id, now)))
        .collect()
}

/// Sorted unique tags in use on one list — the tag picker's options.
pub fn tag_options(doc: &Document, list_id: &str) -> Vec<String> {
    let mut tags: IndexSet<&str> = IndexSet::new();
    for task in doc.tasks.iter().filter(|t| t.list_id == list_id) {
        for tag in &task.tags {
            tags.insert(tag.as_str());
        }
    }
    let mut out: Vec<String> = tags.into_iter().map(str::to_string).collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use crate::model::task::Task;
    use crate::ops::list_ops;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn doc_with_tasks() -> (Document, String) {
        let mut doc = Document::new_default(now());
        let list_id = doc.active_list_id.clone();

        let mut done = Task::new(&list_id, "done", now());
        done.completed_at = Some(now());

        let mut overdue = Task::new(&list_id, "overdue", now());
        overdue.due_at = Some(now() - Duration::days(3));

        let mut soon = Task::new(&list_id, "soon", now());
        soon.due_at = Some(now() + Duration::hours(4));

        let mut archived = Task::new(&list_id, "archived", now());
        archived.archived_at = Some(now());

        let open = Task::new(&list_id, "open", now());

        doc.tasks = vec![done, overdue, soon, archived, open];
        (doc, list_id)
    }

    #[test]
    fn summary_counts_and_pct() {
        let (doc, list_id) = doc_with_tasks();
        let summary = list_summary(&doc, &list_id, now());
        // Archived task is out of the progress counts
        assert_eq!(summary.total, 4);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.remaining, 3);
        assert_eq!(summary.pct, 25);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.due_soon, 1);
    }

    #[test]
    fn empty_list_is_zero_pct() {
        let doc = Document::new_default(now());
        let summary = list_summary(&doc, &doc.active_list_id, now());
        assert_eq!(summary, ListSummary::default());
    }

    #[test]
    fn summaries_follow_document_order() {
        let (mut doc, first) = doc_with_tasks();
        let second = list_ops::create_list(&mut doc, "Second", now()).unwrap();
        let summaries = all_summaries(&doc, now());
        let keys: Vec<&String> = summaries.keys().collect();
        assert_eq!(keys, vec![&first, &second]);
        assert_eq!(summaries[&second], ListSummary::default());
    }

    #[test]
    fn tag_options_are_sorted_and_unique() {
        let (mut doc, list_id) = doc_with_tasks();
        doc.tasks[0].tags = vec!["zeta".into(), "alpha".into()];
        doc.tasks[1].tags = vec!["alpha".into(), "mid".into()];
        assert_eq!(tag_options(&doc, &list_id), vec!["alpha", "mid", "zeta"]);
        assert!(tag_options(&doc, "other").is_empty());
    }
}
