//! Due-date classification relative to a point in time. Pure functions —
//! callers pass `now` explicitly.

use chrono::{DateTime, Duration, Utc};

use crate::model::task::Task;

/// How far ahead a due date counts as "due soon"
pub const SOON_HORIZON_HOURS: i64 = 48;
/// How recently created a task counts as "new"
pub const NEW_HORIZON_HOURS: i64 = 24;

/// A task is overdue once its due calendar day has fully elapsed — due
/// "today" is not yet overdue until the day ends. Completed tasks are
/// never overdue.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    if task.is_completed() {
        return false;
    }
    task.due_at
        .is_some_and(|due| due.date_naive() < now.date_naive())
}

/// Not overdue, and due within the soon horizon of now.
pub fn is_due_soon(task: &Task, now: DateTime<Utc>) -> bool {
    if is_overdue(task, now) {
        return false;
    }
    task.due_at
        .is_some_and(|due| due <= now + Duration::hours(SOON_HORIZON_HOURS))
}

/// Created within the recency horizon. Cosmetic only — used for badges.
pub fn is_new(task: &Task, now: DateTime<Utc>) -> bool {
    now - task.created_at <= Duration::hours(NEW_HORIZON_HOURS)
}

/// Urgency rank used by the priority_due sort: overdue > due-soon > rest.
pub fn urgency_bucket(task: &Task, now: DateTime<Utc>) -> u8 {
    if is_overdue(task, now) {
        2
    } else if is_due_soon(task, now) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn task_due(due: Option<DateTime<Utc>>) -> Task {
        let mut task = Task::new("l1", "t", now());
        task.due_at = due;
        task
    }

    #[test]
    fn due_yesterday_is_overdue() {
        let due = Utc.with_ymd_and_hms(2025, 6, 14, 23, 0, 0).unwrap();
        assert!(is_overdue(&task_due(Some(due)), now()));
    }

    #[test]
    fn due_today_is_not_yet_overdue() {
        // Earlier today — the day has not fully elapsed
        let due = Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap();
        let task = task_due(Some(due));
        assert!(!is_overdue(&task, now()));
        assert!(is_due_soon(&task, now()));
    }

    #[test]
    fn completed_task_is_never_overdue() {
        let due = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut task = task_due(Some(due));
        task.completed_at = Some(now());
        assert!(!is_overdue(&task, now()));
    }

    #[test]
    fn no_due_date_is_neither() {
        let task = task_due(None);
        assert!(!is_overdue(&task, now()));
        assert!(!is_due_soon(&task, now()));
        assert_eq!(urgency_bucket(&task, now()), 0);
    }

    #[test]
    fn soon_horizon_boundary() {
        let inside = now() + Duration::hours(SOON_HORIZON_HOURS);
        let outside = now() + Duration::hours(SOON_HORIZON_HOURS) + Duration::minutes(1);
        assert!(is_due_soon(&task_due(Some(inside)), now()));
        assert!(!is_due_soon(&task_due(Some(outside)), now()));
    }

    #[test]
    fn buckets_rank_overdue_highest() {
        let overdue = task_due(Some(Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap()));
        let soon = task_due(Some(now() + Duration::hours(3)));
        let later = task_due(Some(now() + Duration::days(30)));
        assert_eq!(urgency_bucket(&overdue, now()), 2);
        assert_eq!(urgency_bucket(&soon, now()), 1);
        assert_eq!(urgency_bucket(&later, now()), 0);
    }

    #[test]
    fn is_new_within_a_day() {
        let mut task = Task::new("l1", "fresh", now());
        assert!(is_new(&task, now()));
        task.created_at = now() - Duration::hours(NEW_HORIZON_HOURS + 1);
        assert!(!is_new(&task, now()));
    }
}
