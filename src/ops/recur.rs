//! Calendar arithmetic for recurrence rules. Kept in one place so every
//! caller advances due dates by the same rules.

use chrono::{DateTime, Days, Months, Utc};

use crate::model::task::Recurrence;

/// Advance a base timestamp by one recurrence interval.
///
/// Daily/weekly/custom add whole days; monthly adds one calendar month,
/// clamping the day when the target month is shorter (Jan 31 → Feb 28).
pub fn next_due(recurrence: &Recurrence, base: DateTime<Utc>) -> DateTime<Utc> {
    match recurrence {
        Recurrence::Daily => add_days(base, 1),
        Recurrence::Weekly => add_days(base, 7),
        Recurrence::Monthly => base
            .checked_add_months(Months::new(1))
            .unwrap_or(base),
        Recurrence::Custom { every_days } => add_days(base, u64::from(*every_days)),
    }
}

fn add_days(base: DateTime<Utc>, days: u64) -> DateTime<Utc> {
    base.checked_add_days(Days::new(days)).unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn daily_adds_one_day() {
        assert_eq!(next_due(&Recurrence::Daily, at(2025, 6, 1)), at(2025, 6, 2));
    }

    #[test]
    fn daily_crosses_month_boundary() {
        assert_eq!(next_due(&Recurrence::Daily, at(2025, 6, 30)), at(2025, 7, 1));
    }

    #[test]
    fn weekly_adds_seven_days() {
        assert_eq!(
            next_due(&Recurrence::Weekly, at(2025, 6, 25)),
            at(2025, 7, 2)
        );
    }

    #[test]
    fn monthly_adds_one_calendar_month() {
        assert_eq!(
            next_due(&Recurrence::Monthly, at(2025, 3, 15)),
            at(2025, 4, 15)
        );
    }

    #[test]
    fn monthly_clamps_short_months() {
        assert_eq!(
            next_due(&Recurrence::Monthly, at(2025, 1, 31)),
            at(2025, 2, 28)
        );
        // Leap year
        assert_eq!(
            next_due(&Recurrence::Monthly, at(2024, 1, 31)),
            at(2024, 2, 29)
        );
    }

    #[test]
    fn monthly_crosses_year_boundary() {
        assert_eq!(
            next_due(&Recurrence::Monthly, at(2025, 12, 10)),
            at(2026, 1, 10)
        );
    }

    #[test]
    fn custom_adds_configured_days() {
        assert_eq!(
            next_due(&Recurrence::Custom { every_days: 3 }, at(2025, 6, 1)),
            at(2025, 6, 4)
        );
    }

    #[test]
    fn preserves_time_of_day() {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 17, 45, 30).unwrap();
        let next = next_due(&Recurrence::Daily, base);
        assert_eq!(next.time(), base.time());
    }
}
