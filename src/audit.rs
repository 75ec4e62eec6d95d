//! Due-date audit: is a task overdue, nearly due, or fine?

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone};

pub const DEFAULT_CUTOFF_HOUR: u32 = 17;
pub const DEFAULT_NEAR_DUE_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    Overdue,
    NearDue,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditPolicy {
    /// Hour of day at which a task becomes due.
    pub cutoff_hour: u32,
    /// Inclusive window, in whole days before the cutoff, that counts as near-due.
    pub near_due_days: i64,
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            cutoff_hour: DEFAULT_CUTOFF_HOUR,
            near_due_days: DEFAULT_NEAR_DUE_DAYS,
        }
    }
}

impl AuditPolicy {
    fn cutoff_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.cutoff_hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// The instant `due` stops being on time, in the time zone of `tz`.
    pub fn cutoff<Tz: TimeZone>(&self, due: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.from_local_datetime(&due.and_time(self.cutoff_time()))
            .earliest()
    }

    pub fn classify<Tz: TimeZone>(&self, due: NaiveDate, now: &DateTime<Tz>) -> Urgency {
        let elapsed = match self.cutoff(due, &now.timezone()) {
            Some(cutoff) => now.naive_utc() - cutoff.naive_utc(),
            // cutoff falls in a DST gap; compare wall clocks instead
            None => now.naive_local() - due.and_time(self.cutoff_time()),
        };

        if elapsed > TimeDelta::zero() {
            Urgency::Overdue
        } else if elapsed.num_days().abs() <= self.near_due_days {
            Urgency::NearDue
        } else {
            Urgency::Normal
        }
    }
}

/// Classifies `due` against `now` with the default 17:00 cutoff and 2-day window.
pub fn classify<Tz: TimeZone>(due: NaiveDate, now: &DateTime<Tz>) -> Urgency {
    AuditPolicy::default().classify(due, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_due_today_before_cutoff_is_near_due() {
        assert_eq!(classify(date(2026, 3, 10), &at(2026, 3, 10, 16, 59)), Urgency::NearDue);
    }

    #[test]
    fn test_exactly_at_cutoff_is_not_overdue() {
        assert_eq!(classify(date(2026, 3, 10), &at(2026, 3, 10, 17, 0)), Urgency::NearDue);
    }

    #[test]
    fn test_after_cutoff_is_overdue() {
        assert_eq!(classify(date(2026, 3, 10), &at(2026, 3, 10, 17, 1)), Urgency::Overdue);
    }

    #[test]
    fn test_three_days_ago_is_overdue() {
        assert_eq!(classify(date(2026, 3, 7), &at(2026, 3, 10, 9, 0)), Urgency::Overdue);
    }

    #[test]
    fn test_exactly_two_days_is_near_due() {
        let cutoff = at(2026, 3, 12, 17, 0);
        let now = cutoff - Duration::days(2);
        assert_eq!(classify(date(2026, 3, 12), &now), Urgency::NearDue);
    }

    #[test]
    fn test_partial_days_truncate_toward_zero() {
        // 2 days 23 hours still counts as two whole days
        let now = at(2026, 3, 12, 17, 0) - Duration::hours(71);
        assert_eq!(classify(date(2026, 3, 12), &now), Urgency::NearDue);
    }

    #[test]
    fn test_three_days_is_normal() {
        assert_eq!(classify(date(2026, 3, 13), &at(2026, 3, 10, 9, 0)), Urgency::Normal);
    }

    #[test]
    fn test_cutoff_uses_callers_time_zone() {
        let tz = FixedOffset::east_opt(5 * 3600).unwrap();
        // 16:00 local is before the cutoff even though it is 11:00 UTC
        let now = tz.with_ymd_and_hms(2026, 3, 10, 16, 0, 0).unwrap();
        assert_eq!(classify(date(2026, 3, 10), &now), Urgency::NearDue);
        let later = tz.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap();
        assert_eq!(classify(date(2026, 3, 10), &later), Urgency::Overdue);
    }

    #[test]
    fn test_custom_policy() {
        let policy = AuditPolicy {
            cutoff_hour: 9,
            near_due_days: 0,
        };
        assert_eq!(policy.classify(date(2026, 3, 10), &at(2026, 3, 10, 10, 0)), Urgency::Overdue);
        assert_eq!(policy.classify(date(2026, 3, 11), &at(2026, 3, 10, 10, 0)), Urgency::NearDue);
        assert_eq!(policy.classify(date(2026, 3, 12), &at(2026, 3, 10, 10, 0)), Urgency::Normal);
    }

    #[test]
    fn test_cutoff_in_dst_gap_uses_wall_clock() {
        use chrono_tz::America::New_York;

        // clocks jump from 02:00 to 03:00 on this date
        let policy = AuditPolicy {
            cutoff_hour: 2,
            near_due_days: 2,
        };
        let due = date(2026, 3, 8);
        assert!(policy.cutoff(due, &New_York).is_none());

        let before = New_York.with_ymd_and_hms(2026, 3, 8, 1, 30, 0).unwrap();
        assert_eq!(policy.classify(due, &before), Urgency::NearDue);
        let after = New_York.with_ymd_and_hms(2026, 3, 8, 4, 0, 0).unwrap();
        assert_eq!(policy.classify(due, &after), Urgency::Overdue);
        let days_before = New_York.with_ymd_and_hms(2026, 3, 4, 12, 0, 0).unwrap();
        assert_eq!(policy.classify(due, &days_before), Urgency::Normal);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let now = at(2026, 3, 10, 12, 0);
        let due = date(2026, 3, 11);
        assert_eq!(classify(due, &now), classify(due, &now));
    }
}
