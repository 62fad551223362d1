//! Day-level read model over the archive.
//!
//! # Responsibility
//! - Group archived memos by the calendar day of `created_at`.
//! - Answer today/yesterday/older bucketing and per-day goal queries.
//!
//! # Invariants
//! - Derived only; holds no state beyond a borrow of the records.
//! - Days are calendar days in the index's time zone, never 24-hour windows.
//! - "Today" derives from the instant the index was built with, not the wall clock.
//! - `bucket` partitions the records: every record lands in exactly one bucket.
//! - "Has records" and "meets goal" are separate predicates.

use crate::model::memo::ArchivedMemo;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Aggregate for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub memo_count: usize,
    /// `memo_count >= daily_goal`.
    pub completed: bool,
}

/// Day-relative grouping; each list keeps archive order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets<'a> {
    pub today: Vec<&'a ArchivedMemo>,
    pub yesterday: Vec<&'a ArchivedMemo>,
    pub older: Vec<&'a ArchivedMemo>,
}

impl Buckets<'_> {
    pub fn total(&self) -> usize {
        self.today.len() + self.yesterday.len() + self.older.len()
    }
}

pub struct HistoryIndex<'a, Tz: TimeZone> {
    records: &'a [ArchivedMemo],
    tz: Tz,
    now: DateTime<Utc>,
}

impl<'a> HistoryIndex<'a, Local> {
    /// Index in the process's local time zone.
    pub fn local(records: &'a [ArchivedMemo], now: DateTime<Utc>) -> Self {
        Self::new(records, Local, now)
    }
}

impl<'a, Tz: TimeZone> HistoryIndex<'a, Tz> {
    /// Index over `records`, with `now` as the current instant.
    pub fn new(records: &'a [ArchivedMemo], tz: Tz, now: DateTime<Utc>) -> Self {
        Self { records, tz, now }
    }

    /// Calendar day a record belongs to.
    pub fn day_of(&self, record: &ArchivedMemo) -> NaiveDate {
        record.created_at.with_timezone(&self.tz).date_naive()
    }

    /// Current calendar day in this index's time zone.
    pub fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.tz).date_naive()
    }

    /// Records created on `date`, in archive order.
    pub fn for_day(&self, date: NaiveDate) -> Vec<&'a ArchivedMemo> {
        self.records
            .iter()
            .filter(|record| self.day_of(record) == date)
            .collect()
    }

    /// Buckets relative to the current day.
    pub fn bucket(&self) -> Buckets<'a> {
        self.bucket_on(self.today())
    }

    /// Buckets relative to `today`.
    ///
    /// Records dated after `today` (clock moved backwards) count as today.
    pub fn bucket_on(&self, today: NaiveDate) -> Buckets<'a> {
        let yesterday = today.pred_opt();
        let mut buckets = Buckets::default();
        for record in self.records {
            let day = self.day_of(record);
            if day >= today {
                buckets.today.push(record);
            } else if Some(day) == yesterday {
                buckets.yesterday.push(record);
            } else {
                buckets.older.push(record);
            }
        }
        buckets
    }

    /// Distinct days holding at least one record.
    pub fn days_with_records(&self) -> BTreeSet<NaiveDate> {
        self.records.iter().map(|record| self.day_of(record)).collect()
    }

    /// Distinct days whose record count reaches `daily_goal`.
    pub fn days_meeting_goal(&self, daily_goal: u32) -> BTreeSet<NaiveDate> {
        self.counts_by_day()
            .into_iter()
            .filter(|(_, count)| meets_goal(*count, daily_goal))
            .map(|(date, _)| date)
            .collect()
    }

    pub fn day_record(&self, date: NaiveDate, daily_goal: u32) -> DayRecord {
        let memo_count = self
            .records
            .iter()
            .filter(|record| self.day_of(record) == date)
            .count();
        DayRecord {
            date,
            memo_count,
            completed: meets_goal(memo_count, daily_goal),
        }
    }

    /// One aggregate per day with records, newest day first.
    pub fn day_records(&self, daily_goal: u32) -> Vec<DayRecord> {
        self.counts_by_day()
            .into_iter()
            .rev()
            .map(|(date, memo_count)| DayRecord {
                date,
                memo_count,
                completed: meets_goal(memo_count, daily_goal),
            })
            .collect()
    }

    fn counts_by_day(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for record in self.records {
            *counts.entry(self.day_of(record)).or_insert(0) += 1;
        }
        counts
    }
}

fn meets_goal(count: usize, daily_goal: u32) -> bool {
    u64::try_from(count).unwrap_or(u64::MAX) >= u64::from(daily_goal)
}

#[cfg(test)]
mod tests {
    use super::HistoryIndex;
    use crate::model::memo::ArchivedMemo;
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};

    fn memo_at(tz: &FixedOffset, y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> ArchivedMemo {
        let created = tz
            .with_ymd_and_hms(y, m, d, h, min, s)
            .unwrap()
            .with_timezone(&Utc);
        ArchivedMemo::new("t", vec![], created, Some(created)).unwrap()
    }

    #[test]
    fn midnight_boundary_splits_buckets() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let records = vec![
            memo_at(&tz, 2026, 5, 2, 0, 0, 1),
            memo_at(&tz, 2026, 5, 1, 23, 59, 59),
        ];
        let index = HistoryIndex::new(&records, tz, Utc::now());
        let today = NaiveDate::from_ymd_opt(2026, 5, 2).unwrap();

        let buckets = index.bucket_on(today);
        assert_eq!(buckets.today.len(), 1);
        assert_eq!(buckets.yesterday.len(), 1);
        assert!(buckets.older.is_empty());
    }

    #[test]
    fn day_is_taken_in_index_time_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let records = vec![memo_at(&tokyo, 2026, 5, 2, 3, 0, 0)];
        let utc_index = HistoryIndex::new(&records, FixedOffset::east_opt(0).unwrap(), Utc::now());
        assert_eq!(
            utc_index.day_of(&records[0]),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
        );
    }

    #[test]
    fn goal_predicate_differs_from_presence() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let records = vec![
            memo_at(&tz, 2026, 5, 2, 8, 0, 0),
            memo_at(&tz, 2026, 5, 2, 9, 0, 0),
            memo_at(&tz, 2026, 5, 1, 9, 0, 0),
        ];
        let index = HistoryIndex::new(&records, tz, Utc::now());

        assert_eq!(index.days_with_records().len(), 2);
        let met = index.days_meeting_goal(2);
        assert_eq!(met.len(), 1);
        assert!(met.contains(&NaiveDate::from_ymd_opt(2026, 5, 2).unwrap()));

        let days = index.day_records(2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 5, 2).unwrap());
        assert!(days[0].completed);
        assert!(!days[1].completed);
    }

    #[test]
    fn today_follows_build_instant_in_index_zone() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let records = vec![
            memo_at(&tz, 2026, 5, 2, 0, 0, 1),
            memo_at(&tz, 2026, 5, 1, 23, 59, 59),
        ];
        // 2026-05-01T15:30Z is 00:30 on May 2 in UTC+9.
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 15, 30, 0).unwrap();
        let index = HistoryIndex::new(&records, tz, now);

        assert_eq!(index.today(), NaiveDate::from_ymd_opt(2026, 5, 2).unwrap());
        let buckets = index.bucket();
        assert_eq!(buckets.today.len(), 1);
        assert_eq!(buckets.yesterday.len(), 1);

        let week_later = HistoryIndex::new(&records, tz, now + Duration::days(7));
        assert_eq!(week_later.bucket().older.len(), 2);
    }
}
