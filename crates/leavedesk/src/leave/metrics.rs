use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{LeaveRecord, LeaveStatus};

/// Allowance every employee starts the year with.
pub const DEFAULT_ALLOWANCE_DAYS: i64 = 18;

/// Inclusive number of calendar days between `start` and `end`.
///
/// A same-day leave counts as one day. Reversed ranges produce zero or a negative count.
pub fn day_span(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Remaining allowance for one applicant, derived from the persisted record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaveBalance {
    pub allowance: i64,
    pub committed_days: i64,
    pub remaining: i64,
}

impl LeaveBalance {
    /// Pending and approved records consume allowance; rejected ones hand it back.
    pub fn from_records<'a, I>(allowance: i64, records: I) -> Self
    where
        I: IntoIterator<Item = &'a LeaveRecord>,
    {
        let committed_days = records
            .into_iter()
            .filter(|record| record.status != LeaveStatus::Rejected)
            .map(|record| record.day_span().max(0))
            .sum();

        Self {
            allowance,
            committed_days,
            remaining: allowance - committed_days,
        }
    }
}
