//! Demonstration records written into an empty store on first access.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::domain::{LeaveRecord, LeaveStatus, LeaveType};
use super::service::next_leave_id;

struct SeedLeave {
    leave_type: LeaveType,
    start: (i32, u32, u32),
    end: (i32, u32, u32),
    reason: &'static str,
    status: LeaveStatus,
    applicant: &'static str,
    applied: (i32, u32, u32),
}

const SEED_LEAVES: [SeedLeave; 3] = [
    SeedLeave {
        leave_type: LeaveType::Casual,
        start: (2023, 10, 15),
        end: (2023, 10, 16),
        reason: "Family function",
        status: LeaveStatus::Approved,
        applicant: "john_doe",
        applied: (2023, 10, 10),
    },
    SeedLeave {
        leave_type: LeaveType::Sick,
        start: (2023, 10, 20),
        end: (2023, 10, 21),
        reason: "Fever and cold",
        status: LeaveStatus::Approved,
        applicant: "jane_smith",
        applied: (2023, 10, 18),
    },
    SeedLeave {
        leave_type: LeaveType::Emergency,
        start: (2023, 11, 1),
        end: (2023, 11, 1),
        reason: "Urgent personal work",
        status: LeaveStatus::Pending,
        applicant: "john_doe",
        applied: (2023, 10, 30),
    },
];

/// The canonical demonstration dataset, each record with a freshly generated id.
pub fn seed_records() -> Vec<LeaveRecord> {
    SEED_LEAVES
        .iter()
        .filter_map(|seed| {
            Some(LeaveRecord {
                id: next_leave_id(),
                applicant: seed.applicant.to_string(),
                leave_type: seed.leave_type,
                start_date: date(seed.start)?,
                end_date: date(seed.end)?,
                reason: seed.reason.to_string(),
                status: seed.status,
                applied_date: midnight(seed.applied)?,
                processed_date: None,
            })
        })
        .collect()
}

fn date((year, month, day): (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn midnight((year, month, day): (i32, u32, u32)) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_has_three_literal_records() {
        let records = seed_records();
        let shape: Vec<_> = records
            .iter()
            .map(|record| (record.leave_type, record.status))
            .collect();

        assert_eq!(
            shape,
            vec![
                (LeaveType::Casual, LeaveStatus::Approved),
                (LeaveType::Sick, LeaveStatus::Approved),
                (LeaveType::Emergency, LeaveStatus::Pending),
            ]
        );
        assert_eq!(records[1].applicant, "jane_smith");
        assert_eq!(records[2].day_span(), 1);
    }

    #[test]
    fn every_seeding_gets_fresh_ids() {
        let first = seed_records();
        let second = seed_records();
        let ids: HashSet<_> = first.iter().chain(&second).map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), 6);
    }
}
