use serde::Serialize;

use super::domain::{LeaveRecord, LeaveStatus};
use super::metrics::LeaveBalance;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }
}

/// Records split by review status, each subset in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusPartition {
    pub pending: Vec<LeaveRecord>,
    pub approved: Vec<LeaveRecord>,
    pub rejected: Vec<LeaveRecord>,
}

impl StatusPartition {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a LeaveRecord>,
    {
        let mut partition = Self::default();
        for record in records {
            let bucket = match record.status {
                LeaveStatus::Pending => &mut partition.pending,
                LeaveStatus::Approved => &mut partition.approved,
                LeaveStatus::Rejected => &mut partition.rejected,
            };
            bucket.push(record.clone());
        }
        partition
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            pending: self.pending.len(),
            approved: self.approved.len(),
            rejected: self.rejected.len(),
        }
    }

    pub fn with_status(&self, status: LeaveStatus) -> &[LeaveRecord] {
        match status {
            LeaveStatus::Pending => &self.pending,
            LeaveStatus::Approved => &self.approved,
            LeaveStatus::Rejected => &self.rejected,
        }
    }
}

/// What an employee sees: their own records and remaining allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeLeaveView {
    pub applicant: String,
    pub records: Vec<LeaveRecord>,
    pub balance: LeaveBalance,
}

/// What a reviewer sees: every record plus the review queues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerLeaveView {
    pub records: Vec<LeaveRecord>,
    pub partition: StatusPartition,
    pub counts: StatusCounts,
}

impl ReviewerLeaveView {
    pub fn from_records(records: Vec<LeaveRecord>) -> Self {
        let partition = StatusPartition::from_records(&records);
        let counts = partition.counts();
        Self {
            records,
            partition,
            counts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum LeaveView {
    Employee(EmployeeLeaveView),
    Admin(ReviewerLeaveView),
}
