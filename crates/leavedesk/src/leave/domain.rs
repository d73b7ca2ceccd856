use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Applicant recorded when the caller does not supply a username.
pub const DEFAULT_APPLICANT: &str = "Employee";

/// Identifier wrapper for leave records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveId(pub String);

impl LeaveId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeaveId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Categories an employee can pick when applying for leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    #[default]
    Casual,
    Sick,
    Earned,
    Emergency,
}

impl LeaveType {
    pub const ALL: [LeaveType; 4] = [
        LeaveType::Casual,
        LeaveType::Sick,
        LeaveType::Earned,
        LeaveType::Emergency,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LeaveType::Casual => "casual",
            LeaveType::Sick => "sick",
            LeaveType::Earned => "earned",
            LeaveType::Emergency => "emergency",
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeaveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "casual" => Ok(LeaveType::Casual),
            "sick" => Ok(LeaveType::Sick),
            "earned" => Ok(LeaveType::Earned),
            "emergency" => Ok(LeaveType::Emergency),
            other => Err(format!("unknown leave type '{other}'")),
        }
    }
}

/// Review status of a leave record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    /// Approved and rejected are the outcomes a reviewer hands out.
    pub const fn is_decided(self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            other => Err(format!("unknown leave status '{other}'")),
        }
    }
}

/// Fields an employee fills in when applying for leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSubmission {
    #[serde(default)]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl LeaveSubmission {
    /// Reject submissions a reviewer could never act on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reason.trim().is_empty() {
            return Err(ValidationError::EmptyReason);
        }
        if self.end_date < self.start_date {
            return Err(ValidationError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("a reason for the leave is required")]
    EmptyReason,
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// A single leave request and where it sits in the review lifecycle.
///
/// The serialized shape is the persisted layout: camelCase keys, ISO dates, RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    pub id: LeaveId,
    #[serde(default = "default_applicant")]
    pub applicant: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    #[serde(default)]
    pub status: LeaveStatus,
    pub applied_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_date: Option<DateTime<Utc>>,
}

impl LeaveRecord {
    /// Build a fresh pending record from a submission.
    pub fn pending(
        id: LeaveId,
        submission: LeaveSubmission,
        applicant: &str,
        applied_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            applicant: normalize_applicant(applicant),
            leave_type: submission.leave_type,
            start_date: submission.start_date,
            end_date: submission.end_date,
            reason: submission.reason,
            status: LeaveStatus::Pending,
            applied_date,
            processed_date: None,
        }
    }

    pub fn day_span(&self) -> i64 {
        super::metrics::day_span(self.start_date, self.end_date)
    }
}

fn default_applicant() -> String {
    DEFAULT_APPLICANT.to_string()
}

/// The applicant name as given, or the placeholder when it is blank.
pub fn normalize_applicant(applicant: &str) -> String {
    if applicant.trim().is_empty() {
        default_applicant()
    } else {
        applicant.to_string()
    }
}
