use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::domain::{LeaveRecord, LeaveStatus};

/// Which status changes a reviewer is allowed to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Only `pending -> approved`, `pending -> rejected`, and repeats of the current status.
    #[default]
    Strict,
    /// Any status may be overwritten with any other.
    Permissive,
}

impl TransitionPolicy {
    pub fn allows(self, from: LeaveStatus, to: LeaveStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => {
                from == to || (from == LeaveStatus::Pending && to.is_decided())
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TransitionPolicy::Strict => "strict",
            TransitionPolicy::Permissive => "permissive",
        }
    }
}

impl fmt::Display for TransitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TransitionPolicy::Strict),
            "permissive" | "legacy" => Ok(TransitionPolicy::Permissive),
            other => Err(format!("unknown transition policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot move a {from} leave to {to}")]
    InvalidTransition { from: LeaveStatus, to: LeaveStatus },
}

/// Apply a reviewer decision to `record`, stamping `processed_date` when the decision lands.
///
/// `pending -> pending` under the strict policy leaves the record untouched.
pub fn apply_transition(
    record: &mut LeaveRecord,
    target: LeaveStatus,
    policy: TransitionPolicy,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    let from = record.status;
    if !policy.allows(from, target) {
        return Err(TransitionError::InvalidTransition { from, to: target });
    }

    if policy == TransitionPolicy::Strict && !target.is_decided() {
        return Ok(());
    }

    record.status = target;
    record.processed_date = Some(now);
    Ok(())
}
