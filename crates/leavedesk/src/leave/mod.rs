//! Leave request lifecycle: submission, persistence, review, and role-scoped views.
//!
//! Records live as one ordered JSON array inside a [`BlobStore`]. [`LeaveService`] is the only
//! writer; it reloads, mutates, and rewrites the whole array on every change.

pub mod domain;
pub mod lifecycle;
pub mod metrics;
pub mod router;
pub mod seed;
pub mod service;
pub mod session;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    normalize_applicant, LeaveId, LeaveRecord, LeaveStatus, LeaveSubmission, LeaveType,
    ValidationError, DEFAULT_APPLICANT,
};
pub use lifecycle::{apply_transition, TransitionError, TransitionPolicy};
pub use metrics::{day_span, LeaveBalance, DEFAULT_ALLOWANCE_DAYS};
pub use router::leave_router;
pub use seed::seed_records;
pub use service::{LeaveService, LeaveServiceError, LeaveServiceSettings};
pub use session::{Role, Session, SessionError};
pub use store::{
    BlobStore, BlobStoreError, FileBlobStore, LeaveStore, MemoryBlobStore, StoreCorruptionError,
    LEAVE_STORAGE_KEY, USERS_STORAGE_KEY,
};
pub use views::{EmployeeLeaveView, LeaveView, ReviewerLeaveView, StatusCounts, StatusPartition};
