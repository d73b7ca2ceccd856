use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::domain::{LeaveId, LeaveRecord, LeaveStatus, LeaveSubmission, ValidationError};
use super::lifecycle::{apply_transition, TransitionError, TransitionPolicy};
use super::metrics::{LeaveBalance, DEFAULT_ALLOWANCE_DAYS};
use super::seed::seed_records;
use super::session::Session;
use super::store::{BlobStore, LeaveStore};
use super::views::{EmployeeLeaveView, LeaveView, ReviewerLeaveView};

static LEAVE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_leave_id() -> LeaveId {
    let sequence = LEAVE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeaveId(format!(
        "lv-{}-{sequence:04}",
        Utc::now().timestamp_millis()
    ))
}

/// Knobs for [`LeaveService`], usually built from `AppConfig`.
#[derive(Debug, Clone)]
pub struct LeaveServiceSettings {
    pub policy: TransitionPolicy,
    pub allowance_days: i64,
    pub latency: Duration,
    pub seed_demo_data: bool,
}

impl Default for LeaveServiceSettings {
    fn default() -> Self {
        Self {
            policy: TransitionPolicy::Strict,
            allowance_days: DEFAULT_ALLOWANCE_DAYS,
            latency: Duration::ZERO,
            seed_demo_data: true,
        }
    }
}

/// Submission, listing, and review of leave records over a [`LeaveStore`].
///
/// Every mutation reloads the full sequence, changes it, and writes it back. Within one service
/// (and its clones) those cycles are serialized, so concurrent reviews cannot overwrite each
/// other. Mutations run as spawned tasks: dropping the returned future does not undo the write.
pub struct LeaveService<B> {
    inner: Arc<ServiceInner<B>>,
}

struct ServiceInner<B> {
    store: LeaveStore<B>,
    settings: LeaveServiceSettings,
    write_lock: Mutex<()>,
}

impl<B> Clone for LeaveService<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: BlobStore> LeaveService<B> {
    pub fn new(blobs: Arc<B>, settings: LeaveServiceSettings) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                store: LeaveStore::new(blobs),
                settings,
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn settings(&self) -> &LeaveServiceSettings {
        &self.inner.settings
    }

    pub fn store(&self) -> &LeaveStore<B> {
        &self.inner.store
    }

    /// Record a new pending leave for `applicant` and persist it.
    pub async fn submit(
        &self,
        submission: LeaveSubmission,
        applicant: &str,
    ) -> Result<LeaveRecord, LeaveServiceError> {
        submission.validate()?;

        let inner = Arc::clone(&self.inner);
        let applicant = applicant.to_string();
        detached(async move { inner.submit(submission, &applicant).await }).await
    }

    /// Records filed by `applicant`, in store order.
    pub async fn list_by_applicant(&self, applicant: &str) -> Vec<LeaveRecord> {
        self.inner.simulate_latency().await;
        self.inner
            .records_with_seed()
            .await
            .into_iter()
            .filter(|record| record.applicant == applicant)
            .collect()
    }

    /// Every record, in store order.
    pub async fn list_all(&self) -> Vec<LeaveRecord> {
        self.inner.simulate_latency().await;
        self.inner.records_with_seed().await
    }

    pub async fn get(&self, id: &LeaveId) -> Result<LeaveRecord, LeaveServiceError> {
        self.list_all()
            .await
            .into_iter()
            .find(|record| &record.id == id)
            .ok_or_else(|| LeaveServiceError::NotFound(id.clone()))
    }

    /// Move a record to `status` and stamp when it was processed.
    pub async fn update_status(
        &self,
        id: &LeaveId,
        status: LeaveStatus,
    ) -> Result<LeaveRecord, LeaveServiceError> {
        let inner = Arc::clone(&self.inner);
        let id = id.clone();
        detached(async move { inner.update_status(&id, status).await }).await
    }

    /// Remaining allowance for `applicant`, recomputed from what is persisted.
    pub async fn balance(&self, applicant: &str) -> LeaveBalance {
        let records = self.list_by_applicant(applicant).await;
        LeaveBalance::from_records(self.inner.settings.allowance_days, &records)
    }

    pub async fn employee_view(&self, applicant: &str) -> EmployeeLeaveView {
        let records = self.list_by_applicant(applicant).await;
        let balance = LeaveBalance::from_records(self.inner.settings.allowance_days, &records);
        EmployeeLeaveView {
            applicant: applicant.to_string(),
            records,
            balance,
        }
    }

    pub async fn reviewer_view(&self) -> ReviewerLeaveView {
        ReviewerLeaveView::from_records(self.list_all().await)
    }

    /// The view matching the caller's role.
    pub async fn view_for(&self, session: &Session) -> LeaveView {
        if session.is_reviewer() {
            LeaveView::Admin(self.reviewer_view().await)
        } else {
            LeaveView::Employee(self.employee_view(&session.username).await)
        }
    }
}

impl<B: BlobStore> ServiceInner<B> {
    async fn submit(
        &self,
        submission: LeaveSubmission,
        applicant: &str,
    ) -> Result<LeaveRecord, LeaveServiceError> {
        self.simulate_latency().await;
        let _guard = self.write_lock.lock().await;

        let mut records = self.store.load().await;
        let mut id = next_leave_id();
        while records.iter().any(|record| record.id == id) {
            id = next_leave_id();
        }

        let record = LeaveRecord::pending(id, submission, applicant, Utc::now());
        records.push(record.clone());
        self.store.save(&records).await;

        info!(
            leave_id = %record.id,
            applicant = %record.applicant,
            leave_type = %record.leave_type,
            days = record.day_span(),
            "leave submitted"
        );
        Ok(record)
    }

    async fn update_status(
        &self,
        id: &LeaveId,
        status: LeaveStatus,
    ) -> Result<LeaveRecord, LeaveServiceError> {
        self.simulate_latency().await;
        let _guard = self.write_lock.lock().await;

        let mut records = self.store.load().await;
        let record = records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| LeaveServiceError::NotFound(id.clone()))?;

        let before = record.clone();
        apply_transition(record, status, self.settings.policy, Utc::now())?;
        if *record == before {
            debug!(leave_id = %id, %status, "leave status unchanged");
            return Ok(before);
        }

        let updated = record.clone();
        self.store.save(&records).await;

        info!(leave_id = %id, from = %before.status, to = %status, "leave status updated");
        Ok(updated)
    }

    /// Load the sequence, writing the demonstration dataset first when the store is empty.
    async fn records_with_seed(&self) -> Vec<LeaveRecord> {
        let _guard = self.write_lock.lock().await;

        let records = self.store.load().await;
        if !records.is_empty() || !self.settings.seed_demo_data {
            return records;
        }

        let seeded = seed_records();
        self.store.save(&seeded).await;
        debug!(records = seeded.len(), "seeded empty leave store");
        seeded
    }

    async fn simulate_latency(&self) {
        if !self.settings.latency.is_zero() {
            tokio::time::sleep(self.settings.latency).await;
        }
    }
}

/// Run `operation` on its own task so abandoning the caller does not cancel the write.
async fn detached<F, T>(operation: F) -> Result<T, LeaveServiceError>
where
    F: Future<Output = Result<T, LeaveServiceError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(operation)
        .await
        .map_err(|err| LeaveServiceError::Interrupted(err.to_string()))?
}

/// Error raised by the leave service.
#[derive(Debug, thiserror::Error)]
pub enum LeaveServiceError {
    #[error("leave application {0} not found")]
    NotFound(LeaveId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("leave operation interrupted: {0}")]
    Interrupted(String),
}

impl LeaveServiceError {
    /// HTTP status shared by the leave router and `AppError`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            LeaveServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            LeaveServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LeaveServiceError::Transition(_) => StatusCode::CONFLICT,
            LeaveServiceError::Interrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
