use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::leave::domain::{LeaveSubmission, LeaveType};
use crate::leave::service::{LeaveService, LeaveServiceSettings};
use crate::leave::store::{BlobStore, BlobStoreError, MemoryBlobStore};
use crate::leave::{leave_router, LEAVE_STORAGE_KEY};

pub(super) fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub(super) fn submission(start: &str, end: &str) -> LeaveSubmission {
    LeaveSubmission {
        leave_type: LeaveType::Casual,
        start_date: date(start),
        end_date: date(end),
        reason: "Family trip".to_string(),
    }
}

pub(super) fn unseeded_settings() -> LeaveServiceSettings {
    LeaveServiceSettings {
        seed_demo_data: false,
        ..LeaveServiceSettings::default()
    }
}

/// Service over a fresh in-memory store with demo seeding switched off.
pub(super) fn build_service() -> (LeaveService<MemoryBlobStore>, Arc<MemoryBlobStore>) {
    let blobs = Arc::new(MemoryBlobStore::default());
    let service = LeaveService::new(blobs.clone(), unseeded_settings());
    (service, blobs)
}

pub(super) fn seeded_service() -> (LeaveService<MemoryBlobStore>, Arc<MemoryBlobStore>) {
    let blobs = Arc::new(MemoryBlobStore::default());
    let service = LeaveService::new(blobs.clone(), LeaveServiceSettings::default());
    (service, blobs)
}

pub(super) fn persisted(blobs: &MemoryBlobStore) -> Option<String> {
    blobs.raw(LEAVE_STORAGE_KEY)
}

pub(super) fn router_with_service(service: LeaveService<MemoryBlobStore>) -> axum::Router {
    leave_router(Arc::new(service))
}

/// Reads nothing back and refuses every write.
pub(super) struct ReadOnlyBlobStore;

impl BlobStore for ReadOnlyBlobStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, BlobStoreError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), BlobStoreError> {
        Err(BlobStoreError::Unavailable("read only".to_string()))
    }
}

/// Every read fails.
pub(super) struct OfflineBlobStore;

impl BlobStore for OfflineBlobStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, BlobStoreError> {
        Err(BlobStoreError::Unavailable("disk offline".to_string()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), BlobStoreError> {
        Err(BlobStoreError::Unavailable("disk offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
