use chrono::NaiveDate;
use leavedesk::config::LeaveConfig;
use leavedesk::leave::{
    FileBlobStore, LeaveRecord, LeaveService, LeaveServiceSettings, MemoryBlobStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn file_leave_service(config: &LeaveConfig) -> LeaveService<FileBlobStore> {
    let blobs = Arc::new(FileBlobStore::new(config.store_dir.clone()));
    LeaveService::new(blobs, config.service_settings())
}

pub(crate) fn memory_leave_service(
    settings: LeaveServiceSettings,
) -> LeaveService<MemoryBlobStore> {
    LeaveService::new(Arc::new(MemoryBlobStore::default()), settings)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn render_record(record: &LeaveRecord) -> String {
    let processed = record
        .processed_date
        .map(|at| format!(" | processed {}", at.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    format!(
        "{} | {} | {} | {} -> {} ({} days) | {} | {}{}",
        record.id,
        record.applicant,
        record.leave_type,
        record.start_date,
        record.end_date,
        record.day_span(),
        record.status,
        record.reason,
        processed
    )
}
