use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{LeaveId, LeaveStatus, LeaveSubmission, LeaveType};
use super::service::{LeaveService, LeaveServiceError};
use super::session::Session;
use super::store::BlobStore;

/// Router builder exposing leave submission, listing, and review endpoints.
pub fn leave_router<B: BlobStore>(service: Arc<LeaveService<B>>) -> Router {
    Router::new()
        .route("/api/v1/session", post(sign_in_handler))
        .route("/api/v1/signup", post(sign_up_handler))
        .route(
            "/api/v1/leaves",
            post(submit_handler::<B>).get(list_handler::<B>),
        )
        .route("/api/v1/leaves/:leave_id", get(get_handler::<B>))
        .route(
            "/api/v1/leaves/:leave_id/status",
            patch(update_status_handler::<B>),
        )
        .route("/api/v1/review/leaves", get(review_handler::<B>))
        .route(
            "/api/v1/employees/:applicant/leaves",
            get(employee_handler::<B>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignInRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignUpRequest {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) confirm_password: String,
    #[serde(default)]
    pub(crate) email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitLeaveRequest {
    #[serde(default)]
    pub(crate) applicant: Option<String>,
    #[serde(default)]
    pub(crate) leave_type: LeaveType,
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: NaiveDate,
    pub(crate) reason: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) applicant: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub(crate) status: LeaveStatus,
}

pub(crate) async fn sign_in_handler(Json(request): Json<SignInRequest>) -> Response {
    match Session::sign_in(&request.username, &request.password) {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

/// Accepts a well-formed sign-up and keeps nothing.
pub(crate) async fn sign_up_handler(Json(request): Json<SignUpRequest>) -> Response {
    match Session::sign_up(
        &request.username,
        &request.password,
        &request.confirm_password,
        &request.email,
    ) {
        Ok(()) => {
            let payload = json!({ "username": request.username });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<B: BlobStore>(
    State(service): State<Arc<LeaveService<B>>>,
    Json(request): Json<SubmitLeaveRequest>,
) -> Response {
    let applicant = request.applicant.unwrap_or_default();
    let submission = LeaveSubmission {
        leave_type: request.leave_type,
        start_date: request.start_date,
        end_date: request.end_date,
        reason: request.reason,
    };

    match service.submit(submission, &applicant).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<B: BlobStore>(
    State(service): State<Arc<LeaveService<B>>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let records = match query.applicant {
        Some(applicant) => service.list_by_applicant(&applicant).await,
        None => service.list_all().await,
    };
    (StatusCode::OK, Json(records)).into_response()
}

pub(crate) async fn get_handler<B: BlobStore>(
    State(service): State<Arc<LeaveService<B>>>,
    Path(leave_id): Path<String>,
) -> Response {
    match service.get(&LeaveId(leave_id)).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<B: BlobStore>(
    State(service): State<Arc<LeaveService<B>>>,
    Path(leave_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response {
    match service
        .update_status(&LeaveId(leave_id), request.status)
        .await
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<B: BlobStore>(
    State(service): State<Arc<LeaveService<B>>>,
) -> Response {
    (StatusCode::OK, Json(service.reviewer_view().await)).into_response()
}

pub(crate) async fn employee_handler<B: BlobStore>(
    State(service): State<Arc<LeaveService<B>>>,
    Path(applicant): Path<String>,
) -> Response {
    (StatusCode::OK, Json(service.employee_view(&applicant).await)).into_response()
}

fn error_response(error: LeaveServiceError) -> Response {
    let status = error.status_code();
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
