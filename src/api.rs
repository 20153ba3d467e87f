//! HTTP surface for the student service.
//!
//! - `POST /students` – Validate and store a new record (`201 {"data": Student}`).
//! - `GET /students` – List every record in store order (`{"data": [Student]}`).
//! - `GET /students/:id` – Fetch one record.
//! - `PUT /students/:id` – Replace a record's fields; the record moves to the end of the list.
//! - `DELETE /students/:id` – Remove a record and return its last values.
//! - `GET /students/:id/summary` – Ask the generation runtime for a summary
//!   (`{"summary": text}`).
//!
//! Failures are returned as `{"error": message}` with 400 for rejected input, 404 for unknown
//! ids and 500 when summary generation fails for any reason.

use crate::store::{StoreError, Student, StudentInput, StudentStore};
use crate::summary::{SummaryClient, SummaryError};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Record store shared by all requests.
    pub store: Arc<StudentStore>,
    /// Summary provider used by the summary endpoint.
    pub summaries: Arc<dyn SummaryClient>,
}

impl AppState {
    /// Bundle a store and a summary provider.
    pub fn new(store: Arc<StudentStore>, summaries: Arc<dyn SummaryClient>) -> Self {
        Self { store, summaries }
    }
}

/// Build the HTTP router exposing the student API.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/students/:id/summary", get(get_summary))
        .with_state(state)
}

#[derive(Serialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Serialize)]
struct SummaryEnvelope {
    summary: String,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: String,
}

async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<Student>>), AppError> {
    let Json(input) = payload?;
    let student = state.store.create(input)?;
    tracing::info!(id = %student.id, "Student created");
    Ok((StatusCode::CREATED, Json(DataEnvelope { data: student })))
}

async fn list_students(State(state): State<AppState>) -> Json<DataEnvelope<Vec<Student>>> {
    let students = state.store.list();
    tracing::debug!(count = students.len(), "Listed students");
    Json(DataEnvelope { data: students })
}

async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<Student>>, AppError> {
    let student = state.store.get(&id)?;
    Ok(Json(DataEnvelope { data: student }))
}

async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<Json<DataEnvelope<Student>>, AppError> {
    let Json(input) = payload?;
    let student = state.store.update(&id, input)?;
    tracing::info!(id = %student.id, "Student updated");
    Ok(Json(DataEnvelope { data: student }))
}

async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<Student>>, AppError> {
    let student = state.store.delete(&id)?;
    tracing::info!(id = %student.id, "Student deleted");
    Ok(Json(DataEnvelope { data: student }))
}

/// The record is copied out of the store first; the lock is not held during the call-out.
async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryEnvelope>, AppError> {
    let student = state.store.get(&id)?;
    let summary = state.summaries.generate_summary(&student).await?;
    tracing::info!(id = %student.id, chars = summary.len(), "Summary generated");
    Ok(Json(SummaryEnvelope { summary }))
}

enum AppError {
    Body(JsonRejection),
    Store(StoreError),
    Summary(SummaryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Body(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "Rejected request body");
                (StatusCode::BAD_REQUEST, "invalid request body".to_string())
            }
            Self::Store(error @ StoreError::InvalidInput(_)) => {
                tracing::warn!(%error, "Rejected student input");
                (StatusCode::BAD_REQUEST, error.to_string())
            }
            Self::Store(error @ StoreError::NotFound) => (StatusCode::NOT_FOUND, error.to_string()),
            // Causes are logged only; clients see one generic message.
            Self::Summary(error) => {
                tracing::error!(%error, "Summary generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "error generating summary".to_string(),
                )
            }
        };
        (status, Json(ErrorEnvelope { error: message })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(inner: JsonRejection) -> Self {
        Self::Body(inner)
    }
}

impl From<StoreError> for AppError {
    fn from(inner: StoreError) -> Self {
        Self::Store(inner)
    }
}

impl From<SummaryError> for AppError {
    fn from(inner: SummaryError) -> Self {
        Self::Summary(inner)
    }
}
