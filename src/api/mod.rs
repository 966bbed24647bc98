//! HTTP surface for the presentation collaborator. Clients never touch
//! storage directly; every read and write goes through these routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use sendloop_core::models::{
    CreateTaskInput, ProgressEntry, ReminderSettings, SetReminderInput, Task, Tier, TierLimits,
    UpdateTaskInput,
};
use sendloop_core::service::{CreateTaskOutcome, HabitService, TaskOverview};
use sendloop_core::{policy, CoreError};

pub fn create_router(service: HabitService) -> Router {
    Router::new()
        .route("/tasks", post(create_task).get(list_tasks))
        .route(
            "/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/archive", post(archive_task))
        .route(
            "/tasks/{id}/progress",
            post(record_progress).get(list_progress),
        )
        .route(
            "/tasks/{id}/progress/{date}",
            get(check_progress).delete(delete_progress),
        )
        .route("/tasks/{id}/overview", get(task_overview))
        .route(
            "/tasks/{id}/reminder",
            put(set_reminder).get(get_reminder).delete(clear_reminder),
        )
        .route("/limits/{tier}", get(tier_limits))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::Validation { .. } => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CreateTaskRequest {
    /// Supplied by the subscription collaborator; defaults to free.
    #[serde(default)]
    tier: Tier,
    #[serde(flatten)]
    input: CreateTaskInput,
}

#[derive(Debug, Default, Deserialize)]
struct RecordProgressRequest {
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct SetReminderRequest {
    enabled: bool,
    time: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProgressCheck {
    date: NaiveDate,
    recorded: bool,
}

async fn create_task(
    State(service): State<HabitService>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<CreateTaskOutcome>), ApiError> {
    let outcome = service.create_task(req.tier, req.input)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn list_tasks(State(service): State<HabitService>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(service.active_tasks()?))
}

async fn get_task(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(service.get_task(id)?))
}

async fn update_task(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
    Json(updates): Json<UpdateTaskInput>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(service.update_task(id, updates)?))
}

async fn archive_task(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.archive_task(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_task(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.delete_task(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn record_progress(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
    body: Option<Json<RecordProgressRequest>>,
) -> Result<(StatusCode, Json<ProgressEntry>), ApiError> {
    let date = body.and_then(|Json(req)| req.date);
    let entry = service.record_progress(id, date)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list_progress(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ProgressEntry>>, ApiError> {
    // Surface a 404 for unknown tasks instead of an empty list.
    service.get_task(id)?;
    Ok(Json(service.progress_for_task(id)?))
}

async fn check_progress(
    State(service): State<HabitService>,
    Path((id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<ProgressCheck>, ApiError> {
    service.get_task(id)?;
    let recorded = service.has_progress_on(id, date)?;
    Ok(Json(ProgressCheck { date, recorded }))
}

async fn delete_progress(
    State(service): State<HabitService>,
    Path((id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<StatusCode, ApiError> {
    service.delete_progress(id, date)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn task_overview(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskOverview>, ApiError> {
    // The clock stops at the API boundary; the core takes `today` as data.
    let today = Utc::now().date_naive();
    Ok(Json(service.task_overview(id, today)?))
}

async fn set_reminder(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetReminderRequest>,
) -> Result<Json<ReminderSettings>, ApiError> {
    let settings = service.set_reminder(SetReminderInput {
        task_id: id,
        enabled: req.enabled,
        time: req.time,
    })?;
    Ok(Json(settings))
}

async fn get_reminder(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<ReminderSettings>>, ApiError> {
    service.get_task(id)?;
    Ok(Json(service.reminder_for(id)?))
}

async fn clear_reminder(
    State(service): State<HabitService>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.clear_reminder(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn tier_limits(Path(tier): Path<Tier>) -> Json<TierLimits> {
    Json(policy::limits(tier))
}
