use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{ApplicationId, JobId, UserId};
use super::policy::PipelineSettings;
use super::repository::ApplicationRepository;
use super::request::{ColumnStatusPayload, DirectStatusPayload, StatusUpdateRequest};
use super::resolver::ResolutionError;
use super::service::{ApplicationStatusService, StatusUpdateError, TransitionOutcome};

/// Header carrying the numeric user id resolved by the upstream session layer.
pub const CALLER_HEADER: &str = "x-user-id";

/// Authenticated caller of the application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(|id| CallerId(UserId(id)))
            .ok_or_else(|| {
                let payload = json!({ "success": false, "error": "authentication required" });
                (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
            })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationPayload {
    pub job_id: Option<u64>,
}

/// Router builder exposing the application status endpoints.
pub fn application_router<R>(service: Arc<ApplicationStatusService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            post(create_handler::<R>).get(board_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/history",
            get(history_handler::<R>),
        )
        .route(
            "/api/v1/application-status",
            post(column_status_handler::<R>),
        )
        .route(
            "/api/v1/application-status/direct",
            post(direct_status_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn column_status_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
    CallerId(caller): CallerId,
    payload: Result<Json<ColumnStatusPayload>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let settings = service.settings();
    let result = payload
        .map_err(|rejection| StatusUpdateError::InvalidInput(rejection.body_text()))
        .and_then(|Json(payload)| StatusUpdateRequest::try_from(payload))
        .and_then(|request| service.update(caller, request));

    match result {
        Ok(outcome) => update_response(outcome),
        Err(error) => error_response(&error, settings),
    }
}

pub(crate) async fn direct_status_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
    CallerId(caller): CallerId,
    payload: Result<Json<DirectStatusPayload>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let settings = service.settings();
    let result = payload
        .map_err(|rejection| StatusUpdateError::InvalidInput(rejection.body_text()))
        .and_then(|Json(payload)| StatusUpdateRequest::try_from(payload))
        .and_then(|request| service.update(caller, request));

    match result {
        Ok(outcome) => update_response(outcome),
        Err(error) => error_response(&error, settings),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
    CallerId(caller): CallerId,
    payload: Result<Json<CreateApplicationPayload>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let settings = service.settings();
    let result = payload
        .map_err(|rejection| StatusUpdateError::InvalidInput(rejection.body_text()))
        .and_then(|Json(payload)| {
            payload
                .job_id
                .map(JobId)
                .ok_or_else(|| StatusUpdateError::InvalidInput("jobId is required".to_string()))
        })
        .and_then(|job_id| service.create(caller, job_id));

    match result {
        Ok(record) => (StatusCode::CREATED, Json(record.status_view())).into_response(),
        Err(error) => error_response(&error, settings),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
    CallerId(caller): CallerId,
    Path(application_id): Path<u64>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(caller, ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => error_response(&error, service.settings()),
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
    CallerId(caller): CallerId,
    Path(application_id): Path<u64>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let application_id = ApplicationId(application_id);
    match service.history(caller, application_id) {
        Ok(entries) => {
            let payload = json!({
                "applicationId": application_id,
                "history": entries,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(&error, service.settings()),
    }
}

pub(crate) async fn board_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
    CallerId(caller): CallerId,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.board(caller) {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(error) => error_response(&error, service.settings()),
    }
}

fn update_response(outcome: TransitionOutcome) -> Response {
    let message = if outcome.changed {
        format!(
            "application status updated from {} to {}",
            outcome.previous, outcome.application.status
        )
    } else {
        "application status unchanged".to_string()
    };

    let payload = json!({
        "success": true,
        "message": message,
        "changed": outcome.changed,
        "application": outcome.application,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) fn error_response(error: &StatusUpdateError, settings: PipelineSettings) -> Response {
    let status = match error {
        StatusUpdateError::InvalidInput(_) | StatusUpdateError::Resolution(_) => {
            StatusCode::BAD_REQUEST
        }
        StatusUpdateError::NotFound { .. } => StatusCode::NOT_FOUND,
        StatusUpdateError::TerminalStatusLocked { .. } => StatusCode::CONFLICT,
        StatusUpdateError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut payload = json!({
        "success": false,
        "error": error.to_string(),
    });

    match error {
        StatusUpdateError::Resolution(ResolutionError::InvalidStatusCombination {
            column,
            sub_stage,
        }) => {
            payload["column"] = json!(column);
            payload["subStage"] = json!(sub_stage);
        }
        StatusUpdateError::Persistence(_) if settings.disclose_error_details => {
            payload["details"] = Value::from(source_chain(error));
        }
        _ => {}
    }

    (status, Json(payload)).into_response()
}

fn source_chain(error: &dyn std::error::Error) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = error.source();
    while let Some(source) = current {
        chain.push(source.to_string());
        current = source.source();
    }
    chain
}
