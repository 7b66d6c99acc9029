use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{Actor, ReferenceNumber};
use super::handler::UpdateError;
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{
    ApplicationStatusService, CloseLatch, StatusChangeInput, StatusChangeOutcome,
};

pub const ACTOR_NAME_HEADER: &str = "x-actor-name";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Router exposing application summaries and the status update form.
pub fn status_router<R>(service: Arc<ApplicationStatusService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/applications", get(list_handler::<R>))
        .route(
            "/api/v1/applications/:reference",
            get(record_handler::<R>),
        )
        .route(
            "/api/v1/applications/:reference/status-form",
            get(form_handler::<R>),
        )
        .route(
            "/api/v1/applications/:reference/status",
            post(change_status_handler::<R>),
        )
        .with_state(service)
}

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Reviewer identity from the session headers; the role falls back to the
/// configured reviewer's role when only a name is supplied.
pub(crate) fn session_actor(headers: &HeaderMap, fallback: &Actor) -> Option<Actor> {
    let name = header_value(headers, ACTOR_NAME_HEADER)?;
    let role = header_value(headers, ACTOR_ROLE_HEADER).unwrap_or(fallback.role.as_str());
    Some(Actor::new(name, role))
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

fn repository_error_response(error: RepositoryError) -> Response {
    let status = match error {
        RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error.to_string())
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list() {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
    Path(reference): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&ReferenceNumber(reference)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn form_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
    Path(reference): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let latch = Arc::new(CloseLatch::default());
    match service.open_form(&ReferenceNumber(reference), None, latch) {
        Ok(form) => (StatusCode::OK, axum::Json(form.view())).into_response(),
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn change_status_handler<R>(
    State(service): State<Arc<ApplicationStatusService<R>>>,
    Path(reference): Path<String>,
    headers: HeaderMap,
    axum::Json(input): axum::Json<StatusChangeInput>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let actor = session_actor(&headers, service.default_actor());
    let reference = ReferenceNumber(reference);

    match service.change_status(&reference, input, actor).await {
        Ok(StatusChangeOutcome::Updated(record)) => {
            (StatusCode::OK, axum::Json(record)).into_response()
        }
        Ok(StatusChangeOutcome::Rejected(form)) => {
            let message = form
                .notice
                .as_ref()
                .map(|notice| notice.message.clone())
                .unwrap_or_else(|| "status update was not submitted".to_string());
            let payload = json!({ "error": message, "form": form });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Ok(StatusChangeOutcome::Failed { error, form }) => {
            let status = match error {
                UpdateError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
                UpdateError::Rejected(_) | UpdateError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let payload = json!({ "error": error.to_string(), "form": form });
            (status, axum::Json(payload)).into_response()
        }
        Err(error) => repository_error_response(error),
    }
}
