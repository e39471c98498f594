use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BloodGroup, DonorId, DonorRegistration, DonorStatusView, ScreeningRequest};
use super::repository::{DonorRepository, NotificationDispatcher, RepositoryError};
use super::service::{DonorScreeningService, ScreeningServiceError};
use crate::workflows::eligibility::DonorAssessmentInput;

/// Router exposing eligibility checks and donor screening endpoints.
pub fn screening_router<R, N>(service: Arc<DonorScreeningService<R, N>>) -> Router
where
    R: DonorRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/evaluate", post(evaluate_handler::<R, N>))
        .route("/api/v1/donors", post(register_handler::<R, N>))
        .route("/api/v1/donors/:donor_id", get(status_handler::<R, N>))
        .route(
            "/api/v1/donors/:donor_id/screenings",
            post(screening_handler::<R, N>),
        )
        .route("/api/v1/available-donors", get(available_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AvailableQuery {
    pub(crate) blood_group: Option<String>,
}

pub(crate) async fn evaluate_handler<R, N>(
    State(service): State<Arc<DonorScreeningService<R, N>>>,
    axum::Json(input): axum::Json<DonorAssessmentInput>,
) -> Response
where
    R: DonorRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let verdict = service.evaluator().evaluate(&input);
    (StatusCode::OK, axum::Json(verdict)).into_response()
}

pub(crate) async fn register_handler<R, N>(
    State(service): State<Arc<DonorScreeningService<R, N>>>,
    axum::Json(registration): axum::Json<DonorRegistration>,
) -> Response
where
    R: DonorRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    match service.register(registration) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<DonorScreeningService<R, N>>>,
    Path(donor_id): Path<String>,
) -> Response
where
    R: DonorRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    match service.get(&DonorId(donor_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn screening_handler<R, N>(
    State(service): State<Arc<DonorScreeningService<R, N>>>,
    Path(donor_id): Path<String>,
    axum::Json(request): axum::Json<ScreeningRequest>,
) -> Response
where
    R: DonorRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    match service.screen(&DonorId(donor_id), request) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn available_handler<R, N>(
    State(service): State<Arc<DonorScreeningService<R, N>>>,
    Query(query): Query<AvailableQuery>,
) -> Response
where
    R: DonorRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    let blood_group = match query.blood_group.as_deref() {
        // An unescaped '+' in the query string decodes to a space.
        Some(raw) => match BloodGroup::parse(&raw.trim_start().replace(' ', "+")) {
            Some(group) => Some(group),
            None => {
                let payload = json!({ "error": format!("unknown blood group '{raw}'") });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
        None => None,
    };

    match service.available_donors(blood_group) {
        Ok(donors) => {
            let views: Vec<DonorStatusView> =
                donors.iter().map(|profile| profile.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScreeningServiceError) -> Response {
    let status = match &error {
        ScreeningServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScreeningServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ScreeningServiceError::Repository(RepositoryError::Unavailable(_))
        | ScreeningServiceError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
