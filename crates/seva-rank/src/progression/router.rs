use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::UserId;
use super::engine::ProgressionError;
use super::repository::{ProgressRepository, RankUpNotifier, RepositoryError};
use super::service::{ProgressService, ProgressServiceError};
use super::views::{LadderView, ProgressView};

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ImpactRequest {
    pub units: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// Router builder exposing the ladder, member progress, and the leaderboard.
pub fn progress_router<R, N>(service: Arc<ProgressService<R, N>>) -> Router
where
    R: ProgressRepository + 'static,
    N: RankUpNotifier + 'static,
{
    Router::new()
        .route("/api/v1/ranks", get(ladder_handler::<R, N>))
        .route(
            "/api/v1/progress/:user_id",
            post(enroll_handler::<R, N>).get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/progress/:user_id/impact",
            post(impact_handler::<R, N>),
        )
        .route("/api/v1/leaderboard", get(leaderboard_handler::<R, N>))
        .with_state(service)
}

pub(crate) async fn ladder_handler<R, N>(
    State(service): State<Arc<ProgressService<R, N>>>,
) -> Response
where
    R: ProgressRepository + 'static,
    N: RankUpNotifier + 'static,
{
    let engine = service.engine();
    let view = LadderView::new(engine.ladder(), engine.points_per_unit());
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn enroll_handler<R, N>(
    State(service): State<Arc<ProgressService<R, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProgressRepository + 'static,
    N: RankUpNotifier + 'static,
{
    match service.enroll(UserId(user_id), Utc::now()) {
        Ok(record) => {
            let view = ProgressView::from_record(&record, service.engine().ladder());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(ProgressServiceError::Repository(RepositoryError::Conflict)) => {
            error_response(StatusCode::CONFLICT, "member already enrolled")
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<ProgressService<R, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProgressRepository + 'static,
    N: RankUpNotifier + 'static,
{
    match service.get(&UserId(user_id)) {
        Ok(record) => {
            let view = ProgressView::from_record(&record, service.engine().ladder());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn impact_handler<R, N>(
    State(service): State<Arc<ProgressService<R, N>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<ImpactRequest>,
) -> Response
where
    R: ProgressRepository + 'static,
    N: RankUpNotifier + 'static,
{
    match service.record_impact(&UserId(user_id), request.units, Utc::now()) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn leaderboard_handler<R, N>(
    State(service): State<Arc<ProgressService<R, N>>>,
    Query(query): Query<LeaderboardQuery>,
) -> Response
where
    R: ProgressRepository + 'static,
    N: RankUpNotifier + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    match service.leaderboard(limit) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(err) => service_error_response(err),
    }
}

fn service_error_response(err: ProgressServiceError) -> Response {
    let status = match &err {
        ProgressServiceError::Progression(ProgressionError::InvalidInput { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ProgressServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ProgressServiceError::Repository(RepositoryError::VersionConflict { .. }) => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &err.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
