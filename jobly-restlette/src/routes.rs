use crate::auth::require_admin;
use crate::error::ApiError;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use jobly_core::{Auth, JobFilter, JobPatch, JobRepository, NewJob};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
struct JobsState {
    repo: Arc<dyn JobRepository>,
    auth: Arc<dyn Auth>,
}

/// Routes for `/jobs`. Reads are public; writes need admin credentials.
///
/// Items are addressed by title in the URL. Mutations resolve the title to
/// the job's id first and then act on the id.
pub fn build_jobs_router(repo: Arc<dyn JobRepository>, auth: Arc<dyn Auth>) -> Router {
    let state = JobsState { repo, auth };

    Router::new()
        .route("/jobs", post(create_handler).get(list_handler))
        .route(
            "/jobs/:title",
            get(read_handler).patch(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

async fn create_handler(
    State(state): State<JobsState>,
    headers: HeaderMap,
    body: Result<Json<NewJob>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(state.auth.as_ref(), &headers)?;
    let Json(new_job) = body?;

    let job = state.repo.create(new_job).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

async fn list_handler(
    State(state): State<JobsState>,
    filter: Result<Query<JobFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = filter?;
    let jobs = state.repo.list(&filter).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

async fn read_handler(
    State(state): State<JobsState>,
    Path(title): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state.repo.read_by_title(&title).await?;
    Ok(Json(json!({ "job": job })))
}

async fn update_handler(
    State(state): State<JobsState>,
    Path(title): Path<String>,
    headers: HeaderMap,
    body: Result<Json<JobPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(state.auth.as_ref(), &headers)?;
    let Json(patch) = body?;

    let current = state.repo.read_by_title(&title).await?;
    let job = state.repo.update(current.id, patch).await?;
    Ok(Json(json!({ "job": job })))
}

async fn delete_handler(
    State(state): State<JobsState>,
    Path(title): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(state.auth.as_ref(), &headers)?;

    let current = state.repo.read_by_title(&title).await?;
    state.repo.remove(current.id).await?;
    Ok(Json(json!({ "deleted": title })))
}
