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
use jobly_core::{Auth, CompanyFilter, CompanyPatch, CompanyRepository, NewCompany};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
struct CompaniesState {
    repo: Arc<dyn CompanyRepository>,
    auth: Arc<dyn Auth>,
}

pub fn build_companies_router(repo: Arc<dyn CompanyRepository>, auth: Arc<dyn Auth>) -> Router {
    let state = CompaniesState { repo, auth };

    Router::new()
        .route("/companies", post(create_handler).get(list_handler))
        .route(
            "/companies/:handle",
            get(read_handler).patch(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

async fn create_handler(
    State(state): State<CompaniesState>,
    headers: HeaderMap,
    body: Result<Json<NewCompany>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(state.auth.as_ref(), &headers)?;
    let Json(new_company) = body?;

    let company = state.repo.create(new_company).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

async fn list_handler(
    State(state): State<CompaniesState>,
    filter: Result<Query<CompanyFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = filter?;
    let companies = state.repo.list(&filter).await?;
    Ok(Json(json!({ "companies": companies })))
}

async fn read_handler(
    State(state): State<CompaniesState>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let company = state.repo.read(&handle).await?;
    Ok(Json(json!({ "company": company })))
}

async fn update_handler(
    State(state): State<CompaniesState>,
    Path(handle): Path<String>,
    headers: HeaderMap,
    body: Result<Json<CompanyPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(state.auth.as_ref(), &headers)?;
    let Json(patch) = body?;

    let company = state.repo.update(&handle, patch).await?;
    Ok(Json(json!({ "company": company })))
}

async fn delete_handler(
    State(state): State<CompaniesState>,
    Path(handle): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(state.auth.as_ref(), &headers)?;

    state.repo.remove(&handle).await?;
    Ok(Json(json!({ "deleted": handle })))
}
