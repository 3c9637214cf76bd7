use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use jobly_core::{JoblyError, ServerConfig};
use jobly_restlette::{build_companies_router, build_jobs_router, ApiError};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the full Axum application from a ServerConfig.
pub fn build_app(config: ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(build_jobs_router(config.jobs, config.auth.clone()))
        .merge(build_companies_router(config.companies, config.auth))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn not_found() -> ApiError {
    ApiError(JoblyError::not_found("Not Found"))
}

/// Start the server on the configured port.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let port = config.port;
    let app = build_app(config);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(port, "jobly listening");
    axum::serve(listener, app).await?;
    Ok(())
}
