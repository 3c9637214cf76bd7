use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jobly_core::JoblyError;
use serde_json::json;

/// HTTP face of [`JoblyError`]. Renders `{"error": {"message", "status"}}`.
#[derive(Debug)]
pub struct ApiError(pub JoblyError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            JoblyError::InvalidInput(_) | JoblyError::Conflict(_) => StatusCode::BAD_REQUEST,
            JoblyError::NotFound(_) => StatusCode::NOT_FOUND,
            JoblyError::Unauthorized => StatusCode::UNAUTHORIZED,
            JoblyError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JoblyError> for ApiError {
    fn from(err: JoblyError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(JoblyError::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(JoblyError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self.0 {
            JoblyError::Storage(detail) => {
                // The detail may name tables or constraints; keep it in the log.
                tracing::error!(error = %detail, "storage failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        let body = json!({
            "error": {
                "message": message,
                "status": status.as_u16(),
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: JoblyError) -> (StatusCode, Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_renders_404_body() {
        let (status, body) = render(JoblyError::not_found("No job: nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "No job: nope");
        assert_eq!(body["error"]["status"], 404);
    }

    #[tokio::test]
    async fn conflict_is_a_bad_request() {
        let (status, _) = render(JoblyError::Conflict("Duplicate job: j1".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_detail_is_not_leaked() {
        let (status, body) =
            render(JoblyError::Storage("relation \"jobs\" does not exist".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn unauthorized_is_401() {
        let (status, body) = render(JoblyError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["status"], 401);
    }
}
