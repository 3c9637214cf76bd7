use crate::error::ApiError;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use jobly_core::{Auth, Credentials, JoblyError};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Reject the request unless its bearer token grants admin.
pub(crate) fn require_admin(auth: &dyn Auth, headers: &HeaderMap) -> Result<Credentials, ApiError> {
    let credentials = auth.authenticate(bearer_token(headers));
    if auth.is_authorized(&credentials) {
        Ok(credentials)
    } else {
        tracing::warn!(
            has_token = credentials.token.is_some(),
            "admin credentials required"
        );
        Err(ApiError(JoblyError::Unauthorized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jobly_core::StaticTokenAuth;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn admin_token_is_required() {
        let auth = StaticTokenAuth::new(["admin-token"]);
        assert!(require_admin(&auth, &headers("Bearer admin-token")).is_ok());
        assert!(require_admin(&auth, &headers("Bearer u1-token")).is_err());
        assert!(require_admin(&auth, &HeaderMap::new()).is_err());
    }
}
