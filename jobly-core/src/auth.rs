use std::collections::HashSet;

/// Who is calling, as far as the API cares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub is_admin: bool,
}

pub trait Auth: Send + Sync {
    /// Resolve the bearer token of a request (if any) into credentials.
    fn authenticate(&self, bearer: Option<&str>) -> Credentials;

    fn is_authorized(&self, credentials: &Credentials) -> bool {
        credentials.is_admin
    }
}

/// Grants admin to every caller. Meant for local runs and tests.
pub struct NoAuth;

impl Auth for NoAuth {
    fn authenticate(&self, bearer: Option<&str>) -> Credentials {
        Credentials {
            token: bearer.map(String::from),
            is_admin: true,
        }
    }
}

/// Grants admin to callers presenting one of a fixed set of tokens.
pub struct StaticTokenAuth {
    admin_tokens: HashSet<String>,
}

impl StaticTokenAuth {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admin_tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

impl Auth for StaticTokenAuth {
    fn authenticate(&self, bearer: Option<&str>) -> Credentials {
        let is_admin = bearer.is_some_and(|t| self.admin_tokens.contains(t));
        Credentials {
            token: bearer.map(String::from),
            is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_auth_grants_admin_without_token() {
        let creds = NoAuth.authenticate(None);
        assert!(NoAuth.is_authorized(&creds));
    }

    #[test]
    fn static_tokens_only_admit_known_tokens() {
        let auth = StaticTokenAuth::new(["admin-token"]);
        assert!(auth.is_authorized(&auth.authenticate(Some("admin-token"))));
        assert!(!auth.is_authorized(&auth.authenticate(Some("u1-token"))));
        assert!(!auth.is_authorized(&auth.authenticate(None)));
    }
}
