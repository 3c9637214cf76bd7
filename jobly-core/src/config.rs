use crate::{Auth, CompanyRepository, JobRepository, NoAuth, StaticTokenAuth};
use std::env;
use std::sync::Arc;

pub const DEFAULT_PORT: u16 = 3001;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

/// Process settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub port: u16,
    pub admin_tokens: Vec<String>,
    /// Treat every caller as admin. Local development only.
    pub open_admin: bool,
    pub table_prefix: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let port = match env::var("JOBLY_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "JOBLY_PORT",
                value: raw,
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let admin_tokens = env::var("JOBLY_ADMIN_TOKENS")
            .map(|v| parse_token_list(&v))
            .unwrap_or_default();

        let open_admin = match env::var("JOBLY_OPEN_ADMIN") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                var: "JOBLY_OPEN_ADMIN",
                value: raw,
            })?,
            Err(_) => false,
        };

        Ok(Self {
            database_url,
            port,
            admin_tokens,
            open_admin,
            table_prefix: env::var("JOBLY_TABLE_PREFIX").unwrap_or_default(),
        })
    }

    /// The authenticator these settings describe.
    pub fn auth(&self) -> Arc<dyn Auth> {
        if self.open_admin {
            Arc::new(NoAuth)
        } else {
            Arc::new(StaticTokenAuth::new(self.admin_tokens.iter().cloned()))
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}

fn parse_token_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Everything `build_app` needs, already wired.
pub struct ServerConfig {
    pub port: u16,
    pub jobs: Arc<dyn JobRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub auth: Arc<dyn Auth>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_list_skips_blanks() {
        assert_eq!(
            parse_token_list(" a, ,b ,"),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(parse_token_list("").is_empty());
    }

    fn settings(admin_tokens: &[&str], open_admin: bool) -> Settings {
        Settings {
            database_url: "postgres://localhost/jobly".into(),
            port: DEFAULT_PORT,
            admin_tokens: admin_tokens.iter().map(|t| t.to_string()).collect(),
            open_admin,
            table_prefix: String::new(),
        }
    }

    #[test]
    fn open_admin_lets_anonymous_callers_write() {
        let auth = settings(&[], true).auth();
        assert!(auth.is_authorized(&auth.authenticate(None)));
    }

    #[test]
    fn closed_settings_only_admit_configured_tokens() {
        let auth = settings(&["admin-token"], false).auth();
        assert!(auth.is_authorized(&auth.authenticate(Some("admin-token"))));
        assert!(!auth.is_authorized(&auth.authenticate(Some("u1-token"))));
        assert!(!auth.is_authorized(&auth.authenticate(None)));
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
