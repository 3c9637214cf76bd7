use crate::update::quote_ident;
use jobly_core::{JoblyError, Result};
use sqlx::PgPool;

/// Table names used by the repositories.
#[derive(Debug, Clone)]
pub struct Tables {
    pub companies: String,
    pub jobs: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self::with_prefix("")
    }
}

impl Tables {
    /// Prefix both table names (useful for test isolation).
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            companies: format!("{prefix}companies"),
            jobs: format!("{prefix}jobs"),
        }
    }
}

/// Connect to `database_url` and make sure the tables exist.
pub async fn connect(database_url: &str, tables: &Tables) -> Result<PgPool> {
    let pool = PgPool::connect(database_url)
        .await
        .map_err(|e| JoblyError::Storage(e.to_string()))?;
    init_schema(&pool, tables).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &PgPool, tables: &Tables) -> Result<()> {
    let companies = quote_ident(&tables.companies);
    let jobs = quote_ident(&tables.jobs);

    let create_companies = format!(
        "CREATE TABLE IF NOT EXISTS {companies} (
            handle TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            num_employees INTEGER CHECK (num_employees >= 0),
            description TEXT NOT NULL,
            logo_url TEXT
        )"
    );
    let create_jobs = format!(
        "CREATE TABLE IF NOT EXISTS {jobs} (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            salary INTEGER CHECK (salary >= 0),
            equity NUMERIC CHECK (equity <= 1.0),
            company_handle TEXT NOT NULL REFERENCES {companies} ON DELETE CASCADE
        )"
    );

    for ddl in [create_companies, create_jobs] {
        sqlx::query(&ddl)
            .execute(pool)
            .await
            .map_err(|e| JoblyError::Storage(e.to_string()))?;
    }
    tracing::debug!(companies = %tables.companies, jobs = %tables.jobs, "schema ready");
    Ok(())
}

/// Classify a failed write. Constraint violations are the caller's fault;
/// anything else is a storage failure.
///
/// `duplicate` receives the name of the violated unique constraint, when the
/// server reports one.
pub(crate) fn write_error(
    err: sqlx::Error,
    duplicate: impl FnOnce(Option<&str>) -> String,
    missing_ref: impl FnOnce() -> String,
) -> JoblyError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return JoblyError::Conflict(duplicate(db.constraint()));
        }
        if db.is_foreign_key_violation() {
            return JoblyError::InvalidInput(missing_ref());
        }
        if db.is_check_violation() {
            return JoblyError::InvalidInput(db.message().to_string());
        }
    }
    JoblyError::Storage(err.to_string())
}

pub(crate) fn storage_error(err: sqlx::Error) -> JoblyError {
    JoblyError::Storage(err.to_string())
}
