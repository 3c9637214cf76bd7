use crate::query::build_job_where;
use crate::schema::{storage_error, write_error, Tables};
use crate::update::{build_set, quote_ident, ColumnMap};
use crate::value::{bind_values, SqlValue};
use async_trait::async_trait;
use jobly_core::{Job, JobFilter, JobPatch, JobRepository, JoblyError, NewJob, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// Equity is NUMERIC in storage but always handed out as a float.
const JOB_COLUMNS: &str = "id, title, salary, equity::FLOAT8 AS equity, company_handle";

const JOB_FIELDS: ColumnMap = ColumnMap::new(&[("companyHandle", "company_handle")]);

pub struct PostgresJobRepository {
    pool: PgPool,
    table: String,
}

impl PostgresJobRepository {
    pub fn new(pool: PgPool, tables: &Tables) -> Self {
        Self {
            pool,
            table: quote_ident(&tables.jobs),
        }
    }

    fn row_to_job(row: &PgRow) -> Result<Job> {
        Ok(Job {
            id: row.try_get("id").map_err(storage_error)?,
            title: row.try_get("title").map_err(storage_error)?,
            salary: row.try_get("salary").map_err(storage_error)?,
            equity: row.try_get("equity").map_err(storage_error)?,
            company_handle: row.try_get("company_handle").map_err(storage_error)?,
        })
    }

    /// Fields of a patch in a fixed order, ready for [`build_set`].
    fn patch_fields(patch: JobPatch) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(title) = patch.title {
            fields.push(("title", SqlValue::from(title)));
        }
        if let Some(salary) = patch.salary {
            fields.push(("salary", SqlValue::from(salary)));
        }
        if let Some(equity) = patch.equity {
            fields.push(("equity", SqlValue::from(equity)));
        }
        if let Some(handle) = patch.company_handle {
            fields.push(("companyHandle", SqlValue::from(handle)));
        }
        fields
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn create(&self, job: NewJob) -> Result<Job> {
        job.validate()?;

        let sql = format!(
            "INSERT INTO {} (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING {JOB_COLUMNS}",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(&job.title)
            .bind(job.salary)
            .bind(job.equity)
            .bind(&job.company_handle)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    |_| format!("Duplicate job: {}", job.title),
                    || format!("No company: {}", job.company_handle),
                )
            })?;

        let created = Self::row_to_job(&row)?;
        tracing::info!(id = created.id, title = %created.title, "job created");
        Ok(created)
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let part = build_job_where(filter);

        let mut sql = format!("SELECT {JOB_COLUMNS} FROM {}", self.table);
        if !part.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&part.clause);
        }
        sql.push_str(" ORDER BY title");
        tracing::debug!(%sql, params = part.values.len(), "listing jobs");

        let rows = bind_values(sqlx::query(&sql), &part.values)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(Self::row_to_job).collect()
    }

    async fn read(&self, id: i32) -> Result<Job> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(r) => Self::row_to_job(&r),
            None => Err(JoblyError::not_found(format!("No job with id: {id}"))),
        }
    }

    async fn read_by_title(&self, title: &str) -> Result<Job> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM {} WHERE title = $1", self.table);
        let row = sqlx::query(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(r) => Self::row_to_job(&r),
            None => Err(JoblyError::not_found(format!("No job: {title}"))),
        }
    }

    async fn update(&self, id: i32, patch: JobPatch) -> Result<Job> {
        patch.validate()?;
        let new_title = patch.title.clone();
        let new_handle = patch.company_handle.clone();

        let set = build_set(&Self::patch_fields(patch), &JOB_FIELDS)?;
        let sql = format!(
            "UPDATE {} SET {} WHERE id = {} RETURNING {JOB_COLUMNS}",
            self.table,
            set.clause,
            set.next_placeholder()
        );
        tracing::debug!(%sql, id, "updating job");

        let row = bind_values(sqlx::query(&sql), &set.values)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    |_| format!("Duplicate job: {}", new_title.unwrap_or_default()),
                    || format!("No company: {}", new_handle.unwrap_or_default()),
                )
            })?;

        match row {
            Some(r) => Self::row_to_job(&r),
            None => Err(JoblyError::not_found(format!("No job with id: {id}"))),
        }
    }

    async fn remove(&self, id: i32) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING id", self.table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(_) => {
                tracing::info!(id, "job removed");
                Ok(())
            }
            None => Err(JoblyError::not_found(format!("No job with id: {id}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_fields_keep_declaration_order_and_nulls() {
        let patch = JobPatch {
            company_handle: Some("c2".into()),
            equity: Some(None),
            title: Some("New".into()),
            salary: None,
        };
        let fields = PostgresJobRepository::patch_fields(patch);
        let names: Vec<&str> = fields.iter().map(|(f, _)| *f).collect();
        assert_eq!(names, vec!["title", "equity", "companyHandle"]);
        assert_eq!(fields[1].1, SqlValue::Float(None));

        let set = build_set(&fields, &JOB_FIELDS).unwrap();
        assert_eq!(set.clause, r#""title"=$1, "equity"=$2, "company_handle"=$3"#);
    }
}
