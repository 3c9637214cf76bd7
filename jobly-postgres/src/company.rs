use crate::query::build_company_where;
use crate::schema::{storage_error, write_error, Tables};
use crate::update::{build_set, quote_ident, ColumnMap};
use crate::value::{bind_values, SqlValue};
use async_trait::async_trait;
use jobly_core::{
    Company, CompanyFilter, CompanyPatch, CompanyRepository, JoblyError, NewCompany, Result,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const COMPANY_COLUMNS: &str = "handle, name, num_employees, description, logo_url";

const COMPANY_FIELDS: ColumnMap = ColumnMap::new(&[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
]);

pub struct PostgresCompanyRepository {
    pool: PgPool,
    table: String,
}

impl PostgresCompanyRepository {
    pub fn new(pool: PgPool, tables: &Tables) -> Self {
        Self {
            pool,
            table: quote_ident(&tables.companies),
        }
    }

    fn row_to_company(row: &PgRow) -> Result<Company> {
        Ok(Company {
            handle: row.try_get("handle").map_err(storage_error)?,
            name: row.try_get("name").map_err(storage_error)?,
            num_employees: row.try_get("num_employees").map_err(storage_error)?,
            description: row.try_get("description").map_err(storage_error)?,
            logo_url: row.try_get("logo_url").map_err(storage_error)?,
        })
    }

    fn patch_fields(patch: CompanyPatch) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(name) = patch.name {
            fields.push(("name", SqlValue::from(name)));
        }
        if let Some(n) = patch.num_employees {
            fields.push(("numEmployees", SqlValue::from(n)));
        }
        if let Some(description) = patch.description {
            fields.push(("description", SqlValue::from(description)));
        }
        if let Some(url) = patch.logo_url {
            fields.push(("logoUrl", SqlValue::from(url)));
        }
        fields
    }

    fn not_found(handle: &str) -> JoblyError {
        JoblyError::not_found(format!("No company: {handle}"))
    }
}

/// Postgres names an inline `UNIQUE` on `name` as `<table>_name_key`; every
/// other unique violation on insert is the primary key.
fn duplicate_company(constraint: Option<&str>, handle: &str, name: &str) -> String {
    match constraint {
        Some(c) if c.ends_with("_name_key") => format!("Duplicate company name: {name}"),
        _ => format!("Duplicate company: {handle}"),
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn create(&self, company: NewCompany) -> Result<Company> {
        company.validate()?;

        let sql = format!(
            "INSERT INTO {} (handle, name, num_employees, description, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COMPANY_COLUMNS}",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(&company.handle)
            .bind(&company.name)
            .bind(company.num_employees)
            .bind(&company.description)
            .bind(&company.logo_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    |constraint| duplicate_company(constraint, &company.handle, &company.name),
                    String::new,
                )
            })?;

        let created = Self::row_to_company(&row)?;
        tracing::info!(handle = %created.handle, "company created");
        Ok(created)
    }

    async fn list(&self, filter: &CompanyFilter) -> Result<Vec<Company>> {
        filter.validate()?;
        let part = build_company_where(filter);

        let mut sql = format!("SELECT {COMPANY_COLUMNS} FROM {}", self.table);
        if !part.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&part.clause);
        }
        sql.push_str(" ORDER BY name");
        tracing::debug!(%sql, params = part.values.len(), "listing companies");

        let rows = bind_values(sqlx::query(&sql), &part.values)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(Self::row_to_company).collect()
    }

    async fn read(&self, handle: &str) -> Result<Company> {
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM {} WHERE handle = $1",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(r) => Self::row_to_company(&r),
            None => Err(Self::not_found(handle)),
        }
    }

    async fn update(&self, handle: &str, patch: CompanyPatch) -> Result<Company> {
        patch.validate()?;
        let new_name = patch.name.clone();

        let set = build_set(&Self::patch_fields(patch), &COMPANY_FIELDS)?;
        let sql = format!(
            "UPDATE {} SET {} WHERE handle = {} RETURNING {COMPANY_COLUMNS}",
            self.table,
            set.clause,
            set.next_placeholder()
        );
        tracing::debug!(%sql, handle, "updating company");

        let row = bind_values(sqlx::query(&sql), &set.values)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                write_error(
                    e,
                    |_| format!("Duplicate company name: {}", new_name.unwrap_or_default()),
                    String::new,
                )
            })?;

        match row {
            Some(r) => Self::row_to_company(&r),
            None => Err(Self::not_found(handle)),
        }
    }

    async fn remove(&self, handle: &str) -> Result<()> {
        let sql = format!(
            "DELETE FROM {} WHERE handle = $1 RETURNING handle",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(_) => {
                tracing::info!(handle, "company removed");
                Ok(())
            }
            None => Err(Self::not_found(handle)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_message_names_the_clashing_column() {
        assert_eq!(
            duplicate_company(Some("t1_companies_name_key"), "c9", "C1"),
            "Duplicate company name: C1"
        );
        assert_eq!(
            duplicate_company(Some("t1_companies_pkey"), "c1", "Other"),
            "Duplicate company: c1"
        );
        assert_eq!(duplicate_company(None, "c1", "Other"), "Duplicate company: c1");
    }
}
