mod company;
pub mod query;
mod repository;
mod schema;
pub mod update;
pub mod value;

pub use company::PostgresCompanyRepository;
pub use query::{build_company_where, build_job_where, QueryPart, WhereBuilder};
pub use repository::PostgresJobRepository;
pub use schema::{connect, init_schema, Tables};
pub use update::{build_set, quote_ident, ColumnMap};
pub use value::SqlValue;
