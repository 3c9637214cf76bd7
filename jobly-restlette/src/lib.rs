mod auth;
mod companies;
mod error;
mod routes;

pub use companies::build_companies_router;
pub use error::ApiError;
pub use routes::build_jobs_router;
