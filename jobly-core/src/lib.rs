pub mod auth;
pub mod company;
pub mod config;
pub mod error;
pub mod testing;

pub use auth::{Auth, Credentials, NoAuth, StaticTokenAuth};
pub use company::{Company, CompanyFilter, CompanyPatch, CompanyRepository, NewCompany};
pub use config::{ConfigError, ServerConfig, Settings};
pub use error::{JoblyError, Result};

use serde::{Deserialize, Deserializer, Serialize};

/// A job posting as surfaced to callers.
///
/// `id` is the immutable row identity; every mutation is keyed by it.
/// `title` is unique but may be renamed, so it is only used for lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl NewJob {
    pub fn new(title: impl Into<String>, company_handle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            salary: None,
            equity: None,
            company_handle: company_handle.into(),
        }
    }

    pub fn salary(mut self, salary: i32) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn equity(mut self, equity: f64) -> Self {
        self.equity = Some(equity);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_not_blank("title", &self.title)?;
        check_not_blank("companyHandle", &self.company_handle)?;
        check_salary(self.salary)?;
        check_equity(self.equity)
    }
}

/// Partial update of a job.
///
/// Outer `None` means "leave as is". For nullable columns `Some(None)` means
/// "set to NULL".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub equity: Option<Option<f64>>,
    #[serde(default)]
    pub company_handle: Option<String>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.salary.is_none()
            && self.equity.is_none()
            && self.company_handle.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            check_not_blank("title", title)?;
        }
        if let Some(handle) = &self.company_handle {
            check_not_blank("companyHandle", handle)?;
        }
        check_salary(self.salary.flatten())?;
        check_equity(self.equity.flatten())
    }
}

/// Optional criteria for listing jobs. Absent criteria do not filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFilter {
    #[serde(default, rename = "title")]
    pub title_contains: Option<String>,
    #[serde(default, rename = "minSalary")]
    pub min_salary: Option<i32>,
    /// Only `Some(true)` restricts results; `Some(false)` behaves like `None`.
    #[serde(default, rename = "hasEquity")]
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn title_contains(mut self, fragment: impl Into<String>) -> Self {
        self.title_contains = Some(fragment.into());
        self
    }

    pub fn min_salary(mut self, salary: i32) -> Self {
        self.min_salary = Some(salary);
        self
    }

    pub fn has_equity(mut self, flag: bool) -> Self {
        self.has_equity = Some(flag);
        self
    }
}

#[async_trait::async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: NewJob) -> Result<Job>;
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>>;
    async fn read(&self, id: i32) -> Result<Job>;
    async fn read_by_title(&self, title: &str) -> Result<Job>;
    async fn update(&self, id: i32, patch: JobPatch) -> Result<Job>;
    async fn remove(&self, id: i32) -> Result<()>;
}

/// Deserialize a present field (including an explicit `null`) as `Some(_)`.
/// Paired with `#[serde(default)]`, a missing field stays `None`.
pub fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn check_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(JoblyError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

fn check_salary(salary: Option<i32>) -> Result<()> {
    match salary {
        Some(s) if s < 0 => Err(JoblyError::invalid("salary must be non-negative")),
        _ => Ok(()),
    }
}

fn check_equity(equity: Option<f64>) -> Result<()> {
    match equity {
        Some(e) if !(0.0..=1.0).contains(&e) => {
            Err(JoblyError::invalid("equity must be between 0 and 1"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_distinguishes_null_from_missing() {
        let patch: JobPatch = serde_json::from_value(json!({"salary": null})).unwrap();
        assert_eq!(patch.salary, Some(None));
        assert_eq!(patch.equity, None);
        assert!(!patch.is_empty());
    }

    #[test]
    fn empty_patch_body_is_empty() {
        let patch: JobPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let result = serde_json::from_value::<JobPatch>(json!({"id": 4}));
        assert!(result.is_err());
    }

    #[test]
    fn patch_rejects_wrong_types() {
        let result = serde_json::from_value::<JobPatch>(json!({"salary": "not-an-integer"}));
        assert!(result.is_err());
    }

    #[test]
    fn new_job_requires_company_handle() {
        let result = serde_json::from_value::<NewJob>(json!({"title": "new", "salary": 10000}));
        assert!(result.is_err());
    }

    #[test]
    fn new_job_validation_checks_ranges() {
        assert!(NewJob::new("j", "c1").salary(10).equity(0.5).validate().is_ok());
        assert!(NewJob::new("j", "c1").salary(-1).validate().is_err());
        assert!(NewJob::new("j", "c1").equity(1.5).validate().is_err());
        assert!(NewJob::new(" ", "c1").validate().is_err());
    }

    #[test]
    fn has_equity_false_is_kept_distinct_from_absent() {
        let explicit: JobFilter = serde_json::from_value(json!({"hasEquity": false})).unwrap();
        let absent: JobFilter = serde_json::from_value(json!({})).unwrap();
        assert_eq!(explicit.has_equity, Some(false));
        assert_eq!(absent.has_equity, None);
    }

    #[test]
    fn job_serializes_camel_case() {
        let job = Job {
            id: 1,
            title: "j1".into(),
            salary: Some(100000),
            equity: Some(0.0),
            company_handle: "c1".into(),
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["companyHandle"], json!("c1"));
        assert_eq!(value["equity"], json!(0.0));
    }
}
