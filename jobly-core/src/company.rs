use crate::{check_not_blank, nullable, JoblyError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub num_employees: Option<i32>,
    pub description: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    pub description: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn new(
        handle: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            handle: handle.into(),
            name: name.into(),
            num_employees: None,
            description: description.into(),
            logo_url: None,
        }
    }

    pub fn num_employees(mut self, n: i32) -> Self {
        self.num_employees = Some(n);
        self
    }

    pub fn logo_url(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_not_blank("handle", &self.handle)?;
        check_not_blank("name", &self.name)?;
        check_employees(self.num_employees)
    }
}

/// Partial update of a company. The handle is the row identity and cannot be
/// changed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub num_employees: Option<Option<i32>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub logo_url: Option<Option<String>>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.num_employees.is_none()
            && self.description.is_none()
            && self.logo_url.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            check_not_blank("name", name)?;
        }
        check_employees(self.num_employees.flatten())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    #[serde(default)]
    pub name_like: Option<String>,
    #[serde(default)]
    pub min_employees: Option<i32>,
    #[serde(default)]
    pub max_employees: Option<i32>,
}

impl CompanyFilter {
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(JoblyError::invalid(
                    "minEmployees cannot be greater than maxEmployees",
                ));
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create(&self, company: NewCompany) -> Result<Company>;
    async fn list(&self, filter: &CompanyFilter) -> Result<Vec<Company>>;
    async fn read(&self, handle: &str) -> Result<Company>;
    async fn update(&self, handle: &str, patch: CompanyPatch) -> Result<Company>;
    async fn remove(&self, handle: &str) -> Result<()>;
}

fn check_employees(n: Option<i32>) -> Result<()> {
    match n {
        Some(n) if n < 0 => Err(JoblyError::invalid("numEmployees must be non-negative")),
        _ => Ok(()),
    }
}
