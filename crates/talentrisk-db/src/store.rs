//! Backend-agnostic storage trait.

use async_trait::async_trait;
use serde::Deserialize;
use talentrisk_common::{Employee, RiskLevel};

use crate::error::Result;

/// Query over stored employees. Results are ordered by risk score, highest
/// first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub min_score: Option<f64>,
    pub limit: Option<usize>,
}

impl EmployeeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_level = Some(level);
        self
    }

    pub fn min_score(mut self, score: f64) -> Self {
        self.min_score = Some(score);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `employee` passes every predicate (the limit is not a predicate).
    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(dept) = &self.department {
            if !employee.department.eq_ignore_ascii_case(dept) {
                return false;
            }
        }
        if let Some(level) = self.risk_level {
            if employee.risk_level != level {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if employee.risk_score < min {
                return false;
            }
        }
        true
    }
}

/// Persistence for employee records.
///
/// Implementations store what they are given; scoring happens upstream in
/// [`crate::EmployeeRepository`].
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<()>;

    async fn insert(&self, employee: &Employee) -> Result<()>;

    /// Returns the number of records written.
    async fn insert_many(&self, employees: &[Employee]) -> Result<usize>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>>;

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>>;

    /// Replace the record with the same `id`. Returns false if none existed.
    async fn replace(&self, employee: &Employee) -> Result<bool>;

    /// Returns false if no record had this id.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn delete_all(&self) -> Result<u64>;

    async fn count(&self) -> Result<u64>;
}
