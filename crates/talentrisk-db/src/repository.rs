//! Employee repository.
//!
//! Validates and scores employees before they reach the store, so every
//! record read back carries a risk score consistent with its inputs.

use chrono::Utc;
use std::sync::Arc;
use talentrisk_common::{Employee, EmployeeUpdate, NewEmployee};
use talentrisk_scorer::analytics::{self, DashboardMetrics, DepartmentSummary};
use talentrisk_scorer::{RiskAssessment, RiskInputs, RiskModel, WeightProfile};

use crate::error::{DbError, Result};
use crate::store::{EmployeeFilter, EmployeeStore};

/// Repository for employee operations.
#[derive(Clone)]
pub struct EmployeeRepository {
    store: Arc<dyn EmployeeStore>,
    model: Arc<RiskModel>,
}

impl EmployeeRepository {
    pub fn new(store: Arc<dyn EmployeeStore>, model: Arc<RiskModel>) -> Self {
        Self { store, model }
    }

    pub fn model(&self) -> &RiskModel {
        &self.model
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub async fn count(&self) -> Result<u64> {
        self.store.count().await
    }

    fn build(&self, new: NewEmployee) -> Result<Employee> {
        new.validate()?;
        let mut employee = Employee::from_new(uuid::Uuid::new_v4().to_string(), new, Utc::now());
        self.model.score_employee(&mut employee);
        Ok(employee)
    }

    /// Validate, assign an id and timestamps, score, and store.
    pub async fn create(&self, new: NewEmployee) -> Result<Employee> {
        let employee = self.build(new)?;
        self.store.insert(&employee).await?;
        tracing::info!(
            id = %employee.id,
            score = employee.risk_score,
            level = %employee.risk_level,
            "employee created"
        );
        Ok(employee)
    }

    /// Bulk variant of [`Self::create`]. Nothing is written if any payload
    /// fails validation.
    pub async fn create_many(&self, batch: Vec<NewEmployee>) -> Result<usize> {
        let employees = batch
            .into_iter()
            .map(|new| self.build(new))
            .collect::<Result<Vec<_>>>()?;
        let written = self.store.insert_many(&employees).await?;
        tracing::info!(count = written, "employees inserted");
        Ok(written)
    }

    pub async fn get(&self, id: &str) -> Result<Employee> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DbError::NotFound(id.to_string()))
    }

    pub async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        self.store.list(filter).await
    }

    /// Merge `update` into the stored record, revalidate, and rescore.
    pub async fn update(&self, id: &str, update: EmployeeUpdate) -> Result<Employee> {
        let mut employee = self.get(id).await?;
        update.apply_to(&mut employee);
        employee.validate()?;
        self.model.score_employee(&mut employee);
        employee.updated_at = Utc::now();

        if !self.store.replace(&employee).await? {
            return Err(DbError::NotFound(id.to_string()));
        }
        tracing::info!(
            id = %employee.id,
            score = employee.risk_score,
            level = %employee.risk_level,
            "employee updated"
        );
        Ok(employee)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(DbError::NotFound(id.to_string()));
        }
        tracing::info!(id, "employee deleted");
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let removed = self.store.delete_all().await?;
        tracing::warn!(removed, "all employees deleted");
        Ok(removed)
    }

    /// Employees scoring at or above `threshold`, highest first.
    pub async fn high_risk(&self, threshold: f64, limit: Option<usize>) -> Result<Vec<Employee>> {
        let filter = EmployeeFilter { min_score: Some(threshold), limit, ..Default::default() };
        self.store.list(&filter).await
    }

    /// Rescore every stored employee with the current model. Returns the
    /// number of records rewritten.
    pub async fn recalculate_all(&self) -> Result<usize> {
        let employees = self.store.list(&EmployeeFilter::all()).await?;
        let now = Utc::now();
        let mut updated = 0;

        for mut employee in employees {
            self.model.score_employee(&mut employee);
            employee.updated_at = now;
            if self.store.replace(&employee).await? {
                updated += 1;
            }
        }

        tracing::info!(updated, "risk scores recalculated");
        Ok(updated)
    }

    pub async fn metrics(&self) -> Result<DashboardMetrics> {
        let employees = self.store.list(&EmployeeFilter::all()).await?;
        Ok(analytics::summarize(&employees))
    }

    pub async fn departments(&self) -> Result<Vec<DepartmentSummary>> {
        let employees = self.store.list(&EmployeeFilter::all()).await?;
        Ok(analytics::department_breakdown(&employees))
    }

    /// Score a stored employee without persisting, optionally under another
    /// weight profile.
    pub async fn assess(
        &self,
        id: &str,
        profile: Option<WeightProfile>,
    ) -> Result<(Employee, RiskAssessment)> {
        let employee = self.get(id).await?;
        let assessment = self.assess_inputs(&RiskInputs::from(&employee), profile);
        Ok((employee, assessment))
    }

    pub fn assess_inputs(&self, inputs: &RiskInputs, profile: Option<WeightProfile>) -> RiskAssessment {
        match profile {
            Some(p) => self.model.with_profile(p).assess(inputs),
            None => self.model.assess(inputs),
        }
    }

    /// The sample roster scored with this repository's model.
    pub fn sample_roster(&self) -> Vec<Employee> {
        crate::sample::sample_roster(&self.model)
    }
}
