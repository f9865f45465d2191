//! Fixtures and builders shared by the workspace's tests.

use chrono::{Duration, Utc};
use talentrisk_common::{Employee, NewEmployee, RiskLevel};

/// Builder for fully-formed [`Employee`] records.
///
/// Defaults describe an unremarkable mid-tenure engineer. Risk fields stay
/// at zero / LOW unless [`EmployeeBuilder::risk`] sets them; tests that need
/// a real score run the record through the scorer.
#[derive(Debug, Clone)]
pub struct EmployeeBuilder {
    inner: Employee,
}

impl EmployeeBuilder {
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        let new = NewEmployee {
            name: name.to_string(),
            department: "Engineering".to_string(),
            role: "Software Engineer".to_string(),
            tenure_months: 30,
            performance_rating: Some(3.5),
            engagement_score: Some(0.7),
            comp_ratio: Some(1.0),
            ..Default::default()
        };
        let mut inner = Employee::from_new(uuid::Uuid::new_v4().to_string(), new, now);
        inner.created_at = now - Duration::days(1);
        Self { inner }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.inner.id = id.to_string();
        self
    }

    pub fn department(mut self, department: &str) -> Self {
        self.inner.department = department.to_string();
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.inner.role = role.to_string();
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.inner.email = Some(email.to_string());
        self
    }

    pub fn performance(mut self, rating: f64) -> Self {
        self.inner.performance_rating = rating;
        self
    }

    pub fn tenure_months(mut self, months: u32) -> Self {
        self.inner.tenure_months = months;
        self
    }

    pub fn engagement(mut self, score: f64) -> Self {
        self.inner.engagement_score = score;
        self
    }

    pub fn comp_ratio(mut self, ratio: f64) -> Self {
        self.inner.comp_ratio = ratio;
        self
    }

    pub fn skill_gaps(mut self, gaps: &[&str]) -> Self {
        self.inner.skill_gaps = gaps.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn performance_trend(mut self, delta: f64) -> Self {
        self.inner.performance_trend = Some(delta);
        self
    }

    /// Set stored risk fields directly, bypassing the scorer.
    pub fn risk(mut self, score: f64, level: RiskLevel) -> Self {
        self.inner.risk_score = score;
        self.inner.risk_level = level;
        self
    }

    pub fn build(self) -> Employee {
        self.inner
    }
}

/// A valid creation payload with every scoring input set.
pub fn new_employee(name: &str, department: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        department: department.to_string(),
        role: "Analyst".to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        tenure_months: 18,
        performance_rating: Some(3.0),
        engagement_score: Some(0.6),
        comp_ratio: Some(0.95),
        critical_skills: vec!["SQL".to_string()],
        ..Default::default()
    }
}

/// A payload that the default model scores HIGH.
pub fn flight_risk_employee(name: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        department: "Engineering".to_string(),
        role: "Senior Engineer".to_string(),
        tenure_months: 4,
        performance_rating: Some(1.5),
        engagement_score: Some(0.15),
        comp_ratio: Some(0.68),
        skill_gaps: vec!["Rust".into(), "Kubernetes".into(), "Terraform".into()],
        performance_trend: Some(-0.4),
        ..Default::default()
    }
}

/// A payload that the default model scores LOW.
pub fn stable_employee(name: &str) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        department: "Finance".to_string(),
        role: "Controller".to_string(),
        tenure_months: 96,
        performance_rating: Some(4.8),
        engagement_score: Some(0.92),
        comp_ratio: Some(1.2),
        ..Default::default()
    }
}

/// Parse a JSON response body, panicking with the raw text on failure.
pub fn parse_json(bytes: &[u8]) -> serde_json::Value {
    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        panic!("invalid JSON ({}): {}", e, String::from_utf8_lossy(bytes))
    })
}
