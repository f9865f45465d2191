//! Employee records and the request payloads that create or modify them.
//!
//! JSON field names are camelCase to match the documents already stored in the
//! `employees` collection. Aliases accept the older spellings (`position`,
//! `tenure`, `compensationRatio`) still sent by some clients.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::{Result, TalentRiskError};
use crate::risk::{RiskFactors, RiskLevel, RiskTrend};

/// Rating assumed when none was recorded.
pub const DEFAULT_PERFORMANCE_RATING: f64 = 3.0;
/// Engagement assumed when no survey result exists.
pub const DEFAULT_ENGAGEMENT_SCORE: f64 = 0.5;
/// Compensation ratio assumed when pay is unknown (at market).
pub const DEFAULT_COMP_RATIO: f64 = 1.0;
/// Upper bound accepted for a market-relative compensation ratio.
pub const MAX_COMP_RATIO: f64 = 5.0;

// ---------------------------------------------------------------------------
// Employee
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub department: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub tenure_months: u32,
    pub performance_rating: f64,
    pub engagement_score: f64,
    pub comp_ratio: f64,
    #[serde(default)]
    pub critical_skills: Vec<String>,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
    /// Signed change in recent performance; drives [`RiskTrend`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_trend: Option<f64>,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub risk_factors: RiskFactors,
    #[serde(default)]
    pub risk_trend: RiskTrend,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Build an unscored record from a creation payload.
    ///
    /// Missing scoring inputs take their documented defaults. The risk fields
    /// start at zero / LOW until [`Employee::apply_risk`] is called.
    pub fn from_new(id: String, new: NewEmployee, now: DateTime<Utc>) -> Self {
        Self {
            id,
            employee_id: new.employee_id,
            name: new.name.trim().to_string(),
            email: new.email,
            department: new.department.trim().to_string(),
            role: new.role.trim().to_string(),
            location: new.location,
            tenure_months: new.tenure_months,
            performance_rating: new.performance_rating.unwrap_or(DEFAULT_PERFORMANCE_RATING),
            engagement_score: new.engagement_score.unwrap_or(DEFAULT_ENGAGEMENT_SCORE),
            comp_ratio: new.comp_ratio.unwrap_or(DEFAULT_COMP_RATIO),
            critical_skills: new.critical_skills,
            skill_gaps: new.skill_gaps,
            performance_trend: new.performance_trend,
            risk_score: 0.0,
            risk_level: RiskLevel::Low,
            risk_factors: RiskFactors::default(),
            risk_trend: RiskTrend::Stable,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store the output of a risk assessment on the record.
    pub fn apply_risk(&mut self, score: f64, level: RiskLevel, factors: RiskFactors, trend: RiskTrend) {
        self.risk_score = score;
        self.risk_level = level;
        self.risk_factors = factors;
        self.risk_trend = trend;
    }

    pub fn validate(&self) -> Result<()> {
        check_required("name", &self.name)?;
        check_required("department", &self.department)?;
        check_required("role", &self.role)?;
        check_range("performanceRating", self.performance_rating, 1.0, 5.0)?;
        check_range("engagementScore", self.engagement_score, 0.0, 1.0)?;
        check_comp_ratio(self.comp_ratio)?;
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        Ok(())
    }

    pub fn summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            department: self.department.clone(),
            risk_score: self.risk_score,
            risk_level: self.risk_level,
        }
    }
}

/// Compact projection used in events and WebSocket frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: String,
    pub name: String,
    pub department: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

// ---------------------------------------------------------------------------
// Create payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[serde(default)]
    pub employee_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub department: String,
    #[serde(alias = "position")]
    pub role: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "tenure")]
    pub tenure_months: u32,
    #[serde(default)]
    pub performance_rating: Option<f64>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default, alias = "compensationRatio")]
    pub comp_ratio: Option<f64>,
    #[serde(default)]
    pub critical_skills: Vec<String>,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
    #[serde(default)]
    pub performance_trend: Option<f64>,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<()> {
        check_required("name", &self.name)?;
        check_required("department", &self.department)?;
        check_required("role", &self.role)?;
        if let Some(rating) = self.performance_rating {
            check_range("performanceRating", rating, 1.0, 5.0)?;
        }
        if let Some(engagement) = self.engagement_score {
            check_range("engagementScore", engagement, 0.0, 1.0)?;
        }
        if let Some(ratio) = self.comp_ratio {
            check_comp_ratio(ratio)?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Update payload
// ---------------------------------------------------------------------------

/// Partial update: present fields overwrite, absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    #[serde(alias = "position")]
    pub role: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "tenure")]
    pub tenure_months: Option<u32>,
    pub performance_rating: Option<f64>,
    pub engagement_score: Option<f64>,
    #[serde(alias = "compensationRatio")]
    pub comp_ratio: Option<f64>,
    pub critical_skills: Option<Vec<String>>,
    pub skill_gaps: Option<Vec<String>>,
    pub performance_trend: Option<f64>,
}

impl EmployeeUpdate {
    /// Merge this update into `employee`. Risk fields are left untouched;
    /// the caller rescores afterwards.
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(v) = self.employee_id {
            employee.employee_id = Some(v);
        }
        if let Some(v) = self.name {
            employee.name = v.trim().to_string();
        }
        if let Some(v) = self.email {
            employee.email = Some(v);
        }
        if let Some(v) = self.department {
            employee.department = v.trim().to_string();
        }
        if let Some(v) = self.role {
            employee.role = v.trim().to_string();
        }
        if let Some(v) = self.location {
            employee.location = Some(v);
        }
        if let Some(v) = self.tenure_months {
            employee.tenure_months = v;
        }
        if let Some(v) = self.performance_rating {
            employee.performance_rating = v;
        }
        if let Some(v) = self.engagement_score {
            employee.engagement_score = v;
        }
        if let Some(v) = self.comp_ratio {
            employee.comp_ratio = v;
        }
        if let Some(v) = self.critical_skills {
            employee.critical_skills = v;
        }
        if let Some(v) = self.skill_gaps {
            employee.skill_gaps = v;
        }
        if let Some(v) = self.performance_trend {
            employee.performance_trend = Some(v);
        }
    }
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

fn check_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TalentRiskError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(TalentRiskError::Validation(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

fn check_comp_ratio(value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value > MAX_COMP_RATIO {
        return Err(TalentRiskError::Validation(format!(
            "compRatio must be greater than 0 and at most {}, got {}",
            MAX_COMP_RATIO, value
        )));
    }
    Ok(())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
    })
}

fn check_email(email: &str) -> Result<()> {
    if !email_pattern().is_match(email) {
        return Err(TalentRiskError::Validation(format!("invalid email address: {}", email)));
    }
    Ok(())
}
