//! BSON shape of an employee in the `employees` collection.
//!
//! Identical to the JSON form except for `createdAt` / `updatedAt`, which are
//! stored as BSON dates so documents written by the seed scripts and the
//! server share one representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use talentrisk_common::{Employee, RiskFactors, RiskLevel, RiskTrend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDocument {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_trend: Option<f64>,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub risk_factors: RiskFactors,
    #[serde(default)]
    pub risk_trend: RiskTrend,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Employee> for EmployeeDocument {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.clone(),
            employee_id: e.employee_id.clone(),
            name: e.name.clone(),
            email: e.email.clone(),
            department: e.department.clone(),
            role: e.role.clone(),
            location: e.location.clone(),
            tenure_months: e.tenure_months,
            performance_rating: e.performance_rating,
            engagement_score: e.engagement_score,
            comp_ratio: e.comp_ratio,
            critical_skills: e.critical_skills.clone(),
            skill_gaps: e.skill_gaps.clone(),
            performance_trend: e.performance_trend,
            risk_score: e.risk_score,
            risk_level: e.risk_level,
            risk_factors: e.risk_factors,
            risk_trend: e.risk_trend,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<EmployeeDocument> for Employee {
    fn from(d: EmployeeDocument) -> Self {
        Self {
            id: d.id,
            employee_id: d.employee_id,
            name: d.name,
            email: d.email,
            department: d.department,
            role: d.role,
            location: d.location,
            tenure_months: d.tenure_months,
            performance_rating: d.performance_rating,
            engagement_score: d.engagement_score,
            comp_ratio: d.comp_ratio,
            critical_skills: d.critical_skills,
            skill_gaps: d.skill_gaps,
            performance_trend: d.performance_trend,
            risk_score: d.risk_score,
            risk_level: d.risk_level,
            risk_factors: d.risk_factors,
            risk_trend: d.risk_trend,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Writes BSON dates; reads BSON dates or RFC 3339 strings.
mod timestamp {
    use chrono::{DateTime, Utc};
    use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
    use mongodb::bson::Bson;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        chrono_datetime_as_bson_datetime::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Bson::deserialize(deserializer)? {
            Bson::DateTime(dt) => Ok(dt.to_chrono()),
            Bson::String(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("expected a date, found {}", other))),
        }
    }
}
