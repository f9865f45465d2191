//! Risk model inspection, per-employee assessment, and bulk rescoring.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use talentrisk_common::employee::{
    DEFAULT_COMP_RATIO, DEFAULT_ENGAGEMENT_SCORE, DEFAULT_PERFORMANCE_RATING,
};
use talentrisk_common::ApiError;
use talentrisk_scorer::{analytics, RiskInputs, WeightProfile, WeightVector};

use crate::handlers::{sample_on_failure, ApiResponse};
use crate::state::{AppEvent, SharedState};

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub profile: Option<String>,
}

impl ProfileQuery {
    fn parse(&self) -> Result<Option<WeightProfile>, ApiError> {
        match self.profile.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => Ok(Some(name.parse::<WeightProfile>()?)),
        }
    }
}

/// Ad-hoc scoring body. Accepts the employee field names; every input is
/// optional and `skillGaps` is the list itself, as on a stored employee.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessRequest {
    pub performance_rating: Option<f64>,
    #[serde(alias = "tenure")]
    pub tenure_months: Option<u32>,
    pub engagement_score: Option<f64>,
    #[serde(alias = "compensationRatio")]
    pub comp_ratio: Option<f64>,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
    pub performance_trend: Option<f64>,
}

impl From<AssessRequest> for RiskInputs {
    fn from(r: AssessRequest) -> Self {
        RiskInputs {
            performance_rating: r.performance_rating.unwrap_or(DEFAULT_PERFORMANCE_RATING),
            tenure_months: r.tenure_months.unwrap_or(0),
            engagement_score: r.engagement_score.unwrap_or(DEFAULT_ENGAGEMENT_SCORE),
            comp_ratio: r.comp_ratio.unwrap_or(DEFAULT_COMP_RATIO),
            skill_gaps: r.skill_gaps.len(),
            performance_trend: r.performance_trend,
        }
    }
}

#[derive(Serialize)]
struct ProfileWeights {
    name: WeightProfile,
    weights: WeightVector,
}

/// GET /api/risk/config
pub async fn risk_config(State(state): State<SharedState>) -> impl IntoResponse {
    let profiles: Vec<ProfileWeights> = WeightProfile::ALL
        .iter()
        .map(|p| ProfileWeights { name: *p, weights: p.weights() })
        .collect();

    ApiResponse::ok(json!({
        "model": state.repo.model(),
        "profiles": profiles,
    }))
}

/// GET /api/risk/departments
pub async fn department_risk(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let (departments, fallback) = match state.repo.departments().await {
        Ok(departments) => (departments, false),
        Err(err) => {
            let sample = sample_on_failure(&state, err, "department breakdown")?;
            (analytics::department_breakdown(&sample), true)
        }
    };
    let count = departments.len();
    Ok(ApiResponse::ok(departments).with("count", count).fallback(fallback))
}

/// GET /api/risk/employees/{id}?profile=tech_focused
pub async fn employee_assessment(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<ProfileQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = query.parse()?;
    let (employee, assessment) = state.repo.assess(&id, profile).await?;
    Ok(ApiResponse::ok(json!({
        "employee": employee.summary(),
        "assessment": assessment,
    })))
}

/// POST /api/risk/assess?profile=sales_focused
pub async fn assess(
    State(state): State<SharedState>,
    Query(query): Query<ProfileQuery>,
    payload: Result<Json<AssessRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = query.parse()?;
    let Json(request) = payload
        .map_err(|rejection| ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text())))?;
    let assessment = state.repo.assess_inputs(&RiskInputs::from(request), profile);
    Ok(ApiResponse::ok(assessment))
}

/// POST /api/risk/recalculate
pub async fn recalculate(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let updated = state.repo.recalculate_all().await?;
    state.publish(AppEvent::RiskRecalculated { updated });
    Ok(ApiResponse::ok(json!({ "updated": updated })))
}
