//! Employee CRUD and high-risk listing.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use talentrisk_common::{ApiError, EmployeeUpdate, NewEmployee, RiskLevel};
use talentrisk_db::EmployeeFilter;

use crate::handlers::{sample_on_failure, ApiResponse};
use crate::state::{AppEvent, SharedState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub department: Option<String>,
    #[serde(alias = "risk_level", alias = "level")]
    pub risk_level: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct HighRiskQuery {
    pub threshold: Option<f64>,
    pub limit: Option<usize>,
}

/// Body errors go through the API envelope rather than axum's plain text.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text())))
}

fn capped_limit(state: &SharedState, requested: Option<usize>) -> usize {
    let max = state.config.api.max_list_limit;
    requested.unwrap_or(max).clamp(1, max)
}

/// GET /api/employees
pub async fn list_employees(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let risk_level = query
        .risk_level
        .as_deref()
        .map(str::parse::<RiskLevel>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let filter = EmployeeFilter {
        department: query.department.filter(|d| !d.trim().is_empty()),
        risk_level,
        min_score: None,
        limit: Some(capped_limit(&state, query.limit)),
    };

    let (employees, fallback) = match state.repo.list(&filter).await {
        Ok(employees) => (employees, false),
        Err(err) => {
            let mut sample = sample_on_failure(&state, err, "list employees")?;
            sample.retain(|e| filter.matches(e));
            sample.truncate(filter.limit.unwrap_or(usize::MAX));
            (sample, true)
        }
    };

    let count = employees.len();
    Ok(ApiResponse::ok(employees).with("count", count).fallback(fallback))
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<SharedState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let new = body(payload)?;
    let employee = state.repo.create(new).await?;
    state.publish(AppEvent::EmployeeCreated { employee: employee.summary() });
    Ok(ApiResponse::created(employee))
}

/// GET /api/employees/high-risk?threshold=70
pub async fn high_risk_employees(
    State(state): State<SharedState>,
    Query(query): Query<HighRiskQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let threshold = query.threshold.unwrap_or(state.config.api.default_high_risk_threshold);
    if !(0.0..=100.0).contains(&threshold) {
        return Err(ApiError::BadRequest(format!(
            "threshold must be between 0 and 100, got {}",
            threshold
        )));
    }
    let limit = capped_limit(&state, query.limit);

    let (employees, fallback) = match state.repo.high_risk(threshold, Some(limit)).await {
        Ok(employees) => (employees, false),
        Err(err) => {
            let mut sample = sample_on_failure(&state, err, "high-risk employees")?;
            sample.retain(|e| e.risk_score >= threshold);
            sample.truncate(limit);
            (sample, true)
        }
    };

    let count = employees.len();
    Ok(ApiResponse::ok(employees)
        .with("count", count)
        .with("threshold", threshold)
        .fallback(fallback))
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = state.repo.get(&id).await?;
    Ok(ApiResponse::ok(employee))
}

/// PUT /api/employees/{id}
pub async fn update_employee(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let update = body(payload)?;
    let employee = state.repo.update(&id, update).await?;
    state.publish(AppEvent::EmployeeUpdated { employee: employee.summary() });
    Ok(ApiResponse::ok(employee))
}

/// DELETE /api/employees/{id}
pub async fn delete_employee(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.repo.delete(&id).await?;
    state.publish(AppEvent::EmployeeDeleted { id: id.clone() });
    Ok(ApiResponse::ok(json!({ "id": id })).with("message", "Employee deleted"))
}
