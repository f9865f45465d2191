//! Router-level tests against the in-memory store.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use talentrisk_common::Employee;
use talentrisk_config::Config;
use talentrisk_db::{DbError, EmployeeFilter, EmployeeRepository, EmployeeStore, MemoryStore};
use talentrisk_scorer::RiskModel;
use talentrisk_test_utils::{flight_risk_employee, new_employee, parse_json, stable_employee};
use talentrisk_web::router::build_router;
use talentrisk_web::state::AppState;
use tower::ServiceExt;

/// A store whose every call fails as if MongoDB were down.
struct DownStore;

fn down<T>() -> talentrisk_db::Result<T> {
    Err(DbError::Unavailable("connection refused".into()))
}

#[async_trait]
impl EmployeeStore for DownStore {
    fn backend(&self) -> &'static str { "mongodb" }
    async fn ping(&self) -> talentrisk_db::Result<()> { down() }
    async fn insert(&self, _: &Employee) -> talentrisk_db::Result<()> { down() }
    async fn insert_many(&self, _: &[Employee]) -> talentrisk_db::Result<usize> { down() }
    async fn find_by_id(&self, _: &str) -> talentrisk_db::Result<Option<Employee>> { down() }
    async fn list(&self, _: &EmployeeFilter) -> talentrisk_db::Result<Vec<Employee>> { down() }
    async fn replace(&self, _: &Employee) -> talentrisk_db::Result<bool> { down() }
    async fn delete(&self, _: &str) -> talentrisk_db::Result<bool> { down() }
    async fn delete_all(&self) -> talentrisk_db::Result<u64> { down() }
    async fn count(&self) -> talentrisk_db::Result<u64> { down() }
}

fn app_with(store: Arc<dyn EmployeeStore>, config: Config) -> Router {
    let repo = EmployeeRepository::new(store, Arc::new(RiskModel::default()));
    build_router(AppState::new(repo, config))
}

fn app() -> Router {
    app_with(Arc::new(MemoryStore::new()), Config::default())
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, parse_json(&bytes))
}

async fn create(app: &Router, payload: talentrisk_common::NewEmployee) -> Value {
    let (status, body) = call(app, Method::POST, "/api/employees", Some(json!(payload))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"].clone()
}

#[tokio::test]
async fn health_reports_memory_backend() {
    let (status, body) = call(&app(), Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["database"], true);
    assert_eq!(body["activeConnections"], 0);
}

#[tokio::test]
async fn post_then_get_returns_same_employee() {
    let app = app();
    let created = create(&app, new_employee("Jo Lee", "Finance")).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = call(&app, Method::GET, &format!("/api/employees/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], created);
}

#[tokio::test]
async fn created_employee_is_scored() {
    let app = app();
    let created = create(&app, flight_risk_employee("Riley")).await;
    let score = created["riskScore"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&score));
    assert!(score >= 70.0);
    assert_eq!(created["riskLevel"], "HIGH");
    assert_eq!(created["riskTrend"], "deteriorating");
}

#[tokio::test]
async fn invalid_create_is_400_with_envelope() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/employees",
        Some(json!({ "name": "", "department": "Ops", "role": "Analyst" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("name"));

    let (status, body) = call(&app, Method::POST, "/api/employees", Some(json!({ "name": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn put_merges_and_rescores() {
    let app = app();
    let created = create(&app, stable_employee("Morgan")).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/employees/{}", id),
        Some(json!({ "engagementScore": 0.1, "performanceRating": 1.5, "tenureMonths": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let updated = &body["data"];
    assert_eq!(updated["name"], "Morgan");
    assert_eq!(updated["role"], created["role"]);
    assert_eq!(updated["compRatio"], created["compRatio"]);
    assert!(updated["riskScore"].as_f64().unwrap() > created["riskScore"].as_f64().unwrap());
}

#[tokio::test]
async fn missing_employee_is_404() {
    let app = app();
    for method in [Method::GET, Method::DELETE] {
        let (status, body) = call(&app, method, "/api/employees/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
    let (status, _) = call(&app, Method::PUT, "/api/employees/nope", Some(json!({ "role": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_employee() {
    let app = app();
    let created = create(&app, new_employee("Sam", "Ops")).await;
    let uri = format!("/api/employees/{}", created["id"].as_str().unwrap());

    let (status, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_department_and_level() {
    let app = app();
    create(&app, flight_risk_employee("A")).await;
    create(&app, stable_employee("B")).await;
    create(&app, new_employee("C", "Finance")).await;

    let (_, body) = call(&app, Method::GET, "/api/employees", None).await;
    assert_eq!(body["count"], 3);

    let (_, body) = call(&app, Method::GET, "/api/employees?department=Finance", None).await;
    assert_eq!(body["count"], 2);

    let (_, body) = call(&app, Method::GET, "/api/employees?riskLevel=high", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "A");

    let (status, _) = call(&app, Method::GET, "/api/employees?riskLevel=extreme", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn high_risk_uses_threshold() {
    let app = app();
    create(&app, flight_risk_employee("A")).await;
    create(&app, stable_employee("B")).await;

    let (status, body) = call(&app, Method::GET, "/api/employees/high-risk", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["threshold"], 70.0);
    assert_eq!(body["count"], 1);

    let (_, body) = call(&app, Method::GET, "/api/employees/high-risk?threshold=0", None).await;
    assert_eq!(body["count"], 2);

    let (status, _) = call(&app, Method::GET, "/api/employees/high-risk?threshold=150", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_counts_add_up() {
    let app = app();
    create(&app, flight_risk_employee("A")).await;
    create(&app, stable_employee("B")).await;
    create(&app, new_employee("C", "Ops")).await;

    let (status, body) = call(&app, Method::GET, "/api/dashboard/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totalEmployees"], 3);
    let dist = &data["riskDistribution"];
    let sum = dist["high"].as_u64().unwrap() + dist["medium"].as_u64().unwrap() + dist["low"].as_u64().unwrap();
    assert_eq!(sum, 3);
    assert_eq!(data["highRiskEmployees"], dist["high"]);
    assert!(body.get("fallback").is_none());
}

#[tokio::test]
async fn risk_config_lists_profiles() {
    let (status, body) = call(&app(), Method::GET, "/api/risk/config", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["model"]["weights"]["performance"], 0.30);
    assert_eq!(data["model"]["thresholds"]["high"], 70.0);
    assert_eq!(data["profiles"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn assess_scores_without_storing() {
    let app = app();
    let body = json!({
        "performanceRating": 1.0,
        "tenureMonths": 2,
        "engagementScore": 0.0,
        "compRatio": 0.5,
        "skillGaps": ["Go", "Rust", "K8s"]
    });
    let (status, resp) = call(&app, Method::POST, "/api/risk/assess", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["score"], 94.5);
    assert_eq!(resp["data"]["level"], "HIGH");
    assert_eq!(
        resp["data"]["recommendations"],
        json!([
            "Immediate retention strategy required",
            "Schedule urgent manager check-in",
            "Create performance improvement plan",
            "Conduct feedback session to address concerns"
        ])
    );

    let (_, resp) = call(&app, Method::POST, "/api/risk/assess?profile=sales", Some(body)).await;
    assert_eq!(resp["data"]["profile"], "sales_focused");

    let (status, _) = call(&app, Method::POST, "/api/risk/assess?profile=bogus", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = call(&app, Method::GET, "/api/employees", None).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn employee_assessment_with_profile() {
    let app = app();
    let created = create(&app, new_employee("Kai", "Engineering")).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/api/risk/employees/{}?profile=tech_focused", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["employee"]["id"], id);
    assert_eq!(body["data"]["assessment"]["profile"], "tech_focused");
    assert!(!body["data"]["assessment"]["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn recalculate_reports_count() {
    let app = app();
    create(&app, new_employee("A", "Ops")).await;
    create(&app, new_employee("B", "Ops")).await;
    let (status, body) = call(&app, Method::POST, "/api/risk/recalculate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 2);
}

#[tokio::test]
async fn store_failure_serves_sample_roster() {
    let app = app_with(Arc::new(DownStore), Config::default());

    let (status, body) = call(&app, Method::GET, "/api/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["count"], 5);

    let (status, body) = call(&app, Method::GET, "/api/dashboard/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["data"]["totalEmployees"], 5);

    let (status, body) = call(&app, Method::GET, "/api/risk/departments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], true);

    let (status, body) = call(&app, Method::GET, "/api/employees/high-risk", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], true);
    for e in body["data"].as_array().unwrap() {
        assert!(e["riskScore"].as_f64().unwrap() >= 70.0);
    }

    let (_, health) = call(&app, Method::GET, "/api/health", None).await;
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["database"], false);
}

#[tokio::test]
async fn fallback_list_keeps_highest_scores_under_limit() {
    let app = app_with(Arc::new(DownStore), Config::default());

    let (status, body) = call(&app, Method::GET, "/api/employees?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], true);
    let ranked: Vec<(&str, f64)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["name"].as_str().unwrap(), e["riskScore"].as_f64().unwrap()))
        .collect();
    assert_eq!(ranked, vec![("David Kim", 83.5), ("Sarah Johnson", 69.17)]);
}

#[tokio::test]
async fn store_failure_without_fallback_is_503() {
    let mut config = Config::default();
    config.api.fallback_to_sample_data = false;
    let app = app_with(Arc::new(DownStore), config);

    let (status, body) = call(&app, Method::GET, "/api/employees", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);

    let (status, _) = call(&app, Method::GET, "/api/dashboard/metrics", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn writes_are_not_served_from_fallback() {
    let app = app_with(Arc::new(DownStore), Config::default());
    let (status, _) = call(&app, Method::POST, "/api/employees", Some(json!(new_employee("X", "Ops")))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
