//! Round trip against a live MongoDB. Run with
//! `MONGODB_URI=mongodb://localhost:27017 cargo test -p talentrisk-db -- --ignored`.

use std::sync::Arc;
use talentrisk_common::{EmployeeUpdate, RiskLevel};
use talentrisk_config::StorageConfig;
use talentrisk_db::{EmployeeFilter, EmployeeRepository, EmployeeStore, MongoStore};
use talentrisk_scorer::RiskModel;
use talentrisk_test_utils::{flight_risk_employee, stable_employee};

async fn store() -> MongoStore {
    let config = StorageConfig {
        uri: std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into()),
        database: format!("talentrisk-test-{}", uuid::Uuid::new_v4().simple()),
        ..Default::default()
    };
    let store = MongoStore::connect(&config).await.expect("client");
    store.ping().await.expect("MongoDB reachable");
    store.ensure_indexes().await.expect("indexes");
    store
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn mongo_crud_round_trip() {
    let store = Arc::new(store().await);
    let repo = EmployeeRepository::new(store.clone(), Arc::new(RiskModel::default()));

    let risky = repo.create(flight_risk_employee("Riley")).await.unwrap();
    let calm = repo.create(stable_employee("Morgan")).await.unwrap();
    let fetched = repo.get(&risky.id).await.unwrap();
    assert_eq!(fetched.risk_score, risky.risk_score);
    // Stored as BSON dates, which keep milliseconds.
    assert_eq!(fetched.created_at.timestamp_millis(), risky.created_at.timestamp_millis());

    let engineering = repo
        .list(&EmployeeFilter::all().department("engineering"))
        .await
        .unwrap();
    assert_eq!(engineering.len(), 1);

    let high = repo
        .list(&EmployeeFilter::all().risk_level(RiskLevel::High))
        .await
        .unwrap();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].id, risky.id);

    let updated = repo
        .update(&calm.id, EmployeeUpdate { role: Some("CFO".into()), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.role, "CFO");

    assert!(store.insert(&risky).await.is_err());

    repo.delete(&risky.id).await.unwrap();
    assert_eq!(store.count().await.unwrap(), 1);
    assert_eq!(store.delete_all().await.unwrap(), 1);
}
