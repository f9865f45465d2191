//! MongoDB-backed employee store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, Collation, CollationStrength, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use std::time::Duration;
use talentrisk_common::Employee;
use talentrisk_config::StorageConfig;

use crate::document::EmployeeDocument;
use crate::error::Result;
use crate::store::{EmployeeFilter, EmployeeStore};

/// Fail fast when the server is down instead of the driver's 30s default.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Main MongoDB handle.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: String,
    employees: Collection<EmployeeDocument>,
}

impl MongoStore {
    /// Build a client for `config.uri`.
    ///
    /// The driver connects lazily, so this succeeds even when the server is
    /// unreachable; call [`EmployeeStore::ping`] to check.
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some("talentrisk".to_string());
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options)?;
        let employees = client
            .database(&config.database)
            .collection::<EmployeeDocument>(&config.collection);

        tracing::info!(
            uri = %config.redacted_uri(),
            database = %config.database,
            collection = %config.collection,
            "MongoDB client created"
        );

        Ok(Self {
            client,
            database: config.database.clone(),
            employees,
        })
    }

    /// Create the indexes the queries rely on. Safe to run repeatedly.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique_id = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let by_score = IndexModel::builder().keys(doc! { "riskScore": -1 }).build();
        let by_department = IndexModel::builder()
            .keys(doc! { "department": 1 })
            .options(
                IndexOptions::builder()
                    .name("department_ci".to_string())
                    .collation(department_collation())
                    .build(),
            )
            .build();

        self.employees
            .create_indexes(vec![unique_id, by_score, by_department])
            .await?;
        tracing::debug!("employee indexes ensured");
        Ok(())
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }
}

/// Case-insensitive string comparison, matching [`EmployeeFilter::matches`].
fn department_collation() -> Collation {
    Collation::builder()
        .locale("en".to_string())
        .strength(CollationStrength::Secondary)
        .build()
}

/// Collation a query needs; only department matching is case-insensitive.
fn query_collation(filter: &EmployeeFilter) -> Option<Collation> {
    filter.department.as_ref().map(|_| department_collation())
}

fn filter_document(filter: &EmployeeFilter) -> Document {
    let mut query = Document::new();
    if let Some(dept) = &filter.department {
        query.insert("department", dept.as_str());
    }
    if let Some(level) = filter.risk_level {
        query.insert("riskLevel", level.as_str());
    }
    if let Some(min) = filter.min_score {
        query.insert("riskScore", doc! { "$gte": min });
    }
    query
}

#[async_trait]
impl EmployeeStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn insert(&self, employee: &Employee) -> Result<()> {
        self.employees.insert_one(EmployeeDocument::from(employee)).await?;
        Ok(())
    }

    async fn insert_many(&self, employees: &[Employee]) -> Result<usize> {
        if employees.is_empty() {
            return Ok(0);
        }
        let result = self
            .employees
            .insert_many(employees.iter().map(EmployeeDocument::from))
            .await?;
        Ok(result.inserted_ids.len())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        let found = self.employees.find_one(doc! { "id": id }).await?;
        Ok(found.map(Employee::from))
    }

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let mut find = self
            .employees
            .find(filter_document(filter))
            .sort(doc! { "riskScore": -1 });
        if let Some(limit) = filter.limit {
            find = find.limit(limit as i64);
        }
        if let Some(collation) = query_collation(filter) {
            find = find.collation(collation);
        }
        let cursor = find.await?;
        let documents: Vec<EmployeeDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Employee::from).collect())
    }

    async fn replace(&self, employee: &Employee) -> Result<bool> {
        let result = self
            .employees
            .replace_one(doc! { "id": employee.id.as_str() }, EmployeeDocument::from(employee))
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.employees.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = self.employees.delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.employees.count_documents(doc! {}).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentrisk_common::RiskLevel;

    #[test]
    fn test_filter_document() {
        let filter = EmployeeFilter::all()
            .department("Engineering")
            .risk_level(RiskLevel::High)
            .min_score(70.0);
        let query = filter_document(&filter);
        assert_eq!(query.get_str("department").unwrap(), "Engineering");
        assert_eq!(query.get_str("riskLevel").unwrap(), "HIGH");
        assert_eq!(
            query.get_document("riskScore").unwrap().get_f64("$gte").unwrap(),
            70.0
        );
        assert!(filter_document(&EmployeeFilter::all()).is_empty());
    }

    #[test]
    fn test_department_queries_ignore_case() {
        let collation = query_collation(&EmployeeFilter::all().department("engineering")).unwrap();
        assert_eq!(collation.locale, "en");
        assert!(matches!(collation.strength, Some(CollationStrength::Secondary)));

        assert!(query_collation(&EmployeeFilter::all().risk_level(RiskLevel::High)).is_none());
    }
}
