//! In-process employee store.

use async_trait::async_trait;
use indexmap::IndexMap;
use talentrisk_common::Employee;
use tokio::sync::RwLock;

use crate::error::{DbError, Result};
use crate::store::{EmployeeFilter, EmployeeStore};

/// Insertion-ordered map behind a `RwLock`. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    employees: RwLock<IndexMap<String, Employee>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let map = employees.into_iter().map(|e| (e.id.clone(), e)).collect();
        Self { employees: RwLock::new(map) }
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, employee: &Employee) -> Result<()> {
        let mut map = self.employees.write().await;
        if map.contains_key(&employee.id) {
            return Err(DbError::Duplicate(employee.id.clone()));
        }
        map.insert(employee.id.clone(), employee.clone());
        Ok(())
    }

    async fn insert_many(&self, employees: &[Employee]) -> Result<usize> {
        let mut map = self.employees.write().await;
        if let Some(dup) = employees.iter().find(|e| map.contains_key(&e.id)) {
            return Err(DbError::Duplicate(dup.id.clone()));
        }
        for e in employees {
            map.insert(e.id.clone(), e.clone());
        }
        Ok(employees.len())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>> {
        Ok(self.employees.read().await.get(id).cloned())
    }

    async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let map = self.employees.read().await;
        let mut out: Vec<Employee> = map.values().filter(|e| filter.matches(e)).cloned().collect();
        out.sort_by(|a, b| {
            b.risk_score
                .partial_cmp(&a.risk_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(limit) = filter.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    async fn replace(&self, employee: &Employee) -> Result<bool> {
        let mut map = self.employees.write().await;
        match map.get_mut(&employee.id) {
            Some(slot) => {
                *slot = employee.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.employees.write().await.shift_remove(id).is_some())
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut map = self.employees.write().await;
        let n = map.len() as u64;
        map.clear();
        Ok(n)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.employees.read().await.len() as u64)
    }
}
