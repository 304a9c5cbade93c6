use models::{employee, employee::EmployeeFilter, Record};

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::storage::{Collection, RecordStore};

/// File-backed `employees` collection (`<data_dir>/employees.json`).
#[derive(Clone, Debug)]
pub struct EmployeeStore {
    employees: Collection,
}

impl EmployeeStore {
    pub fn new(store: RecordStore) -> Self {
        let employees = Collection::new(store, employee::COLLECTION, employee::REQUIRED_FIELDS)
            .with_validator(employee::validate);
        Self { employees }
    }

    pub async fn create(&self, fields: Record) -> Result<Record, ServiceError> {
        self.employees.create(fields).await
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Record> {
        self.employees.find_by_id(id).await
    }

    pub async fn find_all(&self) -> Vec<Record> {
        self.employees.find_all().await
    }

    /// Filtered listing in insertion order, optionally paged.
    pub async fn list(&self, filter: &EmployeeFilter, page: Option<Pagination>) -> Vec<Record> {
        let matching = if filter.is_empty() {
            self.employees.find_all().await
        } else {
            self.employees.find_many(|r| filter.matches(r)).await
        };
        match page {
            Some(p) => p.apply(matching),
            None => matching,
        }
    }

    pub async fn update(&self, id: &str, patch: Record) -> Result<Option<Record>, ServiceError> {
        self.employees.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        self.employees.delete(id).await
    }

    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.employees.clear().await
    }
}
