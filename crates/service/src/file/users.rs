use models::{user, Record};
use serde_json::Value;

use crate::errors::ServiceError;
use crate::storage::{Collection, RecordStore};

/// File-backed `users` collection (`<data_dir>/users.json`).
///
/// Stores whatever password value it is given; hashing happens in the
/// auth service before records reach this layer.
#[derive(Clone, Debug)]
pub struct UserStore {
    users: Collection,
}

impl UserStore {
    pub fn new(store: RecordStore) -> Self {
        Self { users: Collection::new(store, user::COLLECTION, user::REQUIRED_FIELDS) }
    }

    pub async fn create(&self, fields: Record) -> Result<Record, ServiceError> {
        self.users.create(fields).await
    }

    pub async fn find_one_by(&self, field: &str, value: &Value) -> Option<Record> {
        self.users.find_one_by(field, value).await
    }

    /// Case-insensitive, whitespace-trimmed email lookup.
    pub async fn find_by_email(&self, email: &str) -> Option<Record> {
        let wanted = email.trim();
        self.users
            .find_one(|r| r.get_str("email").map(|e| e.trim().eq_ignore_ascii_case(wanted)).unwrap_or(false))
            .await
    }

    pub async fn find_by_username(&self, username: &str) -> Option<Record> {
        let wanted = username.trim();
        self.users.find_one(|r| r.get_str("username").map(|u| u.trim() == wanted).unwrap_or(false)).await
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Record> {
        self.users.find_by_id(id).await
    }

    pub async fn find_all(&self) -> Vec<Record> {
        self.users.find_all().await
    }

    pub async fn update(&self, id: &str, patch: Record) -> Result<Option<Record>, ServiceError> {
        self.users.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        self.users.delete(id).await
    }
}
