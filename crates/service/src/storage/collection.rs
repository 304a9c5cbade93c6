use models::{errors::ModelError, Record};
use serde_json::Value;
use tracing::info;

use super::record_store::RecordStore;
use crate::errors::ServiceError;

/// Extra per-collection checks run after the required-field check.
pub type Validator = fn(&Record) -> Result<(), ModelError>;

/// Document-style accessor over one collection file.
///
/// Every operation is a full load, an in-memory scan or mutation, and (for
/// writes) a full save. Reads cannot fail: store trouble shows up as an
/// empty collection. Writes report store failures as `ServiceError::Storage`.
#[derive(Clone, Debug)]
pub struct Collection {
    store: RecordStore,
    name: &'static str,
    required: &'static [&'static str],
    validator: Option<Validator>,
}

impl Collection {
    pub fn new(store: RecordStore, name: &'static str, required: &'static [&'static str]) -> Self {
        Self { store, name, required, validator: None }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn store(&self) -> &RecordStore { &self.store }

    fn check(&self, record: &Record) -> Result<(), ServiceError> {
        record.require(self.required)?;
        if let Some(validate) = self.validator {
            validate(record)?;
        }
        Ok(())
    }

    /// Insert a new record with a fresh (or caller supplied) `_id` and timestamps.
    pub async fn create(&self, fields: Record) -> Result<Record, ServiceError> {
        self.check(&fields)?;
        let mut record = fields;
        let id = record.stamp_new()?;
        let mut records = self.store.load(self.name).await;
        if records.iter().any(|r| r.matches_id(&id)) {
            return Err(ServiceError::Conflict(format!("{} {id} already exists", self.name)));
        }
        records.push(record.clone());
        self.store.save(self.name, &records).await?;
        info!(collection = self.name, id = %id, count = records.len(), "record created");
        Ok(record)
    }

    /// First record satisfying `predicate`, in insertion order.
    pub async fn find_one<P>(&self, predicate: P) -> Option<Record>
    where
        P: Fn(&Record) -> bool,
    {
        self.store.load(self.name).await.into_iter().find(|r| predicate(r))
    }

    /// First record whose `field` equals `value`.
    pub async fn find_one_by(&self, field: &str, value: &Value) -> Option<Record> {
        self.find_one(|r| r.field_equals(field, value)).await
    }

    pub async fn find_many<P>(&self, predicate: P) -> Vec<Record>
    where
        P: Fn(&Record) -> bool,
    {
        self.store.load(self.name).await.into_iter().filter(|r| predicate(r)).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Record> {
        let mut records = self.store.load(self.name).await;
        locate(&records, id).map(|idx| records.swap_remove(idx))
    }

    pub async fn find_all(&self) -> Vec<Record> {
        self.store.load(self.name).await
    }

    /// Merge `patch` into the record with `id`. `Ok(None)` when absent.
    pub async fn update(&self, id: &str, patch: Record) -> Result<Option<Record>, ServiceError> {
        let mut records = self.store.load(self.name).await;
        let Some(idx) = locate(&records, id) else {
            return Ok(None);
        };
        let mut updated = records[idx].clone();
        updated.merge(patch);
        self.check(&updated)?;
        records[idx] = updated.clone();
        self.store.save(self.name, &records).await?;
        info!(collection = self.name, id, "record updated");
        Ok(Some(updated))
    }

    /// Remove the record with `id`. Returns whether it existed; the file is
    /// not rewritten when it did not.
    pub async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let mut records = self.store.load(self.name).await;
        let Some(idx) = locate(&records, id) else {
            return Ok(false);
        };
        records.remove(idx);
        self.store.save(self.name, &records).await?;
        info!(collection = self.name, id, count = records.len(), "record deleted");
        Ok(true)
    }

    /// Drop every record.
    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.store.save(self.name, &[]).await?;
        info!(collection = self.name, "collection cleared");
        Ok(())
    }
}

/// `_id` match wins over an `id` match.
fn locate(records: &[Record], id: &str) -> Option<usize> {
    records
        .iter()
        .position(|r| r.id() == Some(id))
        .or_else(|| records.iter().position(|r| r.matches_id(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_collection(required: &'static [&'static str]) -> Collection {
        let dir = std::env::temp_dir().join(format!("collection_{}", uuid::Uuid::new_v4()));
        Collection::new(RecordStore::new(dir), "users", required)
    }

    fn rec(v: Value) -> Record { Record::from_value(v).unwrap() }

    async fn cleanup(c: &Collection) {
        let _ = tokio::fs::remove_dir_all(c.store().data_dir()).await;
    }

    #[tokio::test]
    async fn create_assigns_unique_id_and_find_by_id_returns_it() -> Result<(), anyhow::Error> {
        let users = temp_collection(&["username", "email"]);
        let existing = users.create(rec(json!({"username": "b", "email": "b@x.com"}))).await?;
        let created = users.create(rec(json!({"username": "a", "email": "a@x.com"}))).await?;
        let id = created.id().unwrap().to_string();
        assert_ne!(Some(id.as_str()), existing.id());

        let found = users.find_by_id(&id).await.expect("found");
        assert_eq!(found, created);
        assert_eq!(found.get_str("email"), Some("a@x.com"));
        cleanup(&users).await;
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_fields_and_rejects_duplicate_ids() -> Result<(), anyhow::Error> {
        let users = temp_collection(&["username"]);
        assert!(matches!(users.create(rec(json!({"email": "x@y"}))).await, Err(ServiceError::Model(_))));
        users.create(rec(json!({"_id": "u1", "username": "a"}))).await?;
        assert!(matches!(
            users.create(rec(json!({"_id": "u1", "username": "b"}))).await,
            Err(ServiceError::Conflict(_))
        ));
        assert_eq!(users.find_all().await.len(), 1);
        cleanup(&users).await;
        Ok(())
    }

    #[tokio::test]
    async fn create_ignores_id_alias_pointing_at_another_record() -> Result<(), anyhow::Error> {
        let users = temp_collection(&[]);
        let first = users.create(rec(json!({"name": "a"}))).await?;
        let first_id = first.id().unwrap().to_string();

        let second = users.create(rec(json!({"name": "b", "id": first_id}))).await?;
        assert_eq!(second.get_str("id"), second.id());
        assert_ne!(second.id(), Some(first_id.as_str()));

        let answering = users.find_many(|r| r.matches_id(&first_id)).await;
        assert_eq!(answering.len(), 1);
        assert_eq!(users.find_by_id(&first_id).await, Some(first));
        cleanup(&users).await;
        Ok(())
    }

    #[tokio::test]
    async fn find_one_by_matches_first_in_insertion_order() -> Result<(), anyhow::Error> {
        let users = temp_collection(&[]);
        users.create(rec(json!({"_id": "1", "role": "admin"}))).await?;
        users.create(rec(json!({"_id": "2", "role": "admin"}))).await?;
        let hit = users.find_one_by("role", &json!("admin")).await.expect("hit");
        assert_eq!(hit.id(), Some("1"));
        assert!(users.find_one_by("role", &json!("guest")).await.is_none());
        assert_eq!(users.find_many(|r| r.get_str("role") == Some("admin")).await.len(), 2);
        cleanup(&users).await;
        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_accepts_mirrored_id_field() -> Result<(), anyhow::Error> {
        let users = temp_collection(&[]);
        // Records written before `id` was kept in sync with `_id`
        users.store().save("users", &[rec(json!({"_id": "primary", "id": "legacy"}))]).await?;
        assert!(users.find_by_id("legacy").await.is_some());
        assert!(users.find_by_id("primary").await.is_some());
        assert!(users.find_by_id("nope").await.is_none());
        cleanup(&users).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_and_reports_missing() -> Result<(), anyhow::Error> {
        let users = temp_collection(&["username"]);
        let created = users
            .create(rec(json!({"username": "a", "address": {"city": "Old", "zip": "1"}})))
            .await?;
        let id = created.id().unwrap();

        let updated = users
            .update(id, rec(json!({"address": {"city": "New"}, "_id": "hijack"})))
            .await?
            .expect("present");
        assert_eq!(updated.id(), Some(id));
        assert_eq!(updated.get("address"), Some(&json!({"city": "New", "zip": "1"})));
        assert_eq!(users.find_by_id(id).await, Some(updated));

        assert!(users.update("missing", rec(json!({"username": "x"}))).await?.is_none());
        assert!(users.update(id, rec(json!({"username": ""}))).await.is_err());
        cleanup(&users).await;
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_leaves_collection_unchanged() -> Result<(), anyhow::Error> {
        let users = temp_collection(&[]);
        users.create(rec(json!({"name": "a"}))).await?;
        users.create(rec(json!({"name": "b"}))).await?;
        let before = users.find_all().await;

        assert!(!users.delete("does-not-exist").await?);
        let after = users.find_all().await;
        assert_eq!(after.len(), before.len());
        assert_eq!(after, before);

        assert!(users.delete(before[0].id().unwrap()).await?);
        assert_eq!(users.find_all().await.len(), 1);
        cleanup(&users).await;
        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_collection() -> Result<(), anyhow::Error> {
        let users = temp_collection(&[]);
        users.create(rec(json!({"name": "a"}))).await?;
        users.clear().await?;
        assert!(users.find_all().await.is_empty());
        cleanup(&users).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_may_lose_a_write() -> Result<(), anyhow::Error> {
        // Unsynchronized creates race on the file. Depending on scheduling
        // one or both records survive; never more than were written.
        let users = temp_collection(&[]);
        let (a, b) = tokio::join!(
            users.create(rec(json!({"name": "a"}))),
            users.create(rec(json!({"name": "b"}))),
        );
        a?;
        b?;
        let len = users.find_all().await.len();
        assert!((1..=2).contains(&len), "got {len}");
        cleanup(&users).await;
        Ok(())
    }
}
