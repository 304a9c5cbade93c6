//! Schema-less record: one JSON object per entity.
//!
//! Records keep arbitrary fields. Only the identifier and a per-collection
//! list of required keys are checked, at the boundary where records enter
//! a collection.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ModelError;

/// Canonical identifier key.
pub const ID_FIELD: &str = "_id";
/// Mirror of `_id` kept for clients that address records by `id`.
pub const ALT_ID_FIELD: &str = "id";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Fields a patch can never overwrite.
const IMMUTABLE_FIELDS: [&str; 3] = [ID_FIELD, ALT_ID_FIELD, CREATED_AT];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self { Self(Map::new()) }

    /// Accepts only JSON objects.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ModelError::InvalidRecord(format!("expected a JSON object, got {}", kind(&other)))),
        }
    }

    pub fn into_value(self) -> Value { Value::Object(self.0) }
    pub fn as_map(&self) -> &Map<String, Value> { &self.0 }

    pub fn id(&self) -> Option<&str> { self.get_str(ID_FIELD) }

    /// True when `_id` or `id` equals `id`.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id() == Some(id) || self.get_str(ALT_ID_FIELD) == Some(id)
    }

    pub fn get(&self, field: &str) -> Option<&Value> { self.0.get(field) }

    pub fn get_str(&self, field: &str) -> Option<&str> { self.0.get(field).and_then(Value::as_str) }

    pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> { self.0.remove(field) }

    /// Copy of the record without `field`.
    pub fn without(&self, field: &str) -> Self {
        let mut copy = self.clone();
        copy.remove(field);
        copy
    }

    /// Every listed field must be present, non-null, and not a blank string.
    pub fn require(&self, fields: &[&str]) -> Result<(), ModelError> {
        for field in fields {
            match self.0.get(*field) {
                None | Some(Value::Null) => return Err(ModelError::missing(field)),
                Some(Value::String(s)) if s.trim().is_empty() => return Err(ModelError::missing(field)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Document-style `{field: value}` match.
    pub fn field_equals(&self, field: &str, value: &Value) -> bool {
        self.0.get(field) == Some(value)
    }

    /// Assign `_id` (keeping a caller supplied string), overwrite `id` with
    /// it, and stamp both timestamps. Returns the identifier.
    pub fn stamp_new(&mut self) -> Result<String, ModelError> {
        let id = match self.0.get(ID_FIELD) {
            None | Some(Value::Null) => Uuid::new_v4().to_string(),
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(_) => return Err(ModelError::Validation(format!("{ID_FIELD} must be a non-empty string"))),
        };
        self.insert(ID_FIELD, id.clone());
        self.insert(ALT_ID_FIELD, id.clone());
        let now = timestamp();
        self.insert(CREATED_AT, now.clone());
        self.insert(UPDATED_AT, now);
        Ok(id)
    }

    /// Merge `patch` into the record and refresh `updatedAt`.
    ///
    /// Objects merge key by key at every depth; any other value (including
    /// arrays and `null`) replaces what was there. `_id`, `id` and
    /// `createdAt` are never touched.
    pub fn merge(&mut self, patch: Record) {
        for (key, value) in patch.0 {
            if IMMUTABLE_FIELDS.contains(&key.as_str()) {
                continue;
            }
            match self.0.get_mut(&key) {
                Some(existing) => merge_value(existing, value),
                None => {
                    self.0.insert(key, value);
                }
            }
        }
        self.insert(UPDATED_AT, timestamp());
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self { Self(map) }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self { record.into_value() }
}

fn merge_value(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(into), Value::Object(from)) => {
            for (key, value) in from {
                match into.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        into.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// RFC 3339 UTC with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
