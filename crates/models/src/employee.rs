//! Conventions for the `employees` collection.

use serde::Deserialize;

use crate::errors::ModelError;
use crate::record::Record;
use crate::user::validate_email;

pub const COLLECTION: &str = "employees";
pub const REQUIRED_FIELDS: &[&str] = &["firstName", "lastName", "email"];

/// Field checks beyond presence: `email`, when given, must look like one.
pub fn validate(record: &Record) -> Result<(), ModelError> {
    if let Some(email) = record.get_str("email") {
        validate_email(email)?;
    }
    Ok(())
}

/// Optional filters for listing employees; all given filters must match.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub status: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, record: &Record) -> bool {
        let eq = |field: &str, want: &Option<String>| match want {
            Some(w) => record.get_str(field).map(|v| v.eq_ignore_ascii_case(w)).unwrap_or(false),
            None => true,
        };
        eq("department", &self.department) && eq("status", &self.status)
    }

    pub fn is_empty(&self) -> bool {
        self.department.is_none() && self.status.is_none()
    }
}
