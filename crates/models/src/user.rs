//! Conventions for the `users` collection.

use crate::errors::ModelError;
use crate::record::Record;

pub const COLLECTION: &str = "users";
pub const REQUIRED_FIELDS: &[&str] = &["username", "email", "password"];
pub const PASSWORD_FIELD: &str = "password";
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace) => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.trim().is_empty() { return Err(ModelError::missing("username")); }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ModelError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    Ok(())
}

/// The record as returned to clients: never carries the password hash.
pub fn public_view(record: &Record) -> Record {
    record.without(PASSWORD_FIELD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn email_rules() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("ax.com").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a b@x.com").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn public_view_strips_password() {
        let r = Record::from_value(json!({"username": "a", "password": "hash"})).unwrap();
        let v = public_view(&r);
        assert!(!v.contains("password"));
        assert_eq!(v.get_str("username"), Some("a"));
    }
}
