use async_trait::async_trait;
use models::Record;

use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Record>, AuthError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Record>, AuthError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Record>, AuthError>;
    async fn create_user(&self, fields: Record) -> Result<Record, AuthError>;
    async fn update_user(&self, id: &str, patch: Record) -> Result<Option<Record>, AuthError>;
    async fn delete_user(&self, id: &str) -> Result<bool, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<Vec<Record>>,
    }

    impl MockAuthRepository {
        fn with_users<T>(&self, f: impl FnOnce(&mut Vec<Record>) -> T) -> Result<T, AuthError> {
            let mut users = self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            Ok(f(&mut users))
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<Record>, AuthError> {
            self.with_users(|u| u.iter().find(|r| r.get_str("email").map(|e| e.eq_ignore_ascii_case(email)).unwrap_or(false)).cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<Record>, AuthError> {
            self.with_users(|u| u.iter().find(|r| r.get_str("username") == Some(username)).cloned())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Record>, AuthError> {
            self.with_users(|u| u.iter().find(|r| r.matches_id(id)).cloned())
        }

        async fn create_user(&self, fields: Record) -> Result<Record, AuthError> {
            let mut record = fields;
            record.stamp_new()?;
            let created = record.clone();
            self.with_users(move |u| u.push(record))?;
            Ok(created)
        }

        async fn update_user(&self, id: &str, patch: Record) -> Result<Option<Record>, AuthError> {
            self.with_users(|u| {
                u.iter_mut().find(|r| r.matches_id(id)).map(|r| {
                    r.merge(patch);
                    r.clone()
                })
            })
        }

        async fn delete_user(&self, id: &str) -> Result<bool, AuthError> {
            self.with_users(|u| {
                let before = u.len();
                u.retain(|r| !r.matches_id(id));
                u.len() != before
            })
        }
    }
}
