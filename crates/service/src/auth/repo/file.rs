use async_trait::async_trait;
use models::Record;

use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::file::UserStore;

/// `AuthRepository` over the `users.json` collection.
#[derive(Clone, Debug)]
pub struct FileAuthRepository {
    pub users: UserStore,
}

impl FileAuthRepository {
    pub fn new(users: UserStore) -> Self { Self { users } }
}

#[async_trait]
impl AuthRepository for FileAuthRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Record>, AuthError> {
        Ok(self.users.find_by_email(email).await)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Record>, AuthError> {
        Ok(self.users.find_by_username(username).await)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Record>, AuthError> {
        Ok(self.users.find_by_id(id).await)
    }

    async fn create_user(&self, fields: Record) -> Result<Record, AuthError> {
        Ok(self.users.create(fields).await?)
    }

    async fn update_user(&self, id: &str, patch: Record) -> Result<Option<Record>, AuthError> {
        Ok(self.users.update(id, patch).await?)
    }

    async fn delete_user(&self, id: &str) -> Result<bool, AuthError> {
        Ok(self.users.delete(id).await?)
    }
}
