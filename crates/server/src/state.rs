use std::sync::Arc;

use service::auth::{repo::FileAuthRepository, AuthService};
use service::file::{EmployeeStore, UserStore};
use service::storage::RecordStore;

pub type FileAuthService = AuthService<FileAuthRepository>;

/// Shared handler state. Stores hold only the data directory path, so
/// cloning is cheap and no record data is cached between requests.
#[derive(Clone)]
pub struct ServerState {
    pub employees: EmployeeStore,
    pub auth: Arc<FileAuthService>,
}

impl ServerState {
    pub fn new(store: RecordStore, auth: service::auth::service::AuthConfig) -> Self {
        let users = UserStore::new(store.clone());
        let repo = Arc::new(FileAuthRepository::new(users));
        Self {
            employees: EmployeeStore::new(store),
            auth: Arc::new(AuthService::new(repo, auth)),
        }
    }
}
