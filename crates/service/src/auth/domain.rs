use models::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Registration input. Fields beyond the three required ones are stored
/// on the user record as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// JWT claims; `sub` is the user's `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Login/registration result. `user` is the public view (no password).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: Record,
}
