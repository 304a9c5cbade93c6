use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::record::{ALT_ID_FIELD, CREATED_AT, ID_FIELD, UPDATED_AT};
use models::{user, Record};
use rand::rngs::OsRng;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn from_settings(cfg: &configs::AuthConfig) -> Self {
        Self { jwt_secret: cfg.jwt_secret.clone(), token_ttl: Duration::hours(cfg.token_ttl_hours) }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password and return a session.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl: chrono::Duration::hours(1) });
    /// let input = RegisterInput { username: "test".into(), email: "user@example.com".into(), password: "Secret123".into(), extra: Default::default() };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.get_str("email"), Some("user@example.com"));
    /// assert!(!session.user.contains("password"));
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_string();
        if username.is_empty() || email.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("username, email and password are required".into()));
        }
        user::validate_email(&email)?;
        user::validate_password(&input.password)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            debug!("email already registered");
            return Err(AuthError::Conflict);
        }
        if self.repo.find_by_username(&username).await?.is_some() {
            debug!("username already taken");
            return Err(AuthError::Conflict);
        }

        let mut record = Record::from(input.extra);
        for reserved in [ID_FIELD, ALT_ID_FIELD, CREATED_AT, UPDATED_AT] {
            record.remove(reserved);
        }
        record.insert("username", username);
        record.insert("email", email);
        record.insert(user::PASSWORD_FIELD, hash_password(&input.password)?);

        let created = self.repo.create_user(record).await?;
        info!(user_id = created.id().unwrap_or_default(), "user_registered");
        self.session_for(created)
    }

    /// Authenticate a user by email and password and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl: chrono::Duration::hours(1) });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "u".into(), email: "u@e.com".into(), password: "Passw0rd".into(), extra: Default::default() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.get_str("username"), Some("u"));
    /// assert!(svc.verify_token(&session.token).is_ok());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("email and password are required".into()));
        }
        let user = self.repo.find_by_email(&input.email).await?.ok_or(AuthError::Unauthorized)?;
        let stored = user.get_str(user::PASSWORD_FIELD).ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.password, stored)? {
            return Err(AuthError::Unauthorized);
        }
        info!(user_id = user.id().unwrap_or_default(), "user_logged_in");
        self.session_for(user)
    }

    /// Decode and validate a token (signature and expiry).
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Public view of the user with `user_id`.
    pub async fn profile(&self, user_id: &str) -> Result<Record, AuthError> {
        let found = self.repo.find_by_id(user_id).await?.ok_or(AuthError::NotFound)?;
        Ok(user::public_view(&found))
    }

    /// Merge `patch` into the user's record. A new password is hashed; a new
    /// email or username must not belong to another user.
    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, user_id: &str, patch: Record) -> Result<Record, AuthError> {
        let mut patch = patch;
        if let Some(value) = patch.get(user::PASSWORD_FIELD).cloned() {
            let password = value
                .as_str()
                .ok_or_else(|| AuthError::Validation("password must be a string".into()))?;
            user::validate_password(password)?;
            patch.insert(user::PASSWORD_FIELD, hash_password(password)?);
        }
        if let Some(value) = patch.get("email").cloned() {
            let email = string_field(&value, "email")?;
            user::validate_email(&email)?;
            if let Some(other) = self.repo.find_by_email(&email).await? {
                if !other.matches_id(user_id) {
                    return Err(AuthError::Conflict);
                }
            }
            patch.insert("email", email);
        }
        if let Some(value) = patch.get("username").cloned() {
            let username = string_field(&value, "username")?;
            user::validate_username(&username)?;
            if let Some(other) = self.repo.find_by_username(&username).await? {
                if !other.matches_id(user_id) {
                    return Err(AuthError::Conflict);
                }
            }
            patch.insert("username", username);
        }

        let updated = self.repo.update_user(user_id, patch).await?.ok_or(AuthError::NotFound)?;
        info!(user_id, "user_updated");
        Ok(user::public_view(&updated))
    }

    pub async fn delete_account(&self, user_id: &str) -> Result<(), AuthError> {
        if !self.repo.delete_user(user_id).await? {
            return Err(AuthError::NotFound);
        }
        info!(user_id, "user_deleted");
        Ok(())
    }

    fn session_for(&self, user: Record) -> Result<AuthSession, AuthError> {
        let token = self.issue_token(&user)?;
        Ok(AuthSession { token, user: user::public_view(&user) })
    }

    fn issue_token(&self, user: &Record) -> Result<String, AuthError> {
        let sub = user.id().ok_or_else(|| AuthError::TokenError("user has no _id".into()))?;
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            email: user.get_str("email").unwrap_or_default().to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.cfg.token_ttl).timestamp() as usize,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

fn string_field(value: &Value, field: &str) -> Result<String, AuthError> {
    value
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| AuthError::Validation(format!("{field} must be a string")))
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashError(e.to_string()))
}

pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}
