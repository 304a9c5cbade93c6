use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

const GENERIC_MESSAGE: &str = "Something went wrong!";

/// JSON error body: `{"error": ..., "message": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg.into()))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(msg.into()))
    }

    /// 500 with a generic message; the cause is only logged.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(GENERIC_MESSAGE.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = match self.message {
            Some(msg) => serde_json::json!({"error": self.error, "message": msg}),
            None => serde_json::json!({"error": self.error}),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::Model(ModelError::Validation(msg) | ModelError::InvalidRecord(msg)) => Self::bad_request(msg),
            ServiceError::Conflict(msg) => Self::bad_request(msg),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Storage(e) => Self::internal(e),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => Self::bad_request(msg),
            AuthError::Conflict => Self::bad_request("User already exists"),
            AuthError::NotFound => Self::not_found("User not found"),
            AuthError::Unauthorized => Self::unauthorized("Invalid credentials"),
            AuthError::TokenError(_) => Self::unauthorized("Invalid or expired token"),
            other => {
                let code = other.code();
                error!(code, error = %other, "auth failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(GENERIC_MESSAGE.into()))
            }
        }
    }
}

impl From<ModelError> for JsonApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) | ModelError::InvalidRecord(msg) => Self::bad_request(msg),
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Model(ModelError::missing("email")), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn auth_errors_map_to_status_codes() {
        assert_eq!(JsonApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::from(AuthError::TokenError("x".into())).status, StatusCode::UNAUTHORIZED);
        assert_eq!(JsonApiError::from(AuthError::Conflict).status, StatusCode::BAD_REQUEST);
        let internal = JsonApiError::from(AuthError::Repository("disk".into()));
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message.as_deref(), Some(GENERIC_MESSAGE));
    }
}
