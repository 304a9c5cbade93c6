use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl ModelError {
    pub fn missing(field: &str) -> Self { Self::Validation(format!("{field} is required")) }
}
