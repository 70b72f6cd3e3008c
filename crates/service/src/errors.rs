use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("identifier {0} already exists")]
    DuplicateKey(i64),
    #[error("identifier {0} not found")]
    NotFound(i64),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self { Self::InvalidInput(msg.into()) }
    pub fn persistence(err: impl std::fmt::Display) -> Self { Self::Persistence(err.to_string()) }
}

impl From<models::ModelError> for ServiceError {
    fn from(err: models::ModelError) -> Self {
        match err {
            models::ModelError::Validation(msg) => Self::InvalidInput(msg),
        }
    }
}
