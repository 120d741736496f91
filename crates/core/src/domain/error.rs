// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid kernel.json document: {0}")]
    InvalidDocument(String),

    #[error("Metadata key `{key}` must be a JSON object, found {found}")]
    InvalidMetadata { key: String, found: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
