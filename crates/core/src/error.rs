// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Version probe error: {0}")]
    Probe(#[from] crate::port::ProbeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Kernel spec `{name}` failed: {source}")]
    Kernelspec {
        name: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Attach the kernel name to an error raised while processing that kernel
    pub fn for_kernel(name: impl Into<String>, source: AppError) -> Self {
        AppError::Kernelspec {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
