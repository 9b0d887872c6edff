use thiserror::Error;

/// Startup and infrastructure errors.
///
/// Per-request failures of the facade live in [`crate::proxy::error::FacadeError`].
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Trust store error: {0}")]
    TrustStore(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

// Implement alias for Result to simplify usage
pub type AppResult<T> = Result<T, AppError>;
