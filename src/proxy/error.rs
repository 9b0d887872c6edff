use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Outcome of a failed facade operation.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// Input rejected locally, downstream was not contacted
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Request could not be read: unparsable body, bad path or query
    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Downstream answered with an error status other than 404
    #[error("Upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Connection, TLS or protocol failure talking to downstream
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream timeout: {0}")]
    Timeout(String),

    /// Downstream body does not match the expected contract
    #[error("Malformed upstream response: {0}")]
    Decode(String),
}

pub type FacadeResult<T> = Result<T, FacadeError>;

impl FacadeError {
    pub fn status(&self) -> StatusCode {
        match self {
            FacadeError::Validation(_) | FacadeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            FacadeError::NotFound(_) => StatusCode::NOT_FOUND,
            FacadeError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            FacadeError::Transport(_) | FacadeError::Decode(_) => StatusCode::BAD_GATEWAY,
            FacadeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Build from a transport-level reqwest failure
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return FacadeError::Timeout(error_chain(&e));
        }
        if e.is_decode() {
            return FacadeError::Decode(error_chain(&e));
        }
        FacadeError::Transport(error_chain(&e))
    }
}

// reqwest's top-level message hides the TLS cause, walk the sources
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl From<JsonRejection> for FacadeError {
    fn from(rejection: JsonRejection) -> Self {
        FacadeError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for FacadeError {
    fn from(rejection: PathRejection) -> Self {
        FacadeError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for FacadeError {
    fn from(rejection: QueryRejection) -> Self {
        FacadeError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for FacadeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            FacadeError::Validation(violations) => violations.join("; "),
            FacadeError::BadRequest(message) => message.clone(),
            FacadeError::Upstream { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        };

        (
            status,
            Json(json!({
                "status": status.as_u16(),
                "error": status.canonical_reason().unwrap_or("Error"),
                "message": message,
            })),
        )
            .into_response()
    }
}
