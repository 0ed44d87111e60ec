//! Unified error handling
//!
//! `DeployError` is the failure taxonomy of the deployment core; `ApiError`
//! implements `IntoResponse` so handlers can return typed failures instead of
//! repeating the `(StatusCode, Json<ErrorResponse>)` pattern.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures produced by the deployment core.
///
/// Every external-process failure carries the tool's raw stderr verbatim.
/// No step is retried; a failure is terminal for its flow.
#[derive(Debug, Error)]
pub enum DeployError {
    /// A referenced workspace, file or image does not exist
    #[error("{0} not found")]
    NotFound(String),
    /// Neither project marker file is present at the workspace root
    #[error("unknown project type: expected requirements.txt (Python) or package.json (Node) at the workspace root")]
    UnsupportedProject,
    /// Both marker files are present at once
    #[error("ambiguous project type: both requirements.txt and package.json are present")]
    MultipleProjectMarkers,
    /// `git clone` exited non-zero
    #[error("git clone failed: {stderr}")]
    Vcs { stderr: String },
    /// `docker build` exited non-zero
    #[error("docker build failed: {stderr}")]
    Build { stderr: String },
    /// `docker run` / `docker stop` exited non-zero
    #[error("docker command failed: {stderr}")]
    Runtime { stderr: String },
    /// The launched container never started listening on its port
    #[error("app did not start listening on port {port} within {timeout_secs}s")]
    NotReady { port: u16, timeout_secs: u64 },
    /// The external binary could not be invoked at all
    #[error("failed to invoke {tool}: {reason}")]
    Tool { tool: &'static str, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// 404 - referenced workspace/file/image absent
    NotFound(String),
    /// 400 - missing or invalid caller input
    BadRequest(String),
    /// 500 - any core failure
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DeployError> for ApiError {
    fn from(err: DeployError) -> Self {
        match err {
            DeployError::NotFound(resource) => ApiError::NotFound(resource),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, message) = match self {
            ApiError::NotFound(resource) => ("not_found", format!("{} not found", resource)),
            ApiError::BadRequest(msg) => ("bad_request", msg),
            ApiError::Internal(msg) => ("internal_error", msg),
        };

        let body = ErrorResponse::new(error_type, message);
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(r) => write!(f, "Not found: {}", r),
            ApiError::BadRequest(m) => write!(f, "Bad request: {}", m),
            ApiError::Internal(m) => write!(f, "Internal error: {}", m),
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience alias
pub type ApiResult<T> = Result<T, ApiError>;
