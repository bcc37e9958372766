use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use common::metrics::record_http_error;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::storage::StorageError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

/// JSON error response: `{"error": <title>, "detail": <message?>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, title: title.into(), detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(detail.into()))
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(detail.into()))
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        record_http_error(self.status.as_u16());
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), title = %self.title, detail = ?self.detail, "request failed");
        }
        (self.status, Json(ErrorBody { error: self.title, detail: self.detail })).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::Storage(se) => se.into(),
            ServiceError::Db(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Database Error", Some(msg)),
            ServiceError::Export(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Export Failed", Some(msg)),
        }
    }
}

impl From<StorageError> for JsonApiError {
    fn from(e: StorageError) -> Self {
        let msg = e.to_string();
        match e {
            StorageError::InvalidPath(_) | StorageError::Rejected(_) => Self::bad_request(msg),
            StorageError::UnknownBucket(_) | StorageError::NotFound(_) => Self::not_found(msg),
            StorageError::AlreadyExists(_) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            StorageError::TooLarge { .. } => Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", Some(msg)),
            StorageError::Io(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error", Some(msg)),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let detail = Some(format!("{} (code {})", e, e.code()));
        match e {
            AuthError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", detail),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, "Conflict", detail),
            AuthError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not Found", detail),
            e if e.is_auth_failure() => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Auth Error", detail),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
