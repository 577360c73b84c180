//! HTTP-facing errors.
//!
//! Every error renders as `{ "message": ... }`; validation failures add the
//! itemized `errors` list so the admin UI can show all of them at once.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use folio_shared::FolioError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid experience level configuration")]
    Validation(Vec<String>),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FolioError> for ApiError {
    fn from(e: FolioError) -> Self {
        match e {
            FolioError::Validation(errors) => ApiError::Validation(errors),
            FolioError::InvalidDate(input) => ApiError::BadRequest(format!("Invalid date: {}", input)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => ErrorBody {
                message: "Invalid experience level configuration".to_string(),
                errors,
            },
            ApiError::Internal(detail) => {
                // Details stay in the log
                error!("  Request failed: {}", detail);
                ErrorBody {
                    message: "Internal server error".to_string(),
                    errors: Vec::new(),
                }
            }
            other => ErrorBody {
                message: other.to_string(),
                errors: Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}
