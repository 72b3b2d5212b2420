use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::screening::pipeline::SubmitError;
use crate::services::{AnalysisError, ServiceError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// A newer submission started while this one was in flight.
    #[error("Superseded by a newer submission")]
    Superseded,

    #[error("Upstream error: {0}")]
    Upstream(#[from] ServiceError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Service(e) => AppError::Upstream(e),
            SubmitError::Superseded(_) => AppError::Superseded,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Superseded => (
                StatusCode::CONFLICT,
                "SUPERSEDED",
                "This submission was superseded by a newer one".to_string(),
            ),
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {e}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.user_message())
            }
            AppError::Analysis(e) => {
                tracing::error!("Analysis error: {e}");
                let (code, message) = match e {
                    AnalysisError::Fetch(_) => {
                        ("ANALYSIS_FETCH_FAILED", "Failed to get AI analysis".to_string())
                    }
                    AnalysisError::Parse(_) => (
                        "ANALYSIS_PARSE_FAILED",
                        "Failed to parse AI analysis".to_string(),
                    ),
                    AnalysisError::Reported(msg) => ("ANALYSIS_REPORTED", msg.clone()),
                };
                (StatusCode::BAD_GATEWAY, code, message)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
