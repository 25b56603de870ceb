use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// User-correctable failures of the matching core.
///
/// Configuration and embedding-backend failures never surface here: they are
/// absorbed where they occur and the core continues in a degraded mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Invalid target role: {0}")]
    RoleNotFound(String),

    #[error("No valid skills could be extracted from input")]
    NoSkillsExtracted,

    #[error("{0}")]
    MissingInput(String),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Analysis(err) => match err {
                AnalysisError::RoleNotFound(_) => {
                    (StatusCode::NOT_FOUND, "ROLE_NOT_FOUND", err.to_string())
                }
                AnalysisError::NoSkillsExtracted => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "NO_SKILLS_EXTRACTED",
                    err.to_string(),
                ),
                AnalysisError::MissingInput(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
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
