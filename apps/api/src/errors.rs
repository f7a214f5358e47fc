use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::analysis::ErrorEnvelope;

/// Application-level error type.
/// Implements `IntoResponse` so every failure leaves the handler as an `ErrorEnvelope`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No text could be extracted from the resume.")]
    InputUnavailable,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InputUnavailable => StatusCode::BAD_REQUEST,
            AppError::Llm(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InputUnavailable => tracing::warn!("Rejecting request: {self}"),
            AppError::Llm(e) => tracing::error!("LLM error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        let status = self.status();
        (status, Json(ErrorEnvelope::new(self.to_string()))).into_response()
    }
}

/// Response for a panicking handler (used with tower-http's `CatchPanicLayer`).
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
