//! Axum route handler for the analysis API.

use axum::{extract::State, Json};
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::analysis::analyzer::analyze_resume;
use crate::analysis::source::ResumeSubmission;
use crate::errors::AppError;
use crate::models::analysis::AnalysisResult;
use crate::state::AppState;

/// POST /analyze
///
/// Accepts a multipart PDF upload (`resume`, `job_field`) or a JSON body
/// (`text`, `job_field`) and returns detected skills, missing skills and resources.
/// Every failure leaves as an `ErrorEnvelope` (400 for no usable text, 500 otherwise).
pub async fn handle_analyze(
    State(state): State<AppState>,
    submission: ResumeSubmission,
) -> Result<Json<AnalysisResult>, AppError> {
    let span = tracing::info_span!("analyze", request_id = %Uuid::new_v4());

    async move {
        info!("/analyze called (source: {})", submission.source);
        let result = analyze_resume(
            &submission.request,
            state.llm.as_ref(),
            state.config.structured_output,
        )
        .await?;
        Ok::<_, AppError>(Json(result))
    }
    .instrument(span)
    .await
}
