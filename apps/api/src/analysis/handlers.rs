//! Axum route handlers for the Job Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::job_analyzer::{analyze_job, JobRequirements};
use crate::errors::AppError;
use crate::extraction::{Diagnostic, Strategy};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeJobResponse {
    pub requirements: JobRequirements,
    pub strategy: Strategy,
    pub diagnostics: Vec<Diagnostic>,
}

/// POST /api/v1/jobs/analyze
///
/// Extracts requirement categories and keywords from a job description.
/// A model failure still returns 200 with empty categories and `strategy: "empty_default"`.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeJobResponse>, AppError> {
    if request.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }

    let analysis = analyze_job(state.llm.as_ref(), &request.job_text).await?;

    Ok(Json(AnalyzeJobResponse {
        requirements: analysis.value,
        strategy: analysis.strategy,
        diagnostics: analysis.diagnostics,
    }))
}
