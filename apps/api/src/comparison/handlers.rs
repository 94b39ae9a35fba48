//! Axum route handlers for the Tailoring comparison API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::job_analyzer::JobRequirements;
use crate::comparison::fit_scoring::FitReport;
use crate::comparison::matcher::{keyword_match, KeywordMatch};
use crate::errors::AppError;
use crate::extraction::SchemaInput;
use crate::parser::resume_parser::ResumeSections;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub resume_sections: SchemaInput<ResumeSections>,
    pub job_requirements: SchemaInput<JobRequirements>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordMatchRequest {
    pub resume_text: String,
    pub keywords: Vec<String>,
}

/// POST /api/v1/tailoring/compare
///
/// Accepts canonical or loosely-shaped sections/requirements; both are
/// normalised before scoring.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<FitReport>, AppError> {
    let sections = request.resume_sections.into_canonical();
    let requirements = request.job_requirements.into_canonical();

    let report = state.fit_scorer.score(&sections, &requirements).await?;

    Ok(Json(report))
}

/// POST /api/v1/tailoring/keywords
pub async fn handle_keyword_match(
    Json(request): Json<KeywordMatchRequest>,
) -> Result<Json<KeywordMatch>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    Ok(Json(keyword_match(&request.resume_text, &request.keywords)))
}
