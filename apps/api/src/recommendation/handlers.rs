//! Axum route handlers for the Recommendation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::comparison::matcher::ComparisonResult;
use crate::errors::AppError;
use crate::extraction::{Diagnostic, SchemaInput, Strategy};
use crate::recommendation::generator::{generate_recommendations, RecommendationSet};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub resume_text: String,
    pub job_text: String,
    pub comparison: SchemaInput<ComparisonResult>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: RecommendationSet,
    pub strategy: Strategy,
    pub diagnostics: Vec<Diagnostic>,
}

/// POST /api/v1/tailoring/recommend
///
/// Recommendations come back sorted by priority, highest first.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if request.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }

    let comparison = request.comparison.into_canonical();
    let generated = generate_recommendations(
        state.llm.as_ref(),
        &request.resume_text,
        &request.job_text,
        &comparison,
    )
    .await?;

    Ok(Json(RecommendResponse {
        recommendations: generated.value,
        strategy: generated.strategy,
        diagnostics: generated.diagnostics,
    }))
}
