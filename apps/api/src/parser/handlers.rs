//! Axum route handlers for the Resume Parsing API.

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::{Diagnostic, Strategy};
use crate::parser::pdf::extract_text_from_pdf;
use crate::parser::resume_parser::{parse_resume, ResumeData};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub resume: ResumeData,
    /// Title Case section name → text, blank sections omitted.
    pub display_sections: Vec<(String, String)>,
    pub strategy: Strategy,
    pub diagnostics: Vec<Diagnostic>,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ParseResumeResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    respond(&state, &request.resume_text).await
}

/// POST /api/v1/resumes/parse-pdf
///
/// Body is the raw PDF. Text is extracted in-process, then parsed like plain text.
pub async fn handle_parse_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ParseResumeResponse>, AppError> {
    if body.is_empty() {
        return Err(AppError::Validation("PDF body cannot be empty".to_string()));
    }

    let text = tokio::task::spawn_blocking(move || extract_text_from_pdf(&body))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    respond(&state, &text).await
}

async fn respond(
    state: &AppState,
    resume_text: &str,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let parsed = parse_resume(state.llm.as_ref(), resume_text).await?;
    let display_sections = parsed.value.sections.display_sections();

    Ok(Json(ParseResumeResponse {
        resume: parsed.value,
        display_sections,
        strategy: parsed.strategy,
        diagnostics: parsed.diagnostics,
    }))
}
