//! Axum route handlers for the Editor API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::document::{RecommendationOutcome, SectionHistory};
use crate::editor::EditableResume;
use crate::editor::export::{to_markdown, to_pdf};
use crate::errors::AppError;
use crate::extraction::{Diagnostic, SchemaInput, Strategy};
use crate::parser::resume_parser::{parse_resume, ResumeData, ResumeSections};
use crate::recommendation::generator::Recommendation;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub resume_text: String,
    /// Already-parsed sections. When absent the text is parsed first.
    #[serde(default)]
    pub sections: Option<SchemaInput<ResumeSections>>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub resume: EditableResume,
    /// Set only when the sections were parsed as part of this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSectionRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RevertRequest {
    pub version: usize,
}

#[derive(Debug, Serialize)]
pub struct SectionResponse {
    pub section: String,
    pub content: String,
    pub changed: bool,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub outcomes: Vec<RecommendationOutcome>,
    pub final_text: String,
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Editor session {id} not found"))
}

async fn load(state: &AppState, id: Uuid) -> Result<EditableResume, AppError> {
    state.editors.get(id).await.ok_or_else(|| session_not_found(id))
}

/// POST /api/v1/editor
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let (data, strategy, diagnostics) = match request.sections {
        Some(sections) => {
            let data = ResumeData {
                raw_text: request.resume_text,
                sections: sections.into_canonical(),
            };
            (data, None, Vec::new())
        }
        None => {
            let parsed = parse_resume(state.llm.as_ref(), &request.resume_text).await?;
            (parsed.value, Some(parsed.strategy), parsed.diagnostics)
        }
    };

    let resume = EditableResume::from_resume_data(&data);
    state.editors.insert(resume.clone()).await;
    tracing::info!(
        resume_id = %resume.id,
        sections = resume.sections.len(),
        "Editor session created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            resume,
            strategy,
            diagnostics,
        }),
    ))
}

/// GET /api/v1/editor/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EditableResume>, AppError> {
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/v1/editor/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .editors
        .remove(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| session_not_found(id))
}

/// PUT /api/v1/editor/:id/sections/:name
///
/// Creates the section if it does not exist yet.
pub async fn handle_put_section(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
    Json(request): Json<UpdateSectionRequest>,
) -> Result<Json<SectionResponse>, AppError> {
    let changed = state
        .editors
        .update(id, |resume| {
            if resume.section(&name).is_some() {
                resume.update_section(&name, &request.content)
            } else {
                Ok(resume.add_section(&name, &request.content))
            }
        })
        .await
        .ok_or_else(|| session_not_found(id))??;

    Ok(Json(SectionResponse {
        section: name,
        content: request.content,
        changed,
    }))
}

/// DELETE /api/v1/editor/:id/sections/:name
pub async fn handle_delete_section(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    state
        .editors
        .update(id, |resume| resume.remove_section(&name))
        .await
        .ok_or_else(|| session_not_found(id))?
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFound(format!("Section '{name}' not found")))
}

/// POST /api/v1/editor/:id/sections/:name/revert
pub async fn handle_revert_section(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
    Json(request): Json<RevertRequest>,
) -> Result<Json<SectionResponse>, AppError> {
    let (content, changed) = state
        .editors
        .update(id, |resume| resume.revert_section(&name, request.version))
        .await
        .ok_or_else(|| session_not_found(id))??;

    Ok(Json(SectionResponse {
        section: name,
        content,
        changed,
    }))
}

/// POST /api/v1/editor/:id/recommendations
///
/// Applies in the order given. Individual failures are reported, not raised.
pub async fn handle_apply_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(recommendations): Json<Vec<Recommendation>>,
) -> Result<Json<ApplyResponse>, AppError> {
    let (outcomes, final_text) = state
        .editors
        .update(id, |resume| {
            let outcomes = resume.apply_recommendations(&recommendations);
            (outcomes, resume.final_text())
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(ApplyResponse {
        outcomes,
        final_text,
    }))
}

/// GET /api/v1/editor/:id/history
pub async fn handle_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SectionHistory>>, AppError> {
    Ok(Json(load(&state, id).await?.edit_summary()))
}

/// GET /api/v1/editor/:id/export/markdown
pub async fn handle_export_markdown(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resume = load(&state, id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        to_markdown(&resume),
    ))
}

/// GET /api/v1/editor/:id/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resume = load(&state, id).await?;
    let bytes = tokio::task::spawn_blocking(move || to_pdf(&resume))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes))
}
