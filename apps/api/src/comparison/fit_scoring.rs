//! Fit Scoring: pluggable scorer comparing parsed resume sections with job requirements.
//!
//! Default: `KeywordFitScorer` (deterministic substring comparator, no LLM call).
//! Optional: `LlmFitScorer` (extraction pipeline against the comparison schema),
//! enabled with `ENABLE_LLM_MATCHING`.
//!
//! `AppState` holds an `Arc<dyn FitScorer>`, chosen at startup via config.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::analysis::job_analyzer::JobRequirements;
use crate::comparison::matcher::{compare, ComparisonResult};
use crate::comparison::prompts::{COMPARISON_FALLBACK, COMPARISON_TEMPLATE};
use crate::extraction::prompt::{bullet_sections, text_sections};
use crate::extraction::{Diagnostic, Extractable, ExtractionRequest, Extractor, SchemaError};
use crate::llm_client::TextGenerator;
use crate::parser::resume_parser::ResumeSections;

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub comparison: ComparisonResult,
    /// Which backend produced `comparison`: "keyword" or "llm".
    pub scorer_backend: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl FitReport {
    fn keyword(comparison: ComparisonResult, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            comparison,
            scorer_backend: "keyword".to_string(),
            diagnostics,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap comparison backends without touching handlers.
#[async_trait]
pub trait FitScorer: Send + Sync {
    async fn score(
        &self,
        sections: &ResumeSections,
        requirements: &JobRequirements,
    ) -> Result<FitReport, SchemaError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordFitScorer: default
// ────────────────────────────────────────────────────────────────────────────

pub struct KeywordFitScorer;

#[async_trait]
impl FitScorer for KeywordFitScorer {
    async fn score(
        &self,
        sections: &ResumeSections,
        requirements: &JobRequirements,
    ) -> Result<FitReport, SchemaError> {
        Ok(FitReport::keyword(compare(sections, requirements), vec![]))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmFitScorer: semantic comparison through the extraction pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Uses the deterministic comparator whenever the pipeline degrades to the
/// empty default.
pub struct LlmFitScorer(pub Arc<dyn TextGenerator>);

#[async_trait]
impl FitScorer for LlmFitScorer {
    async fn score(
        &self,
        sections: &ResumeSections,
        requirements: &JobRequirements,
    ) -> Result<FitReport, SchemaError> {
        let display = sections.display_sections();
        let resume_block = text_sections(display.iter().map(|(n, t)| (n.as_str(), t.as_str())));
        let requirements_block = bullet_sections(requirements.categories());

        let schema = ComparisonResult::schema();
        let request = ExtractionRequest::new(&schema, COMPARISON_TEMPLATE, COMPARISON_FALLBACK)
            .source("resume_sections", &resume_block)
            .source("job_requirements", &requirements_block);

        let outcome = Extractor::new(self.0.as_ref()).extract(&request).await?;

        if outcome.is_degraded() {
            warn!("LLM comparison degraded, using keyword comparator");
            return Ok(FitReport::keyword(
                compare(sections, requirements),
                outcome.diagnostics,
            ));
        }

        let typed = outcome.into_typed::<ComparisonResult>();
        Ok(FitReport {
            comparison: typed.value,
            scorer_backend: "llm".to_string(),
            diagnostics: typed.diagnostics,
        })
    }
}
