use std::sync::Arc;

use crate::comparison::fit_scoring::FitScorer;
use crate::config::Config;
use crate::editor::EditorStore;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn TextGenerator>,
    /// Pluggable fit scorer. Default: KeywordFitScorer. Swap via ENABLE_LLM_MATCHING.
    pub fit_scorer: Arc<dyn FitScorer>,
    pub editors: EditorStore,
    pub config: Config,
}
