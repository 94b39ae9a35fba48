//! Advisory degradation records emitted while extracting.
//!
//! Diagnostics are logged as they are recorded and returned to the caller with
//! the result. They never influence control flow.

use serde::Serialize;
use tracing::{debug, warn};

use crate::extraction::orchestrator::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    BackendError,
    ParseError,
    MissingField,
    TypeCoercion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub strategy: Strategy,
    /// Dotted path of the field involved, e.g. `matches[1].item`.
    pub field: Option<String>,
    pub detail: String,
}

#[derive(Debug)]
pub struct Diagnostics {
    schema: String,
    strategy: Strategy,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(schema: &str) -> Self {
        Self {
            schema: schema.to_string(),
            strategy: Strategy::Structured,
            items: Vec::new(),
        }
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    pub fn record(&mut self, kind: DiagnosticKind, field: Option<&str>, detail: String) {
        match kind {
            DiagnosticKind::BackendError | DiagnosticKind::ParseError => warn!(
                schema = %self.schema,
                strategy = ?self.strategy,
                kind = ?kind,
                "{detail}"
            ),
            DiagnosticKind::MissingField | DiagnosticKind::TypeCoercion => debug!(
                schema = %self.schema,
                field = field.unwrap_or_default(),
                kind = ?kind,
                "{detail}"
            ),
        }

        self.items.push(Diagnostic {
            kind,
            strategy: self.strategy,
            field: field.map(str::to_string),
            detail,
        });
    }

    pub fn field(&mut self, kind: DiagnosticKind, field: &str, detail: impl Into<String>) {
        self.record(kind, Some(field), detail.into());
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}
