//! Error types for the structured extraction pipeline.
//!
//! `ExtractionError` is recoverable: the orchestrator catches every variant and
//! moves on to the next strategy. `SchemaError` is a caller bug and is the only
//! error the public entry point returns.

use thiserror::Error;

use crate::extraction::diagnostics::DiagnosticKind;
use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("backend error: {0}")]
    Backend(#[from] LlmError),

    #[error("no JSON object found in model response")]
    NoJsonFound,

    #[error("invalid JSON in model response: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl ExtractionError {
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            ExtractionError::Backend(_) => DiagnosticKind::BackendError,
            _ => DiagnosticKind::ParseError,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("schema name must not be empty")]
    EmptyName,

    #[error("schema '{0}' declares no fields")]
    NoFields(String),

    #[error("schema '{schema}' has a field with an empty name")]
    EmptyFieldName { schema: String },

    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    #[error("field '{field}' in schema '{schema}' has an invalid range")]
    InvalidRange { schema: String, field: String },

    #[error("record field '{field}' in schema '{schema}' declares no nested fields")]
    EmptyRecord { schema: String, field: String },
}
