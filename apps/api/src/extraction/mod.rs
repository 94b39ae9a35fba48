//! Structured extraction pipeline.
//!
//! Every LLM-backed use case goes through here: format a prompt, call the
//! backend, clean the raw text, parse, repair against the schema, and fall
//! back through simpler strategies. Callers always get a fully-populated
//! result; only an invalid schema is an error.

pub mod cleaner;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod prompt;
pub mod repair;
pub mod schema;

pub use diagnostics::Diagnostic;
pub use error::SchemaError;
pub use input::SchemaInput;
pub use orchestrator::{Extracted, ExtractionRequest, Extractor, Strategy};
pub use schema::{Extractable, ExtractionResult, ExtractionSchema, FieldSpec, FieldValue};
