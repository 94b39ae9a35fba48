// Resume ingestion: PDF text extraction and LLM section identification.

pub mod handlers;
pub mod pdf;
pub mod prompts;
pub mod resume_parser;
