use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EditorError {
    #[error("Section '{0}' not found")]
    SectionNotFound(String),

    #[error("Version {version} out of range for section '{section}' ({len} edits recorded)")]
    VersionOutOfRange {
        section: String,
        version: usize,
        len: usize,
    },

    #[error("Recommendation for section '{0}' has no content")]
    EmptyRecommendation(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF write error: {0}")]
    Write(String),
}
