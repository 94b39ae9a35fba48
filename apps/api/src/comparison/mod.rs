// Resume vs job comparison: deterministic matcher, keyword match, pluggable fit scorers.

pub mod fit_scoring;
pub mod handlers;
pub mod matcher;
pub mod prompts;
