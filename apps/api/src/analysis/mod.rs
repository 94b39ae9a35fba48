// Job description analysis.
// All LLM calls go through the extraction pipeline; nothing here talks to Ollama directly.

pub mod handlers;
pub mod job_analyzer;
pub mod prompts;
