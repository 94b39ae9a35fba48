use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    /// Score resume/job fit with the LLM instead of keyword matching.
    pub enable_llm_matching: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            ollama_base_url: var("OLLAMA_BASE_URL", "http://localhost:11434"),
            ollama_model: var("OLLAMA_MODEL", "llama3.1"),
            llm_timeout: Duration::from_secs(
                var("LLM_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            llm_max_retries: var("LLM_MAX_RETRIES", "3")
                .parse::<u32>()
                .context("LLM_MAX_RETRIES must be a non-negative integer")?,
            enable_llm_matching: parse_flag(&var("ENABLE_LLM_MATCHING", "false"))
                .context("ENABLE_LLM_MATCHING must be true or false")?,
            port: var("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}
