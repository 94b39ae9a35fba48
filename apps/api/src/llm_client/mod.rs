/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: the extraction pipeline only ever sees `TextGenerator`.
/// `OllamaClient` is the production backend, talking to a local Ollama server.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GENERATE_PATH: &str = "/api/generate";
const DEFAULT_BACKOFF: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Backend unavailable after {retries} retries")]
    Unavailable { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Backend invocation contract: one prompt in, free text out.
///
/// No streaming and no structured-output support is assumed here. Structured
/// parsing is layered on top by `crate::extraction`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Ollama `/api/generate` client with retry on 429 / 5xx and transport errors.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    max_retries: u32,
    backoff: Duration,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        model: String,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_retries: max_retries.max(1),
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Overrides the base delay of the exponential backoff.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes a raw call to Ollama, returning the full response object.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<GenerateResponse, LlmError> {
        let url = format!("{}{GENERATE_PATH}", self.base_url);
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1x, 2x, 4x the base delay
                let delay = self.backoff * (1 << (attempt - 1));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(&request_body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Ollama returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OllamaError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let generated: GenerateResponse = response.json().await?;

            debug!(
                "LLM call succeeded: model={}, prompt_tokens={:?}, output_tokens={:?}",
                self.model, generated.prompt_eval_count, generated.eval_count
            );

            return Ok(generated);
        }

        Err(last_error.unwrap_or(LlmError::Unavailable {
            retries: self.max_retries,
        }))
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, prompts::JSON_ONLY_SYSTEM).await?;
        if response.response.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(response.response)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OllamaClient {
        OllamaClient::new(&server.uri(), "llama3.1".to_string(), Duration::from_secs(5), 3)
            .unwrap()
            .with_backoff(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_generate_returns_response_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({"model": "llama3.1", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.1",
                "response": "{\"keywords\": [\"Rust\"]}",
                "done": true,
                "eval_count": 12
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).generate("Analyze this").await.unwrap();
        assert_eq!(text, "{\"keywords\": [\"Rust\"]}");
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(503).set_body_string("loading model"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": "ok", "done": true})),
            )
            .mount(&server)
            .await;

        let text = client_for(&server).generate("hello").await.unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"error": "model 'llama3.1' not found"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hello").await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("not found"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_persistent_server_error_surfaces_last_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_blank_response_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": "  ", "done": true})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_scripted_generator_replays_then_fails() {
        let generator = testing::ScriptedGenerator::replying(&["first"]);
        assert_eq!(generator.generate("a").await.unwrap(), "first");
        assert!(generator.generate("b").await.is_err());
        assert_eq!(generator.prompts(), vec!["a".to_string(), "b".to_string()]);
    }
}
