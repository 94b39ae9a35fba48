//! Extraction orchestrator: runs an ordered list of strategies until one
//! yields a repaired result. The last strategy cannot fail, so the entry point
//! only errors on an invalid schema.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::extraction::cleaner::clean_response;
use crate::extraction::diagnostics::{Diagnostic, Diagnostics};
use crate::extraction::error::{ExtractionError, SchemaError};
use crate::extraction::prompt::{field_names, format_instructions, format_prompt};
use crate::extraction::repair::repair;
use crate::extraction::schema::{Extractable, ExtractionResult, ExtractionSchema};
use crate::llm_client::TextGenerator;

/// Placeholder filled with the schema's full JSON instructions.
pub const FORMAT_INSTRUCTIONS_KEY: &str = "format_instructions";
/// Placeholder filled with the bare list of expected keys.
pub const FIELD_NAMES_KEY: &str = "field_names";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Structured,
    FallbackPrompt,
    EmptyDefault,
}

const CHAIN: [Strategy; 3] = [
    Strategy::Structured,
    Strategy::FallbackPrompt,
    Strategy::EmptyDefault,
];

/// Everything one extraction needs besides the backend.
///
/// `sources` are the texts being extracted from; if any of them is blank the
/// backend is never called. `values` are extra substitutions (prior results
/// already formatted as text).
#[derive(Debug, Clone)]
pub struct ExtractionRequest<'a> {
    schema: &'a ExtractionSchema,
    structured_template: &'a str,
    fallback_template: &'a str,
    sources: Vec<(&'a str, &'a str)>,
    values: Vec<(&'a str, &'a str)>,
}

impl<'a> ExtractionRequest<'a> {
    pub fn new(
        schema: &'a ExtractionSchema,
        structured_template: &'a str,
        fallback_template: &'a str,
    ) -> Self {
        Self {
            schema,
            structured_template,
            fallback_template,
            sources: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn source(mut self, key: &'a str, text: &'a str) -> Self {
        self.sources.push((key, text));
        self
    }

    pub fn value(mut self, key: &'a str, text: &'a str) -> Self {
        self.values.push((key, text));
        self
    }

    fn has_blank_source(&self) -> bool {
        self.sources.iter().any(|(_, text)| text.trim().is_empty())
    }

    fn render(&self, template: &str, extra: (&'a str, &str)) -> String {
        let mut values: Vec<(&str, &str)> =
            Vec::with_capacity(self.sources.len() + self.values.len() + 1);
        values.extend(self.sources.iter().copied());
        values.extend(self.values.iter().copied());
        values.push(extra);
        format_prompt(template, &values)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub result: ExtractionResult,
    pub strategy: Strategy,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExtractionOutcome {
    pub fn is_degraded(&self) -> bool {
        self.strategy == Strategy::EmptyDefault
    }

    pub fn into_typed<T: Extractable>(self) -> Extracted<T> {
        Extracted {
            value: T::from_result(&self.result),
            strategy: self.strategy,
            diagnostics: self.diagnostics,
        }
    }
}

/// An outcome converted to its use-case type.
#[derive(Debug, Clone, Serialize)]
pub struct Extracted<T> {
    pub value: T,
    pub strategy: Strategy,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Extracted<T> {
    pub fn is_degraded(&self) -> bool {
        self.strategy == Strategy::EmptyDefault
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        Extracted {
            value: f(self.value),
            strategy: self.strategy,
            diagnostics: self.diagnostics,
        }
    }
}

pub struct Extractor<'g> {
    generator: &'g dyn TextGenerator,
}

impl<'g> Extractor<'g> {
    pub fn new(generator: &'g dyn TextGenerator) -> Self {
        Self { generator }
    }

    pub async fn extract(
        &self,
        request: &ExtractionRequest<'_>,
    ) -> Result<ExtractionOutcome, SchemaError> {
        let schema = request.schema;
        schema.validate()?;

        let mut diagnostics = Diagnostics::new(schema.name());

        if request.has_blank_source() {
            info!(schema = schema.name(), "Blank source text, returning empty result");
            return Ok(ExtractionOutcome {
                result: schema.empty_result(),
                strategy: Strategy::EmptyDefault,
                diagnostics: diagnostics.into_vec(),
            });
        }

        for strategy in CHAIN {
            diagnostics.set_strategy(strategy);

            let prompt = match strategy {
                Strategy::Structured => request.render(
                    request.structured_template,
                    (FORMAT_INSTRUCTIONS_KEY, &format_instructions(schema)),
                ),
                Strategy::FallbackPrompt => request.render(
                    request.fallback_template,
                    (FIELD_NAMES_KEY, &field_names(schema)),
                ),
                Strategy::EmptyDefault => {
                    info!(schema = schema.name(), "All strategies failed, returning empty result");
                    return Ok(ExtractionOutcome {
                        result: schema.empty_result(),
                        strategy,
                        diagnostics: diagnostics.into_vec(),
                    });
                }
            };

            match self.attempt(&prompt, schema, &mut diagnostics).await {
                Ok(result) => {
                    info!(schema = schema.name(), strategy = ?strategy, "Extraction succeeded");
                    return Ok(ExtractionOutcome {
                        result,
                        strategy,
                        diagnostics: diagnostics.into_vec(),
                    });
                }
                Err(e) => diagnostics.record(e.diagnostic_kind(), None, e.to_string()),
            }
        }

        // CHAIN ends with EmptyDefault, which always returns above.
        Ok(ExtractionOutcome {
            result: schema.empty_result(),
            strategy: Strategy::EmptyDefault,
            diagnostics: diagnostics.into_vec(),
        })
    }

    async fn attempt(
        &self,
        prompt: &str,
        schema: &ExtractionSchema,
        diagnostics: &mut Diagnostics,
    ) -> Result<ExtractionResult, ExtractionError> {
        let raw = self.generator.generate(prompt).await?;
        debug!(schema = schema.name(), chars = raw.len(), "Backend responded");

        let cleaned = clean_response(&raw)?;
        let object: Map<String, Value> = serde_json::from_str(&cleaned)?;

        Ok(repair(&object, schema, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::diagnostics::DiagnosticKind;
    use crate::extraction::schema::{FieldSpec, FieldValue};
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::LlmError;

    const STRUCTURED: &str = "Extract from:\n{job_description}\n\n{format_instructions}";
    const FALLBACK: &str = "Return JSON with keys {field_names} for:\n{job_description}";

    fn schema() -> ExtractionSchema {
        ExtractionSchema::new(
            "job_requirements",
            vec![
                FieldSpec::list("required_skills", "Essential skills"),
                FieldSpec::list("keywords", "Important terms"),
            ],
        )
    }

    async fn run(generator: &ScriptedGenerator, text: &str) -> ExtractionOutcome {
        let schema = schema();
        let request = ExtractionRequest::new(&schema, STRUCTURED, FALLBACK)
            .source("job_description", text);
        Extractor::new(generator).extract(&request).await.unwrap()
    }

    #[tokio::test]
    async fn test_reasoning_and_fence_are_recovered() {
        let generator = ScriptedGenerator::replying(&[
            "<think>reasoning</think>\n```json\n{\"keywords\": [\"Python\"]}\n```",
        ]);
        let outcome = run(&generator, "Python developer wanted").await;

        assert_eq!(outcome.strategy, Strategy::Structured);
        assert_eq!(outcome.result.list("keywords"), vec!["Python"]);
        assert!(outcome.result.list("required_skills").is_empty());
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::MissingField
                && d.field.as_deref() == Some("required_skills")));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_bare_string_in_prose_becomes_list() {
        let generator = ScriptedGenerator::replying(&["Sure! {\"keywords\": \"Python\"}"]);
        let outcome = run(&generator, "Python developer wanted").await;
        assert_eq!(outcome.result.list("keywords"), vec!["Python"]);
    }

    #[tokio::test]
    async fn test_prose_falls_back_then_empty_default() {
        let generator = ScriptedGenerator::replying(&[
            "I am unable to help with that.",
            "Still no JSON here, sorry.",
        ]);
        let outcome = run(&generator, "Python developer wanted").await;

        assert_eq!(outcome.strategy, Strategy::EmptyDefault);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.result, schema().empty_result());
        assert_eq!(generator.calls(), 2);

        let parse_errors: Vec<_> = outcome
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::ParseError)
            .map(|d| d.strategy)
            .collect();
        assert_eq!(parse_errors, vec![Strategy::Structured, Strategy::FallbackPrompt]);
    }

    #[tokio::test]
    async fn test_fallback_prompt_recovers() {
        let generator = ScriptedGenerator::replying(&[
            "no json",
            "{\"required_skills\": [\"Rust\"], \"keywords\": []}",
        ]);
        let outcome = run(&generator, "Rust engineer").await;

        assert_eq!(outcome.strategy, Strategy::FallbackPrompt);
        assert_eq!(outcome.result.list("required_skills"), vec!["Rust"]);

        let prompts = generator.prompts();
        assert!(prompts[0].contains("\"required_skills\" (list of strings)"));
        assert!(prompts[1].starts_with("Return JSON with keys required_skills, keywords for:"));
        assert!(prompts[1].contains("Rust engineer"));
    }

    #[tokio::test]
    async fn test_backend_error_falls_back() {
        let generator = ScriptedGenerator::new(vec![
            Err(LlmError::Unavailable { retries: 3 }),
            Ok("{\"keywords\": [\"Go\"]}".to_string()),
        ]);
        let outcome = run(&generator, "Go developer").await;

        assert_eq!(outcome.strategy, Strategy::FallbackPrompt);
        assert_eq!(outcome.result.list("keywords"), vec!["Go"]);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::BackendError);
        assert_eq!(outcome.diagnostics[0].strategy, Strategy::Structured);
    }

    #[tokio::test]
    async fn test_object_inside_json_array_is_recovered() {
        let generator = ScriptedGenerator::replying(&["[{\"keywords\": []}]"]);
        let outcome = run(&generator, "anything").await;

        assert_eq!(outcome.strategy, Strategy::Structured);
        assert_eq!(outcome.result, schema().empty_result());
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_source_skips_backend() {
        let generator = ScriptedGenerator::failing();
        let outcome = run(&generator, "   \n\t").await;

        assert_eq!(generator.calls(), 0);
        assert_eq!(outcome.strategy, Strategy::EmptyDefault);
        assert_eq!(outcome.result, schema().empty_result());
        assert!(outcome.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_schema_is_the_only_error() {
        let generator = ScriptedGenerator::failing();
        let schema = ExtractionSchema::new("broken", vec![]);
        let request = ExtractionRequest::new(&schema, STRUCTURED, FALLBACK)
            .source("job_description", "text");

        let err = Extractor::new(&generator).extract(&request).await.unwrap_err();
        assert_eq!(err, SchemaError::NoFields("broken".to_string()));
        assert_eq!(generator.calls(), 0);
    }

    /// Hostile backend outputs never break the list-field invariant.
    #[tokio::test]
    async fn test_list_fields_survive_fuzzed_outputs() {
        let outputs = [
            "",
            "null",
            "42",
            "{\"keywords\": null, \"required_skills\": 7}",
            "{\"keywords\": {\"nested\": {\"deep\": true}}}",
            "text before {\"keywords\": [1, [2, {\"x\": \"y\"}]]} text after",
            "```\n{\"required_skills\": \"SQL\", \"extra\": {}}\n```",
            "<think>{</think>}{",
            "{\"keywords\": [\"unterminated\"",
        ];

        for output in outputs {
            let generator = ScriptedGenerator::replying(&[output, output]);
            let outcome = run(&generator, "some job").await;
            for name in ["required_skills", "keywords"] {
                assert!(
                    matches!(outcome.result.get(name), Some(FieldValue::List(_))),
                    "{name} is not a list for output {output:?}"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_substituted_values_reach_prompt() {
        let generator = ScriptedGenerator::replying(&["{}"]);
        let schema = schema();
        let template = "{job_description}|{extra}|{format_instructions}";
        let request = ExtractionRequest::new(&schema, template, FALLBACK)
            .source("job_description", "JD")
            .value("extra", "=== Skills ===\n- Rust");

        Extractor::new(&generator).extract(&request).await.unwrap();
        let expected = "JD|=== Skills ===\n- Rust|Return a single JSON object";
        assert!(generator.prompts()[0].starts_with(expected));
    }
}
