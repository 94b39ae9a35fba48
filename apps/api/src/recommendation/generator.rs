//! Recommendation Generator: turns a comparison into prioritized resume edits.

use serde::{Deserialize, Serialize};

use crate::comparison::matcher::{to_prompt_block, ComparisonResult};
use crate::extraction::{
    Extractable, Extracted, ExtractionRequest, ExtractionResult, ExtractionSchema, Extractor,
    FieldSpec, FieldValue, SchemaError,
};
use crate::llm_client::TextGenerator;
use crate::recommendation::prompts::{
    MANUAL_REVIEW_SUMMARY, RECOMMENDATION_FALLBACK, RECOMMENDATION_TEMPLATE,
};

pub const MIN_PRIORITY: i64 = 1;
pub const MAX_PRIORITY: i64 = 10;

/// The kind of edit a recommendation asks for. Anything unrecognised is `Other`,
/// which the editor leaves as a no-op. Deserialisation goes through
/// [`RecommendationType::parse`], so it is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RecommendationType {
    Add,
    Modify,
    Emphasize,
    Remove,
    Other,
}

impl From<String> for RecommendationType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl RecommendationType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "add" => Self::Add,
            "modify" => Self::Modify,
            "emphasize" | "emphasise" => Self::Emphasize,
            "remove" => Self::Remove,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Modify => "modify",
            Self::Emphasize => "emphasize",
            Self::Remove => "remove",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Resume section to change, e.g. "Skills".
    pub section: String,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub content: String,
    #[serde(default)]
    pub reason: String,
    /// 1 (low) to 10 (critical).
    pub priority: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub summary: String,
    pub recommendations: Vec<Recommendation>,
    pub keyword_suggestions: Vec<String>,
}

impl Extractable for RecommendationSet {
    fn schema() -> ExtractionSchema {
        ExtractionSchema::new(
            "recommendation_set",
            vec![
                FieldSpec::text("summary", "Overall assessment and key areas to improve"),
                FieldSpec::records(
                    "recommendations",
                    "Specific changes to make",
                    vec![
                        FieldSpec::text("section", "Resume section to change, e.g. Skills"),
                        FieldSpec::text("type", "One of add, modify, emphasize, remove"),
                        FieldSpec::text("content", "The exact change"),
                        FieldSpec::text("reason", "Why the change matters for this job"),
                        FieldSpec::integer(
                            "priority",
                            "1 (low) to 10 (critical)",
                            MIN_PRIORITY,
                            MAX_PRIORITY,
                            MIN_PRIORITY,
                        ),
                    ],
                ),
                FieldSpec::list("keyword_suggestions", "Keywords to work into the resume"),
            ],
        )
    }

    fn from_result(result: &ExtractionResult) -> Self {
        let recommendations = result
            .records("recommendations")
            .iter()
            .map(|r| Recommendation {
                section: r.text("section"),
                kind: RecommendationType::parse(&r.text("type")),
                content: r.text("content"),
                reason: r.text("reason"),
                priority: r.integer("priority"),
            })
            .filter(|r| !r.content.trim().is_empty())
            .collect();

        Self {
            summary: result.text("summary"),
            recommendations,
            keyword_suggestions: result.list("keyword_suggestions"),
        }
    }

    fn to_result(&self) -> ExtractionResult {
        let records = self
            .recommendations
            .iter()
            .map(|rec| {
                let mut r = ExtractionResult::default();
                r.insert("section", FieldValue::Text(rec.section.clone()));
                r.insert("type", FieldValue::Text(rec.kind.as_str().to_string()));
                r.insert("content", FieldValue::Text(rec.content.clone()));
                r.insert("reason", FieldValue::Text(rec.reason.clone()));
                r.insert("priority", FieldValue::Integer(rec.priority));
                r
            })
            .collect();

        let mut result = ExtractionResult::default();
        result.insert("summary", FieldValue::Text(self.summary.clone()));
        result.insert("recommendations", FieldValue::Records(records));
        result.insert(
            "keyword_suggestions",
            FieldValue::List(self.keyword_suggestions.clone()),
        );
        result
    }
}

/// Highest priority first. Stable, so equal priorities keep their order.
pub fn prioritize(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
}

pub async fn generate_recommendations(
    llm: &dyn TextGenerator,
    resume_text: &str,
    job_text: &str,
    comparison: &ComparisonResult,
) -> Result<Extracted<RecommendationSet>, SchemaError> {
    let comparison_block = to_prompt_block(comparison);

    let schema = RecommendationSet::schema();
    let request = ExtractionRequest::new(&schema, RECOMMENDATION_TEMPLATE, RECOMMENDATION_FALLBACK)
        .source("resume_text", resume_text)
        .source("job_description", job_text)
        .value("comparison_results", &comparison_block);

    let outcome = Extractor::new(llm).extract(&request).await?;
    let degraded = outcome.is_degraded();

    Ok(outcome.into_typed().map(|mut set: RecommendationSet| {
        if degraded {
            set.summary = MANUAL_REVIEW_SUMMARY.to_string();
        }
        prioritize(&mut set.recommendations);
        set
    }))
}
