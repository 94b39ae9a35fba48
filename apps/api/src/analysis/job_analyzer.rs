//! Job Analyzer: extracts requirement categories and resume keywords from a job description.

use serde::{Deserialize, Serialize};

use crate::analysis::prompts::{JOB_ANALYSIS_FALLBACK, JOB_ANALYSIS_TEMPLATE};
use crate::extraction::{
    Extractable, Extracted, ExtractionRequest, ExtractionResult, ExtractionSchema, Extractor,
    FieldSpec, FieldValue, SchemaError,
};
use crate::llm_client::TextGenerator;

/// Requirement categories in declaration order.
pub const CATEGORIES: [&str; 6] = [
    "required_skills",
    "preferred_skills",
    "required_experience",
    "required_education",
    "responsibilities",
    "keywords",
];

/// Structured requirements of a job posting. Every category is a list of
/// plain strings, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobRequirements {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub required_experience: Vec<String>,
    pub required_education: Vec<String>,
    pub responsibilities: Vec<String>,
    pub keywords: Vec<String>,
}

impl JobRequirements {
    /// `(category, items)` pairs in declaration order.
    pub fn categories(&self) -> [(&'static str, &[String]); 6] {
        [
            (CATEGORIES[0], self.required_skills.as_slice()),
            (CATEGORIES[1], self.preferred_skills.as_slice()),
            (CATEGORIES[2], self.required_experience.as_slice()),
            (CATEGORIES[3], self.required_education.as_slice()),
            (CATEGORIES[4], self.responsibilities.as_slice()),
            (CATEGORIES[5], self.keywords.as_slice()),
        ]
    }

    pub fn total_items(&self) -> usize {
        self.categories().iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }
}

impl Extractable for JobRequirements {
    fn schema() -> ExtractionSchema {
        ExtractionSchema::new(
            "job_requirements",
            vec![
                FieldSpec::list("required_skills", "Skills the candidate must have"),
                FieldSpec::list("preferred_skills", "Nice-to-have skills"),
                FieldSpec::list("required_experience", "Experience requirements"),
                FieldSpec::list("required_education", "Degrees or certifications required"),
                FieldSpec::list("responsibilities", "Key duties of the role"),
                FieldSpec::list("keywords", "Terms worth repeating in a resume"),
            ],
        )
    }

    fn from_result(result: &ExtractionResult) -> Self {
        Self {
            required_skills: result.list("required_skills"),
            preferred_skills: result.list("preferred_skills"),
            required_experience: result.list("required_experience"),
            required_education: result.list("required_education"),
            responsibilities: result.list("responsibilities"),
            keywords: result.list("keywords"),
        }
    }

    fn to_result(&self) -> ExtractionResult {
        let mut result = ExtractionResult::default();
        for (category, items) in self.categories() {
            result.insert(category, FieldValue::List(items.to_vec()));
        }
        result
    }
}

/// Analyzes a job description. Never fails on bad model output; a failed
/// analysis comes back as empty requirements with `EmptyDefault` strategy.
pub async fn analyze_job(
    llm: &dyn TextGenerator,
    job_text: &str,
) -> Result<Extracted<JobRequirements>, SchemaError> {
    let schema = JobRequirements::schema();
    let request = ExtractionRequest::new(&schema, JOB_ANALYSIS_TEMPLATE, JOB_ANALYSIS_FALLBACK)
        .source("job_description", job_text);

    let outcome = Extractor::new(llm).extract(&request).await?;
    Ok(outcome.into_typed())
}

/// Just the keyword list of a job description.
pub async fn extract_keywords(
    llm: &dyn TextGenerator,
    job_text: &str,
) -> Result<Vec<String>, SchemaError> {
    Ok(analyze_job(llm, job_text).await?.value.keywords)
}
