//! Resume Parser: splits raw resume text into named sections.

use serde::{Deserialize, Serialize};

use crate::extraction::prompt::title_case;
use crate::extraction::{
    Extractable, Extracted, ExtractionRequest, ExtractionResult, ExtractionSchema, Extractor,
    FieldSpec, FieldValue, SchemaError,
};
use crate::llm_client::TextGenerator;
use crate::parser::prompts::{SECTION_ID_FALLBACK, SECTION_ID_TEMPLATE};

/// Section fields in canonical order. The comparator reports the first
/// section containing a term in this order.
pub const SECTION_FIELDS: [&str; 8] = [
    "contact_information",
    "summary",
    "education",
    "experience",
    "skills",
    "projects",
    "certifications",
    "additional",
];

/// Text of each recognised resume section. An empty string means the section
/// was not found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumeSections {
    pub contact_information: String,
    pub summary: String,
    pub education: String,
    pub experience: String,
    pub skills: String,
    pub projects: String,
    pub certifications: String,
    pub additional: String,
}

impl ResumeSections {
    /// `(field, text)` pairs in canonical order, empty sections included.
    pub fn entries(&self) -> [(&'static str, &str); 8] {
        [
            (SECTION_FIELDS[0], self.contact_information.as_str()),
            (SECTION_FIELDS[1], self.summary.as_str()),
            (SECTION_FIELDS[2], self.education.as_str()),
            (SECTION_FIELDS[3], self.experience.as_str()),
            (SECTION_FIELDS[4], self.skills.as_str()),
            (SECTION_FIELDS[5], self.projects.as_str()),
            (SECTION_FIELDS[6], self.certifications.as_str()),
            (SECTION_FIELDS[7], self.additional.as_str()),
        ]
    }

    /// Title Case display names with their text, blank sections omitted.
    pub fn display_sections(&self) -> Vec<(String, String)> {
        self.entries()
            .into_iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(field, text)| (title_case(field), text.to_string()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, text)| text.trim().is_empty())
    }
}

impl Extractable for ResumeSections {
    fn schema() -> ExtractionSchema {
        ExtractionSchema::new(
            "resume_sections",
            vec![
                FieldSpec::text("contact_information", "Name, email, phone, address"),
                FieldSpec::text("summary", "Professional summary or objective"),
                FieldSpec::text("education", "Degrees, institutions and dates"),
                FieldSpec::text("experience", "Work history with titles and responsibilities"),
                FieldSpec::text("skills", "Technical and professional skills"),
                FieldSpec::text("projects", "Notable projects"),
                FieldSpec::text("certifications", "Certifications and licenses"),
                FieldSpec::text("additional", "Awards, publications, anything else"),
            ],
        )
    }

    fn from_result(result: &ExtractionResult) -> Self {
        Self {
            contact_information: result.text("contact_information"),
            summary: result.text("summary"),
            education: result.text("education"),
            experience: result.text("experience"),
            skills: result.text("skills"),
            projects: result.text("projects"),
            certifications: result.text("certifications"),
            additional: result.text("additional"),
        }
    }

    fn to_result(&self) -> ExtractionResult {
        let mut result = ExtractionResult::default();
        for (field, text) in self.entries() {
            result.insert(field, FieldValue::Text(text.to_string()));
        }
        result
    }
}

/// Raw resume text plus its identified sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeData {
    pub raw_text: String,
    pub sections: ResumeSections,
}

pub async fn identify_sections(
    llm: &dyn TextGenerator,
    resume_text: &str,
) -> Result<Extracted<ResumeSections>, SchemaError> {
    let schema = ResumeSections::schema();
    let request = ExtractionRequest::new(&schema, SECTION_ID_TEMPLATE, SECTION_ID_FALLBACK)
        .source("resume_text", resume_text);

    let outcome = Extractor::new(llm).extract(&request).await?;
    Ok(outcome.into_typed())
}

/// Identifies sections and bundles them with the raw text.
pub async fn parse_resume(
    llm: &dyn TextGenerator,
    resume_text: &str,
) -> Result<Extracted<ResumeData>, SchemaError> {
    let sections = identify_sections(llm, resume_text).await?;
    Ok(sections.map(|sections| ResumeData {
        raw_text: resume_text.to_string(),
        sections,
    }))
}
