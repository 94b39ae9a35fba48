// Prompt templates for the LLM-backed comparison.

pub const COMPARISON_TEMPLATE: &str = r#"Compare the following resume sections against the job requirements and identify matches and gaps.

Resume Sections:
{resume_sections}

Job Requirements:
{job_requirements}

For each requirement category, identify:
1. Which requirements the resume demonstrates, and in which section
2. Which requirements are missing or not clearly demonstrated
3. A concrete suggestion for each gap

match_score is the overall percentage (0-100) of requirements met.
section_scores holds the same percentage for each requirement category.

{format_instructions}"#;

pub const COMPARISON_FALLBACK: &str = r#"Resume:
{resume_sections}

Job requirements:
{job_requirements}

Which requirements does the resume meet and which are missing?
Respond with one JSON object whose keys are: {field_names}."#;
