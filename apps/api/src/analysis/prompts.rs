// Prompt templates for job description analysis.
// `{format_instructions}` and `{field_names}` are filled by the extraction pipeline.

pub const JOB_ANALYSIS_TEMPLATE: &str = r#"Analyze the following job description and extract:
1. Required skills
2. Preferred skills
3. Required experience
4. Required education
5. Key responsibilities
6. Important keywords worth including in a resume

Job Description:
{job_description}

{format_instructions}"#;

pub const JOB_ANALYSIS_FALLBACK: &str = r#"Read this job description and list its requirements.

{job_description}

Respond with one JSON object whose keys are: {field_names}.
Every value must be a list of short strings."#;
