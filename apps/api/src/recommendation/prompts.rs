// Prompt templates for tailoring recommendations.

pub const RECOMMENDATION_TEMPLATE: &str = r#"Generate specific, actionable recommendations for tailoring this resume to the job description.

Resume:
{resume_text}

Job Description:
{job_description}

Comparison Results:
{comparison_results}

For each gap, recommend how to address it. Also suggest ways to highlight existing matches more effectively.
Each recommendation names the resume section to change, the type of change (add, modify, emphasize or remove),
the exact content, the reason, and a priority from 1 (low) to 10 (critical).
Focus on concrete changes rather than generic advice.

{format_instructions}"#;

pub const RECOMMENDATION_FALLBACK: &str = r#"Resume:
{resume_text}

Job description:
{job_description}

Suggest changes that make the resume fit the job better.
Respond with one JSON object whose keys are: {field_names}.
"recommendations" is a list of objects with section, type, content, reason and priority (1-10)."#;

/// Summary shown when no recommendations could be generated.
pub const MANUAL_REVIEW_SUMMARY: &str = "Unable to generate detailed recommendations. \
    Consider reviewing the job description manually and highlighting relevant skills \
    and experience in your resume.";
