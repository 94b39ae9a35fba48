// Prompt templates for resume section identification.

pub const SECTION_ID_TEMPLATE: &str = r#"Identify and extract the sections of this resume.

{format_instructions}

Resume:
{resume_text}

Look for the usual sections:
- Contact Information (name, email, phone, address)
- Summary or Objective statement
- Education (degrees, institutions, dates)
- Experience or Work History (titles, companies, responsibilities)
- Skills (technical and professional)
- Projects (notable projects with descriptions)
- Certifications (professional certifications)
- Anything else relevant goes into "additional"

Copy section content from the resume as plain text. Use an empty string for a missing section."#;

pub const SECTION_ID_FALLBACK: &str = r#"Identify and extract the sections from this resume in JSON format:

{resume_text}

Return JSON with keys: {field_names}
Every value must be a plain string."#;
