//! Prompt formatting: template substitution and schema-derived instructions.

use crate::extraction::schema::{ExtractionSchema, FieldKind, FieldSpec};
use crate::llm_client::prompts::STRING_LISTS_INSTRUCTION;

/// Substitutes `{key}` placeholders in a single left-to-right pass.
///
/// Braces that do not name a known key (JSON examples in the template) are
/// kept verbatim, and substituted values are never re-scanned, so a job
/// description containing `{resume_text}` stays literal.
pub fn format_prompt(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open + 1..];

        let substitution = candidate.find('}').and_then(|close| {
            let key = &candidate[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });

        match substitution {
            Some((value, close)) => {
                out.push_str(value);
                rest = &candidate[close + 1..];
            }
            None => {
                out.push('{');
                rest = candidate;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Describes the expected JSON object for the structured attempt.
pub fn format_instructions(schema: &ExtractionSchema) -> String {
    let mut out = String::from("Return a single JSON object with exactly these keys:\n");
    for field in schema.fields() {
        out.push_str(&format!(
            "- \"{}\" ({}): {}\n",
            field.name,
            describe_kind(&field.kind),
            field.description
        ));
    }
    out.push_str("\nExample of the expected shape:\n");
    out.push_str(&example_object(schema.fields()));
    out.push_str("\n\n");
    out.push_str(STRING_LISTS_INSTRUCTION);
    out
}

/// Bare key list for the simplified fallback prompt.
pub fn field_names(schema: &ExtractionSchema) -> String {
    schema
        .fields()
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_kind(kind: &FieldKind) -> String {
    match kind {
        FieldKind::List => "list of strings".to_string(),
        FieldKind::Text => "string".to_string(),
        FieldKind::Number { min, max } => format!("number between {min} and {max}"),
        FieldKind::Integer { min, max, .. } => format!("integer from {min} to {max}"),
        FieldKind::NumberMap { min, max } => {
            format!("object mapping names to numbers between {min} and {max}")
        }
        FieldKind::Records(fields) => format!(
            "list of objects with keys {}",
            fields
                .iter()
                .map(|f| format!("\"{}\" ({})", f.name, describe_kind(&f.kind)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn example_object(fields: &[FieldSpec]) -> String {
    let entries = fields
        .iter()
        .map(|f| format!("\"{}\": {}", f.name, example_value(&f.kind)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{entries}}}")
}

fn example_value(kind: &FieldKind) -> String {
    match kind {
        FieldKind::List => "[\"...\"]".to_string(),
        FieldKind::Text => "\"...\"".to_string(),
        FieldKind::Number { max, .. } => format!("{max}"),
        FieldKind::Integer { max, .. } => format!("{max}"),
        FieldKind::NumberMap { max, .. } => format!("{{\"...\": {max}}}"),
        FieldKind::Records(fields) => format!("[{}]", example_object(fields)),
    }
}

/// `required_skills` → `Required Skills`.
pub fn title_case(name: &str) -> String {
    name.replace('_', " ")
        .split_whitespace()
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().collect::<String>() + &c.as_str().to_lowercase(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats categories of items as `=== Title ===` blocks of `- item` bullets.
/// Empty categories are skipped.
pub fn bullet_sections<'a, I>(categories: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a [String])>,
{
    let mut out = String::new();
    for (category, items) in categories {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("=== {} ===\n", title_case(category)));
        for item in items {
            out.push_str(&format!("- {item}\n"));
        }
        out.push('\n');
    }
    out
}

/// Formats named text blocks as `=== Name ===\ncontent` sections.
pub fn text_sections<'a, I>(sections: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (name, content) in sections {
        out.push_str(&format!("=== {name} ===\n{content}\n\n"));
    }
    out
}
