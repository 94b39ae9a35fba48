//! Schema validator/repairer.
//!
//! Given a parsed JSON object, produces a fully-populated `ExtractionResult`.
//! Every declared field is present afterwards with its declared kind. Absent
//! or uncoercible fields fall back to their defaults, extra keys are ignored,
//! and nothing in here fails.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::extraction::diagnostics::{DiagnosticKind, Diagnostics};
use crate::extraction::schema::{
    ExtractionResult, ExtractionSchema, FieldKind, FieldSpec, FieldValue,
};

pub fn repair(
    object: &Map<String, Value>,
    schema: &ExtractionSchema,
    diagnostics: &mut Diagnostics,
) -> ExtractionResult {
    repair_fields(object, schema.fields(), "", diagnostics)
}

fn repair_fields(
    object: &Map<String, Value>,
    fields: &[FieldSpec],
    prefix: &str,
    diagnostics: &mut Diagnostics,
) -> ExtractionResult {
    let mut result = ExtractionResult::default();

    for field in fields {
        let path = format!("{prefix}{}", field.name);
        let value = match object.get(&field.name) {
            Some(raw) => repair_value(raw, field, &path, diagnostics),
            None => {
                diagnostics.field(
                    DiagnosticKind::MissingField,
                    &path,
                    "field absent, using default",
                );
                field.default_value()
            }
        };
        result.insert(&field.name, value);
    }

    result
}

fn repair_value(
    raw: &Value,
    field: &FieldSpec,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> FieldValue {
    match &field.kind {
        FieldKind::List => FieldValue::List(repair_list(raw, path, diagnostics)),
        FieldKind::Text => FieldValue::Text(repair_text(raw, path, diagnostics)),
        FieldKind::Number { min, max } => {
            let n = coerce_number(raw, path, diagnostics).unwrap_or(0.0);
            FieldValue::Number(round_one_decimal(clamp_reported(n, *min, *max, path, diagnostics)))
        }
        FieldKind::Integer { min, max, default } => {
            let n = coerce_number(raw, path, diagnostics)
                .map(|n| n.round() as i64)
                .unwrap_or(*default);
            let clamped = n.clamp(*min, *max);
            if clamped != n {
                diagnostics.field(
                    DiagnosticKind::TypeCoercion,
                    path,
                    format!("{n} clamped to {clamped}"),
                );
            }
            FieldValue::Integer(clamped)
        }
        FieldKind::NumberMap { min, max } => {
            FieldValue::NumberMap(repair_number_map(raw, *min, *max, path, diagnostics))
        }
        FieldKind::Records(nested) => {
            FieldValue::Records(repair_records(raw, nested, path, diagnostics))
        }
    }
}

fn repair_list(raw: &Value, path: &str, diagnostics: &mut Diagnostics) -> Vec<String> {
    match raw {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            let mut coerced = false;
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    Value::Null => coerced = true,
                    Value::Number(_) | Value::Bool(_) => {
                        coerced = true;
                        out.extend(scalar_string(item));
                    }
                    Value::Array(_) => {
                        coerced = true;
                        collect_scalars(item, &mut out);
                    }
                    Value::Object(_) => {
                        coerced = true;
                        let joined = flatten(item, ", ");
                        if !joined.is_empty() {
                            out.push(joined);
                        }
                    }
                }
            }
            if coerced {
                diagnostics.field(
                    DiagnosticKind::TypeCoercion,
                    path,
                    "list elements coerced to strings",
                );
            }
            out
        }
        other if is_falsy(other) => {
            diagnostics.field(
                DiagnosticKind::TypeCoercion,
                path,
                format!("expected a list, got empty {}", type_name(other)),
            );
            Vec::new()
        }
        other => {
            diagnostics.field(
                DiagnosticKind::TypeCoercion,
                path,
                format!("expected a list, wrapped {}", type_name(other)),
            );
            let single = flatten(other, ", ");
            if single.is_empty() {
                Vec::new()
            } else {
                vec![single]
            }
        }
    }
}

fn repair_text(raw: &Value, path: &str, diagnostics: &mut Diagnostics) -> String {
    match raw {
        Value::String(s) => s.clone(),
        // An explicit null is how models say "section not present".
        Value::Null => String::new(),
        Value::Array(_) => {
            diagnostics.field(DiagnosticKind::TypeCoercion, path, "list joined into text");
            flatten(raw, "\n")
        }
        other => {
            diagnostics.field(
                DiagnosticKind::TypeCoercion,
                path,
                format!("{} coerced to text", type_name(other)),
            );
            flatten(other, ", ")
        }
    }
}

fn repair_number_map(
    raw: &Value,
    min: f64,
    max: f64,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, f64> {
    let Value::Object(entries) = raw else {
        if !is_falsy(raw) {
            diagnostics.field(
                DiagnosticKind::TypeCoercion,
                path,
                format!("expected an object, got {}", type_name(raw)),
            );
        }
        return BTreeMap::new();
    };

    let mut out = BTreeMap::new();
    for (key, value) in entries {
        let entry_path = format!("{path}.{key}");
        if let Some(n) = coerce_number(value, &entry_path, diagnostics) {
            let n = clamp_reported(n, min, max, &entry_path, diagnostics);
            out.insert(key.clone(), round_one_decimal(n));
        }
    }
    out
}

fn repair_records(
    raw: &Value,
    fields: &[FieldSpec],
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<ExtractionResult> {
    match raw {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item {
                Value::Object(object) => Some(repair_fields(
                    object,
                    fields,
                    &format!("{path}[{i}]."),
                    diagnostics,
                )),
                other => {
                    diagnostics.field(
                        DiagnosticKind::TypeCoercion,
                        &format!("{path}[{i}]"),
                        format!("dropped {} where an object was expected", type_name(other)),
                    );
                    None
                }
            })
            .collect(),
        Value::Object(object) if !object.is_empty() => {
            diagnostics.field(
                DiagnosticKind::TypeCoercion,
                path,
                "single object wrapped as a one-element list",
            );
            vec![repair_fields(object, fields, &format!("{path}[0]."), diagnostics)]
        }
        other => {
            if !is_falsy(other) {
                diagnostics.field(
                    DiagnosticKind::TypeCoercion,
                    path,
                    format!("expected a list of objects, got {}", type_name(other)),
                );
            }
            Vec::new()
        }
    }
}

/// Accepts JSON numbers and numeric strings such as `"85"` or `"85%"`.
fn coerce_number(raw: &Value, path: &str, diagnostics: &mut Diagnostics) -> Option<f64> {
    let parsed = match raw {
        Value::Number(n) => return n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite()),
        _ => None,
    };

    let detail = match parsed {
        Some(n) => format!("numeric string parsed as {n}"),
        None => format!("{} is not a number, using default", type_name(raw)),
    };
    diagnostics.field(DiagnosticKind::TypeCoercion, path, detail);
    parsed
}

fn clamp_reported(n: f64, min: f64, max: f64, path: &str, diagnostics: &mut Diagnostics) -> f64 {
    let clamped = n.max(min).min(max);
    if clamped != n {
        diagnostics.field(
            DiagnosticKind::TypeCoercion,
            path,
            format!("{n} clamped to {clamped}"),
        );
    }
    clamped
}

fn round_one_decimal(n: f64) -> f64 {
    (n * 10.0).round() / 10.0
}

/// Mirrors the truthiness a loosely-typed caller would apply.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Depth-first scalar leaves of a value, nulls skipped.
fn collect_scalars(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => items.iter().for_each(|v| collect_scalars(v, out)),
        Value::Object(entries) => entries.values().for_each(|v| collect_scalars(v, out)),
        other => out.extend(scalar_string(other)),
    }
}

fn flatten(value: &Value, separator: &str) -> String {
    let mut leaves = Vec::new();
    collect_scalars(value, &mut leaves);
    leaves.join(separator)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
