//! Extraction schemas and the results they produce.
//!
//! A schema is an ordered list of named fields, each with a kind and an empty
//! default. An `ExtractionResult` always carries every declared field with a
//! value of the declared kind.

use std::collections::{BTreeMap, HashSet};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::extraction::error::SchemaError;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// List of strings. Default `[]`.
    List,
    /// Scalar string. Default `""`.
    Text,
    /// Float clamped to `[min, max]`, rounded to one decimal. Default `0` (clamped).
    Number { min: f64, max: f64 },
    /// Integer clamped to `[min, max]`.
    Integer { min: i64, max: i64, default: i64 },
    /// String → float map, values clamped to `[min, max]`. Default `{}`.
    NumberMap { min: f64, max: f64 },
    /// List of nested objects, each repaired against the nested fields. Default `[]`.
    Records(Vec<FieldSpec>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub description: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: &str, description: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
        }
    }

    pub fn list(name: &str, description: &str) -> Self {
        Self::new(name, description, FieldKind::List)
    }

    pub fn text(name: &str, description: &str) -> Self {
        Self::new(name, description, FieldKind::Text)
    }

    pub fn number(name: &str, description: &str, min: f64, max: f64) -> Self {
        Self::new(name, description, FieldKind::Number { min, max })
    }

    pub fn integer(name: &str, description: &str, min: i64, max: i64, default: i64) -> Self {
        Self::new(name, description, FieldKind::Integer { min, max, default })
    }

    pub fn number_map(name: &str, description: &str, min: f64, max: f64) -> Self {
        Self::new(name, description, FieldKind::NumberMap { min, max })
    }

    pub fn records(name: &str, description: &str, fields: Vec<FieldSpec>) -> Self {
        Self::new(name, description, FieldKind::Records(fields))
    }

    /// The empty value for this field's kind.
    pub fn default_value(&self) -> FieldValue {
        match &self.kind {
            FieldKind::List => FieldValue::List(Vec::new()),
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Number { min, max } => FieldValue::Number(0.0_f64.max(*min).min(*max)),
            FieldKind::Integer { default, .. } => FieldValue::Integer(*default),
            FieldKind::NumberMap { .. } => FieldValue::NumberMap(BTreeMap::new()),
            FieldKind::Records(_) => FieldValue::Records(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl ExtractionSchema {
    pub fn new(name: &str, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.to_string(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Rejects schema definitions no extraction could satisfy.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        validate_fields(&self.name, &self.fields)
    }

    /// A result with every field at its declared default.
    pub fn empty_result(&self) -> ExtractionResult {
        empty_record(&self.fields)
    }
}

fn validate_fields(schema: &str, fields: &[FieldSpec]) -> Result<(), SchemaError> {
    if fields.is_empty() {
        return Err(SchemaError::NoFields(schema.to_string()));
    }

    let mut seen = HashSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(SchemaError::EmptyFieldName {
                schema: schema.to_string(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                schema: schema.to_string(),
                field: field.name.clone(),
            });
        }

        let invalid_range = || SchemaError::InvalidRange {
            schema: schema.to_string(),
            field: field.name.clone(),
        };
        match &field.kind {
            FieldKind::Number { min, max } | FieldKind::NumberMap { min, max } => {
                if !(min.is_finite() && max.is_finite() && min <= max) {
                    return Err(invalid_range());
                }
            }
            FieldKind::Integer { min, max, default } => {
                if min > max || default < min || default > max {
                    return Err(invalid_range());
                }
            }
            FieldKind::Records(nested) => {
                if nested.is_empty() {
                    return Err(SchemaError::EmptyRecord {
                        schema: schema.to_string(),
                        field: field.name.clone(),
                    });
                }
                validate_fields(schema, nested)?;
            }
            FieldKind::List | FieldKind::Text => {}
        }
    }
    Ok(())
}

pub(crate) fn empty_record(fields: &[FieldSpec]) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    for field in fields {
        result.insert(&field.name, field.default_value());
    }
    result
}

/// A single repaired field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    List(Vec<String>),
    Text(String),
    Number(f64),
    Integer(i64),
    NumberMap(BTreeMap<String, f64>),
    Records(Vec<ExtractionResult>),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::List(items) => items.serialize(serializer),
            FieldValue::Text(text) => text.serialize(serializer),
            FieldValue::Number(n) => n.serialize(serializer),
            FieldValue::Integer(n) => n.serialize(serializer),
            FieldValue::NumberMap(map) => map.serialize(serializer),
            FieldValue::Records(records) => records.serialize(serializer),
        }
    }
}

/// Field name → value, in schema declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    fields: Vec<(String, FieldValue)>,
}

impl ExtractionResult {
    /// Sets a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: &str, value: FieldValue) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    // Typed accessors. A repaired result always holds the declared kind, so a
    // mismatch here means the caller asked for the wrong field; it reads as empty.

    pub fn list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(FieldValue::List(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn text(&self, name: &str) -> String {
        match self.get(name) {
            Some(FieldValue::Text(text)) => text.clone(),
            _ => String::new(),
        }
    }

    pub fn number(&self, name: &str) -> f64 {
        match self.get(name) {
            Some(FieldValue::Number(n)) => *n,
            _ => 0.0,
        }
    }

    pub fn integer(&self, name: &str) -> i64 {
        match self.get(name) {
            Some(FieldValue::Integer(n)) => *n,
            _ => 0,
        }
    }

    pub fn number_map(&self, name: &str) -> BTreeMap<String, f64> {
        match self.get(name) {
            Some(FieldValue::NumberMap(map)) => map.clone(),
            _ => BTreeMap::new(),
        }
    }

    pub fn records(&self, name: &str) -> &[ExtractionResult] {
        match self.get(name) {
            Some(FieldValue::Records(records)) => records,
            _ => &[],
        }
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A typed use-case struct backed by an extraction schema.
pub trait Extractable: Sized {
    fn schema() -> ExtractionSchema;

    /// Builds the typed value from a repaired result.
    fn from_result(result: &ExtractionResult) -> Self;

    fn to_result(&self) -> ExtractionResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> ExtractionSchema {
        ExtractionSchema::new(
            "sample",
            vec![
                FieldSpec::list("keywords", "Keywords"),
                FieldSpec::text("summary", "Summary"),
                FieldSpec::number("score", "Score", 0.0, 100.0),
                FieldSpec::integer("priority", "Priority", 1, 10, 1),
                FieldSpec::number_map("scores", "Scores", 0.0, 100.0),
                FieldSpec::records(
                    "items",
                    "Items",
                    vec![FieldSpec::text("name", "Name")],
                ),
            ],
        )
    }

    #[test]
    fn test_valid_schema_passes_validation() {
        assert_eq!(sample_schema().validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let schema = ExtractionSchema::new(
            "dup",
            vec![FieldSpec::list("a", ""), FieldSpec::text("a", "")],
        );
        assert_eq!(
            schema.validate(),
            Err(SchemaError::DuplicateField {
                schema: "dup".to_string(),
                field: "a".to_string()
            })
        );
    }

    #[test]
    fn test_schema_without_fields_is_rejected() {
        let schema = ExtractionSchema::new("bare", vec![]);
        assert_eq!(schema.validate(), Err(SchemaError::NoFields("bare".to_string())));
    }

    #[test]
    fn test_integer_default_outside_range_is_rejected() {
        let schema = ExtractionSchema::new(
            "prio",
            vec![FieldSpec::integer("priority", "", 1, 10, 0)],
        );
        assert!(matches!(schema.validate(), Err(SchemaError::InvalidRange { .. })));
    }

    #[test]
    fn test_empty_nested_record_is_rejected() {
        let schema = ExtractionSchema::new("rec", vec![FieldSpec::records("items", "", vec![])]);
        assert!(matches!(schema.validate(), Err(SchemaError::EmptyRecord { .. })));
    }

    #[test]
    fn test_empty_result_has_every_field_at_default() {
        let result = sample_schema().empty_result();
        assert_eq!(serde_json::to_value(&result).unwrap().as_object().unwrap().len(), 6);
        assert_eq!(result.get("keywords"), Some(&FieldValue::List(vec![])));
        assert_eq!(result.get("summary"), Some(&FieldValue::Text(String::new())));
        assert_eq!(result.get("score"), Some(&FieldValue::Number(0.0)));
        assert_eq!(result.get("priority"), Some(&FieldValue::Integer(1)));
        assert!(result.records("items").is_empty());
    }

    #[test]
    fn test_result_serializes_in_declaration_order() {
        let json = serde_json::to_string(&sample_schema().empty_result()).unwrap();
        assert_eq!(
            json,
            r#"{"keywords":[],"summary":"","score":0.0,"priority":1,"scores":{},"items":[]}"#
        );
    }
}
