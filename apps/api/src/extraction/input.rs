//! Boundary input accepting either the canonical typed shape or a loose JSON
//! object. Loose values are repaired into the canonical type on entry, so
//! everything past the handler only sees `T`.

use serde::Deserialize;
use serde_json::Value;

use crate::extraction::diagnostics::Diagnostics;
use crate::extraction::repair::repair;
use crate::extraction::schema::Extractable;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaInput<T> {
    Canonical(T),
    Loose(Value),
}

impl<T: Extractable> SchemaInput<T> {
    pub fn into_canonical(self) -> T {
        match self {
            SchemaInput::Canonical(value) => value,
            SchemaInput::Loose(Value::Object(object)) => {
                let schema = T::schema();
                let mut diagnostics = Diagnostics::new(schema.name());
                T::from_result(&repair(&object, &schema, &mut diagnostics))
            }
            SchemaInput::Loose(_) => T::from_result(&T::schema().empty_result()),
        }
    }
}
