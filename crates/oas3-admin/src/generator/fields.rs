use serde::Serialize;
use serde_json::Number;
use strum::{AsRefStr, Display};

use crate::generator::schema::Schema;

/// How a field's value is entered and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
  Number,
  Text,
}

/// The per-property shape used to render one form input or one list column.
#[derive(Debug, Clone, PartialEq, Serialize, bon::Builder)]
pub struct FieldDescriptor {
  #[builder(into)]
  pub key: String,
  pub kind: FieldKind,
  #[builder(default)]
  pub required: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  #[builder(into)]
  pub pattern: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub minimum: Option<Number>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub maximum: Option<Number>,
  #[serde(skip_serializing_if = "Option::is_none")]
  #[builder(into)]
  pub description: Option<String>,
}

impl FieldDescriptor {
  #[must_use]
  pub const fn is_numeric(&self) -> bool {
    matches!(self.kind, FieldKind::Number)
  }

  /// Returns true when any client-side validation applies to this field.
  #[must_use]
  pub const fn has_constraints(&self) -> bool {
    self.required || self.pattern.is_some() || self.minimum.is_some() || self.maximum.is_some()
  }
}

/// Derives field descriptors from the properties of an `object` schema.
pub struct FieldExtractor;

impl FieldExtractor {
  /// Walks `schema.properties` in declaration order.
  ///
  /// Anything other than an object schema with properties yields no fields. Array
  /// schemas are not unwrapped here; callers pass the item schema.
  #[must_use]
  pub fn extract(schema: &Schema) -> Vec<FieldDescriptor> {
    if !schema.has_object_properties() {
      return vec![];
    }

    schema
      .properties
      .iter()
      .map(|(key, property)| Self::describe(key, property, schema.is_required(key)))
      .collect()
  }

  fn describe(key: &str, property: &Schema, required: bool) -> FieldDescriptor {
    FieldDescriptor {
      key: key.to_string(),
      kind: Self::infer_kind(property),
      required,
      pattern: property.pattern.clone(),
      minimum: property.minimum.clone(),
      maximum: property.maximum.clone(),
      description: property.description.clone(),
    }
  }

  #[must_use]
  pub fn infer_kind(property: &Schema) -> FieldKind {
    if property.is_numeric() {
      FieldKind::Number
    } else {
      FieldKind::Text
    }
  }
}
