use serde::Serialize;
use serde_json::Value;

use crate::generator::{
  fields::{FieldDescriptor, FieldExtractor, FieldKind},
  schema::{Schema, SchemaType},
};

/// One violation found by [`SchemaValidator`], addressed by the property key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
  pub path: String,
  pub message: String,
}

impl ValidationError {
  fn new(key: &str, message: String) -> Self {
    Self {
      path: key.to_string(),
      message,
    }
  }
}

/// Presence, string and number checks for an `object` schema.
///
/// Walks the same field list the emitters render, so a schema without object
/// properties never produces errors. Keys in the data that the schema does not
/// declare are accepted.
pub struct SchemaValidator;

impl SchemaValidator {
  #[must_use]
  pub fn validate(schema: &Schema, data: &Value) -> Vec<ValidationError> {
    let object = data.as_object();
    let mut errors = Vec::new();

    for field in FieldExtractor::extract(schema) {
      match object.and_then(|object| object.get(&field.key)) {
        None if field.required => {
          errors.push(ValidationError::new(&field.key, format!("{} is required", field.key)));
        }
        None => {}
        Some(value) => errors.extend(Self::check_type(&field, &schema.properties[&field.key], value)),
      }
    }

    errors
  }

  fn check_type(field: &FieldDescriptor, property: &Schema, value: &Value) -> Option<ValidationError> {
    let key = &field.key;
    let message = match (field.kind, property.primary_type()) {
      (FieldKind::Number, _) => (!value.is_number()).then(|| format!("{key} must be a number")),
      (FieldKind::Text, Some(SchemaType::String) | None) => {
        (!value.is_string()).then(|| format!("{key} must be a string"))
      }
      (FieldKind::Text, Some(_)) => None,
    }?;
    Some(ValidationError::new(key, message))
  }
}
