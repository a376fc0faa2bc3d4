use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Number, Value};
use strum::{AsRefStr, Display, EnumString};

/// JSON-schema primitive and structural type names understood by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaType {
  Object,
  Array,
  String,
  Number,
  Integer,
  Boolean,
  Null,
}

impl SchemaType {
  #[must_use]
  pub const fn is_numeric(self) -> bool {
    matches!(self, Self::Number | Self::Integer)
  }
}

/// The `type` keyword, which OpenAPI 3.1 allows to be either a single name or a list.
///
/// Names are kept verbatim so that unknown type names degrade instead of failing the
/// whole operation that embeds the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaTypeSet {
  Single(String),
  Multiple(Vec<String>),
}

impl SchemaTypeSet {
  pub fn types(&self) -> impl Iterator<Item = SchemaType> + '_ {
    let names: &[String] = match self {
      Self::Single(name) => std::slice::from_ref(name),
      Self::Multiple(names) => names,
    };
    names.iter().filter_map(|name| name.parse::<SchemaType>().ok())
  }

  /// The first declared type that is not `null`.
  #[must_use]
  pub fn primary(&self) -> Option<SchemaType> {
    self.types().find(|ty| *ty != SchemaType::Null)
  }
}

/// A JSON-schema fragment as it appears in an OpenAPI document.
///
/// `properties` keeps declaration order; everything downstream (fields, columns,
/// validation errors) relies on it. Each keyword is decoded on its own: a keyword
/// with the wrong shape (`"type": 5`, `"minimum": "0"`) reads as absent and the
/// rest of the schema is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
  #[serde(rename = "$ref", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub reference: Option<String>,
  #[serde(rename = "type", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub schema_type: Option<SchemaTypeSet>,
  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,
  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub pattern: Option<String>,
  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub minimum: Option<Number>,
  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub maximum: Option<Number>,
  #[serde(default, deserialize_with = "lenient_properties", skip_serializing_if = "IndexMap::is_empty")]
  pub properties: IndexMap<String, Schema>,
  /// Only the `required: [names]` form counts; the boolean per-property
  /// `required: true` some hand-written documents still carry reads as empty.
  #[serde(default, deserialize_with = "lenient_or_default", skip_serializing_if = "Vec::is_empty")]
  pub required: Vec<String>,
  #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
  pub items: Option<Box<Schema>>,
}

impl Schema {
  #[must_use]
  pub fn primary_type(&self) -> Option<SchemaType> {
    self.schema_type.as_ref().and_then(SchemaTypeSet::primary)
  }

  #[must_use]
  pub fn is_object(&self) -> bool {
    self
      .schema_type
      .as_ref()
      .is_some_and(|set| set.types().any(|ty| ty == SchemaType::Object))
  }

  #[must_use]
  pub fn is_array(&self) -> bool {
    self
      .schema_type
      .as_ref()
      .is_some_and(|set| set.types().any(|ty| ty == SchemaType::Array))
  }

  #[must_use]
  pub fn is_numeric(&self) -> bool {
    self.primary_type().is_some_and(SchemaType::is_numeric)
  }

  #[must_use]
  pub fn is_required(&self, key: &str) -> bool {
    self.required.iter().any(|name| name == key)
  }

  /// Returns true when the schema is an object with at least one declared property.
  #[must_use]
  pub fn has_object_properties(&self) -> bool {
    self.is_object() && !self.properties.is_empty()
  }
}

/// Decodes one keyword, reading a value of the wrong shape as absent.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Value::deserialize(deserializer)?;
  Ok(serde_json::from_value(value).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned + Default,
{
  Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Keeps every property that is itself a schema object; other entries are dropped.
fn lenient_properties<'de, D>(deserializer: D) -> Result<IndexMap<String, Schema>, D::Error>
where
  D: Deserializer<'de>,
{
  let entries: IndexMap<String, Value> = lenient_or_default(deserializer)?;
  Ok(
    entries
      .into_iter()
      .filter_map(|(key, value)| Some((key, serde_json::from_value(value).ok()?)))
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_properties_keep_declaration_order() {
    let schema: Schema = serde_json::from_value(json!({
      "type": "object",
      "properties": {
        "zeta": { "type": "string" },
        "alpha": { "type": "number" },
        "mid": { "type": "boolean" }
      }
    }))
    .unwrap();

    let keys: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
  }

  #[test]
  fn test_type_set_variants() {
    let single: Schema = serde_json::from_value(json!({ "type": "object" })).unwrap();
    assert!(single.is_object());
    assert_eq!(single.primary_type(), Some(SchemaType::Object));

    let nullable: Schema = serde_json::from_value(json!({ "type": ["null", "integer"] })).unwrap();
    assert!(nullable.is_numeric());
    assert_eq!(nullable.primary_type(), Some(SchemaType::Integer));

    let unknown: Schema = serde_json::from_value(json!({ "type": "uuid" })).unwrap();
    assert_eq!(unknown.primary_type(), None);
    assert!(!unknown.is_object());
  }

  #[test]
  fn test_required_accepts_legacy_boolean() {
    let schema: Schema = serde_json::from_value(json!({ "type": "string", "required": true })).unwrap();
    assert!(schema.required.is_empty());

    let schema: Schema = serde_json::from_value(json!({ "type": "object", "required": ["id"] })).unwrap();
    assert!(schema.is_required("id"));
    assert!(!schema.is_required("name"));
  }

  #[test]
  fn test_ref_and_constraints() {
    let schema: Schema = serde_json::from_value(json!({
      "$ref": "#/components/schemas/User",
      "minimum": 1,
      "maximum": 2.5,
      "pattern": "^[a-z]+$"
    }))
    .unwrap();

    assert_eq!(schema.reference.as_deref(), Some("#/components/schemas/User"));
    assert_eq!(schema.minimum.map(|n| n.to_string()), Some("1".to_string()));
    assert_eq!(schema.maximum.map(|n| n.to_string()), Some("2.5".to_string()));
    assert_eq!(schema.pattern.as_deref(), Some("^[a-z]+$"));
  }

  #[test]
  fn test_malformed_keywords_read_as_absent() {
    let schema: Schema = serde_json::from_value(json!({
      "type": "object",
      "required": ["age", 7],
      "properties": {
        "age": { "type": "integer", "minimum": "0", "maximum": 120 },
        "code": { "type": 5, "pattern": false },
        "tags": 3,
        "name": { "type": "string" }
      },
      "items": "none"
    }))
    .unwrap();

    assert!(schema.is_object());
    assert!(schema.required.is_empty());
    assert!(schema.items.is_none());
    assert_eq!(
      schema.properties.keys().map(String::as_str).collect::<Vec<_>>(),
      vec!["age", "code", "name"]
    );

    let age = &schema.properties["age"];
    assert!(age.is_numeric());
    assert!(age.minimum.is_none());
    assert_eq!(age.maximum.as_ref().map(ToString::to_string), Some("120".to_string()));

    let code = &schema.properties["code"];
    assert!(code.schema_type.is_none());
    assert!(code.pattern.is_none());
  }

  #[test]
  fn test_non_object_schema_is_rejected() {
    assert!(serde_json::from_value::<Schema>(json!("not a schema")).is_err());
  }
}
