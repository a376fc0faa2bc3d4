//! Drives generation across a whole document.
//!
//! [`AdminGenerator`] walks every operation of a [`ParsedSpec`], decides which
//! components the operation supports, and hands each [`ComponentConfig`] to the
//! [`GenerationDispatcher`]. Rules per operation:
//!
//! - a request body with a JSON schema produces a `Form` submitting to the
//!   operation's method and path;
//! - a `200` response with a JSON schema produces a `List` over the item schema
//!   (the `items` of an array response, otherwise the schema itself).
//!
//! ```no_run
//! use oas3_admin::generator::{
//!   dispatcher::{GenerationDispatcher, GeneratorOptions},
//!   orchestrator::AdminGenerator,
//!   spec_parser::ParsedSpec,
//! };
//!
//! # fn example() -> anyhow::Result<()> {
//! let spec = ParsedSpec::from_json_str(&std::fs::read_to_string("openapi.json")?)?;
//! let generator = AdminGenerator::new(GenerationDispatcher::new(GeneratorOptions::builder().target("react").build()));
//! let output = generator.generate(&spec)?;
//!
//! println!("Generated {} components", output.stats.artifacts_generated());
//! # Ok(())
//! # }
//! ```

use indexmap::IndexMap;
use serde_json::Value;

use crate::generator::{
  dispatcher::{GenerationDispatcher, GeneratorOptions, UnsupportedTargetError},
  emitters::{ComponentConfig, ComponentKind, GeneratedComponent},
  metrics::{GenerationStats, MalformedSpecWarning},
  naming::ArtifactKey,
  schema::Schema,
  spec_parser::{Operation, ParsedSpec},
  validation::{SchemaValidator, ValidationError},
};

const LIST_RESPONSE_STATUS: &str = "200";

/// Generated components keyed by `"<METHOD> <PATH> <Kind>"`, plus statistics.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
  pub artifacts: IndexMap<String, GeneratedComponent>,
  pub stats: GenerationStats,
}

/// High-level entry point turning a parsed document into UI components.
#[derive(Debug)]
pub struct AdminGenerator {
  dispatcher: GenerationDispatcher,
}

impl AdminGenerator {
  #[must_use]
  pub fn new(dispatcher: GenerationDispatcher) -> Self {
    Self { dispatcher }
  }

  #[must_use]
  pub fn from_options(options: GeneratorOptions) -> Self {
    Self::new(GenerationDispatcher::new(options))
  }

  #[must_use]
  pub fn dispatcher(&self) -> &GenerationDispatcher {
    &self.dispatcher
  }

  /// Generates every supported component and returns only the artifact map.
  pub fn generate_all(
    &self,
    spec: &ParsedSpec,
  ) -> Result<IndexMap<String, GeneratedComponent>, UnsupportedTargetError> {
    Ok(self.generate(spec)?.artifacts)
  }

  /// Generates every supported component in operation order.
  ///
  /// The target is checked before any operation is visited, so an unsupported target
  /// never yields a partial result. Parse warnings carried by `spec` are copied into
  /// the returned statistics.
  ///
  /// # Errors
  ///
  /// Returns [`UnsupportedTargetError`] when the configured target has neither an
  /// emitter nor custom templates for every component kind.
  pub fn generate(&self, spec: &ParsedSpec) -> Result<GenerationOutput, UnsupportedTargetError> {
    self.dispatcher.check_target()?;

    let mut stats = GenerationStats::default();
    stats.record_warnings(spec.warnings.iter().cloned());
    let mut artifacts = IndexMap::new();

    for operation in spec.operations().into_values() {
      stats.record_operation();

      let mut warnings = Vec::new();
      let configs = Self::component_configs(spec, operation, &mut warnings);
      stats.record_warnings(warnings);

      for config in configs {
        let key = ArtifactKey::new(operation.method.clone(), operation.path.as_str(), config.kind);
        let component = self.dispatcher.generate(&config)?;
        stats.record_artifact(config.kind);
        artifacts.insert(key.to_string(), component);
      }
    }

    Ok(GenerationOutput { artifacts, stats })
  }

  /// The component configs `operation` supports: zero, one or two, form first.
  ///
  /// `$ref` schemas are resolved against `spec`. Problems that degrade a config
  /// (an unresolved reference, an array without `items`, a schema without object
  /// properties) are pushed to `warnings` and the config is still produced.
  pub fn component_configs(
    spec: &ParsedSpec,
    operation: &Operation,
    warnings: &mut Vec<MalformedSpecWarning>,
  ) -> Vec<ComponentConfig> {
    let mut configs = Vec::with_capacity(2);

    if let Some(schema) = operation.json_request_schema() {
      let schema = resolve_or_empty(spec, schema, warnings);
      check_fields(operation, ComponentKind::Form, &schema, warnings);
      configs.push(
        ComponentConfig::builder()
          .kind(ComponentKind::Form)
          .schema(schema)
          .path(operation.path.as_str())
          .method(operation.method.clone())
          .build(),
      );
    }

    if let Some(schema) = operation.json_response_schema(LIST_RESPONSE_STATUS) {
      let schema = list_item_schema(spec, operation, schema, warnings);
      check_fields(operation, ComponentKind::List, &schema, warnings);
      configs.push(
        ComponentConfig::builder()
          .kind(ComponentKind::List)
          .schema(schema)
          .path(operation.path.as_str())
          .build(),
      );
    }

    configs
  }

  /// Checks `data` against `schema`; see [`SchemaValidator`].
  #[must_use]
  pub fn validate_schema(&self, schema: &Schema, data: &Value) -> Vec<ValidationError> {
    SchemaValidator::validate(schema, data)
  }
}

fn resolve_or_empty(spec: &ParsedSpec, schema: &Schema, warnings: &mut Vec<MalformedSpecWarning>) -> Schema {
  spec.resolve(schema).unwrap_or_else(|warning| {
    warnings.push(warning);
    Schema::default()
  })
}

fn list_item_schema(
  spec: &ParsedSpec,
  operation: &Operation,
  schema: &Schema,
  warnings: &mut Vec<MalformedSpecWarning>,
) -> Schema {
  let resolved = resolve_or_empty(spec, schema, warnings);
  if !resolved.is_array() {
    return resolved;
  }

  match resolved.items.as_deref() {
    Some(items) => resolve_or_empty(spec, items, warnings),
    None => {
      warnings.push(MalformedSpecWarning::MissingItemsSchema {
        operation: operation.key(),
      });
      Schema::default()
    }
  }
}

fn check_fields(operation: &Operation, kind: ComponentKind, schema: &Schema, warnings: &mut Vec<MalformedSpecWarning>) {
  if !schema.has_object_properties() {
    warnings.push(MalformedSpecWarning::EmptyFieldList {
      operation: operation.key(),
      kind,
    });
  }
}
