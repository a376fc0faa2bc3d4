use serde_json::json;

use crate::generator::{
  dispatcher::{GenerationDispatcher, GeneratorOptions},
  emitters::{ComponentKind, EmitterRegistry, GeneratedComponent, ReactEmitter},
  metrics::MalformedSpecWarning,
  orchestrator::AdminGenerator,
  spec_parser::ParsedSpec,
  templates::TextTemplate,
};

fn generator(target: &str) -> AdminGenerator {
  AdminGenerator::from_options(GeneratorOptions::builder().target(target).build())
}

fn users_api() -> ParsedSpec {
  ParsedSpec::from_json_str(include_str!("../../../fixtures/users_api.json")).unwrap()
}

fn position(code: &str, needle: &str) -> usize {
  code
    .find(needle)
    .unwrap_or_else(|| panic!("expected `{needle}` in:\n{code}"))
}

#[test]
fn test_users_scenario_for_every_target() {
  let spec = users_api();

  for target in ["react", "vue", "angular"] {
    let artifacts = generator(target).generate_all(&spec).unwrap();
    let keys: Vec<&str> = artifacts.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["GET /users List", "POST /users Form"], "target {target}");

    let list = &artifacts["GET /users List"].code;
    assert!(list.contains("UserList"), "{target}:\n{list}");
    assert!(position(list, "item.id") < position(list, "item.name"), "{target}:\n{list}");

    let form = &artifacts["POST /users Form"].code;
    assert!(form.contains("NewUserForm"), "{target}:\n{form}");
    assert!(form.contains("'POST'"), "{target}:\n{form}");
    assert!(form.contains("'/users'"), "{target}:\n{form}");
    assert!(position(form, "name") < position(form, "email"), "{target}:\n{form}");
  }
}

#[test]
fn test_users_scenario_required_fields() {
  let artifacts = generator("react").generate_all(&users_api()).unwrap();
  let form = &artifacts["POST /users Form"].code;

  assert!(form.contains("required: 'name is required',"));
  assert!(form.contains("required: 'email is required',"));
  assert!(form.contains("placeholder={'Display name'}"));
}

#[test]
fn test_stats_for_users_scenario() {
  let output = generator("vue").generate(&users_api()).unwrap();

  assert_eq!(output.stats.operations_scanned, 2);
  assert_eq!(output.stats.forms_generated, 1);
  assert_eq!(output.stats.lists_generated, 1);
  assert!(output.stats.warnings.is_empty());
}

#[test]
fn test_form_and_list_for_same_operation() {
  let spec = ParsedSpec::parse(&json!({
    "paths": {
      "/users": {
        "post": {
          "requestBody": {
            "content": { "application/json": { "schema": { "type": "object", "properties": { "a": {} } } } }
          },
          "responses": {
            "200": {
              "content": { "application/json": { "schema": { "type": "object", "properties": { "b": {} } } } }
            }
          }
        },
        "delete": { "responses": { "204": { "description": "gone" } } }
      }
    }
  }));

  let artifacts = generator("react").generate_all(&spec).unwrap();
  assert_eq!(
    artifacts.keys().collect::<Vec<_>>(),
    vec!["POST /users Form", "POST /users List"]
  );
}

#[test]
fn test_unsupported_target_leaves_no_artifacts() {
  let error = generator("svelte").generate(&users_api()).unwrap_err();
  assert_eq!(error.target, "svelte");
  assert!(error.to_string().contains("react, vue, angular"));
}

#[test]
fn test_empty_registry_rejects_every_target() {
  let dispatcher = GenerationDispatcher::with_registry(
    GeneratorOptions::builder().target("react").build(),
    EmitterRegistry::empty(),
  );
  let error = AdminGenerator::new(dispatcher).generate_all(&users_api()).unwrap_err();
  assert!(error.supported.is_empty());
}

#[test]
fn test_custom_registry() {
  let mut registry = EmitterRegistry::empty();
  registry.register(ReactEmitter);
  let dispatcher = GenerationDispatcher::with_registry(GeneratorOptions::builder().target("react").build(), registry);

  let artifacts = AdminGenerator::new(dispatcher).generate_all(&users_api()).unwrap();
  assert_eq!(artifacts.len(), 2);
}

#[test]
fn test_custom_template_for_one_kind() {
  let options = GeneratorOptions::builder().target("angular").build().with_template(
    "angular",
    ComponentKind::List,
    TextTemplate::new("// {{componentName}} reads {{path}}", ["@angular/core"]),
  );
  let artifacts = AdminGenerator::from_options(options).generate_all(&users_api()).unwrap();

  assert_eq!(
    artifacts["GET /users List"],
    GeneratedComponent::new("// UserList reads /users".to_string(), ["@angular/core"])
  );
  assert!(artifacts["POST /users Form"].code.contains("Validators.required"));
}

#[test]
fn test_base_url_does_not_change_keys() {
  let options = GeneratorOptions::builder()
    .target("react")
    .base_url("https://api.example.com/")
    .build();
  let artifacts = AdminGenerator::from_options(options).generate_all(&users_api()).unwrap();

  assert!(artifacts.contains_key("GET /users List"));
  assert!(artifacts["GET /users List"].code.contains("'https://api.example.com/users'"));
}

#[test]
fn test_malformed_document_degrades() {
  let spec = ParsedSpec::from_json_str(include_str!("../../../fixtures/malformed_api.json")).unwrap();
  let output = generator("react").generate(&spec).unwrap();

  assert_eq!(
    output.artifacts.keys().collect::<Vec<_>>(),
    vec!["POST /orders Form", "POST /orders List"]
  );
  assert!(output.artifacts["POST /orders Form"].code.contains("ComponentForm"));
  assert_eq!(output.stats.operations_scanned, 3);

  let generation_warnings: Vec<&MalformedSpecWarning> = output
    .stats
    .warnings
    .iter()
    .filter(|warning| !warning.is_skipped_item())
    .collect();
  assert_eq!(
    generation_warnings,
    vec![
      &MalformedSpecWarning::UnresolvedReference {
        reference: "#/components/schemas/Missing".to_string()
      },
      &MalformedSpecWarning::EmptyFieldList {
        operation: "POST /orders".to_string(),
        kind: ComponentKind::Form
      },
      &MalformedSpecWarning::MissingItemsSchema {
        operation: "POST /orders".to_string()
      },
      &MalformedSpecWarning::EmptyFieldList {
        operation: "POST /orders".to_string(),
        kind: ComponentKind::List
      },
    ]
  );
  assert_eq!(output.stats.warnings.len(), 7);
}

fn users_operation(body_property: serde_json::Value, extra_responses: serde_json::Value) -> ParsedSpec {
  let mut responses = json!({
    "200": {
      "content": {
        "application/json": {
          "schema": { "type": "object", "properties": { "id": { "type": "integer" } } }
        }
      }
    }
  });
  if let (Some(responses), Some(extra)) = (responses.as_object_mut(), extra_responses.as_object()) {
    responses.extend(extra.clone());
  }

  ParsedSpec::parse(&json!({
    "paths": {
      "/users": {
        "post": {
          "requestBody": {
            "content": {
              "application/json": {
                "schema": { "type": "object", "properties": { "age": body_property } }
              }
            }
          },
          "responses": responses
        }
      }
    }
  }))
}

#[test]
fn test_malformed_unused_response_keeps_form_and_list() {
  let spec = users_operation(
    json!({ "type": "integer" }),
    json!({ "404": { "content": { "application/json": { "schema": { "type": 5 } } } } }),
  );
  let artifacts = generator("react").generate_all(&spec).unwrap();

  assert_eq!(
    artifacts.keys().collect::<Vec<_>>(),
    vec!["POST /users Form", "POST /users List"]
  );
}

#[test]
fn test_malformed_constraint_degrades_to_absent() {
  let spec = users_operation(json!({ "type": "integer", "minimum": "0" }), json!({}));
  let artifacts = generator("react").generate_all(&spec).unwrap();

  assert_eq!(
    artifacts.keys().collect::<Vec<_>>(),
    vec!["POST /users Form", "POST /users List"]
  );
  let form = &artifacts["POST /users Form"].code;
  assert!(form.contains("valueAsNumber: true,"), "{form}");
  assert!(!form.contains("min:"), "{form}");
  assert!(spec.warnings.is_empty());
}

#[test]
fn test_yaml_document_with_parameterized_media_type() {
  let yaml: serde_yaml::Value = serde_yaml::from_str(include_str!("../../../fixtures/pets_api.yaml")).unwrap();
  let document = serde_json::to_value(yaml).unwrap();
  let spec = ParsedSpec::parse(&document);
  let artifacts = generator("react").generate_all(&spec).unwrap();

  assert_eq!(
    artifacts.keys().collect::<Vec<_>>(),
    vec!["POST /pets Form", "POST /pets List", "GET /pets/{petId} List"]
  );
  let list = &artifacts["GET /pets/{petId} List"].code;
  assert!(list.contains("export function PetList()"));
  assert!(list.contains("'/pets/{petId}'"));
}

#[test]
fn test_component_configs_for_list_unwraps_items() {
  let spec = users_api();
  let operations = spec.operations();
  let mut warnings = Vec::new();
  let configs = AdminGenerator::component_configs(&spec, operations["GET /users"], &mut warnings);

  assert_eq!(configs.len(), 1);
  assert_eq!(configs[0].kind, ComponentKind::List);
  assert_eq!(configs[0].schema.title.as_deref(), Some("User"));
  assert!(configs[0].schema.is_object());
  assert!(configs[0].method.is_none());
  assert!(warnings.is_empty());
}

#[test]
fn test_validate_schema_passthrough() {
  let spec = users_api();
  let schema = spec.schema("NewUser").unwrap();
  let errors = generator("react").validate_schema(schema, &json!({ "name": 5 }));

  let messages: Vec<&str> = errors.iter().map(|error| error.message.as_str()).collect();
  assert_eq!(messages, vec!["name must be a string", "email is required"]);
}
