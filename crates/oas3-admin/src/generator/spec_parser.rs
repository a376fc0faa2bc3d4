//! Normalizes a raw OpenAPI document into the canonical [`ParsedSpec`] model.
//!
//! Parsing never fails. Documents found in the wild are often partial, so every
//! piece that cannot be decoded (a missing `paths` object, a request body or a
//! single response with an unexpected shape, a broken component schema) is dropped
//! and recorded as a [`MalformedSpecWarning`] while the rest of the document is kept.
//! Pieces are decoded separately so that a bad `404` response never costs the
//! operation its form.

use std::collections::HashSet;

use http::Method;
use indexmap::IndexMap;
use mediatype::{MediaType, names};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::generator::{
  metrics::MalformedSpecWarning,
  schema::{Schema, lenient},
};

const PARAMETERS_KEY: &str = "parameters";
const EXTENSION_PREFIX: &str = "x-";
const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
const JSON_MEDIA_TYPE: &str = "application/json";

/// Metadata from the document's `info` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub version: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaTypeObject {
  #[serde(default)]
  pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBody {
  #[serde(default)]
  pub content: IndexMap<String, MediaTypeObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
  #[serde(default, deserialize_with = "lenient")]
  pub description: Option<String>,
  #[serde(default)]
  pub content: IndexMap<String, MediaTypeObject>,
}

/// The raw shape of an operation; body and responses are decoded one by one later.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationObject {
  #[serde(default, deserialize_with = "lenient")]
  operation_id: Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  summary: Option<String>,
  #[serde(default)]
  request_body: Option<Value>,
  #[serde(default)]
  responses: Option<Value>,
}

/// One HTTP method on one path.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
  pub method: Method,
  pub path: String,
  pub operation_id: Option<String>,
  pub summary: Option<String>,
  pub request_body: Option<RequestBody>,
  pub responses: IndexMap<String, Response>,
}

impl Operation {
  /// The `"METHOD PATH"` key this operation is stored under.
  #[must_use]
  pub fn key(&self) -> String {
    operation_key(&self.method, &self.path)
  }

  /// Schema of the JSON request body, if the operation declares one.
  #[must_use]
  pub fn json_request_schema(&self) -> Option<&Schema> {
    self.request_body.as_ref().and_then(|body| json_schema(&body.content))
  }

  /// Schema of the JSON payload returned for `status`, if declared.
  #[must_use]
  pub fn json_response_schema(&self, status: &str) -> Option<&Schema> {
    self.responses.get(status).and_then(|response| json_schema(&response.content))
  }
}

#[must_use]
pub fn operation_key(method: &Method, path: &str) -> String {
  format!("{} {path}", method.as_str())
}

/// Operations declared under one path, keyed by their uppercased method.
pub type PathItem = IndexMap<String, Operation>;

/// The canonical model of an OpenAPI document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSpec {
  pub paths: IndexMap<String, PathItem>,
  pub schemas: IndexMap<String, Schema>,
  pub info: ApiInfo,
  pub warnings: Vec<MalformedSpecWarning>,
}

impl ParsedSpec {
  #[must_use]
  pub fn parse(document: &Value) -> Self {
    let mut warnings = Vec::new();

    let info = document
      .get("info")
      .and_then(|info| ApiInfo::deserialize(info).ok())
      .unwrap_or_default();
    let schemas = parse_component_schemas(document, &mut warnings);
    let paths = parse_paths(document, &mut warnings);

    Self {
      paths,
      schemas,
      info,
      warnings,
    }
  }

  pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
    let document: Value = serde_json::from_str(json)?;
    Ok(Self::parse(&document))
  }

  /// Every operation in the document keyed by `"METHOD PATH"`, in source order.
  #[must_use]
  pub fn operations(&self) -> IndexMap<String, &Operation> {
    self
      .paths
      .values()
      .flat_map(IndexMap::values)
      .map(|operation| (operation.key(), operation))
      .collect()
  }

  #[must_use]
  pub fn schema(&self, name: &str) -> Option<&Schema> {
    self.schemas.get(name)
  }

  /// Follows `$ref` chains into `components.schemas`.
  ///
  /// A resolved component without a `title` takes the component name as its title so
  /// that generated components are named after it.
  pub fn resolve(&self, schema: &Schema) -> Result<Schema, MalformedSpecWarning> {
    let mut current = schema;
    let mut component_name = None;
    let mut visited = HashSet::new();

    while let Some(reference) = current.reference.as_deref() {
      let unresolved = || MalformedSpecWarning::UnresolvedReference {
        reference: reference.to_string(),
      };
      let name = parse_schema_ref_path(reference).ok_or_else(unresolved)?;
      if !visited.insert(name.clone()) {
        return Err(unresolved());
      }
      current = self.schemas.get(&name).ok_or_else(unresolved)?;
      component_name = Some(name);
    }

    let mut resolved = current.clone();
    if resolved.title.is_none() {
      resolved.title = component_name;
    }
    Ok(resolved)
  }
}

/// Extracts the component name from an internal `#/components/schemas/<Name>` reference.
#[must_use]
pub fn parse_schema_ref_path(reference: &str) -> Option<String> {
  let name = reference.strip_prefix(SCHEMA_REF_PREFIX)?;
  if name.is_empty() || name.contains('/') {
    return None;
  }
  Some(name.replace("~1", "/").replace("~0", "~"))
}

/// Returns true for `application/json` and its parameterized forms.
#[must_use]
pub fn is_json_media_type(raw: &str) -> bool {
  MediaType::parse(raw)
    .is_ok_and(|media| media.ty == names::APPLICATION && media.subty == names::JSON && media.suffix.is_none())
}

fn json_schema(content: &IndexMap<String, MediaTypeObject>) -> Option<&Schema> {
  content
    .get(JSON_MEDIA_TYPE)
    .or_else(|| {
      content
        .iter()
        .find_map(|(media_type, object)| is_json_media_type(media_type).then_some(object))
    })
    .and_then(|object| object.schema.as_ref())
}

fn parse_component_schemas(document: &Value, warnings: &mut Vec<MalformedSpecWarning>) -> IndexMap<String, Schema> {
  let Some(entries) = document
    .get("components")
    .and_then(|components| components.get("schemas"))
    .and_then(Value::as_object)
  else {
    return IndexMap::new();
  };

  entries
    .iter()
    .filter_map(|(name, raw)| match Schema::deserialize(raw) {
      Ok(schema) => Some((name.clone(), schema)),
      Err(error) => {
        warnings.push(MalformedSpecWarning::InvalidSchema {
          name: name.clone(),
          error: error.to_string(),
        });
        None
      }
    })
    .collect()
}

fn parse_paths(document: &Value, warnings: &mut Vec<MalformedSpecWarning>) -> IndexMap<String, PathItem> {
  let entries = match document.get("paths") {
    None | Some(Value::Null) => {
      warnings.push(MalformedSpecWarning::MissingPaths);
      return IndexMap::new();
    }
    Some(Value::Object(entries)) => entries,
    Some(_) => {
      warnings.push(MalformedSpecWarning::InvalidPaths);
      return IndexMap::new();
    }
  };

  let mut paths = IndexMap::with_capacity(entries.len());
  for (path, raw_item) in entries {
    let Some(raw_item) = raw_item.as_object() else {
      warnings.push(MalformedSpecWarning::InvalidPathItem { path: path.clone() });
      continue;
    };

    let mut item = PathItem::new();
    for (method_key, raw_operation) in raw_item {
      if method_key == PARAMETERS_KEY || method_key.starts_with(EXTENSION_PREFIX) || !raw_operation.is_object() {
        continue;
      }

      match parse_operation(method_key, path, raw_operation, warnings) {
        Ok(operation) => {
          item.insert(operation.method.as_str().to_string(), operation);
        }
        Err(error) => warnings.push(MalformedSpecWarning::InvalidOperation {
          method: method_key.to_ascii_uppercase(),
          path: path.clone(),
          error,
        }),
      }
    }
    paths.insert(path.clone(), item);
  }
  paths
}

fn parse_operation(
  method_key: &str,
  path: &str,
  raw: &Value,
  warnings: &mut Vec<MalformedSpecWarning>,
) -> Result<Operation, String> {
  let method = Method::from_bytes(method_key.to_ascii_uppercase().as_bytes()).map_err(|e| e.to_string())?;
  let object = OperationObject::deserialize(raw).map_err(|e| e.to_string())?;
  let key = operation_key(&method, path);

  let request_body = match object.request_body {
    None | Some(Value::Null) => None,
    Some(raw_body) => match RequestBody::deserialize(raw_body) {
      Ok(body) => Some(body),
      Err(error) => {
        warnings.push(MalformedSpecWarning::InvalidRequestBody {
          operation: key.clone(),
          error: error.to_string(),
        });
        None
      }
    },
  };
  let responses = parse_responses(&key, object.responses, warnings);

  Ok(Operation {
    method,
    path: path.to_string(),
    operation_id: object.operation_id,
    summary: object.summary,
    request_body,
    responses,
  })
}

fn parse_responses(
  operation: &str,
  raw: Option<Value>,
  warnings: &mut Vec<MalformedSpecWarning>,
) -> IndexMap<String, Response> {
  let entries = match raw {
    None | Some(Value::Null) => return IndexMap::new(),
    Some(Value::Object(entries)) => entries,
    Some(_) => {
      warnings.push(MalformedSpecWarning::InvalidResponses {
        operation: operation.to_string(),
      });
      return IndexMap::new();
    }
  };

  let mut responses = IndexMap::with_capacity(entries.len());
  for (status, raw_response) in entries {
    match Response::deserialize(raw_response) {
      Ok(response) => {
        responses.insert(status, response);
      }
      Err(error) => warnings.push(MalformedSpecWarning::InvalidResponse {
        operation: operation.to_string(),
        status,
        error: error.to_string(),
      }),
    }
  }
  responses
}
