use std::{
  ffi::OsStr,
  fmt,
  path::{Path, PathBuf},
};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde_json::{Map, Number, Value};

use crate::generator::spec_parser::ParsedSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext.to_ascii_lowercase().as_str() {
      "json" => Some(Self::Json),
      "yaml" | "yml" => Some(Self::Yaml),
      _ => None,
    }
  }

  /// Guesses the format from the first meaningful byte: JSON documents open with `{`.
  #[must_use]
  pub fn sniff(content: &[u8]) -> Self {
    match content.iter().find(|byte| !byte.is_ascii_whitespace()) {
      Some(b'{' | b'[') => Self::Json,
      _ => Self::Yaml,
    }
  }
}

/// Where a document is read from: a local path or an `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
  File(PathBuf),
  Url(String),
}

impl SpecSource {
  #[must_use]
  pub fn parse(input: &str) -> Self {
    if input.starts_with("http://") || input.starts_with("https://") {
      Self::Url(input.to_string())
    } else {
      Self::File(PathBuf::from(input))
    }
  }

  fn declared_format(&self) -> Option<SpecFormat> {
    match self {
      Self::File(path) => path
        .extension()
        .and_then(OsStr::to_str)
        .and_then(SpecFormat::from_extension),
      Self::Url(url) => {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        Path::new(path)
          .extension()
          .and_then(OsStr::to_str)
          .and_then(SpecFormat::from_extension)
      }
    }
  }
}

impl fmt::Display for SpecSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::File(path) => write!(f, "{}", path.display()),
      Self::Url(url) => f.write_str(url),
    }
  }
}

enum SpecContent {
  Mapped(AsyncMmapFile),
  Fetched(Vec<u8>),
}

impl SpecContent {
  fn as_slice(&self) -> &[u8] {
    match self {
      Self::Mapped(file) => file.as_slice(),
      Self::Fetched(bytes) => bytes,
    }
  }
}

/// Reads an OpenAPI document from disk or over HTTP.
pub struct SpecLoader {
  content: SpecContent,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open {}", path.display()))?;
    let content = SpecContent::Mapped(file);
    let format = SpecSource::File(path.to_path_buf())
      .declared_format()
      .unwrap_or_else(|| SpecFormat::sniff(content.as_slice()));

    Ok(Self { content, format })
  }

  pub async fn load(source: &SpecSource) -> anyhow::Result<Self> {
    match source {
      SpecSource::File(path) => Self::open(path).await,
      SpecSource::Url(url) => {
        let content = SpecContent::Fetched(fetch(url).await?);
        let format = source
          .declared_format()
          .unwrap_or_else(|| SpecFormat::sniff(content.as_slice()));
        Ok(Self { content, format })
      }
    }
  }

  #[must_use]
  pub fn format(&self) -> SpecFormat {
    self.format
  }

  /// Decodes the raw document into an order-preserving JSON value.
  pub fn document(&self) -> anyhow::Result<Value> {
    match self.format {
      SpecFormat::Json => Ok(serde_json::from_slice(self.content.as_slice())?),
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(self.content.as_slice())?;
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
        Ok(yaml_to_json(yaml))
      }
    }
  }

  pub fn parse(&self) -> anyhow::Result<ParsedSpec> {
    Ok(ParsedSpec::parse(&self.document()?))
  }
}

#[cfg(feature = "remote")]
async fn fetch(url: &str) -> anyhow::Result<Vec<u8>> {
  let response = reqwest::get(url)
    .await
    .with_context(|| format!("failed to fetch {url}"))?
    .error_for_status()?;
  Ok(response.bytes().await?.to_vec())
}

#[cfg(not(feature = "remote"))]
async fn fetch(url: &str) -> anyhow::Result<Vec<u8>> {
  anyhow::bail!("cannot fetch {url}: built without the `remote` feature")
}

/// Converts YAML into JSON, keeping mapping order.
///
/// Scalar keys become strings (`200:` turns into `"200"`). Mapping entries with
/// non-scalar keys have no JSON form and are dropped, as are YAML tags.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
  match value {
    serde_yaml::Value::Null => Value::Null,
    serde_yaml::Value::Bool(value) => Value::Bool(value),
    serde_yaml::Value::Number(number) => yaml_number(&number),
    serde_yaml::Value::String(value) => Value::String(value),
    serde_yaml::Value::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
    serde_yaml::Value::Mapping(mapping) => Value::Object(
      mapping
        .into_iter()
        .filter_map(|(key, value)| Some((yaml_key(key)?, yaml_to_json(value))))
        .collect::<Map<_, _>>(),
    ),
    serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
  }
}

fn yaml_number(number: &serde_yaml::Number) -> Value {
  if let Some(value) = number.as_u64() {
    Value::from(value)
  } else if let Some(value) = number.as_i64() {
    Value::from(value)
  } else {
    number
      .as_f64()
      .and_then(Number::from_f64)
      .map_or(Value::Null, Value::Number)
  }
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
  match key {
    serde_yaml::Value::String(key) => Some(key),
    serde_yaml::Value::Number(number) => Some(number.to_string()),
    serde_yaml::Value::Bool(value) => Some(value.to_string()),
    serde_yaml::Value::Null => Some("null".to_string()),
    serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
    serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use serde_json::json;

  use super::*;

  fn temp_spec(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
  }

  #[test]
  fn test_source_parse() {
    assert_eq!(
      SpecSource::parse("https://example.com/openapi.yaml"),
      SpecSource::Url("https://example.com/openapi.yaml".to_string())
    );
    assert_eq!(
      SpecSource::parse("specs/openapi.json"),
      SpecSource::File(PathBuf::from("specs/openapi.json"))
    );
  }

  #[test]
  fn test_declared_format() {
    let cases = [
      ("api.json", Some(SpecFormat::Json)),
      ("api.YML", Some(SpecFormat::Yaml)),
      ("https://example.com/api.yaml?token=1", Some(SpecFormat::Yaml)),
      ("https://example.com/spec", None),
      ("api.txt", None),
    ];
    for (input, expected) in cases {
      assert_eq!(SpecSource::parse(input).declared_format(), expected, "input {input}");
    }
  }

  #[test]
  fn test_sniff() {
    assert_eq!(SpecFormat::sniff(b"  \n{\"openapi\": \"3.0.0\"}"), SpecFormat::Json);
    assert_eq!(SpecFormat::sniff(b"openapi: 3.0.0\n"), SpecFormat::Yaml);
  }

  #[test]
  fn test_yaml_to_json_keeps_order_and_stringifies_keys() {
    let yaml: serde_yaml::Value =
      serde_yaml::from_str("zeta: 1\nalpha:\n  200: ok\n  true: yes\nratio: 0.5\n").unwrap();
    let json = yaml_to_json(yaml);

    assert_eq!(json, json!({ "zeta": 1, "alpha": { "200": "ok", "true": "yes" }, "ratio": 0.5 }));
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "ratio"]);
  }

  #[tokio::test]
  async fn test_open_json_file() {
    let file = temp_spec(".json", include_str!("../../fixtures/users_api.json"));
    let loader = SpecLoader::open(file.path()).await.unwrap();

    assert_eq!(loader.format(), SpecFormat::Json);
    let spec = loader.parse().unwrap();
    assert_eq!(spec.info.title, "Users API");
    assert!(spec.operations().contains_key("POST /users"));
  }

  #[tokio::test]
  async fn test_open_yaml_file() {
    let file = temp_spec(".yaml", include_str!("../../fixtures/pets_api.yaml"));
    let loader = SpecLoader::load(&SpecSource::File(file.path().to_path_buf()))
      .await
      .unwrap();

    assert_eq!(loader.format(), SpecFormat::Yaml);
    let spec = loader.parse().unwrap();
    assert_eq!(spec.info.title, "Pet Store");
    let operation = spec.operations()["POST /pets"];
    assert!(operation.json_response_schema("200").is_some());
  }

  #[tokio::test]
  async fn test_open_missing_file() {
    let error = SpecLoader::open(Path::new("/definitely/not/here.json")).await.err().unwrap();
    assert!(error.to_string().contains("failed to open"));
  }

  #[tokio::test]
  async fn test_invalid_json_reports_error() {
    let file = temp_spec(".json", "{ not json");
    let loader = SpecLoader::open(file.path()).await.unwrap();
    assert!(loader.parse().is_err());
  }
}
