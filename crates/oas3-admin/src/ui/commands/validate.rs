use std::path::Path;

use comfy_table::{Cell, Row};
use crossterm::style::Stylize;
use oas3_admin::{
  generator::{spec_parser::ParsedSpec, validation::{SchemaValidator, ValidationError}},
  utils::spec::{SpecLoader, SpecSource},
};
use serde_json::Value;

use super::new_table;
use crate::ui::{Colors, cli::ValidateCommand, colors::Role};

async fn read_data(path: &Path) -> anyhow::Result<Value> {
  let content = tokio::fs::read_to_string(path)
    .await
    .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
  Ok(serde_json::from_str(&content)?)
}

/// Validates `data` against the component schema `name`, following `$ref` aliases.
pub fn validate_named_schema(spec: &ParsedSpec, name: &str, data: &Value) -> anyhow::Result<Vec<ValidationError>> {
  let schema = spec.schema(name).ok_or_else(|| {
    anyhow::anyhow!(
      "Schema '{name}' not found; available: {}",
      spec.schemas.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
    )
  })?;
  let schema = spec.resolve(schema).map_err(|warning| anyhow::anyhow!("{warning}"))?;
  Ok(SchemaValidator::validate(&schema, data))
}

pub async fn validate_data(command: ValidateCommand, colors: &Colors) -> anyhow::Result<()> {
  let spec = SpecLoader::load(&SpecSource::parse(&command.input)).await?.parse()?;
  let data = read_data(&command.data).await?;
  let errors = validate_named_schema(&spec, &command.schema, &data)?;

  if errors.is_empty() {
    println!(
      "{}",
      format!("{} is a valid {}", command.data.display(), command.schema).with(colors.success())
    );
    return Ok(());
  }

  let mut table = new_table(&["FIELD", "MESSAGE"], colors);

  for error in &errors {
    let mut row = Row::new();
    row.add_cell(Cell::new(&error.path).fg(colors.comfy(Role::Value)));
    row.add_cell(Cell::new(&error.message).fg(colors.comfy(Role::Accent)));
    table.add_row(row);
  }
  println!("{table}");

  anyhow::bail!("{} violation(s) found in {}", errors.len(), command.data.display())
}
