use comfy_table::{Attribute, Cell, CellAlignment, Row};
use itertools::Itertools;
use oas3_admin::{
  generator::{emitters::EmitterRegistry, naming::ArtifactKey, orchestrator::AdminGenerator},
  utils::spec::{SpecLoader, SpecSource},
};

use super::new_table;
use crate::ui::{Colors, colors::Role};

const NO_ARTIFACTS: &str = "-";

pub async fn list_operations(input: &str, colors: &Colors) -> anyhow::Result<()> {
  let spec = SpecLoader::load(&SpecSource::parse(input)).await?.parse()?;
  let mut table = new_table(&["METHOD", "PATH", "OPERATION ID", "ARTIFACTS"], colors);

  for operation in spec.operations().into_values() {
    let mut warnings = Vec::new();
    let artifacts = AdminGenerator::component_configs(&spec, operation, &mut warnings)
      .into_iter()
      .map(|config| ArtifactKey::new(operation.method.clone(), operation.path.as_str(), config.kind).file_stem())
      .join(", ");

    let mut row = Row::new();
    row.add_cell(
      Cell::new(operation.method.as_str())
        .fg(colors.comfy(Role::Accent))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(
      Cell::new(&operation.path)
        .fg(colors.comfy(Role::Value))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(operation.operation_id.as_deref().unwrap_or_default()).fg(colors.comfy(Role::Primary)));
    let artifacts = if artifacts.is_empty() { NO_ARTIFACTS } else { artifacts.as_str() };
    row.add_cell(Cell::new(artifacts).fg(colors.comfy(Role::Success)));
    table.add_row(row);
  }

  println!("{table}");

  for warning in &spec.warnings {
    eprintln!("{warning}");
  }

  Ok(())
}

pub fn list_targets(colors: &Colors) {
  let registry = EmitterRegistry::builtin();
  let mut table = new_table(&["TARGET", "EXTENSION", "DEPENDENCIES"], colors);

  for emitter in registry.iter() {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(emitter.target())
        .fg(colors.comfy(Role::Value))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(format!(".{}", emitter.file_extension())).fg(colors.comfy(Role::Accent)));
    row.add_cell(Cell::new(emitter.dependencies().iter().join(", ")).fg(colors.comfy(Role::Primary)));
    table.add_row(row);
  }

  println!("{table}");
}
