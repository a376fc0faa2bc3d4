use std::{
  collections::HashSet,
  path::{Path, PathBuf},
};

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use indexmap::{IndexMap, IndexSet};
use oas3_admin::{
  generator::{
    dispatcher::GeneratorOptions,
    emitters::{ComponentKind, EmitterRegistry, GeneratedComponent},
    metrics::GenerationStats,
    naming::ArtifactKey,
    orchestrator::{AdminGenerator, GenerationOutput},
    spec_parser::ParsedSpec,
    templates::TextTemplate,
  },
  utils::spec::{SpecLoader, SpecSource},
};
use serde::Serialize;

use crate::ui::{Colors, cli::GenerateCommand};

const MANIFEST_FILE: &str = "manifest.json";
const TEMPLATE_EXTENSION: &str = "txt";

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: SpecSource,
  pub output: PathBuf,
  pub target: String,
  pub base_url: Option<String>,
  pub templates: IndexMap<ComponentKind, PathBuf>,
  pub only: Option<IndexSet<ArtifactKey>>,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      target,
      base_url,
      template,
      only,
      verbose,
      quiet,
    } = command;

    let only = if only.is_empty() {
      None
    } else {
      Some(
        only
          .iter()
          .map(|key| key.parse::<ArtifactKey>())
          .collect::<Result<IndexSet<_>, _>>()?,
      )
    };

    Ok(Self {
      input: SpecSource::parse(&input),
      output,
      target: target.to_ascii_lowercase(),
      base_url,
      templates: parse_templates(template)?,
      only,
      verbose,
      quiet,
    })
  }

  async fn load_spec(&self) -> anyhow::Result<ParsedSpec> {
    SpecLoader::load(&self.input).await?.parse()
  }

  async fn create_generator(&self, registry: &EmitterRegistry) -> anyhow::Result<AdminGenerator> {
    let mut options = GeneratorOptions::builder()
      .target(self.target.as_str())
      .maybe_base_url(self.base_url.as_deref())
      .build();

    let dependencies = registry
      .get(&self.target)
      .map(|emitter| emitter.dependencies().to_vec())
      .unwrap_or_default();
    for (kind, path) in &self.templates {
      let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {kind} template {}: {e}", path.display()))?;
      options = options.with_template(
        self.target.as_str(),
        *kind,
        TextTemplate::new(source, dependencies.iter().copied()),
      );
    }

    Ok(AdminGenerator::from_options(options))
  }

  /// Drops artifacts not selected with `--only`, returning the keys that matched nothing.
  fn apply_filter(&self, output: &mut GenerationOutput) -> Vec<String> {
    let Some(only) = &self.only else {
      return vec![];
    };

    let selected: IndexSet<String> = only.iter().map(ToString::to_string).collect();
    output.artifacts.retain(|key, _| selected.contains(key));
    selected
      .into_iter()
      .filter(|key| !output.artifacts.contains_key(key))
      .collect()
  }

  async fn write_output(
    &self,
    artifacts: &IndexMap<String, GeneratedComponent>,
    extension: &str,
  ) -> anyhow::Result<Manifest> {
    tokio::fs::create_dir_all(&self.output).await?;

    let mut manifest = Manifest {
      target: self.target.clone(),
      source: self.input.to_string(),
      artifacts: IndexMap::with_capacity(artifacts.len()),
    };

    let mut used = HashSet::with_capacity(artifacts.len());
    for (key, component) in artifacts {
      let file = unique_file_name(&artifact_stem(key)?, extension, &mut used);
      tokio::fs::write(self.output.join(&file), &component.code).await?;
      manifest.artifacts.insert(
        key.clone(),
        ManifestEntry {
          file,
          dependencies: component.dependencies.iter().cloned().collect(),
        },
      );
    }

    let json = serde_json::to_string_pretty(&manifest)?;
    tokio::fs::write(self.output.join(MANIFEST_FILE), json).await?;
    Ok(manifest)
  }
}

/// Parses `KIND=PATH` entries; a later entry for the same kind wins.
fn parse_templates(entries: Vec<String>) -> anyhow::Result<IndexMap<ComponentKind, PathBuf>> {
  let mut templates = IndexMap::new();
  for entry in entries {
    let (kind, path) = entry.split_once('=').ok_or_else(|| {
      anyhow::anyhow!("Invalid template format '{entry}': expected KIND=PATH (e.g., form=templates/form.tsx)")
    })?;
    let kind = kind
      .trim()
      .parse::<ComponentKind>()
      .map_err(|_| anyhow::anyhow!("Invalid template kind '{kind}': expected form or list"))?;
    if path.is_empty() {
      anyhow::bail!("Invalid template format '{entry}': missing PATH");
    }
    templates.insert(kind, PathBuf::from(path));
  }
  Ok(templates)
}

fn artifact_stem(key: &str) -> anyhow::Result<String> {
  Ok(key.parse::<ArtifactKey>()?.file_stem())
}

/// Appends `_2`, `_3`, ... when another artifact already claimed the same stem
/// (`/user-list` and `/user_list` both map to `user_list`).
fn unique_file_name(stem: &str, extension: &str, used: &mut HashSet<String>) -> String {
  let mut file = format!("{stem}.{extension}");
  let mut suffix = 2;
  while !used.insert(file.clone()) {
    file = format!("{stem}_{suffix}.{extension}");
    suffix += 1;
  }
  file
}

#[derive(Debug, Serialize)]
struct Manifest {
  target: String,
  source: String,
  artifacts: IndexMap<String, ManifestEntry>,
}

#[derive(Debug, Serialize)]
struct ManifestEntry {
  file: String,
  dependencies: Vec<String>,
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn detail(&self, message: &str) {
    if self.config.verbose && !self.config.quiet {
      println!("            {}", message.with(self.colors.muted()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI spec from: {}", self.config.input)
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self, spec: &ParsedSpec) {
    let title = if spec.info.title.is_empty() {
      "untitled API".to_string()
    } else {
      format!("{} {}", spec.info.title, spec.info.version).trim_end().to_string()
    };
    self.info(
      &format!("Generating {} components for {title}...", self.config.target)
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Operations scanned:", stats.operations_scanned.to_string());
    self.stat("Components generated:", stats.artifacts_generated().to_string());
    self.stat("", format!("{} forms", stats.forms_generated));
    self.stat("", format!("{} lists", stats.lists_generated));
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }
    self.print_warnings(stats);
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    let mut printed_header = false;
    for warning in &stats.warnings {
      if !warning.is_skipped_item() && !self.config.verbose {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_unmatched(&self, unmatched: &[String]) {
    for key in unmatched {
      eprintln!(
        "{} {}",
        "Not generated:".with(self.colors.accent()),
        key.as_str().with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_manifest(&self, manifest: &Manifest) {
    for (key, entry) in &manifest.artifacts {
      self.detail(&format!("{key} -> {}", entry.file));
    }
  }

  fn log_success(&self, count: usize, output: &Path) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        format!("Successfully wrote {count} components to {}", output.display()).with(self.colors.success())
      );
    }
  }
}

pub async fn generate_components(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);
  let registry = EmitterRegistry::builtin();

  logger.log_loading();
  let spec = config.load_spec().await?;

  logger.log_generating(&spec);
  let generator = config.create_generator(&registry).await?;
  let mut output = generator.generate(&spec)?;
  let unmatched = config.apply_filter(&mut output);
  logger.print_statistics(&output.stats);
  logger.log_unmatched(&unmatched);

  logger.log_writing();
  let extension = registry
    .get(&config.target)
    .map_or(TEMPLATE_EXTENSION, |emitter| emitter.file_extension());
  let manifest = config.write_output(&output.artifacts, extension).await?;
  logger.log_manifest(&manifest);

  logger.log_success(manifest.artifacts.len(), &config.output);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn command(template: Vec<&str>, only: Vec<&str>) -> GenerateCommand {
    GenerateCommand {
      input: "api.json".to_string(),
      output: PathBuf::from("out"),
      target: "React".to_string(),
      base_url: None,
      template: template.into_iter().map(String::from).collect(),
      only: only.into_iter().map(String::from).collect(),
      verbose: false,
      quiet: true,
    }
  }

  #[test]
  fn test_parse_templates_empty() {
    assert!(parse_templates(vec![]).unwrap().is_empty());
  }

  #[test]
  fn test_parse_templates_entries() {
    let templates = parse_templates(vec![
      "form=templates/form.tsx".to_string(),
      "LIST=templates/list.tsx".to_string(),
      "form=templates/other=form.tsx".to_string(),
    ])
    .unwrap();

    assert_eq!(templates.len(), 2);
    assert_eq!(templates[&ComponentKind::Form], PathBuf::from("templates/other=form.tsx"));
    assert_eq!(templates[&ComponentKind::List], PathBuf::from("templates/list.tsx"));
  }

  #[test]
  fn test_parse_templates_invalid() {
    let cases = [
      ("form", "Invalid template format"),
      ("table=x.tsx", "Invalid template kind"),
      ("list=", "missing PATH"),
    ];

    for (entry, expected) in cases {
      let error = parse_templates(vec![entry.to_string()]).unwrap_err();
      assert!(error.to_string().contains(expected), "entry {entry}: {error}");
    }
  }

  #[test]
  fn test_from_command() {
    let config = GenerateConfig::from_command(command(vec!["list=list.tsx"], vec!["get /users list"])).unwrap();

    assert_eq!(config.target, "react");
    assert_eq!(config.input, SpecSource::File(PathBuf::from("api.json")));
    assert!(config.templates.contains_key(&ComponentKind::List));
    let only: Vec<String> = config.only.unwrap().iter().map(ToString::to_string).collect();
    assert_eq!(only, vec!["GET /users List"]);
  }

  #[test]
  fn test_from_command_rejects_bad_only_key() {
    let error = GenerateConfig::from_command(command(vec![], vec!["users"])).unwrap_err();
    assert!(error.to_string().contains("invalid artifact key 'users'"));
  }

  #[test]
  fn test_artifact_stem() {
    assert_eq!(artifact_stem("POST /users Form").unwrap(), "post_users_form");
    assert_eq!(artifact_stem("GET /pets/{petId} List").unwrap(), "get_pets_by_id_list");
    assert!(artifact_stem("users").is_err());
  }

  #[test]
  fn test_unique_file_name() {
    let mut used = HashSet::new();
    assert_eq!(unique_file_name("get_user_list_list", "vue", &mut used), "get_user_list_list.vue");
    assert_eq!(unique_file_name("get_user_list_list", "vue", &mut used), "get_user_list_list_2.vue");
    assert_eq!(unique_file_name("get_user_list_list", "vue", &mut used), "get_user_list_list_3.vue");
    assert_eq!(unique_file_name("post_users_form", "vue", &mut used), "post_users_form.vue");
  }

  #[tokio::test]
  async fn test_colliding_stems_get_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = GenerateConfig::from_command(command(vec![], vec![])).unwrap();
    config.output = dir.path().to_path_buf();

    let artifacts: IndexMap<String, GeneratedComponent> = [
      ("GET /user-list List", "first"),
      ("GET /user_list List", "second"),
    ]
    .into_iter()
    .map(|(key, code)| (key.to_string(), GeneratedComponent::new(code.to_string(), ["react"])))
    .collect();

    let manifest = config.write_output(&artifacts, "tsx").await.unwrap();
    let files: Vec<&str> = manifest.artifacts.values().map(|entry| entry.file.as_str()).collect();
    assert_eq!(files, vec!["get_user_list_list.tsx", "get_user_list_list_2.tsx"]);
    assert_eq!(
      std::fs::read_to_string(dir.path().join("get_user_list_list.tsx")).unwrap(),
      "first"
    );
    assert_eq!(
      std::fs::read_to_string(dir.path().join("get_user_list_list_2.tsx")).unwrap(),
      "second"
    );
  }

  #[tokio::test]
  async fn test_generate_writes_files_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = GenerateConfig::from_command(command(vec![], vec![])).unwrap();
    config.input = SpecSource::File(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/users_api.json")));
    config.output = dir.path().join("components");

    generate_components(config, &Colors::new(false, crate::ui::colors::Theme::Dark))
      .await
      .unwrap();

    let components = dir.path().join("components");
    let list = std::fs::read_to_string(components.join("get_users_list.tsx")).unwrap();
    assert!(list.contains("export function UserList()"));
    assert!(components.join("post_users_form.tsx").exists());

    let manifest: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(components.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest["target"], "react");
    assert_eq!(manifest["artifacts"]["POST /users Form"]["file"], "post_users_form.tsx");
    assert_eq!(
      manifest["artifacts"]["GET /users List"]["dependencies"],
      serde_json::json!(["react", "react-hook-form", "@tanstack/react-query"])
    );
  }

  #[tokio::test]
  async fn test_generate_with_only_and_template() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("form.vue");
    std::fs::write(&template, "<!-- {{componentName}} {{method}} {{path}} -->").unwrap();

    let mut config = GenerateConfig::from_command(command(vec![], vec!["POST /users Form"])).unwrap();
    config.target = "vue".to_string();
    config.input = SpecSource::File(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/users_api.json")));
    config.output = dir.path().join("out");
    config.templates.insert(ComponentKind::Form, template);

    generate_components(config, &Colors::new(false, crate::ui::colors::Theme::Dark))
      .await
      .unwrap();

    let out = dir.path().join("out");
    assert_eq!(
      std::fs::read_to_string(out.join("post_users_form.vue")).unwrap(),
      "<!-- NewUserForm POST /users -->"
    );
    assert!(!out.join("get_users_list.vue").exists());
  }
}
