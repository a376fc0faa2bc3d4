use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-admin")]
#[command(author, version, about = "OpenAPI to admin UI component generator")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI specification or the generator itself
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate form and list components from an OpenAPI specification
  Generate(GenerateCommand),
  /// Check a JSON data file against a component schema
  Validate(ValidateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path or http(s) URL of the OpenAPI specification (JSON or YAML)
  #[arg(short, long, value_name = "FILE|URL")]
  pub input: String,

  /// Directory the generated components and manifest.json are written to
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Front-end platform to generate for (react, vue, angular)
  #[arg(short, long, value_name = "TARGET")]
  pub target: String,

  /// Prefix prepended to every request path in the generated code
  #[arg(long, value_name = "URL")]
  pub base_url: Option<String>,

  /// Replace the built-in emitter for one component kind with a text template
  /// (e.g., form=templates/form.tsx). Templates may use {{componentName}},
  /// {{path}} and {{method}}
  #[arg(long, value_name = "KIND=PATH")]
  pub template: Vec<String>,

  /// Only write the given artifacts (e.g., "POST /users Form"); may be repeated
  #[arg(long, value_name = "KEY")]
  pub only: Vec<String>,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct ValidateCommand {
  /// Path or http(s) URL of the OpenAPI specification (JSON or YAML)
  #[arg(short, long, value_name = "FILE|URL")]
  pub input: String,

  /// Name of the schema under components.schemas
  #[arg(short, long, value_name = "NAME")]
  pub schema: String,

  /// JSON file holding the object to validate
  #[arg(short, long, value_name = "FILE")]
  pub data: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations and the components each one produces
  Operations {
    /// Path or http(s) URL of the OpenAPI specification (JSON or YAML)
    #[arg(short, long, value_name = "FILE|URL")]
    input: String,
  },
  /// List the supported targets and the packages their components import
  Targets,
}
