use strum::Display;

use crate::generator::emitters::ComponentKind;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub operations_scanned: usize,
  pub forms_generated: usize,
  pub lists_generated: usize,
  pub warnings: Vec<MalformedSpecWarning>,
}

impl GenerationStats {
  pub fn record_operation(&mut self) {
    self.operations_scanned += 1;
  }

  pub fn record_artifact(&mut self, kind: ComponentKind) {
    match kind {
      ComponentKind::Form => self.forms_generated += 1,
      ComponentKind::List => self.lists_generated += 1,
    }
  }

  #[must_use]
  pub const fn artifacts_generated(&self) -> usize {
    self.forms_generated + self.lists_generated
  }

  pub fn record_warning(&mut self, warning: MalformedSpecWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = MalformedSpecWarning>) {
    self.warnings.extend(warnings);
  }
}

/// Non-fatal problems found while reading a document.
///
/// None of these stop generation; the affected piece is dropped or degraded to an
/// empty collection and the rest of the document is still processed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MalformedSpecWarning {
  #[strum(to_string = "Document has no 'paths' object")]
  MissingPaths,
  #[strum(to_string = "'paths' is not an object")]
  InvalidPaths,
  #[strum(to_string = "Path item '{path}' is not an object")]
  InvalidPathItem { path: String },
  #[strum(to_string = "Failed to read operation '{method} {path}': {error}")]
  InvalidOperation {
    method: String,
    path: String,
    error: String,
  },
  #[strum(to_string = "[{operation}] Failed to read request body: {error}")]
  InvalidRequestBody { operation: String, error: String },
  #[strum(to_string = "[{operation}] 'responses' is not an object")]
  InvalidResponses { operation: String },
  #[strum(to_string = "[{operation}] Failed to read response '{status}': {error}")]
  InvalidResponse {
    operation: String,
    status: String,
    error: String,
  },
  #[strum(to_string = "Failed to read schema '{name}': {error}")]
  InvalidSchema { name: String, error: String },
  #[strum(to_string = "Unresolved reference '{reference}'")]
  UnresolvedReference { reference: String },
  #[strum(to_string = "[{operation}] array response has no 'items' schema")]
  MissingItemsSchema { operation: String },
  #[strum(to_string = "[{operation}] {kind} schema has no object properties")]
  EmptyFieldList { operation: String, kind: ComponentKind },
}

impl MalformedSpecWarning {
  /// Returns true when the warning means part of the document was dropped entirely.
  #[must_use]
  pub fn is_skipped_item(&self) -> bool {
    matches!(
      self,
      Self::InvalidPathItem { .. }
        | Self::InvalidOperation { .. }
        | Self::InvalidRequestBody { .. }
        | Self::InvalidResponses { .. }
        | Self::InvalidResponse { .. }
        | Self::InvalidSchema { .. }
    )
  }
}
