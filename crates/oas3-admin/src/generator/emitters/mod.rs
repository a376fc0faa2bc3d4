//! Target-specific component emitters.
//!
//! Every target implements [`TargetEmitter`]. Field layout comes from
//! [`FieldExtractor`] once per request and is handed to the target as an
//! [`EmitContext`], so a target only decides how fields become text.

mod angular;
mod react;
mod source;
mod vue;


use http::Method;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

pub use angular::AngularEmitter;
pub use react::ReactEmitter;
pub(crate) use source::SourceBuilder;
pub use vue::VueEmitter;

use crate::generator::{
  fields::{FieldDescriptor, FieldExtractor},
  naming::component_name,
  schema::Schema,
};

pub(crate) const GENERATED_NOTICE: &str = "Generated by oas3-admin. Do not edit.";

/// The two component shapes the generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter, Serialize)]
#[strum(ascii_case_insensitive)]
pub enum ComponentKind {
  Form,
  List,
}

/// Request to generate one component.
///
/// For [`ComponentKind::List`] the schema is the per-item object schema, never the
/// array wrapping it.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct ComponentConfig {
  pub kind: ComponentKind,
  #[builder(default)]
  pub schema: Schema,
  #[builder(into)]
  pub path: String,
  pub method: Option<Method>,
}

impl ComponentConfig {
  /// The HTTP method the component issues: lists always `GET`, forms their
  /// operation's method or `POST` when none was given.
  #[must_use]
  pub fn request_method(&self) -> Method {
    match self.kind {
      ComponentKind::List => Method::GET,
      ComponentKind::Form => self.method.clone().unwrap_or(Method::POST),
    }
  }

  /// Returns a copy whose request path is prefixed with `base_url`.
  #[must_use]
  pub fn with_base_url(&self, base_url: &str) -> Self {
    let base = base_url.trim_end_matches('/');
    let path = self.path.trim_start_matches('/');
    Self {
      path: format!("{base}/{path}"),
      ..self.clone()
    }
  }
}

/// A generated component: source text plus the packages it imports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedComponent {
  pub code: String,
  pub dependencies: IndexSet<String>,
}

impl GeneratedComponent {
  #[must_use]
  pub fn new<I, S>(code: String, dependencies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      code,
      dependencies: dependencies.into_iter().map(Into::into).collect(),
    }
  }
}

/// Everything a target needs to render one component.
#[derive(Debug)]
pub struct EmitContext<'a> {
  pub config: &'a ComponentConfig,
  pub component_name: String,
  pub fields: Vec<FieldDescriptor>,
}

impl<'a> EmitContext<'a> {
  #[must_use]
  pub fn new(config: &'a ComponentConfig) -> Self {
    Self {
      config,
      component_name: component_name(&config.schema, config.kind),
      fields: FieldExtractor::extract(&config.schema),
    }
  }
}

/// A front-end platform that components can be generated for.
pub trait TargetEmitter: Send + Sync {
  /// Identifier the target is selected by, e.g. `react`.
  fn target(&self) -> &'static str;

  /// Extension of the generated source files, without the leading dot.
  fn file_extension(&self) -> &'static str;

  /// Packages the generated code imports, in install order.
  fn dependencies(&self) -> &'static [&'static str];

  fn emit_form(&self, context: &EmitContext<'_>) -> String;

  fn emit_list(&self, context: &EmitContext<'_>) -> String;

  fn emit(&self, config: &ComponentConfig) -> GeneratedComponent {
    let context = EmitContext::new(config);
    let code = match config.kind {
      ComponentKind::Form => self.emit_form(&context),
      ComponentKind::List => self.emit_list(&context),
    };
    GeneratedComponent::new(code, self.dependencies().iter().copied())
  }
}

/// Built-in target identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinTarget {
  React,
  Vue,
  Angular,
}

/// Maps target identifiers to their emitters.
pub struct EmitterRegistry {
  emitters: IndexMap<&'static str, Box<dyn TargetEmitter>>,
}

impl EmitterRegistry {
  /// A registry with no targets.
  #[must_use]
  pub fn empty() -> Self {
    Self {
      emitters: IndexMap::new(),
    }
  }

  /// A registry with the React, Vue and Angular emitters.
  #[must_use]
  pub fn builtin() -> Self {
    let mut registry = Self::empty();
    registry.register(ReactEmitter);
    registry.register(VueEmitter);
    registry.register(AngularEmitter);
    registry
  }

  /// Adds `emitter`, replacing any emitter already registered for its target.
  pub fn register<E>(&mut self, emitter: E) -> &mut Self
  where
    E: TargetEmitter + 'static,
  {
    self.emitters.insert(emitter.target(), Box::new(emitter));
    self
  }

  #[must_use]
  pub fn get(&self, target: &str) -> Option<&dyn TargetEmitter> {
    self.emitters.get(target).map(|emitter| &**emitter)
  }

  #[must_use]
  pub fn contains(&self, target: &str) -> bool {
    self.emitters.contains_key(target)
  }

  pub fn targets(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.emitters.keys().copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = &dyn TargetEmitter> {
    self.emitters.values().map(|emitter| &**emitter)
  }
}

impl Default for EmitterRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}

impl std::fmt::Debug for EmitterRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries(self.emitters.keys()).finish()
  }
}
