use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use strum::IntoEnumIterator;

use crate::generator::{
  emitters::{ComponentConfig, ComponentKind, EmitterRegistry, GeneratedComponent, TargetEmitter},
  templates::{ComponentTemplate, TemplateKey},
};

/// Returned when no emitter or custom template exists for the requested target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported target '{target}'; expected one of: {}", .supported.join(", "))]
pub struct UnsupportedTargetError {
  pub target: String,
  pub supported: Vec<String>,
}

/// Options shared by every component a dispatcher generates.
#[derive(Clone, bon::Builder)]
pub struct GeneratorOptions {
  #[builder(into)]
  pub target: String,
  #[builder(into)]
  pub base_url: Option<String>,
  #[builder(default)]
  pub custom_templates: IndexMap<TemplateKey, Arc<dyn ComponentTemplate>>,
}

impl GeneratorOptions {
  /// Registers `template` for `(target, kind)`, replacing any previous one.
  #[must_use]
  pub fn with_template<T>(mut self, target: impl Into<String>, kind: ComponentKind, template: T) -> Self
  where
    T: ComponentTemplate + 'static,
  {
    self
      .custom_templates
      .insert(TemplateKey::new(target, kind), Arc::new(template));
    self
  }

  #[must_use]
  pub fn custom_template(&self, kind: ComponentKind) -> Option<&dyn ComponentTemplate> {
    self
      .custom_templates
      .get(&TemplateKey::new(self.target.as_str(), kind))
      .map(|template| &**template)
  }
}

impl fmt::Debug for GeneratorOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GeneratorOptions")
      .field("target", &self.target)
      .field("base_url", &self.base_url)
      .field("custom_templates", &self.custom_templates.keys().collect::<Vec<_>>())
      .finish()
  }
}

/// Routes each [`ComponentConfig`] to a custom template or the target's emitter.
///
/// Holds no per-request state; generating the same config twice yields the same
/// component.
#[derive(Debug)]
pub struct GenerationDispatcher {
  options: GeneratorOptions,
  registry: EmitterRegistry,
}

impl GenerationDispatcher {
  #[must_use]
  pub fn new(options: GeneratorOptions) -> Self {
    Self::with_registry(options, EmitterRegistry::builtin())
  }

  #[must_use]
  pub fn with_registry(options: GeneratorOptions, registry: EmitterRegistry) -> Self {
    Self { options, registry }
  }

  #[must_use]
  pub fn options(&self) -> &GeneratorOptions {
    &self.options
  }

  #[must_use]
  pub fn registry(&self) -> &EmitterRegistry {
    &self.registry
  }

  /// The emitter registered for the configured target, if any.
  #[must_use]
  pub fn emitter(&self) -> Option<&dyn TargetEmitter> {
    self.registry.get(&self.options.target)
  }

  /// Succeeds when every component kind can be produced for the configured target,
  /// either by a registered emitter or by custom templates covering all kinds.
  pub fn check_target(&self) -> Result<(), UnsupportedTargetError> {
    let covered_by_templates = ComponentKind::iter().all(|kind| self.options.custom_template(kind).is_some());
    if self.registry.contains(&self.options.target) || covered_by_templates {
      Ok(())
    } else {
      Err(self.unsupported())
    }
  }

  pub fn generate(&self, config: &ComponentConfig) -> Result<GeneratedComponent, UnsupportedTargetError> {
    let adjusted;
    let config = match self.options.base_url.as_deref() {
      Some(base_url) => {
        adjusted = config.with_base_url(base_url);
        &adjusted
      }
      None => config,
    };

    if let Some(template) = self.options.custom_template(config.kind) {
      return Ok(template.render(config));
    }

    self
      .emitter()
      .map(|emitter| emitter.emit(config))
      .ok_or_else(|| self.unsupported())
  }

  fn unsupported(&self) -> UnsupportedTargetError {
    UnsupportedTargetError {
      target: self.options.target.clone(),
      supported: self.registry.targets().map(String::from).collect(),
    }
  }
}
