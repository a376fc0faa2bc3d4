//! User-supplied component templates that replace a built-in emitter for one
//! `(target, kind)` pair.

use crate::generator::{
  emitters::{ComponentConfig, ComponentKind, GeneratedComponent},
  naming::component_name,
};

const COMPONENT_NAME_PLACEHOLDER: &str = "{{componentName}}";
const PATH_PLACEHOLDER: &str = "{{path}}";
const METHOD_PLACEHOLDER: &str = "{{method}}";

/// Renders a component in place of the target's built-in emitter.
pub trait ComponentTemplate: Send + Sync {
  fn render(&self, config: &ComponentConfig) -> GeneratedComponent;
}

impl<F> ComponentTemplate for F
where
  F: Fn(&ComponentConfig) -> GeneratedComponent + Send + Sync,
{
  fn render(&self, config: &ComponentConfig) -> GeneratedComponent {
    self(config)
  }
}

/// Lookup key of a custom template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey {
  pub target: String,
  pub kind: ComponentKind,
}

impl TemplateKey {
  #[must_use]
  pub fn new(target: impl Into<String>, kind: ComponentKind) -> Self {
    Self {
      target: target.into(),
      kind,
    }
  }
}

/// A plain-text template with `{{componentName}}`, `{{path}}` and `{{method}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTemplate {
  source: String,
  dependencies: Vec<String>,
}

impl TextTemplate {
  #[must_use]
  pub fn new<I, S>(source: impl Into<String>, dependencies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      source: source.into(),
      dependencies: dependencies.into_iter().map(Into::into).collect(),
    }
  }
}

impl ComponentTemplate for TextTemplate {
  fn render(&self, config: &ComponentConfig) -> GeneratedComponent {
    let code = self
      .source
      .replace(COMPONENT_NAME_PLACEHOLDER, &component_name(&config.schema, config.kind))
      .replace(PATH_PLACEHOLDER, &config.path)
      .replace(METHOD_PLACEHOLDER, config.request_method().as_str());
    GeneratedComponent::new(code, self.dependencies.iter().cloned())
  }
}
