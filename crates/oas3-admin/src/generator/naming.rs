use std::{fmt, str::FromStr, sync::LazyLock};

use any_ascii::any_ascii;
use http::Method;
use inflections::Inflect;
use regex::Regex;

use crate::generator::{emitters::ComponentKind, schema::Schema};

pub(crate) const FALLBACK_COMPONENT_NAME: &str = "Component";

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Turns free-form text into a PascalCase identifier.
///
/// Returns an empty string when nothing usable remains.
pub(crate) fn to_pascal_identifier(input: &str) -> String {
  let ascii = any_ascii(input);
  let spaced = INVALID_CHARS_RE.replace_all(&ascii, " ");
  let words = spaced
    .split_whitespace()
    .map(|word| {
      let mut chars = word.chars();
      chars
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
        .unwrap_or_default()
    })
    .collect::<String>();

  match words.chars().next() {
    Some(first) if first.is_ascii_digit() => format!("{FALLBACK_COMPONENT_NAME}{words}"),
    _ => words,
  }
}

/// Name of the generated component: the schema title (or `Component`) plus `Form`/`List`.
#[must_use]
pub fn component_name(schema: &Schema, kind: ComponentKind) -> String {
  let base = schema
    .title
    .as_deref()
    .map(to_pascal_identifier)
    .filter(|name| !name.is_empty())
    .unwrap_or_else(|| FALLBACK_COMPONENT_NAME.to_string());
  format!("{base}{kind}")
}

/// Kebab-case selector for frameworks that register components by tag name.
#[must_use]
pub fn component_selector(component_name: &str) -> String {
  format!("app-{}", component_name.to_kebab_case())
}

/// Key of one generated artifact: `"<METHOD> <PATH> <Kind>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
  pub method: Method,
  pub path: String,
  pub kind: ComponentKind,
}

impl ArtifactKey {
  #[must_use]
  pub fn new(method: Method, path: impl Into<String>, kind: ComponentKind) -> Self {
    Self {
      method,
      path: path.into(),
      kind,
    }
  }

  /// A filesystem-friendly stem, e.g. `post_users_by_id_form` for `POST /users/{id} Form`.
  #[must_use]
  pub fn file_stem(&self) -> String {
    let segments = self
      .path
      .split('/')
      .filter(|segment| !segment.is_empty())
      .map(|segment| {
        if segment.starts_with('{') && segment.ends_with('}') {
          "by_id".to_string()
        } else {
          any_ascii(segment).to_snake_case()
        }
      })
      .filter(|segment| !segment.is_empty())
      .collect::<Vec<_>>();

    let method = self.method.as_str().to_lowercase();
    let kind = self.kind.as_ref().to_lowercase();
    if segments.is_empty() {
      format!("{method}_{kind}")
    } else {
      format!("{method}_{}_{kind}", segments.join("_"))
    }
  }
}

impl fmt::Display for ArtifactKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} {}", self.method.as_str(), self.path, self.kind)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid artifact key '{0}': expected \"<METHOD> <PATH> <Form|List>\"")]
pub struct InvalidArtifactKey(pub String);

impl FromStr for ArtifactKey {
  type Err = InvalidArtifactKey;

  fn from_str(input: &str) -> Result<Self, Self::Err> {
    let invalid = || InvalidArtifactKey(input.to_string());

    let (method, rest) = input.trim().split_once(' ').ok_or_else(invalid)?;
    let (path, kind) = rest.rsplit_once(' ').ok_or_else(invalid)?;
    if path.is_empty() {
      return Err(invalid());
    }

    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| invalid())?;
    let kind = kind.parse::<ComponentKind>().map_err(|_| invalid())?;
    Ok(Self::new(method, path, kind))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn titled(title: Option<&str>) -> Schema {
    Schema {
      title: title.map(String::from),
      ..Schema::default()
    }
  }

  #[test]
  fn test_component_name() {
    let cases = [
      (Some("User"), ComponentKind::Form, "UserForm"),
      (Some("User"), ComponentKind::List, "UserList"),
      (Some("user profile"), ComponentKind::Form, "UserProfileForm"),
      (Some("Pet-Store item"), ComponentKind::List, "PetStoreItemList"),
      (Some("3d model"), ComponentKind::Form, "Component3dModelForm"),
      (Some("!!!"), ComponentKind::Form, "ComponentForm"),
      (None, ComponentKind::List, "ComponentList"),
    ];

    for (title, kind, expected) in cases {
      assert_eq!(component_name(&titled(title), kind), expected, "title {title:?}");
    }
  }

  #[test]
  fn test_component_selector() {
    assert_eq!(component_selector("UserForm"), "app-user-form");
  }

  #[test]
  fn test_artifact_key_display() {
    let key = ArtifactKey::new(Method::POST, "/users", ComponentKind::Form);
    assert_eq!(key.to_string(), "POST /users Form");

    let key = ArtifactKey::new(Method::GET, "/users/{id}", ComponentKind::List);
    assert_eq!(key.to_string(), "GET /users/{id} List");
  }

  #[test]
  fn test_artifact_key_from_str() {
    let key: ArtifactKey = "POST /users/{id} Form".parse().unwrap();
    assert_eq!(key, ArtifactKey::new(Method::POST, "/users/{id}", ComponentKind::Form));

    let key: ArtifactKey = "get /users list".parse().unwrap();
    assert_eq!(key.to_string(), "GET /users List");

    for input in ["POST /users", "POST /users Table", "POST  Form", ""] {
      assert_eq!(input.parse::<ArtifactKey>(), Err(InvalidArtifactKey(input.to_string())), "input {input:?}");
    }
  }

  #[test]
  fn test_artifact_file_stem() {
    let cases = [
      (Method::POST, "/users", ComponentKind::Form, "post_users_form"),
      (Method::GET, "/users/{id}", ComponentKind::List, "get_users_by_id_list"),
      (Method::GET, "/", ComponentKind::List, "get_list"),
      (Method::PUT, "/api/v1/pets", ComponentKind::Form, "put_api_v1_pets_form"),
    ];

    for (method, path, kind, expected) in cases {
      assert_eq!(ArtifactKey::new(method, path, kind).file_stem(), expected);
    }
  }
}
