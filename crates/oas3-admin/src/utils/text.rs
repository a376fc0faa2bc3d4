use std::sync::LazyLock;

use regex::Regex;

static JS_IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Quotes `input` as a single-quoted JavaScript string literal.
#[must_use]
pub fn js_string(input: &str) -> String {
  let mut out = String::with_capacity(input.len() + 2);
  out.push('\'');
  for ch in input.chars() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '\'' => out.push_str("\\'"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\u{2028}' => out.push_str("\\u2028"),
      '\u{2029}' => out.push_str("\\u2029"),
      '<' => out.push_str("\\x3C"),
      _ => out.push(ch),
    }
  }
  out.push('\'');
  out
}

#[must_use]
pub fn is_js_identifier(input: &str) -> bool {
  JS_IDENTIFIER_RE.is_match(input)
}

/// Renders `object.key`, falling back to `object['key']` for keys that are not identifiers.
#[must_use]
pub fn property_access(object: &str, key: &str) -> String {
  if is_js_identifier(key) {
    format!("{object}.{key}")
  } else {
    format!("{object}[{}]", js_string(key))
  }
}

/// Renders a key for an object literal, quoting it only when required.
#[must_use]
pub fn object_key(key: &str) -> String {
  if is_js_identifier(key) {
    key.to_string()
  } else {
    js_string(key)
  }
}

/// Escapes text and attribute values for HTML-like templates.
///
/// Braces are escaped too so that schema text never opens a template interpolation.
#[must_use]
pub fn html_escape(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for ch in input.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      '{' => out.push_str("&#123;"),
      '}' => out.push_str("&#125;"),
      _ => out.push(ch),
    }
  }
  out
}

/// Escapes text placed inside a JavaScript template literal.
#[must_use]
pub fn template_literal(input: &str) -> String {
  input.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}
