const INDENT: &str = "  ";

/// Line-oriented text buffer with two-space indentation.
#[derive(Debug, Default)]
pub(crate) struct SourceBuilder {
  buf: String,
  depth: usize,
}

impl SourceBuilder {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Starts at `depth` levels of indentation, for fragments embedded in other text.
  pub(crate) fn at_depth(depth: usize) -> Self {
    Self {
      buf: String::new(),
      depth,
    }
  }

  /// Writes one indented line. Empty input writes a bare newline.
  pub(crate) fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
    let text = text.as_ref();
    if !text.is_empty() {
      for _ in 0..self.depth {
        self.buf.push_str(INDENT);
      }
      self.buf.push_str(text);
    }
    self.buf.push('\n');
    self
  }

  pub(crate) fn blank(&mut self) -> &mut Self {
    self.buf.push('\n');
    self
  }

  /// Writes each line of an already formatted fragment at the current depth.
  pub(crate) fn lines(&mut self, text: &str) -> &mut Self {
    for line in text.lines() {
      self.line(line);
    }
    self
  }

  /// Writes `body` one level deeper.
  pub(crate) fn indented(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
    self.depth += 1;
    body(self);
    self.depth -= 1;
    self
  }

  /// Writes `open`, then `body` one level deeper, then `close`.
  pub(crate) fn block(
    &mut self,
    open: impl AsRef<str>,
    close: impl AsRef<str>,
    body: impl FnOnce(&mut Self),
  ) -> &mut Self {
    self.line(open);
    self.indented(body);
    self.line(close)
  }

  pub(crate) fn finish(self) -> String {
    self.buf
  }
}
