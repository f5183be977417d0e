//! Immutable document text shared by the analyzer and the formatter.

use std::fmt;

use crate::error::EngineResult;

/// An immutable markdown document.
///
/// Lines are the text between newline boundaries with the terminator
/// stripped; both `\n` and `\r\n` terminate a line. The empty document has
/// zero lines, and a trailing newline does not start an extra line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocumentText {
    text: String,
}

impl DocumentText {
    /// Wrap already-decoded text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Decode raw bytes as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidEncoding`](crate::EngineError::InvalidEncoding)
    /// when the bytes are not valid UTF-8. No repair is attempted.
    pub fn from_bytes(bytes: &[u8]) -> EngineResult<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    /// The full text, including line terminators.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Iterate over the lines of the document.
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    /// Number of lines in the document.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// Returns `true` if the document contains no text at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns `true` if the document holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Consume the document, returning the owned text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl From<String> for DocumentText {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl From<&str> for DocumentText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for DocumentText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for DocumentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
