use std::fmt;

use crate::CoreError;

/// Placeholder replaced by the 1-based number when a template is rendered.
pub const PLACEHOLDER: &str = "{0}";

/// Default token written before each document block.
pub const DEFAULT_DOCUMENT_DELIMITER: &str = "==== BEGIN DOCUMENT {0} ====";

/// Default token written before each page's text.
pub const DEFAULT_PAGE_SEPARATOR: &str = "[p{0}]";

/// A numbered marker such as `[p{0}]` or `==== BEGIN DOCUMENT {0} ====`.
///
/// Every occurrence of `{0}` is replaced by the number on render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    /// Build a template, rejecting patterns without a `{0}` placeholder.
    pub fn new(pattern: impl Into<String>) -> Result<Self, CoreError> {
        let pattern = pattern.into();
        if !pattern.contains(PLACEHOLDER) {
            return Err(CoreError::InvalidTemplate(pattern));
        }
        Ok(Self(pattern))
    }

    pub fn default_document_delimiter() -> Self {
        Self(DEFAULT_DOCUMENT_DELIMITER.to_string())
    }

    pub fn default_page_separator() -> Self {
        Self(DEFAULT_PAGE_SEPARATOR.to_string())
    }

    /// Render the marker for the given 1-based number.
    pub fn render(&self, n: usize) -> String {
        self.0.replace(PLACEHOLDER, &n.to_string())
    }

    /// The raw pattern, placeholder included.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
