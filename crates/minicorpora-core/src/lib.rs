use std::path::PathBuf;

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod settings;
pub mod template;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use settings::Settings;
pub use template::Template;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("template {0:?} has no {{0}} placeholder")]
    InvalidTemplate(String),
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}

/// A file linked to an item, typically a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Export directory joined with the attachment's relative reference.
    pub path: PathBuf,
    /// Declared title, empty when the export has none.
    pub title: String,
}

/// One bibliographic record resolved from the export.
///
/// Missing optional fields are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Stable identifier from the export; the join key between items,
    /// attachments and extracted documents.
    pub id: String,
    pub title: String,
    /// `", "`-joined "given surname" names.
    pub author: String,
    /// `", "`-joined "given surname" names.
    pub editor: String,
    pub date: String,
    pub publication: String,
    /// Subject strings in export order.
    pub tags: Vec<String>,
    /// Attachments in link-declaration order.
    pub pdfs: Vec<Attachment>,
}

impl Item {
    pub fn has_pdf(&self) -> bool {
        !self.pdfs.is_empty()
    }

    /// Attachment paths joined with `sep`.
    pub fn pdf_paths(&self, sep: &str) -> String {
        self.pdfs
            .iter()
            .map(|p| p.path.to_string_lossy())
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// Attachment titles joined with `sep`.
    pub fn pdf_titles(&self, sep: &str) -> String {
        self.pdfs
            .iter()
            .map(|p| p.title.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// The page-delimited text of one attachment.
#[derive(Debug, Clone)]
pub struct ExtractedDocument<'a> {
    /// 1-based position of the owning item in the extraction order.
    /// Attachments of the same item share it; the corpus writer keeps its
    /// own per-document sequence for the document delimiter.
    pub doc_num: usize,
    pub metadata: &'a Item,
    /// Every page prefixed by its separator line, trimmed as a whole.
    pub text: String,
}
