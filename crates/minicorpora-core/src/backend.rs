use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level per-page text step; page separators,
/// collision checks and document assembly live in
/// `minicorpora_extract::TextExtractor`.
pub trait PdfBackend: Send + Sync {
    /// Extract the raw text of every page, in page order.
    ///
    /// The document must be released before returning, on success and on
    /// failure alike.
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}
