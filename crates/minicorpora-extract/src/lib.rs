//! Page-delimited text extraction over a pluggable [`PdfBackend`].
//!
//! Pipeline, per item and per attachment in order:
//! 1. Skip attachments whose path is not an existing regular file
//! 2. Extract the raw text of every page via the backend
//! 3. Flag pages whose raw text already contains their own separator token
//! 4. Prefix each trimmed page with its separator line and join the pages
//!
//! A PDF that fails to open or extract is logged and skipped; it never stops
//! the run.

use std::path::Path;

// Re-export domain types from core (canonical definitions live there)
pub use minicorpora_core::{BackendError, ExtractedDocument, Item, PdfBackend, Template};

/// Why an attachment produced no document.
#[derive(Debug)]
pub enum SkipReason {
    /// The resolved path is not an existing regular file.
    Missing,
    /// The backend could not open or read the file.
    Unreadable(BackendError),
}

/// Progress events emitted while extracting.
#[derive(Debug)]
pub enum ExtractProgress<'a> {
    /// Processing of an item starts. `index` is 0-based.
    Item {
        index: usize,
        total: usize,
        item: &'a Item,
    },
    Extracted {
        path: &'a Path,
        pages: usize,
    },
    Skipped {
        path: &'a Path,
        reason: &'a SkipReason,
    },
}

/// Result of an extraction run.
#[derive(Debug, Default)]
pub struct ExtractionOutcome<'a> {
    pub documents: Vec<ExtractedDocument<'a>>,
    /// Set when any page's raw text already contained its own separator.
    pub separator_collision: bool,
    pub missing: usize,
    pub unreadable: usize,
}

/// Turns the attachments of resolved items into [`ExtractedDocument`]s.
pub struct TextExtractor<'b> {
    backend: &'b dyn PdfBackend,
    page_separator: Template,
    check_collisions: bool,
}

impl<'b> TextExtractor<'b> {
    /// Extractor with the default `[p{0}]` separator and collision checks on.
    pub fn new(backend: &'b dyn PdfBackend) -> Self {
        Self {
            backend,
            page_separator: Template::default_page_separator(),
            check_collisions: true,
        }
    }

    pub fn with_page_separator(mut self, separator: Template) -> Self {
        self.page_separator = separator;
        self
    }

    pub fn with_collision_check(mut self, enabled: bool) -> Self {
        self.check_collisions = enabled;
        self
    }

    /// Extract every attachment of every item.
    pub fn extract<'a>(&self, items: &'a [Item]) -> ExtractionOutcome<'a> {
        self.extract_with_progress(items, |_| {})
    }

    /// Extract every attachment of every item, reporting each step.
    pub fn extract_with_progress<'a>(
        &self,
        items: &'a [Item],
        mut progress: impl FnMut(ExtractProgress<'_>),
    ) -> ExtractionOutcome<'a> {
        let mut outcome = ExtractionOutcome::default();
        let total = items.len();

        for (index, item) in items.iter().enumerate() {
            progress(ExtractProgress::Item { index, total, item });
            let doc_num = index + 1;

            for pdf in &item.pdfs {
                let path = pdf.path.as_path();
                match self.extract_file(path) {
                    Ok((text, pages, collision)) => {
                        outcome.separator_collision |= collision;
                        progress(ExtractProgress::Extracted { path, pages });
                        outcome.documents.push(ExtractedDocument {
                            doc_num,
                            metadata: item,
                            text,
                        });
                    }
                    Err(reason) => {
                        match &reason {
                            SkipReason::Missing => {
                                tracing::debug!(path = %path.display(), "attachment not on disk, skipping");
                                outcome.missing += 1;
                            }
                            SkipReason::Unreadable(e) => {
                                tracing::warn!(path = %path.display(), error = %e, "failed to read PDF");
                                outcome.unreadable += 1;
                            }
                        }
                        progress(ExtractProgress::Skipped {
                            path,
                            reason: &reason,
                        });
                    }
                }
            }
        }

        if outcome.separator_collision {
            tracing::warn!(
                separator = %self.page_separator,
                "page text already contains its separator token; page boundaries may be ambiguous"
            );
        }
        tracing::info!(
            items = total,
            documents = outcome.documents.len(),
            missing = outcome.missing,
            unreadable = outcome.unreadable,
            "text extraction complete"
        );
        outcome
    }

    /// Extract one file: `(text, page count, collision)`.
    fn extract_file(&self, path: &Path) -> Result<(String, usize, bool), SkipReason> {
        if !path.is_file() {
            return Err(SkipReason::Missing);
        }
        let pages = self
            .backend
            .extract_pages(path)
            .map_err(SkipReason::Unreadable)?;
        let (text, collision) = self.render_pages(&pages);
        Ok((text, pages.len(), collision))
    }

    /// Join raw page texts into one separator-delimited text.
    ///
    /// Returns the text and whether any page already contained its own
    /// separator token (only checked when collision checks are enabled).
    pub fn render_pages(&self, pages: &[String]) -> (String, bool) {
        let mut collision = false;
        let mut rendered = Vec::with_capacity(pages.len());

        for (i, raw) in pages.iter().enumerate() {
            let token = self.page_separator.render(i + 1);
            if self.check_collisions && raw.contains(&token) {
                collision = true;
            }
            rendered.push(format!("{}\n{}", token, raw.trim()));
        }

        (rendered.join("\n").trim().to_string(), collision)
    }
}
