//! Zotero RDF export reader.
//!
//! Locates the export document in an input folder, parses it into a
//! namespace-resolved tree and resolves the bibliographic records into flat
//! [`Item`]s with their authors, editors, tags, publication titles and linked
//! attachments.

pub mod resolver;
pub mod tree;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use minicorpora_core::{Attachment, Item};
pub use resolver::resolve_items;
pub use tree::{Element, parse_document};

/// Extension of the export document, compared case-insensitively.
pub const EXPORT_EXTENSION: &str = "rdf";

#[derive(Error, Debug)]
pub enum RdfError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    #[error("malformed export: {0}")]
    Malformed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// First regular file in `dir` whose name ends in `.rdf`, in directory
/// listing order.
pub fn find_export_file(dir: &Path) -> Result<Option<PathBuf>, RdfError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_export = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case(EXPORT_EXTENSION))
            .unwrap_or(false);
        if is_export && path.is_file() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Parse the export at `path` and resolve its items.
///
/// Attachment references are resolved against `base_dir`. A well-formed
/// export without items yields an empty list.
pub fn load_items(path: &Path, base_dir: &Path) -> Result<Vec<Item>, RdfError> {
    let file = File::open(path)?;
    let root = parse_document(BufReader::new(file))?;
    let items = resolve_items(&root, base_dir);
    tracing::info!(path = %path.display(), items = items.len(), "parsed export");
    Ok(items)
}
