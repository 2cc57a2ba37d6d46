//! Assembly of the annotated corpus text.

use minicorpora_core::{ExtractedDocument, Template};

/// Placeholder for sections meant to be filled in by hand.
const EMPTY_SLOT: &str = "EMPTY";
const NOT_AVAILABLE: &str = "N/A";

/// Run-level facts printed in the corpus header.
#[derive(Debug, Clone)]
pub struct CorpusMeta<'s> {
    pub corpus_name: &'s str,
    /// Every item of the source collection, extracted or not.
    pub total_items: usize,
    pub document_delimiter: &'s Template,
    pub page_separator: &'s Template,
    pub separator_collision: bool,
    pub description: Option<&'s str>,
}

/// Render the descriptive header that opens every corpus.
pub fn render_header(meta: &CorpusMeta<'_>, documents: usize) -> String {
    let collision = if meta.separator_collision { "yes" } else { "no" };
    let description = meta.description.unwrap_or(EMPTY_SLOT);
    format!(
        "Corpus name: {name}
Total number of articles in corpus: {total}
Number of articles in this file: {documents}
Document delimiter used: {delimiter}
Page separator used: {separator}
Page separator collision detected: {collision}

This file contains multiple OCR-extracted articles (secondary bibliography from historical and related disciplines)
or other documents (primary sources mainly produced between 1850 and 1920).
Each document starts with a \"=DOCUMENT METADATA=\" delimiter, which contains automatically inserted metadata referring to its title, author, editor, date, publication, and pdf file (title and RDF export path)
Each document's extracted OCR text is inserted after the \"=DOCUMENT TEXT=\" delimiter
When necessary, instructions on how to understand the document (structure, content, etc.) might be added manually, under the \"Optional explanation (filled manually)\" section.

In some cases (which are usually exceptional):
-Documents might be poorly OCRised or even empty.
-Documents might contain external elements which are not part of their textual content (in the case of HTML extractions for example)
-Document content might not correspond to the actual referred document (partial, table of contents of a book, reviews, etc.)
Main languages are Spanish, French and English

Corpus description and explanation (filled manually) : {description}

",
        name = meta.corpus_name,
        total = meta.total_items,
        delimiter = meta.document_delimiter,
        separator = meta.page_separator,
    )
}

fn or_not_available(value: String) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value
    }
}

/// Append the metadata and text block of one document.
///
/// `sequence` is the 1-based write-time counter used in the delimiter; the
/// `Document Number` line keeps the item number assigned during extraction.
fn push_document(
    lines: &mut Vec<String>,
    doc: &ExtractedDocument<'_>,
    sequence: usize,
    delimiter: &Template,
) {
    let meta = doc.metadata;
    lines.push(delimiter.render(sequence));
    lines.push("=DOCUMENT METADATA=".to_string());
    lines.push(format!("Document Number: {}", doc.doc_num));
    lines.push(format!("Title: {}", meta.title));
    lines.push(format!("Author: {}", meta.author));
    lines.push(format!("Editor: {}", meta.editor));
    lines.push(format!("Date: {}", meta.date));
    lines.push(format!("Publication: {}", meta.publication));
    lines.push(format!("Link or ID: {}", meta.id));
    lines.push(String::new());
    lines.push(format!("PDF Title: {}", or_not_available(meta.pdf_titles("; "))));
    lines.push(format!(
        "RDF export path: {}",
        or_not_available(meta.pdf_paths("; "))
    ));
    lines.push(String::new());
    lines.push(format!("Zotero tags: {}", meta.tags.join(" ; ")));
    lines.push(format!(
        "Optional explanation (filled manually): {EMPTY_SLOT}"
    ));
    lines.push(String::new());
    lines.push("=DOCUMENT TEXT=".to_string());
    lines.push(doc.text.clone());
    lines.push(String::new());
}

/// Header followed by every document block, newline-joined and trimmed.
pub fn assemble_corpus(documents: &[ExtractedDocument<'_>], meta: &CorpusMeta<'_>) -> String {
    let mut lines = Vec::with_capacity(1 + documents.len() * 19);
    lines.push(render_header(meta, documents.len()));
    for (i, doc) in documents.iter().enumerate() {
        push_document(&mut lines, doc, i + 1, meta.document_delimiter);
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minicorpora_core::{Attachment, Item};
    use std::path::PathBuf;

    fn meta<'s>(delimiter: &'s Template, separator: &'s Template) -> CorpusMeta<'s> {
        CorpusMeta {
            corpus_name: "Nitrate",
            total_items: 3,
            document_delimiter: delimiter,
            page_separator: separator,
            separator_collision: false,
            description: None,
        }
    }

    fn item() -> Item {
        Item {
            id: "http://zotero.org/users/1/items/AAA".into(),
            title: "Report on X".into(),
            author: "Marie Duval, Ortega".into(),
            editor: String::new(),
            date: "1998".into(),
            publication: "Annales".into(),
            tags: vec!["Mining".into(), "Chile".into()],
            pdfs: vec![Attachment {
                path: PathBuf::from("/in/files/10/report.pdf"),
                title: "Full Text PDF".into(),
            }],
        }
    }

    #[test]
    fn header_lists_counts_and_markers() {
        let (d, s) = (
            Template::default_document_delimiter(),
            Template::default_page_separator(),
        );
        let header = render_header(&meta(&d, &s), 2);
        assert!(header.starts_with("Corpus name: Nitrate\n"));
        assert!(header.contains("Total number of articles in corpus: 3\n"));
        assert!(header.contains("Number of articles in this file: 2\n"));
        assert!(header.contains("Document delimiter used: ==== BEGIN DOCUMENT {0} ====\n"));
        assert!(header.contains("Page separator used: [p{0}]\n"));
        assert!(header.contains("Page separator collision detected: no\n"));
        assert!(header.contains("Corpus description and explanation (filled manually) : EMPTY"));
    }

    #[test]
    fn header_reports_collision_and_description() {
        let (d, s) = (
            Template::default_document_delimiter(),
            Template::default_page_separator(),
        );
        let mut m = meta(&d, &s);
        m.separator_collision = true;
        m.description = Some("Nitrate era press");
        let header = render_header(&m, 0);
        assert!(header.contains("Page separator collision detected: yes\n"));
        assert!(header.contains("(filled manually) : Nitrate era press"));
    }

    #[test]
    fn document_block_layout() {
        let (d, s) = (
            Template::default_document_delimiter(),
            Template::default_page_separator(),
        );
        let item = item();
        let docs = vec![ExtractedDocument {
            doc_num: 2,
            metadata: &item,
            text: "[p1]\np1 text".into(),
        }];
        let corpus = assemble_corpus(&docs, &meta(&d, &s));
        let block = corpus
            .split_once("==== BEGIN DOCUMENT 1 ====\n")
            .map(|(_, rest)| rest)
            .unwrap();
        let expected = [
            "=DOCUMENT METADATA=",
            "Document Number: 2",
            "Title: Report on X",
            "Author: Marie Duval, Ortega",
            "Editor: ",
            "Date: 1998",
            "Publication: Annales",
            "Link or ID: http://zotero.org/users/1/items/AAA",
            "",
            "PDF Title: Full Text PDF",
            "RDF export path: /in/files/10/report.pdf",
            "",
            "Zotero tags: Mining ; Chile",
            "Optional explanation (filled manually): EMPTY",
            "",
            "=DOCUMENT TEXT=",
            "[p1]",
            "p1 text",
        ];
        assert_eq!(block, expected.join("\n"));
    }

    #[test]
    fn delimiter_uses_its_own_sequence() {
        let (d, s) = (
            Template::default_document_delimiter(),
            Template::default_page_separator(),
        );
        let item = item();
        let docs: Vec<ExtractedDocument<'_>> = (0..3)
            .map(|_| ExtractedDocument {
                doc_num: 7,
                metadata: &item,
                text: "t".into(),
            })
            .collect();
        let corpus = assemble_corpus(&docs, &meta(&d, &s));
        for n in 1..=3 {
            assert!(corpus.contains(&format!("==== BEGIN DOCUMENT {n} ====\n")));
        }
        assert_eq!(corpus.matches("Document Number: 7\n").count(), 3);
    }

    #[test]
    fn empty_attachment_fields_show_not_available() {
        let (d, s) = (
            Template::default_document_delimiter(),
            Template::default_page_separator(),
        );
        let mut item = item();
        item.pdfs.clear();
        let docs = vec![ExtractedDocument {
            doc_num: 1,
            metadata: &item,
            text: String::new(),
        }];
        let corpus = assemble_corpus(&docs, &meta(&d, &s));
        assert!(corpus.contains("PDF Title: N/A\nRDF export path: N/A\n"));
        assert!(corpus.ends_with("=DOCUMENT TEXT="));
    }

    #[test]
    fn corpus_without_documents_is_the_trimmed_header() {
        let (d, s) = (
            Template::default_document_delimiter(),
            Template::default_page_separator(),
        );
        let corpus = assemble_corpus(&[], &meta(&d, &s));
        assert!(corpus.ends_with("(filled manually) : EMPTY"));
    }
}
