//! The two CSV summaries: extracted items, and the entire source collection.
//!
//! Both are UTF-8 with a byte-order mark, comma-delimited, CRLF-terminated,
//! with a header row. List-valued fields are `"; "`-joined.

use std::collections::HashSet;
use std::io::Write;

use minicorpora_core::{ExtractedDocument, Item};

use crate::ReportError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const LIST_SEP: &str = "; ";

pub const EXTRACTED_ITEMS_HEADER: [&str; 10] = [
    "Link or ID",
    "Title",
    "Author",
    "Editor",
    "Date",
    "Publication",
    "Has PDF",
    "PDF Paths",
    "PDF Titles",
    "Tags",
];

pub const COLLECTION_HEADER: [&str; 11] = [
    "Link or ID",
    "Title",
    "Author",
    "Editor",
    "Date",
    "Publication",
    "Has Attachment",
    "Included in Corpus",
    "Attachment title",
    "Path",
    "Tags",
];

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn csv_writer<W: Write>(mut out: W) -> Result<csv::Writer<W>, ReportError> {
    out.write_all(UTF8_BOM)?;
    Ok(csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(out))
}

/// One row per extracted document, describing its owning item.
pub fn write_extracted_items<W: Write>(
    out: W,
    documents: &[ExtractedDocument<'_>],
) -> Result<(), ReportError> {
    let mut writer = csv_writer(out)?;
    writer.write_record(EXTRACTED_ITEMS_HEADER)?;
    for doc in documents {
        let item = doc.metadata;
        writer.write_record([
            item.id.as_str(),
            item.title.as_str(),
            item.author.as_str(),
            item.editor.as_str(),
            item.date.as_str(),
            item.publication.as_str(),
            yes_no(item.has_pdf()),
            item.pdf_paths(LIST_SEP).as_str(),
            item.pdf_titles(LIST_SEP).as_str(),
            item.tags.join(LIST_SEP).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// One row per resolved item, flagging whether any of its attachments made it
/// into the corpus.
pub fn write_entire_collection<W: Write>(
    out: W,
    items: &[Item],
    documents: &[ExtractedDocument<'_>],
) -> Result<(), ReportError> {
    let included: HashSet<&str> = documents.iter().map(|d| d.metadata.id.as_str()).collect();

    let mut writer = csv_writer(out)?;
    writer.write_record(COLLECTION_HEADER)?;
    for item in items {
        writer.write_record([
            item.id.as_str(),
            item.title.as_str(),
            item.author.as_str(),
            item.editor.as_str(),
            item.date.as_str(),
            item.publication.as_str(),
            yes_no(item.has_pdf()),
            yes_no(included.contains(item.id.as_str())),
            item.pdf_titles(LIST_SEP).as_str(),
            item.pdf_paths(LIST_SEP).as_str(),
            item.tags.join(LIST_SEP).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minicorpora_core::Attachment;
    use std::path::PathBuf;

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: "#a".into(),
                title: "Salitre, trabajo y \"progreso\"".into(),
                author: "Ana Pérez, Luis Soto".into(),
                date: "1910".into(),
                tags: vec!["nitrate".into(), "labour".into()],
                pdfs: vec![
                    Attachment {
                        path: PathBuf::from("/in/a1.pdf"),
                        title: "Part 1".into(),
                    },
                    Attachment {
                        path: PathBuf::from("/in/a2.pdf"),
                        title: "Part 2".into(),
                    },
                ],
                ..Default::default()
            },
            Item {
                id: "#b".into(),
                title: "No files".into(),
                ..Default::default()
            },
            Item {
                id: "#c".into(),
                title: "Unreadable".into(),
                pdfs: vec![Attachment {
                    path: PathBuf::from("/in/c.pdf"),
                    title: String::new(),
                }],
                ..Default::default()
            },
        ]
    }

    fn read_rows(bytes: &[u8]) -> Vec<Vec<String>> {
        assert!(bytes.starts_with(UTF8_BOM));
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&bytes[UTF8_BOM.len()..]);
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn extracted_items_has_a_row_per_document() {
        let items = items();
        let docs = vec![
            ExtractedDocument {
                doc_num: 1,
                metadata: &items[0],
                text: String::new(),
            },
            ExtractedDocument {
                doc_num: 1,
                metadata: &items[0],
                text: String::new(),
            },
        ];
        let mut out = Vec::new();
        write_extracted_items(&mut out, &docs).unwrap();

        let rows = read_rows(&out);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], EXTRACTED_ITEMS_HEADER);
        assert_eq!(
            rows[1],
            vec![
                "#a",
                "Salitre, trabajo y \"progreso\"",
                "Ana Pérez, Luis Soto",
                "",
                "1910",
                "",
                "yes",
                "/in/a1.pdf; /in/a2.pdf",
                "Part 1; Part 2",
                "nitrate; labour",
            ]
        );
        assert_eq!(rows[1], rows[2]);
    }

    #[test]
    fn collection_flags_inclusion_by_identifier() {
        let items = items();
        let docs = vec![ExtractedDocument {
            doc_num: 1,
            metadata: &items[0],
            text: String::new(),
        }];
        let mut out = Vec::new();
        write_entire_collection(&mut out, &items, &docs).unwrap();

        let rows = read_rows(&out);
        assert_eq!(rows[0], COLLECTION_HEADER);
        let flags: Vec<(&str, &str, &str)> = rows[1..]
            .iter()
            .map(|r| (r[0].as_str(), r[6].as_str(), r[7].as_str()))
            .collect();
        assert_eq!(
            flags,
            vec![("#a", "yes", "yes"), ("#b", "no", "no"), ("#c", "yes", "no")]
        );
        assert_eq!(rows[1][8], "Part 1; Part 2");
        assert_eq!(rows[1][9], "/in/a1.pdf; /in/a2.pdf");
    }

    #[test]
    fn records_are_crlf_terminated_and_quoted_when_needed() {
        let items = items();
        let mut out = Vec::new();
        write_entire_collection(&mut out, &items[..1], &[]).unwrap();
        let text = String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(
            lines[0],
            "Link or ID,Title,Author,Editor,Date,Publication,Has Attachment,Included in Corpus,Attachment title,Path,Tags"
        );
        assert!(lines[1].starts_with("#a,\"Salitre, trabajo y \"\"progreso\"\"\",\"Ana Pérez, Luis Soto\","));
        assert_eq!(lines[2], "");
    }

    #[test]
    fn output_is_deterministic() {
        let items = items();
        let docs = vec![ExtractedDocument {
            doc_num: 3,
            metadata: &items[2],
            text: String::new(),
        }];
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_entire_collection(&mut first, &items, &docs).unwrap();
        write_entire_collection(&mut second, &items, &docs).unwrap();
        assert_eq!(first, second);
    }
}
