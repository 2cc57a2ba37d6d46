//! Output writing for a mini corpus: the annotated text file (or its parts)
//! and the two CSV summaries, all under `<output_root>/<corpus_name>/`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use minicorpora_core::{ExtractedDocument, Item, Settings};
use thiserror::Error;

pub mod corpus;
pub mod split;
pub mod tables;

pub use corpus::{CorpusMeta, assemble_corpus, render_header};
pub use split::{needs_split, split_parts};
pub use tables::{write_entire_collection, write_extracted_items};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid corpus name {0:?}")]
    InvalidCorpusName(String),
}

/// Paths of everything a run wrote.
#[derive(Debug, Clone)]
pub struct WrittenOutputs {
    pub dir: PathBuf,
    /// `{corpus}.txt`, or `{corpus}_part1.txt`, `{corpus}_part2.txt`, ...
    pub text_files: Vec<PathBuf>,
    /// Whether the text went to part files, even if only one part resulted.
    pub split: bool,
    pub extracted_items_csv: PathBuf,
    pub collection_csv: PathBuf,
}

impl WrittenOutputs {
    pub fn is_split(&self) -> bool {
        self.split
    }
}

/// Writes the output file set of one corpus.
pub struct CorpusWriter<'s> {
    corpus_name: &'s str,
    settings: &'s Settings,
}

impl<'s> CorpusWriter<'s> {
    /// The corpus name becomes a directory and file stem, so it must be a
    /// single path component.
    pub fn new(corpus_name: &'s str, settings: &'s Settings) -> Result<Self, ReportError> {
        let valid = !corpus_name.trim().is_empty()
            && corpus_name != "."
            && corpus_name != ".."
            && !corpus_name.contains(['/', '\\']);
        if !valid {
            return Err(ReportError::InvalidCorpusName(corpus_name.to_string()));
        }
        Ok(Self {
            corpus_name,
            settings,
        })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.settings.corpus_dir(self.corpus_name)
    }

    /// Assemble and write the corpus text, then both CSVs.
    ///
    /// Reruns overwrite earlier outputs. Text files left by an earlier run in
    /// the other mode (single file versus parts) are removed first.
    pub fn write(
        &self,
        items: &[Item],
        documents: &[ExtractedDocument<'_>],
        separator_collision: bool,
    ) -> Result<WrittenOutputs, ReportError> {
        let dir = self.output_dir();
        fs::create_dir_all(&dir)?;
        self.remove_stale_text_files(&dir)?;

        let meta = CorpusMeta {
            corpus_name: self.corpus_name,
            total_items: items.len(),
            document_delimiter: &self.settings.document_delimiter,
            page_separator: &self.settings.page_separator,
            separator_collision,
            description: self.settings.description.as_deref(),
        };
        let text = assemble_corpus(documents, &meta);

        let (text_files, split) = self.write_text(&dir, &text)?;

        let extracted_items_csv = dir.join(format!("{}_text_extracted_items.csv", self.corpus_name));
        let mut out = BufWriter::new(File::create(&extracted_items_csv)?);
        write_extracted_items(&mut out, documents)?;
        out.flush()?;

        let collection_csv = dir.join(format!("{}_entire_collection.csv", self.corpus_name));
        let mut out = BufWriter::new(File::create(&collection_csv)?);
        write_entire_collection(&mut out, items, documents)?;
        out.flush()?;

        tracing::info!(dir = %dir.display(), files = text_files.len(), "corpus written");

        Ok(WrittenOutputs {
            dir,
            text_files,
            split,
            extracted_items_csv,
            collection_csv,
        })
    }

    /// Write `text` as `{corpus}.txt`, or as numbered parts when it exceeds
    /// the split threshold.
    fn write_text(&self, dir: &Path, text: &str) -> Result<(Vec<PathBuf>, bool), ReportError> {
        let limit = self.settings.split_threshold_bytes;
        if !needs_split(text, limit) {
            let path = dir.join(format!("{}.txt", self.corpus_name));
            fs::write(&path, text)?;
            return Ok((vec![path], false));
        }

        let parts = split_parts(text, limit);
        tracing::info!(
            bytes = text.len(),
            parts = parts.len(),
            "corpus exceeds {limit} bytes, splitting"
        );
        let mut paths = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            let path = dir.join(format!("{}_part{}.txt", self.corpus_name, i + 1));
            fs::write(&path, part)?;
            paths.push(path);
        }
        Ok((paths, true))
    }

    fn is_text_output(&self, file_name: &str) -> bool {
        let Some(stem) = file_name.strip_suffix(".txt") else {
            return false;
        };
        if stem == self.corpus_name {
            return true;
        }
        stem.strip_prefix(self.corpus_name)
            .and_then(|rest| rest.strip_prefix("_part"))
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    }

    fn remove_stale_text_files(&self, dir: &Path) -> Result<(), ReportError> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(name) = name.to_str()
                && self.is_text_output(name)
            {
                tracing::debug!(file = name, "removing previous corpus text");
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}
