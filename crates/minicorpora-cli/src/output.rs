use std::io::Write;
use std::path::Path;

use minicorpora_reporting::WrittenOutputs;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Counts and paths reported once a corpus is written.
pub struct RunSummary<'a> {
    pub corpus_name: &'a str,
    pub export: &'a Path,
    pub items: usize,
    pub linked_pdfs: usize,
    pub documents: usize,
    pub missing: usize,
    pub unreadable: usize,
    pub separator_collision: bool,
    pub written: &'a WrittenOutputs,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Print the end-of-run summary.
pub fn print_summary(
    w: &mut dyn Write,
    summary: &RunSummary<'_>,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", format!("Corpus: {}", summary.corpus_name).bold())?;
    } else {
        writeln!(w, "Corpus: {}", summary.corpus_name)?;
    }
    writeln!(w, "  Export:           {}", summary.export.display())?;
    writeln!(w, "  Items:            {}", summary.items)?;
    writeln!(w, "  Linked PDFs:      {}", summary.linked_pdfs)?;

    if color.enabled() {
        writeln!(
            w,
            "  Extracted:        {}",
            summary.documents.to_string().green()
        )?;
    } else {
        writeln!(w, "  Extracted:        {}", summary.documents)?;
    }

    let skipped = summary.missing + summary.unreadable;
    if skipped > 0 {
        let line = format!(
            "  Skipped:          {} ({} missing, {} unreadable)",
            skipped, summary.missing, summary.unreadable
        );
        if color.enabled() {
            writeln!(w, "{}", line.yellow())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }

    if summary.separator_collision {
        let line = "  Page separator collision detected: yes";
        if color.enabled() {
            writeln!(w, "{}", line.red())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    } else {
        writeln!(w, "  Page separator collision detected: no")?;
    }

    writeln!(w)?;
    writeln!(w, "Output folder: {}", summary.written.dir.display())?;
    for path in &summary.written.text_files {
        writeln!(w, "  {}", file_name(path))?;
    }
    writeln!(w, "  {}", file_name(&summary.written.extracted_items_csv))?;
    writeln!(w, "  {}", file_name(&summary.written.collection_csv))?;
    writeln!(w)?;

    if color.enabled() {
        writeln!(w, "{}", "DONE. Output written to the folder".green().bold())?;
    } else {
        writeln!(w, "DONE. Output written to the folder")?;
    }
    Ok(())
}
