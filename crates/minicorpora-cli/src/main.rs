use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minicorpora_core::Settings;
use minicorpora_core::config_file::{self, ConfigFile};
use minicorpora_core::settings::default_output_root;
use minicorpora_extract::{ExtractProgress, TextExtractor};
use minicorpora_pdf_mupdf::MupdfBackend;
use minicorpora_reporting::CorpusWriter;

mod output;
mod terminal;

use output::{ColorMode, RunSummary};

const ENV_OUTPUT_ROOT: &str = "MINICORPORA_OUTPUT_ROOT";
const ENV_CONFIG: &str = "MINICORPORA_CONFIG";

/// Mini corpora builder - Turn a Zotero RDF export and its PDFs into a
/// page-delimited text corpus with CSV summaries
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Folder holding the `.rdf` export and its attachment files
    input_folder: PathBuf,

    /// Name of the corpus; used for the output directory and file names
    corpus_name: String,

    /// Directory under which `<corpus_name>/` is written
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Config file to use instead of the default config cascade
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not check page texts for occurrences of their own separator
    #[arg(long)]
    no_collision_check: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1; --help and --version exit 0.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let no_color = terminal::should_disable_color(
        cli.no_color,
        terminal::no_color_env_requested(),
        std::io::stdout().is_terminal(),
    );
    // Drawn only once extraction starts; log lines suspend it meanwhile.
    let bar = indicatif::ProgressBar::hidden();
    let default_level = if cli.verbose { "debug" } else { "info" };
    terminal::init_tracing(default_level, no_color, &bar);
    run(&cli, &bar, ColorMode(!no_color))
}

/// Resolve configuration: CLI flags > env vars > config files > defaults.
fn resolve_settings(
    cli: &Cli,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let env_path = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    let config = match cli.config.clone().or_else(|| env_path(ENV_CONFIG)) {
        Some(path) => config_file::load_from_path(&path).unwrap_or_else(|| {
            tracing::warn!(path = %path.display(), "config file not usable, using defaults");
            ConfigFile::default()
        }),
        None => config_file::load_config(),
    };

    let mut settings = Settings::from_config(&config, default_output_root())?;
    if let Some(root) = cli.output_root.clone().or_else(|| env_path(ENV_OUTPUT_ROOT)) {
        settings.output_root = root;
    }
    if cli.no_collision_check {
        settings.check_separator_collisions = false;
    }
    Ok(settings)
}

fn short_title(title: &str) -> String {
    const MAX: usize = 50;
    if title.chars().count() > MAX {
        let cut: String = title.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

fn run(cli: &Cli, bar: &indicatif::ProgressBar, color: ColorMode) -> anyhow::Result<()> {
    let settings = resolve_settings(cli, |key| std::env::var(key).ok())?;
    let writer = CorpusWriter::new(&cli.corpus_name, &settings)?;

    let export = minicorpora_rdf::find_export_file(&cli.input_folder)
        .with_context(|| format!("Cannot list {}", cli.input_folder.display()))?
        .ok_or_else(|| {
            anyhow::anyhow!("No RDF file found in folder {}", cli.input_folder.display())
        })?;
    let items = minicorpora_rdf::load_items(&export, &cli.input_folder)
        .with_context(|| format!("Failed to read export {}", export.display()))?;

    let backend = MupdfBackend::new();
    let extractor = TextExtractor::new(&backend)
        .with_page_separator(settings.page_separator.clone())
        .with_collision_check(settings.check_separator_collisions);

    bar.set_length(items.len() as u64);
    bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
    bar.set_style(
        indicatif::ProgressStyle::with_template(
            "{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len}",
        )?
        .progress_chars("=> "),
    );
    let outcome = extractor.extract_with_progress(&items, |event| {
        if let ExtractProgress::Item { index, item, .. } = event {
            bar.set_position(index as u64);
            bar.set_message(short_title(&item.title));
        }
    });
    bar.finish_and_clear();

    let written = writer
        .write(&items, &outcome.documents, outcome.separator_collision)
        .with_context(|| format!("Failed to write corpus to {}", writer.output_dir().display()))?;

    let summary = RunSummary {
        corpus_name: &cli.corpus_name,
        export: &export,
        items: items.len(),
        linked_pdfs: items.iter().map(|i| i.pdfs.len()).sum(),
        documents: outcome.documents.len(),
        missing: outcome.missing,
        unreadable: outcome.unreadable,
        separator_collision: outcome.separator_collision,
        written: &written,
    };
    let mut stdout = std::io::stdout().lock();
    output::print_summary(&mut stdout, &summary, color)?;
    Ok(())
}
