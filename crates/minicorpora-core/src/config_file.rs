use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub output: Option<OutputConfig>,
    pub templates: Option<TemplatesConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub corpus: Option<CorpusConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub root: Option<String>,
    pub split_threshold_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    pub document_delimiter: Option<String>,
    pub page_separator: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub check_separator_collisions: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub description: Option<String>,
}

/// Platform config directory path: `<config_dir>/minicorpora/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("minicorpora").join("config.toml"))
}

/// Load config by cascading CWD `.minicorpora.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".minicorpora.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        output: Some(OutputConfig {
            root: overlay
                .output
                .as_ref()
                .and_then(|o| o.root.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.root.clone())),
            split_threshold_bytes: overlay
                .output
                .as_ref()
                .and_then(|o| o.split_threshold_bytes)
                .or_else(|| base.output.as_ref().and_then(|o| o.split_threshold_bytes)),
        }),
        templates: Some(TemplatesConfig {
            document_delimiter: overlay
                .templates
                .as_ref()
                .and_then(|t| t.document_delimiter.clone())
                .or_else(|| {
                    base.templates
                        .as_ref()
                        .and_then(|t| t.document_delimiter.clone())
                }),
            page_separator: overlay
                .templates
                .as_ref()
                .and_then(|t| t.page_separator.clone())
                .or_else(|| base.templates.as_ref().and_then(|t| t.page_separator.clone())),
        }),
        extraction: Some(ExtractionConfig {
            check_separator_collisions: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.check_separator_collisions)
                .or_else(|| {
                    base.extraction
                        .as_ref()
                        .and_then(|e| e.check_separator_collisions)
                }),
        }),
        corpus: Some(CorpusConfig {
            description: overlay
                .corpus
                .as_ref()
                .and_then(|c| c.description.clone())
                .or_else(|| base.corpus.as_ref().and_then(|c| c.description.clone())),
        }),
    }
}
