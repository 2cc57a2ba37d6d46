use std::path::PathBuf;

use crate::config_file::ConfigFile;
use crate::template::Template;
use crate::CoreError;

/// Name of the directory that holds every corpus when no root is configured.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "Mini corpora";

/// Main text outputs larger than this are split into parts (20 MiB).
pub const DEFAULT_SPLIT_THRESHOLD_BYTES: usize = 20 * 1024 * 1024;

/// Fully resolved run settings: config file values merged over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory under which `<corpus_name>/` is created.
    pub output_root: PathBuf,
    pub split_threshold_bytes: usize,
    pub document_delimiter: Template,
    pub page_separator: Template,
    pub check_separator_collisions: bool,
    /// Replaces the `EMPTY` placeholder of the header's description line.
    pub description: Option<String>,
}

impl Settings {
    /// Defaults with outputs rooted at `output_root`.
    pub fn with_output_root(output_root: PathBuf) -> Self {
        Self {
            output_root,
            split_threshold_bytes: DEFAULT_SPLIT_THRESHOLD_BYTES,
            document_delimiter: Template::default_document_delimiter(),
            page_separator: Template::default_page_separator(),
            check_separator_collisions: true,
            description: None,
        }
    }

    /// Resolve a config file against the defaults.
    ///
    /// `default_output_root` is used when the config names no `output.root`.
    pub fn from_config(
        config: &ConfigFile,
        default_output_root: PathBuf,
    ) -> Result<Self, CoreError> {
        let mut settings = Self::with_output_root(default_output_root);

        if let Some(output) = &config.output {
            if let Some(root) = &output.root {
                settings.output_root = PathBuf::from(root);
            }
            if let Some(threshold) = output.split_threshold_bytes {
                if threshold == 0 {
                    return Err(CoreError::InvalidSetting(
                        "output.split_threshold_bytes must be greater than zero".into(),
                    ));
                }
                settings.split_threshold_bytes = threshold;
            }
        }
        if let Some(templates) = &config.templates {
            if let Some(delimiter) = &templates.document_delimiter {
                settings.document_delimiter = Template::new(delimiter.clone())?;
            }
            if let Some(separator) = &templates.page_separator {
                settings.page_separator = Template::new(separator.clone())?;
            }
        }
        if let Some(check) = config
            .extraction
            .as_ref()
            .and_then(|e| e.check_separator_collisions)
        {
            settings.check_separator_collisions = check;
        }
        settings.description = config
            .corpus
            .as_ref()
            .and_then(|c| c.description.clone())
            .filter(|d| !d.trim().is_empty());

        Ok(settings)
    }

    /// Directory the outputs of `corpus_name` are written to.
    pub fn corpus_dir(&self, corpus_name: &str) -> PathBuf {
        self.output_root.join(corpus_name)
    }
}

/// `Mini corpora` next to the running binary, or in the working directory
/// when the binary location cannot be determined.
pub fn default_output_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_OUTPUT_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::{OutputConfig, TemplatesConfig};

    #[test]
    fn empty_config_uses_defaults() {
        let s = Settings::from_config(&ConfigFile::default(), PathBuf::from("/opt/mc")).unwrap();
        assert_eq!(s.output_root, PathBuf::from("/opt/mc"));
        assert_eq!(s.split_threshold_bytes, 20 * 1024 * 1024);
        assert_eq!(s.page_separator.render(2), "[p2]");
        assert_eq!(s.document_delimiter.render(1), "==== BEGIN DOCUMENT 1 ====");
        assert!(s.check_separator_collisions);
        assert!(s.description.is_none());
    }

    #[test]
    fn config_root_overrides_default() {
        let config = ConfigFile {
            output: Some(OutputConfig {
                root: Some("/data/corpora".into()),
                split_threshold_bytes: None,
            }),
            ..Default::default()
        };
        let s = Settings::from_config(&config, PathBuf::from("/opt/mc")).unwrap();
        assert_eq!(s.corpus_dir("Letters"), PathBuf::from("/data/corpora/Letters"));
    }

    #[test]
    fn invalid_template_is_rejected() {
        let config = ConfigFile {
            templates: Some(TemplatesConfig {
                document_delimiter: None,
                page_separator: Some("[page]".into()),
            }),
            ..Default::default()
        };
        let err = Settings::from_config(&config, PathBuf::from("/x")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTemplate(_)));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let config = ConfigFile {
            output: Some(OutputConfig {
                root: None,
                split_threshold_bytes: Some(0),
            }),
            ..Default::default()
        };
        assert!(matches!(
            Settings::from_config(&config, PathBuf::from("/x")),
            Err(CoreError::InvalidSetting(_))
        ));
    }

    #[test]
    fn default_root_ends_with_mini_corpora() {
        assert!(default_output_root().ends_with(DEFAULT_OUTPUT_DIR_NAME));
    }
}
