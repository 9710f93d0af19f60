//! Configuration file handling for para-cli

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Explicitly selected project directory
    pub project_path: Option<PathBuf>,
    /// Directories scanned for a project when nothing is selected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workspace_roots: Vec<PathBuf>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// List internal (`_`-prefixed) types and datapoints
    pub show_internal: Option<bool>,
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("para-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(
        &self,
        project: Option<&Path>,
        output: Option<OutputFormat>,
        no_color: bool,
        show_internal: bool,
    ) -> MergedConfig {
        MergedConfig {
            explicit_project: project.map(Path::to_path_buf),
            saved_project: self.project_path.clone(),
            workspace_roots: self.workspace_roots.clone(),
            output: output
                .or_else(|| {
                    self.output
                        .as_deref()
                        .and_then(|o| OutputFormat::from_str(o, true).ok())
                })
                .unwrap_or_default(),
            no_color: no_color || self.no_color.unwrap_or(false),
            show_internal: show_internal || self.show_internal.unwrap_or(false),
        }
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// `--project` / `PARA_PROJECT`
    pub explicit_project: Option<PathBuf>,
    /// `project_path` from the config file
    pub saved_project: Option<PathBuf>,
    pub workspace_roots: Vec<PathBuf>,
    pub output: OutputFormat,
    pub no_color: bool,
    pub show_internal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            project_path: Some(PathBuf::from("/opt/projects/Demo")),
            workspace_roots: vec![PathBuf::from("/opt/projects")],
            output: Some("json".to_string()),
            no_color: None,
            show_internal: Some(true),
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_default() {
        let config: Config = toml::from_str("output = \"csv\"\n").unwrap();
        assert_eq!(config.project_path, None);
        assert!(config.workspace_roots.is_empty());
    }

    #[test]
    fn test_args_override_file() {
        let config = Config {
            project_path: Some(PathBuf::from("/saved")),
            output: Some("csv".to_string()),
            ..Default::default()
        };

        let merged = config.merge_with_args(Some(Path::new("/explicit")), None, false, false);
        assert_eq!(merged.explicit_project, Some(PathBuf::from("/explicit")));
        assert_eq!(merged.saved_project, Some(PathBuf::from("/saved")));
        assert_eq!(merged.output, OutputFormat::Csv);

        let merged = config.merge_with_args(None, Some(OutputFormat::Json), true, true);
        assert_eq!(merged.output, OutputFormat::Json);
        assert!(merged.no_color);
        assert!(merged.show_internal);
    }

    #[test]
    fn test_unknown_output_falls_back_to_table() {
        let config = Config {
            output: Some("yaml".to_string()),
            ..Default::default()
        };
        let merged = config.merge_with_args(None, None, false, false);
        assert_eq!(merged.output, OutputFormat::Table);
    }
}
