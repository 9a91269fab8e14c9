//! Defaults loaded from `.ghstatsrc.json`.
//!
//! The working directory is searched first, then the home directory. Command
//! line options override anything set here.

use crate::error::Result;
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CONFIG_FILE_NAME: &str = ".ghstatsrc.json";
pub const DEFAULT_DAYS: u32 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub default_days: Option<u32>,
    /// Kept as a string so an unknown value is reported by [`Config::validate`]
    /// instead of discarding the whole file.
    pub default_output: Option<String>,
    pub exclude_repos: Vec<String>,
    pub include_repos: Vec<String>,
    pub branch: Option<String>,
    pub color_scheme: ColorScheme,
}

/// Color names (`red`, `cyan`, ...) or 256-color indices for the graph series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub additions: Option<String>,
    pub deletions: Option<String>,
    pub neutral: Option<String>,
}

impl Config {
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }
        paths
    }

    pub fn load() -> Self {
        Self::load_from_paths(&Self::candidate_paths())
    }

    /// Returns the first candidate that parses. Unreadable files are skipped with a warning.
    pub fn load_from_paths(paths: &[PathBuf]) -> Self {
        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_from_path(path) {
                Ok(config) => return config,
                Err(e) => warn!("Could not parse config file {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.default_output {
            format.parse::<OutputFormat>()?;
        }
        Ok(())
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.default_output.as_deref().and_then(|f| f.parse().ok())
    }

    pub fn include_pattern(&self) -> Option<String> {
        join_patterns(&self.include_repos)
    }

    pub fn exclude_pattern(&self) -> Option<String> {
        join_patterns(&self.exclude_repos)
    }
}

fn join_patterns(patterns: &[String]) -> Option<String> {
    if patterns.is_empty() {
        None
    } else {
        Some(patterns.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GhstatsError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_camel_case_keys() {
        let config: Config = serde_json::from_str(
            r#"{
                "defaultDays": 14,
                "defaultOutput": "csv",
                "excludeRepos": ["dotfiles", "scratch*"],
                "branch": "main",
                "colorScheme": { "additions": "green" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_days, Some(14));
        assert_eq!(config.output_format(), Some(OutputFormat::Csv));
        assert_eq!(config.exclude_pattern().as_deref(), Some("dotfiles|scratch*"));
        assert_eq!(config.include_pattern(), None);
        assert_eq!(config.branch.as_deref(), Some("main"));
        assert_eq!(config.color_scheme.additions.as_deref(), Some("green"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_output_format_fails_validation() {
        let config = Config {
            default_output: Some("xml".into()),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(GhstatsError::Config(_))));
    }

    #[test]
    fn first_parseable_candidate_wins() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        let good = dir.path().join("good.json");
        let missing = dir.path().join("missing.json");
        fs::write(&broken, "{ not json").unwrap();
        fs::write(&good, r#"{"defaultDays": 7}"#).unwrap();

        let config = Config::load_from_paths(&[missing, broken, good]);
        assert_eq!(config.default_days, Some(7));
    }

    #[test]
    fn no_files_means_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from_paths(&[dir.path().join(CONFIG_FILE_NAME)]);
        assert_eq!(config, Config::default());
    }
}
