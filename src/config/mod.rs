//! Settings loading for promptforge.
//!
//! Configuration is a small TOML file with the two classification pattern
//! sources and the two base directories:
//!
//! ```toml
//! directive_pattern = "^(to|summary|defect)$"
//! layer_pattern = "^(project|issue|task)$"
//! prompt_base_dir = "~/.promptforge/prompts"
//! schema_base_dir = "~/.promptforge/schema"
//! ```
//!
//! # Lookup Order
//!
//! 1. An explicit `--config` path (must exist)
//! 2. `promptforge.toml` in the current directory
//! 3. `~/.promptforge/config.toml`
//! 4. Built-in defaults
//!
//! Fields missing from a file fall back to their defaults, so a file may
//! set only the keys it cares about. Base directories are tilde-expanded
//! when accessed; an explicitly empty base directory is preserved as empty
//! so the resolver can reject it as a configuration error instead of
//! silently searching somewhere else.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Project-local settings file name.
pub const PROJECT_CONFIG_FILE: &str = "promptforge.toml";

/// Merged configuration consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Regex source validating directive tokens.
    pub directive_pattern: String,
    /// Regex source validating layer tokens.
    pub layer_pattern: String,
    /// Base directory for prompt templates.
    pub prompt_base_dir: String,
    /// Base directory for schema files.
    pub schema_base_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directive_pattern: "^(to|summary|defect)$".to_string(),
            layer_pattern: "^(project|issue|task)$".to_string(),
            prompt_base_dir: "prompts".to_string(),
            schema_base_dir: "schema".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings following the documented lookup order.
    ///
    /// # Errors
    ///
    /// Fails when an explicitly given path cannot be read or parsed, or
    /// when a discovered file exists but is not valid TOML. A completely
    /// absent configuration is not an error; defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return parse_settings(path);
        }

        let project = Path::new(PROJECT_CONFIG_FILE);
        if project.is_file() {
            return parse_settings(project);
        }

        if let Some(home) = Self::default_path() {
            if home.is_file() {
                return parse_settings(&home);
            }
        }

        debug!("No settings file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Default per-user settings location (`~/.promptforge/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".promptforge").join("config.toml"))
    }

    /// The prompt base directory with `~` expanded. Empty stays empty.
    pub fn prompt_base_dir(&self) -> PathBuf {
        expand_dir(&self.prompt_base_dir)
    }

    /// The schema base directory with `~` expanded. Empty stays empty.
    pub fn schema_base_dir(&self) -> PathBuf {
        expand_dir(&self.schema_base_dir)
    }
}

fn expand_dir(raw: &str) -> PathBuf {
    if raw.is_empty() {
        PathBuf::new()
    } else {
        PathBuf::from(shellexpand::tilde(raw).into_owned())
    }
}

/// Parses a settings file, attaching the path to any failure.
pub fn parse_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let settings: Settings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
    debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.directive_pattern, "^(to|summary|defect)$");
        assert_eq!(settings.layer_pattern, "^(project|issue|task)$");
        assert_eq!(settings.prompt_base_dir(), PathBuf::from("prompts"));
        assert_eq!(settings.schema_base_dir(), PathBuf::from("schema"));
    }

    #[test]
    fn test_parse_full_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
directive_pattern = "^(to)$"
layer_pattern = "^(project)$"
prompt_base_dir = "/srv/prompts"
schema_base_dir = "/srv/schema"
"#,
        )
        .unwrap();

        let settings = parse_settings(&path).unwrap();
        assert_eq!(settings.directive_pattern, "^(to)$");
        assert_eq!(settings.prompt_base_dir(), PathBuf::from("/srv/prompts"));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "prompt_base_dir = \"/custom\"\n").unwrap();

        let settings = parse_settings(&path).unwrap();
        assert_eq!(settings.prompt_base_dir(), PathBuf::from("/custom"));
        // Untouched keys keep their defaults.
        assert_eq!(settings.directive_pattern, Settings::default().directive_pattern);
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "prompt_base_dir = [not toml").unwrap();

        let err = parse_settings(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_empty_base_dir_survives_expansion() {
        let settings = Settings {
            prompt_base_dir: String::new(),
            ..Settings::default()
        };
        // Empty must stay empty so the resolver can reject it, rather
        // than expanding to the current directory.
        assert_eq!(settings.prompt_base_dir(), PathBuf::new());
    }

    #[test]
    fn test_tilde_expansion() {
        let settings = Settings {
            prompt_base_dir: "~/prompts".to_string(),
            ..Settings::default()
        };
        let expanded = settings.prompt_base_dir();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("prompts"));
    }
}
