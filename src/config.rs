use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "JSON_EXPLORER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "json-explorer.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Settings for the explorer. Every field is optional in the YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Spaces per level in the canonical text form.
    pub indent: usize,
    pub storage_path: PathBuf,
    /// Log destination; logging is off when unset.
    pub log_file: Option<PathBuf>,
    pub max_visible_rows: Option<usize>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            indent: crate::core::json_text::DEFAULT_INDENT,
            storage_path: PathBuf::from(".json-explorer/storage.json"),
            log_file: None,
            max_visible_rows: None,
        }
    }
}

impl ExplorerConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `$JSON_EXPLORER_CONFIG` if set, else `json-explorer.yaml` in the
    /// working directory if present, else defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV_VAR) {
            return Self::load_from(Path::new(&path));
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::load_from(fallback);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        assert_eq!(ExplorerConfig::from_yaml_str("").expect("empty"), ExplorerConfig::default());
    }

    #[test]
    fn partial_yaml_overrides_named_fields() {
        let config = ExplorerConfig::from_yaml_str("indent: 4\nlog_file: /tmp/explorer.log\n")
            .expect("valid yaml");
        assert_eq!(config.indent, 4);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/explorer.log")));
        assert_eq!(config.storage_path, ExplorerConfig::default().storage_path);
        assert_eq!(config.max_visible_rows, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(ExplorerConfig::from_yaml_str("indnet: 4").is_err());
    }

    #[test]
    fn load_from_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ExplorerConfig::load_from(&dir.path().join("absent.yaml")).expect_err("missing");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
