//! Process-wide configuration, loaded once at startup.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults ([`Config::default`])
//! 2. an optional JSON config file (`{"statePath": "/var/lib/terrastate"}`)
//! 3. command-line flags and their environment variables ([`Overrides`])

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default request body limit. State documents for large environments run
/// to several megabytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Directory holding state documents and lock markers. Created on
    /// startup if absent.
    #[serde(alias = "statepath")]
    pub state_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            state_path: PathBuf::from("state"),
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub state_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_body_bytes: Option<usize>,
}

/// Errors from loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    /// Reads a JSON config file. Missing keys keep their defaults; unknown
    /// keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the effective configuration from an optional file plus
    /// overrides.
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        Ok(base.apply(overrides))
    }

    fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(state_path) = overrides.state_path {
            self.state_path = state_path;
        }
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(max_body_bytes) = overrides.max_body_bytes {
            self.max_body_bytes = max_body_bytes;
        }
        self
    }

    /// `host:port` for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_without_file() {
        let config = Config::load(None, Overrides::default()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn file_keys_are_camel_case() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(
            tmp.path(),
            r#"{"statePath": "/var/lib/terrastate", "port": 8080, "maxBodyBytes": 1024}"#,
        );
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.state_path, PathBuf::from("/var/lib/terrastate"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_body_bytes, 1024);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn lowercase_statepath_is_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(tmp.path(), r#"{"statepath": "/srv/state", "debug": false}"#);
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.state_path, PathBuf::from("/srv/state"));
    }

    #[test]
    fn overrides_win_over_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(tmp.path(), r#"{"statePath": "/from/file", "port": 8080}"#);
        let config = Config::load(
            Some(&path),
            Overrides {
                state_path: Some(PathBuf::from("/from/flag")),
                host: Some("127.0.0.1".to_string()),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(config.state_path, PathBuf::from("/from/flag"));
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn unreadable_and_invalid_files_are_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(&tmp.path().join("missing.json")),
            Err(ConfigError::Read { .. })
        ));

        let path = write_config(tmp.path(), "{ not json");
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
