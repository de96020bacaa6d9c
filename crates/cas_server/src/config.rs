//! Server configuration: defaults, then an optional TOML file, then the
//! `LOG_FORMAT` environment variable, then command-line flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::telemetry::LogFormat;

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    /// Longest accepted problem text, in characters.
    pub max_problem_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_format: LogFormat::Pretty,
            max_problem_len: 2000,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        Self::from_toml(&content, &shown)
    }

    /// Apply `LOG_FORMAT` if set.
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(value) = std::env::var(LOG_FORMAT_ENV) {
            self.log_format = value.parse()?;
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr(), "0.0.0.0:8000");
        assert_eq!(c.max_problem_len, 2000);
        assert_eq!(c.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9090\nlog_format = \"json\"").unwrap();
        let c = ServerConfig::load(file.path()).unwrap();
        assert_eq!(c.port, 9090);
        assert_eq!(c.log_format, LogFormat::Json);
        assert_eq!(c.host, "0.0.0.0");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = ServerConfig::from_toml("prot = 1", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::load(Path::new("/nonexistent/solver.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
