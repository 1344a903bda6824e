use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_LANDING_TERM: &str = "movie";

const ENV_API_KEY: &str = "OMDB_API_KEY";
const ENV_BASE_URL: &str = "OMDB_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing API key (set OMDB_API_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("base URL must use https: {0}")]
    InsecureBaseUrl(String),

    #[error("landing search term must not be empty")]
    EmptyLandingTerm,

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub landing_term: Option<String>,
}

/// Runtime configuration for the movie service client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub landing_term: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            landing_term: DEFAULT_LANDING_TERM.to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Platform directories for config, cache and log files.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "movie-finder", "movie-finder")
}

impl AppConfig {
    /// Default location of `config.json`.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Resolve defaults, config file, `.env`/environment and overrides, in
    /// that order, and validate the result.
    pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        config.validate()?;

        tracing::debug!(base_url = %config.base_url, landing_term = %config.landing_term, "configuration loaded");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
            self.api_key = key;
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            self.base_url = url;
        }
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(key) = &overrides.api_key {
            self.api_key = key.clone();
        }
        if let Some(url) = &overrides.base_url {
            self.base_url = url.clone();
        }
        if let Some(term) = &overrides.landing_term {
            self.landing_term = term.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "https" {
            return Err(ConfigError::InsecureBaseUrl(self.base_url.clone()));
        }
        if self.landing_term.trim().is_empty() {
            return Err(ConfigError::EmptyLandingTerm);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid() -> AppConfig {
        AppConfig {
            api_key: "abc123".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_default_configuration() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.landing_term, "movie");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_validate_rejects_plain_http() {
        let config = AppConfig {
            base_url: "http://www.omdbapi.com/".to_string(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InsecureBaseUrl(_))));
    }

    #[test]
    fn test_validate_rejects_garbage_url_and_blank_fields() {
        let config = AppConfig {
            base_url: "::not a url".to_string(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl { .. })));

        let config = AppConfig {
            landing_term: "   ".to_string(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyLandingTerm)));

        let config = AppConfig {
            request_timeout_secs: 0,
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_env_then_overrides_take_precedence() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            "OMDB_API_KEY" => Some("from-env".to_string()),
            "OMDB_BASE_URL" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        config.apply_overrides(&ConfigOverrides {
            api_key: Some("from-cli".to_string()),
            base_url: None,
            landing_term: Some("batman".to_string()),
        });
        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.landing_term, "batman");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_key": "filekey", "landing_term": "star"}}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_key, "filekey");
        assert_eq!(config.landing_term, "star");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid config file"));
    }
}
