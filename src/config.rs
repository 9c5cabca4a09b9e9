use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Browser-like identity sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for fetching, downloading and exporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// User-Agent header sent with page and download requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for the page fetch, in seconds
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Timeout for video and file downloads, in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// Directory that downloads and exported documents are written to
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Downloads older than this are removed by cleanup
    #[serde(default = "default_max_file_age_hours")]
    pub max_file_age_hours: u64,
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn max_file_age(&self) -> Duration {
        Duration::from_secs(self.max_file_age_hours * 3600)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            page_timeout_secs: default_page_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
            download_dir: default_download_dir(),
            max_file_age_hours: default_max_file_age_hours(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_page_timeout_secs() -> u64 {
    30
}

fn default_download_timeout_secs() -> u64 {
    60
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_max_file_age_hours() -> u64 {
    24
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = HarvestConfig::from_json(r#"{"page_timeout_secs": 5}"#).unwrap();
        assert_eq!(config.page_timeout(), Duration::from_secs(5));
        assert_eq!(config.download_timeout(), Duration::from_secs(60));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert_eq!(config.max_file_age(), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"download_dir": "/tmp/harvest", "max_file_age_hours": 2}}"#).unwrap();

        let config = HarvestConfig::from_file(file.path()).unwrap();
        assert_eq!(config.download_dir, PathBuf::from("/tmp/harvest"));
        assert_eq!(config.max_file_age_hours, 2);
        assert_eq!(config.page_timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_and_bad_json() {
        let err = HarvestConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        let err = HarvestConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
