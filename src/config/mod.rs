//! Configuration management.
//!
//! Settings come from (lowest to highest priority) built-in defaults, a TOML
//! file, `CITESET_*` environment variables, and finally CLI flags applied by
//! the binary. Nested keys use a double underscore in environment variables,
//! e.g. `CITESET_OUTPUT__PATH=out.json` or
//! `CITESET_INPUT__URLS=https://a,https://b`.

mod file_config;

pub use file_config::ConfigFileError;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name searched in the working directory
pub const CONFIG_FILE_NAME: &str = "citeset.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CITESET";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input locations
    #[serde(default)]
    pub input: InputConfig,

    /// Output location
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP settings for page fetches
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Folder scanned for PDF files
    #[serde(default = "default_pdf_folder")]
    pub pdf_folder: PathBuf,

    /// Link registry CSV (optional)
    #[serde(default = "default_registry_path")]
    pub registry_path: Option<PathBuf>,

    /// Web pages to include, in order
    #[serde(default)]
    pub urls: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pdf_folder: default_pdf_folder(),
            registry_path: default_registry_path(),
            urls: Vec::new(),
        }
    }
}

impl InputConfig {
    /// Registry path, treating an empty path as "no registry"
    pub fn registry(&self) -> Option<&Path> {
        self.registry_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

fn default_pdf_folder() -> PathBuf {
    PathBuf::from("PDFs")
}

fn default_registry_path() -> Option<PathBuf> {
    Some(PathBuf::from("urls-for-document-references.csv"))
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Dataset file to write
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("citations.json")
}

/// HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    crate::utils::DEFAULT_TIMEOUT.as_secs()
}

fn default_user_agent() -> String {
    crate::utils::default_user_agent().to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_source())
        .build()?
        .try_deserialize()
}

/// Get the configuration from defaults and environment variables only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(env_source())
        .build()?
        .try_deserialize()
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("input.urls")
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("citeset").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.pdf_folder, PathBuf::from("PDFs"));
        assert_eq!(
            config.input.registry_path,
            Some(PathBuf::from("urls-for-document-references.csv"))
        );
        assert!(config.input.urls.is_empty());
        assert_eq!(config.output.path, PathBuf::from("citations.json"));
        assert_eq!(config.http.timeout(), Duration::from_secs(10));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_empty_registry_path_disables_registry() {
        let mut input = InputConfig::default();
        assert!(input.registry().is_some());

        input.registry_path = Some(PathBuf::new());
        assert_eq!(input.registry(), None);

        input.registry_path = None;
        assert_eq!(input.registry(), None);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("citeset.toml");
        std::fs::write(
            &path,
            r#"
[input]
pdf_folder = "/data/pdfs"
urls = ["https://example.com", "https://example.org"]

[output]
path = "/data/out.json"

[http]
timeout_seconds = 4

[logging]
level = "debug"
format = "json"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.input.pdf_folder, PathBuf::from("/data/pdfs"));
        assert_eq!(config.input.urls.len(), 2);
        assert_eq!(
            config.input.registry_path,
            Some(PathBuf::from("urls-for-document-references.csv"))
        );
        assert_eq!(config.output.path, PathBuf::from("/data/out.json"));
        assert_eq!(config.http.timeout_seconds, 4);
        assert_eq!(config.http.user_agent, crate::utils::default_user_agent());
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/citeset.toml"));
        assert!(result.is_err());
    }
}
