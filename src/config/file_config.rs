//! Configuration file support for citeset.
//!
//! # Configuration File Format
//!
//! ```toml
//! [input]
//! pdf_folder = "PDFs"
//! registry_path = "urls-for-document-references.csv"
//! urls = [
//!     "https://transform.england.nhs.uk/",
//! ]
//!
//! [output]
//! path = "citations.json"
//!
//! [http]
//! timeout_seconds = 10
//! user_agent = "citeset/0.1.0"
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```
//!
//! Set `registry_path = ""` to run without a link registry.

use std::path::Path;

use super::Config;

impl Config {
    /// Parse a configuration from TOML text (no environment overrides)
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigFileError> {
        toml::from_str(content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Render this configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
