//! Citation sources: the link registry and the PDF and web extractors.
//!
//! Each extractor turns one input (a PDF file or a URL) into zero or more
//! [`CitationRecord`](crate::models::CitationRecord)s. Extractors never
//! return errors to their caller: every failure is converted into a
//! [`CitationError`], reported through a
//! [`DiagnosticSink`](crate::utils::DiagnosticSink), and the input simply
//! contributes fewer records.
//!
//! # Title precedence for PDFs
//!
//! 1. Registry title for the file name, if non-empty
//! 2. `/Title` from the PDF Info dictionary, if non-empty
//! 3. File name without its extension

mod pdf;
mod registry;
mod web;

pub use pdf::{resolve_title, PdfExtractor, TitleContext, TitleSource, TITLE_PRECEDENCE};
pub use registry::{
    parse_registry, LinkRegistry, RegistryParse, RegistryParseError, SkippedRow,
    DOCUMENT_NAME_COLUMN, TITLE_COLUMN, WEB_LINK_COLUMN,
};
pub use web::{parse_page, sniff_meta_charset, ParsedPage, WebExtractor};

use std::path::PathBuf;

use crate::utils::Level;

/// Errors recovered during a run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CitationError {
    /// Registry source unreadable or malformed
    #[error("Error loading link registry from '{path}': {reason}")]
    RegistryLoad { path: PathBuf, reason: String },

    /// A registry row without a usable document name
    #[error("Skipping registry row {line}: {reason}")]
    RegistryRow { line: u64, reason: String },

    /// PDF file unreadable or unparseable
    #[error("Error processing PDF '{path}': {reason}")]
    PdfRead { path: PathBuf, reason: String },

    /// Network failure, timeout, or non-success HTTP status
    #[error("Error retrieving URL '{url}': {reason}")]
    WebFetch { url: String, reason: String },

    /// Input folder could not be listed
    #[error("Error reading PDF folder '{path}': {reason}")]
    FolderRead { path: PathBuf, reason: String },

    /// Output file could not be written
    #[error("Error writing to file '{path}': {reason}")]
    OutputWrite { path: PathBuf, reason: String },

    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CitationError {
    /// Severity used when this error is reported as a diagnostic
    pub fn level(&self) -> Level {
        match self {
            CitationError::RegistryLoad { .. } | CitationError::RegistryRow { .. } => Level::Warn,
            _ => Level::Error,
        }
    }
}
