//! # citeset
//!
//! Builds a citation dataset from local PDF documents and web pages. Every
//! PDF page and every web page becomes one [`CitationRecord`] carrying its
//! text and provenance (title, page number, link), and the whole run is
//! written as a single `{"citations": [...]}` JSON document.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (CitationRecord, Dataset, LinkRegistryEntry)
//! - [`sources`]: Link registry plus the PDF and web extractors
//! - [`dataset`]: The builder that runs extractors and writes the output
//! - [`utils`]: Text normalization, HTTP client, PDF reading, diagnostics
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use citeset::dataset::DatasetBuilder;
//! use citeset::utils::{HttpClient, TracingSink, DEFAULT_TIMEOUT};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let builder = DatasetBuilder::new(HttpClient::new(DEFAULT_TIMEOUT)?, Arc::new(TracingSink));
//! let summary = builder
//!     .build(
//!         Path::new("PDFs"),
//!         &["https://example.com".to_string()],
//!         Some(Path::new("urls-for-document-references.csv")),
//!         Path::new("citations.json"),
//!     )
//!     .await;
//! println!("{} records", summary.records());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dataset;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use dataset::{BuildSummary, DatasetBuilder};
pub use models::{CitationRecord, Dataset, SourceType};
pub use sources::{CitationError, LinkRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
