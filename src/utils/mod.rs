//! Utility modules supporting citation extraction.
//!
//! - [`normalize_whitespace`]: Collapse whitespace runs and trim extracted text
//! - [`HttpClient`]: HTTP client with a bounded per-request timeout
//! - [`PdfDocument`]: Page list, per-page text, and Info title of a PDF
//! - [`DiagnosticSink`]: Injectable receiver for operator diagnostics
//!
//! # Diagnostics
//!
//! ```rust
//! use citeset::utils::{DiagnosticSink, MemorySink};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let dyn_sink: Arc<dyn DiagnosticSink> = sink.clone();
//! dyn_sink.info("Processing PDF: report.pdf");
//! assert_eq!(sink.messages(), vec!["Processing PDF: report.pdf"]);
//! ```

mod diagnostics;
mod http;
mod pdf;
mod text;

pub use diagnostics::{Diagnostic, DiagnosticSink, Level, MemorySink, TracingSink};
pub use http::{default_user_agent, HttpClient, DEFAULT_TIMEOUT};
pub use pdf::{decode_text_string, PdfDocument, PdfExtractError};
pub use text::normalize_whitespace;

#[cfg(test)]
pub(crate) use pdf::fixtures;
