//! Operator-facing diagnostics.
//!
//! Extraction never fails outright; problems are reported through a
//! [`DiagnosticSink`] and the run continues. [`TracingSink`] forwards to
//! `tracing` for the CLI, [`MemorySink`] keeps everything for inspection.

use std::sync::Mutex;

use crate::sources::CitationError;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// A single diagnostic message, optionally carrying the recovered error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub error: Option<CitationError>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            error: None,
        }
    }

    /// Diagnostic for an error that was caught and recovered from
    pub fn failure(error: CitationError) -> Self {
        Self {
            level: error.level(),
            message: error.to_string(),
            error: Some(error),
        }
    }
}

/// Receiver for diagnostics emitted during a run
pub trait DiagnosticSink: Send + Sync + std::fmt::Debug {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<'a> dyn DiagnosticSink + 'a {
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(Diagnostic::new(Level::Debug, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Diagnostic::new(Level::Info, message));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(Diagnostic::new(Level::Warn, message));
    }

    pub fn failure(&self, error: CitationError) {
        self.emit(Diagnostic::failure(error));
    }
}

/// Forwards diagnostics to the global `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Debug => tracing::debug!("{}", diagnostic.message),
            Level::Info => tracing::info!("{}", diagnostic.message),
            Level::Warn => tracing::warn!("{}", diagnostic.message),
            Level::Error => tracing::error!("{}", diagnostic.message),
        }
    }
}

/// Collects diagnostics in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, in order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|d| d.message.clone()).collect()
    }

    /// Recovered errors, in order
    pub fn failures(&self) -> Vec<CitationError> {
        self.lock().iter().filter_map(|d| d.error.clone()).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}
