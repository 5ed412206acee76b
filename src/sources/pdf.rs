//! PDF extractor: one citation record per page.

use std::path::Path;
use std::sync::Arc;

use super::{CitationError, LinkRegistry};
use crate::models::{CitationRecord, LinkRegistryEntry};
use crate::utils::{normalize_whitespace, DiagnosticSink, PdfDocument};

/// A provider of candidate document titles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// Title column of the link registry
    Registry,
    /// `/Title` in the PDF Info dictionary
    Metadata,
    /// File name without extension
    FileStem,
}

/// Providers in the order they are consulted
pub const TITLE_PRECEDENCE: [TitleSource; 3] = [
    TitleSource::Registry,
    TitleSource::Metadata,
    TitleSource::FileStem,
];

/// Everything the title providers can draw from
#[derive(Debug, Clone, Copy)]
pub struct TitleContext<'a> {
    pub entry: Option<&'a LinkRegistryEntry>,
    pub metadata_title: Option<&'a str>,
    pub file_name: &'a str,
}

impl TitleSource {
    /// This provider's candidate, if it has a non-empty one
    pub fn candidate<'a>(&self, ctx: &TitleContext<'a>) -> Option<&'a str> {
        let candidate = match self {
            TitleSource::Registry => ctx.entry.and_then(LinkRegistryEntry::title),
            TitleSource::Metadata => ctx.metadata_title,
            TitleSource::FileStem => Path::new(ctx.file_name)
                .file_stem()
                .and_then(|stem| stem.to_str()),
        };
        candidate.map(str::trim).filter(|title| !title.is_empty())
    }
}

/// Walk [`TITLE_PRECEDENCE`] and return the first non-empty title with the
/// provider that supplied it. Falls back to the raw file name.
pub fn resolve_title(ctx: &TitleContext<'_>) -> (TitleSource, String) {
    TITLE_PRECEDENCE
        .iter()
        .find_map(|source| source.candidate(ctx).map(|title| (*source, title.to_string())))
        .unwrap_or_else(|| (TitleSource::FileStem, ctx.file_name.to_string()))
}

/// Extracts per-page citation records from PDF files
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    sink: Arc<dyn DiagnosticSink>,
}

impl PdfExtractor {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Extract one record per page of `path`, in page order.
    ///
    /// A file that cannot be opened or parsed is reported and contributes no
    /// records. A page without an extractable text layer yields an empty
    /// `text`.
    pub fn extract(&self, path: &Path, registry: &LinkRegistry) -> Vec<CitationRecord> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().trim().to_string())
            .unwrap_or_default();

        let entry = registry.get(&file_name);
        if entry.is_none() {
            self.sink.debug(format!(
                "No registry mapping found for file: '{}' (key: '{}')",
                file_name,
                LinkRegistry::lookup_key(&file_name)
            ));
        }

        let document = match PdfDocument::open(path) {
            Ok(document) => document,
            Err(e) => {
                self.sink.failure(CitationError::PdfRead {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return Vec::new();
            }
        };

        let metadata_title = document.metadata_title();
        let (title_source, title) = resolve_title(&TitleContext {
            entry,
            metadata_title: metadata_title.as_deref(),
            file_name: &file_name,
        });
        self.sink.debug(format!(
            "Resolved title '{}' for '{}' from {:?}",
            title, file_name, title_source
        ));

        let web_link = entry.and_then(LinkRegistryEntry::web_link).map(str::to_string);

        let mut records = Vec::with_capacity(document.page_count());
        for (page_number, page) in (1u32..).zip(document.page_numbers()) {
            let text = match document.page_text(page) {
                Ok(raw) => normalize_whitespace(&raw),
                Err(e) => {
                    self.sink
                        .debug(format!("No text extracted from '{}': {}", path.display(), e));
                    String::new()
                }
            };

            records.push(CitationRecord::pdf_page(
                title.clone(),
                page_number,
                text,
                web_link.clone(),
            ));
        }

        records
    }
}
