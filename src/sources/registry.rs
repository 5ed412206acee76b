//! Link registry: document file name to registry title and web link.
//!
//! The registry is a CSV export with (at least) the columns `Document Name`,
//! `Title` and `Web Link`. Parsing is a pure function, [`parse_registry`],
//! which returns the mapping together with the rows it had to skip;
//! [`LinkRegistry::load`] wraps it with file access and diagnostics and never
//! fails.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::CitationError;
use crate::models::LinkRegistryEntry;
use crate::utils::DiagnosticSink;

/// Column holding the document file name
pub const DOCUMENT_NAME_COLUMN: &str = "Document Name";
/// Column holding the display title
pub const TITLE_COLUMN: &str = "Title";
/// Column holding the canonical web link
pub const WEB_LINK_COLUMN: &str = "Web Link";

/// Positions of the registry columns within the header row
#[derive(Debug, Clone, Copy, Default)]
struct Columns {
    document_name: Option<usize>,
    title: Option<usize>,
    web_link: Option<usize>,
}

impl Columns {
    /// Locate each column by name. A repeated name resolves to its last
    /// occurrence.
    fn locate(headers: &csv::StringRecord) -> Self {
        let last = |name: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| *header == name)
                .map(|(index, _)| index)
                .last()
        };
        Self {
            document_name: last(DOCUMENT_NAME_COLUMN),
            title: last(TITLE_COLUMN),
            web_link: last(WEB_LINK_COLUMN),
        }
    }
}

/// Cell at `index`, or `None` when the column is unknown or the row is short
fn cell(record: &csv::StringRecord, index: Option<usize>) -> Option<&str> {
    index.and_then(|i| record.get(i))
}

/// A registry row that was not loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source
    pub line: u64,
    pub reason: String,
}

/// Result of parsing a registry source
#[derive(Debug, Clone, Default)]
pub struct RegistryParse {
    /// Header names as detected (trimmed)
    pub headers: Vec<String>,
    pub entries: HashMap<String, LinkRegistryEntry>,
    pub skipped: Vec<SkippedRow>,
}

/// Reasons a registry source cannot be parsed at all
#[derive(Debug, thiserror::Error)]
pub enum RegistryParseError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("source is not valid UTF-8")]
    Encoding,

    #[error("missing header row")]
    MissingHeader,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse a registry CSV.
///
/// A leading UTF-8 byte-order mark is ignored and header names are trimmed.
/// Unknown columns are ignored, short rows are accepted, and a repeated
/// column name reads from its last occurrence. Rows without a
/// document name are reported in [`RegistryParse::skipped`]. When two rows
/// name the same document, the later one wins.
pub fn parse_registry<R: Read>(mut reader: R) -> Result<RegistryParse, RegistryParseError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let content = String::from_utf8(raw).map_err(|_| RegistryParseError::Encoding)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers = csv_reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(RegistryParseError::MissingHeader);
    }

    let columns = Columns::locate(&headers);
    let mut parsed = RegistryParse {
        headers: headers.iter().map(str::to_string).collect(),
        ..Default::default()
    };

    let mut record = csv::StringRecord::new();
    while csv_reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let key = cell(&record, columns.document_name)
            .map(LinkRegistry::lookup_key)
            .unwrap_or_default();
        if key.is_empty() {
            parsed.skipped.push(SkippedRow {
                line,
                reason: format!("'{}' value not found in row", DOCUMENT_NAME_COLUMN),
            });
            continue;
        }

        let entry = LinkRegistryEntry::new(
            cell(&record, columns.title).unwrap_or_default(),
            cell(&record, columns.web_link).unwrap_or_default(),
        );
        parsed.entries.insert(key, entry);
    }

    Ok(parsed)
}

/// Read-only mapping from normalized file name to registry entry
#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    entries: HashMap<String, LinkRegistryEntry>,
}

impl LinkRegistry {
    /// A registry with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a registry file.
    ///
    /// Any failure is reported through `sink` and yields an empty registry.
    pub fn load(path: &Path, sink: &dyn DiagnosticSink) -> Self {
        let parsed = std::fs::File::open(path)
            .map_err(RegistryParseError::from)
            .and_then(parse_registry);

        match parsed {
            Ok(parsed) => Self::from_parse(parsed, path, sink),
            Err(e) => {
                sink.failure(CitationError::RegistryLoad {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                Self::empty()
            }
        }
    }

    fn from_parse(parsed: RegistryParse, path: &Path, sink: &dyn DiagnosticSink) -> Self {
        sink.debug(format!("Registry headers: {:?}", parsed.headers));

        if !parsed.headers.iter().any(|h| h == DOCUMENT_NAME_COLUMN) {
            sink.warn(format!(
                "Registry '{}' has no '{}' column",
                path.display(),
                DOCUMENT_NAME_COLUMN
            ));
        }

        for skipped in parsed.skipped {
            sink.failure(CitationError::RegistryRow {
                line: skipped.line,
                reason: skipped.reason,
            });
        }

        sink.info(format!(
            "Loaded {} registry entries from '{}'",
            parsed.entries.len(),
            path.display()
        ));

        Self {
            entries: parsed.entries,
        }
    }

    /// Normalize a file name into a registry key (trimmed, lower-cased)
    pub fn lookup_key(file_name: &str) -> String {
        file_name.trim().to_lowercase()
    }

    /// Register an entry under a file name
    pub fn insert(&mut self, file_name: &str, entry: LinkRegistryEntry) {
        self.entries.insert(Self::lookup_key(file_name), entry);
    }

    /// Look up a file name, case-insensitively
    pub fn get(&self, file_name: &str) -> Option<&LinkRegistryEntry> {
        self.entries.get(&Self::lookup_key(file_name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, LinkRegistryEntry)> for LinkRegistry {
    fn from_iter<I: IntoIterator<Item = (String, LinkRegistryEntry)>>(iter: I) -> Self {
        let mut registry = Self::empty();
        for (file_name, entry) in iter {
            registry.insert(&file_name, entry);
        }
        registry
    }
}
