//! Citation record model shared by every extractor.

use serde::{Deserialize, Serialize};

/// Where a citation record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Pdf,
    Web,
}

impl SourceType {
    /// Returns the identifier used in the serialized dataset
    pub fn id(&self) -> &'static str {
        match self {
            SourceType::Pdf => "pdf",
            SourceType::Web => "web",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One extracted unit of text with its provenance.
///
/// PDF records carry a page number and optionally the registry web link;
/// web records carry the original URL and a `null` page number. Use
/// [`CitationRecord::pdf_page`] or [`CitationRecord::web_page`] to build one
/// so those fields stay consistent with `source_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    /// Kind of source the text was extracted from
    pub source_type: SourceType,

    /// Resolved document title
    pub document_title: String,

    /// 1-based page number, `null` for web pages
    #[serde(default)]
    pub page_number: Option<u32>,

    /// Whitespace-normalized text
    pub text: String,

    /// Canonical link supplied by the registry (PDF only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,

    /// Original source URL (web only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CitationRecord {
    /// Create a record for one page of a PDF document
    pub fn pdf_page(
        document_title: impl Into<String>,
        page_number: u32,
        text: impl Into<String>,
        web_link: Option<String>,
    ) -> Self {
        Self {
            source_type: SourceType::Pdf,
            document_title: document_title.into(),
            page_number: Some(page_number),
            text: text.into(),
            web_link: web_link.filter(|link| !link.is_empty()),
            url: None,
        }
    }

    /// Create a record for a whole web page
    pub fn web_page(
        document_title: impl Into<String>,
        text: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            source_type: SourceType::Web,
            document_title: document_title.into(),
            page_number: None,
            text: text.into(),
            web_link: None,
            url: Some(url.into()),
        }
    }
}

/// The full output of one run, serialized as `{"citations": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub citations: Vec<CitationRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records in order
    pub fn extend(&mut self, records: impl IntoIterator<Item = CitationRecord>) {
        self.citations.extend(records);
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    /// Count records of a given source type
    pub fn count_of(&self, source_type: SourceType) -> usize {
        self.citations
            .iter()
            .filter(|record| record.source_type == source_type)
            .count()
    }
}
