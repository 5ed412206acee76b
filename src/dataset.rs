//! Dataset builder: runs every extractor and writes the combined output.
//!
//! A run loads the link registry once, extracts every PDF in the input
//! folder (in directory order), then every URL (in the given order), and
//! serializes all records as one pretty-printed JSON document. Inputs are
//! processed one at a time; a failure on one input never stops the run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::models::{Dataset, SourceType};
use crate::sources::{CitationError, LinkRegistry, PdfExtractor, WebExtractor};
use crate::utils::{DiagnosticSink, HttpClient};

/// File extension, compared case-insensitively
const PDF_EXTENSION: &str = ".pdf";

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// PDF files found in the input folder
    pub pdf_files: usize,
    /// URLs attempted
    pub urls: usize,
    /// Records produced from PDFs
    pub pdf_records: usize,
    /// Records produced from web pages
    pub web_records: usize,
    /// Whether the output file was written
    pub written: bool,
}

impl BuildSummary {
    /// Total records in the dataset
    pub fn records(&self) -> usize {
        self.pdf_records + self.web_records
    }
}

/// Whether a directory entry name looks like a PDF
pub fn is_pdf_file_name(name: &str) -> bool {
    name.to_lowercase().ends_with(PDF_EXTENSION)
}

/// List PDF entries of `folder` in directory enumeration order (unsorted)
pub fn list_pdf_files(folder: &Path) -> Result<Vec<PathBuf>, CitationError> {
    let folder_error = |reason: String| CitationError::FolderRead {
        path: folder.to_path_buf(),
        reason,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(|e| folder_error(e.to_string()))? {
        let entry = entry.map_err(|e| folder_error(e.to_string()))?;
        if is_pdf_file_name(&entry.file_name().to_string_lossy()) {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// Write `dataset` as indented JSON with non-ASCII characters unescaped
pub fn write_dataset(dataset: &Dataset, output: &Path) -> Result<(), CitationError> {
    let write_error = |reason: String| CitationError::OutputWrite {
        path: output.to_path_buf(),
        reason,
    };

    let file = File::create(output).map_err(|e| write_error(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dataset).map_err(|e| write_error(e.to_string()))?;
    writer.flush().map_err(|e| write_error(e.to_string()))
}

/// Orchestrates one dataset run
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    pdf: PdfExtractor,
    web: WebExtractor,
    sink: Arc<dyn DiagnosticSink>,
}

impl DatasetBuilder {
    pub fn new(client: HttpClient, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            pdf: PdfExtractor::new(Arc::clone(&sink)),
            web: WebExtractor::new(client, Arc::clone(&sink)),
            sink,
        }
    }

    /// Build from configuration, creating the HTTP client it describes
    pub fn from_config(config: &Config, sink: Arc<dyn DiagnosticSink>) -> Result<Self, CitationError> {
        let client = HttpClient::with_user_agent(&config.http.user_agent, config.http.timeout())
            .map_err(|e| CitationError::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self::new(client, sink))
    }

    /// Run the whole pipeline and write `output`.
    ///
    /// Never fails; every problem is reported through the diagnostic sink.
    pub async fn build(
        &self,
        folder: &Path,
        urls: &[String],
        registry_source: Option<&Path>,
        output: &Path,
    ) -> BuildSummary {
        let registry = match registry_source {
            Some(path) => LinkRegistry::load(path, self.sink.as_ref()),
            None => LinkRegistry::empty(),
        };

        let (dataset, mut summary) = self.collect(folder, urls, &registry).await;

        match write_dataset(&dataset, output) {
            Ok(()) => {
                summary.written = true;
                self.sink.info(format!(
                    "Successfully wrote {} citations to '{}'",
                    dataset.len(),
                    output.display()
                ));
            }
            Err(e) => self.sink.failure(e),
        }

        summary
    }

    /// Extract every PDF in `folder`, then every URL, into one dataset
    pub async fn collect(
        &self,
        folder: &Path,
        urls: &[String],
        registry: &LinkRegistry,
    ) -> (Dataset, BuildSummary) {
        let mut dataset = Dataset::new();
        let mut summary = BuildSummary::default();

        match list_pdf_files(folder) {
            Ok(files) => {
                summary.pdf_files = files.len();
                for path in files {
                    self.sink.info(format!("Processing PDF: {}", path.display()));
                    dataset.extend(self.pdf.extract(&path, registry));
                }
            }
            Err(e) => self.sink.failure(e),
        }

        for url in urls {
            self.sink.info(format!("Processing URL: {}", url));
            dataset.extend(self.web.extract(url).await);
        }

        summary.urls = urls.len();
        summary.pdf_records = dataset.count_of(SourceType::Pdf);
        summary.web_records = dataset.count_of(SourceType::Web);
        (dataset, summary)
    }
}
