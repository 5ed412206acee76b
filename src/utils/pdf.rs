//! PDF reading utilities.
//!
//! This module wraps the lopdf crate to expose the three things the PDF
//! extractor needs: the page list in document order, the text layer of each
//! page, and the `/Title` entry of the document Info dictionary.

use lopdf::{Document, Object};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading a PDF
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("File not found or not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Failed to extract text from page {page}: {reason}")]
    PageText { page: u32, reason: String },
}

/// A loaded PDF document
#[derive(Debug)]
pub struct PdfDocument {
    document: Document,
}

impl PdfDocument {
    /// Load a PDF from disk.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let pdf = PdfDocument::open(Path::new("report.pdf"))?;
    /// println!("{} pages", pdf.page_count());
    /// ```
    pub fn open(path: &Path) -> Result<Self, PdfExtractError> {
        if !path.exists() {
            return Err(PdfExtractError::InvalidFile(format!(
                "File not found: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(PdfExtractError::InvalidFile(format!(
                "Not a file: {}",
                path.display()
            )));
        }

        let document =
            Document::load(path).map_err(|e| PdfExtractError::Parse(e.to_string()))?;
        Ok(Self { document })
    }

    /// Load a PDF from an in-memory buffer
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfExtractError> {
        let document =
            Document::load_mem(bytes).map_err(|e| PdfExtractError::Parse(e.to_string()))?;
        Ok(Self { document })
    }

    /// Page numbers in document order
    pub fn page_numbers(&self) -> Vec<u32> {
        self.document.get_pages().keys().copied().collect()
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Raw text layer of one page
    pub fn page_text(&self, page: u32) -> Result<String, PdfExtractError> {
        self.document
            .extract_text(&[page])
            .map_err(|e| PdfExtractError::PageText {
                page,
                reason: e.to_string(),
            })
    }

    /// Trimmed `/Title` from the Info dictionary, if present and non-empty
    pub fn metadata_title(&self) -> Option<String> {
        let info = self.resolve(self.document.trailer.get(b"Info").ok()?)?;
        let info = info.as_dict().ok()?;
        let title = match self.resolve(info.get(b"Title").ok()?)? {
            Object::String(bytes, _) => decode_text_string(bytes),
            _ => return None,
        };

        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    fn resolve<'a>(&'a self, object: &'a Object) -> Option<&'a Object> {
        match object {
            Object::Reference(id) => self.document.get_object(*id).ok(),
            other => Some(other),
        }
    }
}

/// Decode a PDF text string.
///
/// UTF-16BE and UTF-8 strings are recognised by their byte-order mark;
/// anything else is PDFDocEncoding, read here as Latin-1.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    if let Some(rest) = bytes.strip_prefix(b"\xEF\xBB\xBF") {
        return String::from_utf8_lossy(rest).into_owned();
    }

    bytes.iter().map(|&b| char::from(b)).collect()
}

/// In-memory PDF builder for tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a PDF with one page per entry of `pages`, each showing that text.
    pub fn sample_pdf(pages: &[&str], title: Option<&str>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
