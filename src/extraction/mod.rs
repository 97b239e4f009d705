//! Document text extraction for `.txt`, `.pdf`, and `.docx` files.
//!
//! The format is chosen by file extension. Failures are reported as [`ExtractionError`]
//! variants; callers never inspect returned text for error markers.

use crate::processing::FailureKind;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Plain UTF-8 text (`.txt`).
    PlainText,
    /// Portable Document Format (`.pdf`).
    Pdf,
    /// Office Open XML word processing document (`.docx`).
    Word,
}

/// Errors raised while obtaining text from a file.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The extension is not one of the supported formats.
    #[error("Unsupported file format: {0}. Only .txt, .pdf, and .docx are supported.")]
    UnsupportedFormat(String),
    /// The file could not be read.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    /// The PDF could not be parsed.
    #[error("PDF read error: {0}")]
    Pdf(String),
    /// The Word document could not be parsed.
    #[error("DOCX read error: {0}")]
    Word(String),
    /// The blocking extraction task did not complete.
    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

impl ExtractionError {
    /// Category of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnsupportedFormat(_) => FailureKind::UnsupportedFormat,
            _ => FailureKind::Extraction,
        }
    }
}

/// Format-specific text extraction.
pub trait TextExtractor: Send + Sync {
    /// Read the file at `path` and return its text.
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Detect the document format from the file extension (case-insensitive).
pub fn detect_format(path: &Path) -> Result<DocumentFormat, ExtractionError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => Ok(DocumentFormat::PlainText),
        "pdf" => Ok(DocumentFormat::Pdf),
        "docx" => Ok(DocumentFormat::Word),
        "" => Err(ExtractionError::UnsupportedFormat("(no extension)".into())),
        other => Err(ExtractionError::UnsupportedFormat(format!(".{other}"))),
    }
}

/// Return the extractor for `format`.
pub fn extractor_for(format: DocumentFormat) -> Box<dyn TextExtractor> {
    match format {
        DocumentFormat::PlainText => Box::new(PlainTextExtractor),
        DocumentFormat::Pdf => Box::new(PdfExtractor),
        DocumentFormat::Word => Box::new(WordExtractor),
    }
}

/// Check the path, pick an extractor by extension, and read the text.
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    if !path.exists() {
        return Err(ExtractionError::NotFound(path.to_path_buf()));
    }
    let format = detect_format(path)?;
    tracing::debug!(path = %path.display(), ?format, "Extracting document text");
    extractor_for(format).extract(path)
}

/// Run [`extract_text`] on the blocking thread pool.
pub async fn extract_text_blocking(path: PathBuf) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&path))
        .await
        .map_err(|error| ExtractionError::Worker(error.to_string()))?
}

/// Reads `.txt` files as UTF-8.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Extracts the text layer of `.pdf` files.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        pdf_extract::extract_text(path).map_err(|error| ExtractionError::Pdf(error.to_string()))
    }
}

/// Extracts paragraph text from `.docx` files, one line per paragraph.
pub struct WordExtractor;

impl TextExtractor for WordExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path)?;
        let docx =
            docx_rs::read_docx(&bytes).map_err(|error| ExtractionError::Word(error.to_string()))?;

        let mut text = String::new();
        for child in &docx.document.children {
            let DocumentChild::Paragraph(paragraph) = child else {
                continue;
            };
            for paragraph_child in &paragraph.children {
                let ParagraphChild::Run(run) = paragraph_child else {
                    continue;
                };
                for run_child in &run.children {
                    if let RunChild::Text(fragment) = run_child {
                        text.push_str(&fragment.text);
                    }
                }
            }
            text.push('\n');
        }
        Ok(text)
    }
}
