#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Token streams for credit-card statement documents.
//!
//! Statements arrive either as PDFs, decoded with pure-Rust text extraction
//! ([`pdf_extract`]) into positioned word tokens by [`words`], or as JSON
//! token dumps ([`dump`]) saved by another extraction tool. Both end up as a
//! [`StatementDocument`]: the document's tokens, one `Vec` per page, ready
//! for [`statement_ledger::TableExtractor`].

pub mod dump;
pub mod words;

use std::path::{Path, PathBuf};

use statement_ledger::TableExtractor;
use statement_ledger::progress::ProgressCallback;
use statement_ledger_models::{Table, Token};

/// Errors specific to statement document loading and extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF decoding or word extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// A token dump could not be read or written.
    #[error("Token dump error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension is neither `.pdf` nor `.json`.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The statement table could not be reconstructed.
    #[error("Table error: {0}")]
    Table(#[from] statement_ledger::TableError),
}

/// Kind of document, from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    TokenDump,
}

impl DocumentFormat {
    /// Detects the format from the path's extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "json" => Some(Self::TokenDump),
            _ => None,
        }
    }
}

/// A statement document as a token stream per page.
#[derive(Debug, Clone)]
pub struct StatementDocument {
    source: PathBuf,
    pages: Vec<Vec<Token>>,
}

impl StatementDocument {
    /// Wraps already extracted pages.
    #[must_use]
    pub fn from_pages(source: impl Into<PathBuf>, pages: Vec<Vec<Token>>) -> Self {
        Self {
            source: source.into(),
            pages,
        }
    }

    /// Loads a PDF or a JSON token dump, depending on the extension.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::UnsupportedFormat`] for other extensions,
    /// [`PdfError::Io`] if the file cannot be read, and
    /// [`PdfError::Extraction`] / [`PdfError::Json`] if it cannot be decoded.
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| PdfError::UnsupportedFormat(path.display().to_string()))?;

        let pages = match format {
            DocumentFormat::Pdf => {
                let bytes = std::fs::read(path)?;
                log::debug!("Read {} bytes from {}", bytes.len(), path.display());
                words::extract_pages(&bytes)?
            }
            DocumentFormat::TokenDump => {
                let file = std::fs::File::open(path)?;
                dump::read_dump(std::io::BufReader::new(file))?
            }
        };

        log::info!("Loaded {} pages from {}", pages.len(), path.display());

        Ok(Self::from_pages(path, pages))
    }

    #[must_use]
    pub fn pages(&self) -> &[Vec<Token>] {
        &self.pages
    }

    /// The document's first page re-flowed into text, for searching
    /// statement-level details such as the statement date.
    #[must_use]
    pub fn first_page_text(&self) -> Option<String> {
        self.pages.first().map(|page| page_text(page))
    }

    /// Reconstructs the transaction table across all pages.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Table`] if a page has table boundaries but no
    /// recoverable header.
    pub fn extract_ledger(
        &self,
        extractor: &TableExtractor,
        progress: &dyn ProgressCallback,
    ) -> Result<Table, PdfError> {
        let table = extractor.extract_document(&self.pages, progress)?;
        log::info!(
            "Extracted {} rows from {}",
            table.len(),
            self.source.display()
        );
        Ok(table)
    }
}

/// Re-flows a page's tokens into text: tokens on the same line are joined
/// with a space, and a newline starts whenever a token's top moves by more
/// than half its height. The text always ends with a newline.
#[must_use]
pub fn page_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut line_top: Option<f64> = None;

    for token in tokens {
        let tolerance = (token.bottom - token.top).abs() / 2.0;
        match line_top {
            Some(top) if (token.top - top).abs() <= tolerance => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        text.push_str(&token.text);
        line_top = Some(token.top);
    }

    if !text.is_empty() {
        text.push('\n');
    }
    text
}
