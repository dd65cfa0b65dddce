//! Statements in, enriched transactions out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use statement_ledger::progress::ProgressCallback;
use statement_ledger::{TableExtractor, assemble};
use statement_ledger_enrich::{enrich_table, statement_year};
use statement_ledger_models::Transaction;
use statement_ledger_pdf::{PdfError, StatementDocument, dump};

/// Inputs for one run over a set of statements.
pub struct Pipeline<'a> {
    pub extractor: &'a TableExtractor,
    pub default_year: &'a str,
    /// Directory to save each document's token stream into, as JSON.
    pub dump_dir: Option<&'a Path>,
}

impl Pipeline<'_> {
    /// Extracts every document in order, concatenates their ledgers, and
    /// enriches the result. The statement year comes from the first
    /// document's first page.
    ///
    /// `pages_progress` creates a progress indicator for one document's
    /// pages, given its file name.
    ///
    /// # Errors
    ///
    /// Returns a [`PdfError`] if any document cannot be loaded or its
    /// table cannot be reconstructed.
    pub fn run(
        &self,
        documents: &[PathBuf],
        progress: &dyn ProgressCallback,
        pages_progress: &dyn Fn(&str) -> Arc<dyn ProgressCallback>,
    ) -> Result<Vec<Transaction>, PdfError> {
        let mut tables = Vec::with_capacity(documents.len());
        let mut year = None;

        for (index, path) in documents.iter().enumerate() {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            progress.set_message(format!("Parsing {name}"));

            let document = StatementDocument::open(path)?;
            if let Some(dir) = self.dump_dir {
                save_tokens(dir, path, &document)?;
            }

            if index == 0 {
                year = document
                    .first_page_text()
                    .as_deref()
                    .and_then(statement_year);
            }

            let pages = pages_progress(&name);
            tables.push(document.extract_ledger(self.extractor, pages.as_ref())?);
            progress.inc(1);
        }

        let year = year.unwrap_or_else(|| {
            log::info!(
                "No statement date found, using default year {}",
                self.default_year
            );
            self.default_year.to_owned()
        });
        log::debug!("Statement year {year}");

        Ok(enrich_table(&assemble(tables), &year))
    }
}

fn save_tokens(dir: &Path, source: &Path, document: &StatementDocument) -> Result<(), PdfError> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(source.with_extension("json").file_name().unwrap_or_default());
    if target == source {
        log::warn!("Not overwriting token dump {}", source.display());
        return Ok(());
    }

    let file = std::fs::File::create(&target)?;
    dump::write_dump(std::io::BufWriter::new(file), document.pages())?;
    log::info!("Saved tokens to {}", target.display());

    Ok(())
}
