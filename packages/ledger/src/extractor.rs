//! Per-page table extraction and document assembly.

use statement_ledger_models::{CardIdentity, Landmark, StatementLayout, Table, Token};

use crate::TableError;
use crate::bounds;
use crate::columns::build_bands;
use crate::locator::{Adjacent, locate};
use crate::progress::ProgressCallback;
use crate::rows::synthesize;

/// Extracts the transaction table from statement pages for one card.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    layout: StatementLayout,
    start: Landmark,
    ends: Vec<Landmark>,
}

impl TableExtractor {
    /// Creates an extractor for the given card using the default layout.
    #[must_use]
    pub fn new(card: &CardIdentity) -> Self {
        Self::with_layout(card, StatementLayout::default())
    }

    #[must_use]
    pub fn with_layout(card: &CardIdentity, layout: StatementLayout) -> Self {
        Self {
            start: layout.start_landmark(card),
            ends: layout.end_landmarks(card),
            layout,
        }
    }

    /// Index of the first table token, or `None` if the card-number line is
    /// absent.
    #[must_use]
    pub fn first_table_index(&self, tokens: &[Token]) -> Option<usize> {
        locate(
            std::slice::from_ref(&self.start),
            tokens,
            Adjacent::Right,
            &self.layout,
        )
    }

    /// Index of the last table token, or `None` if no footer phrase is
    /// present.
    #[must_use]
    pub fn last_table_index(&self, tokens: &[Token]) -> Option<usize> {
        locate(&self.ends, tokens, Adjacent::Left, &self.layout)
    }

    /// Extracts one page's table.
    ///
    /// A page without the start or end landmark (a cover page, a summary
    /// page) yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::HeaderNotFound`] when the table boundaries are
    /// present but the column header is not.
    pub fn extract_page(&self, tokens: &[Token]) -> Result<Table, TableError> {
        let (Some(first), Some(last)) = (self.first_table_index(tokens), self.last_table_index(tokens))
        else {
            log::debug!("No table landmarks among {} tokens", tokens.len());
            return Ok(Table::new());
        };

        let Some(table_bounds) = bounds::resolve(first, last, tokens, self.layout.right_margin)
        else {
            return Ok(Table::new());
        };
        log::debug!("Table tokens {first}..={last}, bounds {table_bounds:?}");

        let bands = build_bands(&table_bounds, tokens, &self.layout)?;

        Ok(synthesize(first, last, tokens, &bands, &self.layout))
    }

    /// Extracts every page of a document and concatenates the tables in
    /// page order, skipping the layout's leading pages.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Page`] wrapping the first page whose header
    /// could not be found.
    pub fn extract_document<P: AsRef<[Token]>>(
        &self,
        pages: &[P],
        progress: &dyn ProgressCallback,
    ) -> Result<Table, TableError> {
        let skip = self.layout.skip_leading_pages.min(pages.len());
        progress.set_total((pages.len() - skip) as u64);

        let mut tables = Vec::with_capacity(pages.len() - skip);
        for (number, page) in pages.iter().enumerate().skip(skip) {
            progress.set_message(format!("page {}", number + 1));
            let table = self
                .extract_page(page.as_ref())
                .map_err(|e| TableError::Page {
                    page: number + 1,
                    source: Box::new(e),
                })?;
            log::debug!("Page {}: {} rows", number + 1, table.len());
            tables.push(table);
            progress.inc(1);
        }

        let table = assemble(tables);
        progress.finish(format!("{} rows", table.len()));
        Ok(table)
    }
}

/// Concatenates per-page tables in order.
#[must_use]
pub fn assemble<I: IntoIterator<Item = Table>>(tables: I) -> Table {
    tables.into_iter().fold(Table::new(), |mut acc, table| {
        acc.append(table);
        acc
    })
}
