#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Transaction table reconstruction from positioned PDF text tokens.
//!
//! Credit-card statements are laid out as a table, but PDF text extraction
//! only yields a flat list of words with bounding boxes. This crate recovers
//! the table from that list, one page at a time:
//!
//! 1. [`locator`] finds the table's start (the masked card-number line) and
//!    end (the page footer or card total) by landmark phrase matching.
//! 2. [`bounds`] turns the two boundary tokens into a rectangle.
//! 3. [`columns`] derives one horizontal band per column from the header row.
//! 4. [`rows`] clusters tokens into rows vertically and assigns them to bands
//!    horizontally, folding wrapped description lines into the row above.
//! 5. [`extractor`] runs the steps per page and concatenates pages in order.
//!
//! A missing landmark is not an error (the page simply has no table). A
//! page whose table boundaries exist but whose header cannot be found fails
//! with [`TableError::HeaderNotFound`].

pub mod bounds;
pub mod columns;
pub mod extractor;
pub mod locator;
pub mod progress;
pub mod rows;

pub use extractor::{TableExtractor, assemble};
pub use statement_ledger_models as models;

/// Errors raised while reconstructing a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table boundaries were found but the column header phrase was not,
    /// so no column structure can be derived.
    #[error("Table headers were not found")]
    HeaderNotFound,

    /// A page of a multi-page document failed.
    #[error("Page {page}: {source}")]
    Page {
        /// One-based page number.
        page: usize,
        #[source]
        source: Box<Self>,
    },
}
