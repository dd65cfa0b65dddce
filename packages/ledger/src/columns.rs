//! Column band derivation from the header row.
//!
//! The header phrase `date date Description Spend Categories Amount($)` is
//! located left-adjacent, and the left edges of the header words at fixed
//! offsets from that index give the column boundaries.

use statement_ledger_models::{Column, ColumnBand, ColumnBands, StatementLayout, TableBounds, Token};

use crate::TableError;
use crate::locator::{Adjacent, locate};

/// Offset from the header index to the post-date `date` label.
pub const POST_DATE_OFFSET: usize = 2;
/// Offset from the header index to the `Description` label.
pub const DESCRIPTION_OFFSET: usize = 3;
/// Offset from the header index to the `Spend` label (first word of
/// `Spend Categories`).
pub const CATEGORY_OFFSET: usize = 4;
/// Offset from the header index to the `Amount($)` label.
pub const AMOUNT_OFFSET: usize = 6;

/// Derives one band per [`Column`] from the header row.
///
/// Each boundary is the header word's `x0` minus `band_margin`, which biases
/// tokens sitting on a boundary toward the band on their right.
///
/// # Errors
///
/// Returns [`TableError::HeaderNotFound`] if the header phrase is missing
/// from the token stream.
pub fn build_bands(
    bounds: &TableBounds,
    tokens: &[Token],
    layout: &StatementLayout,
) -> Result<ColumnBands, TableError> {
    let header = layout.header_landmark();
    let Some(index) = locate(std::slice::from_ref(&header), tokens, Adjacent::Left, layout)
    else {
        log::warn!("Table bounds found but header {:?} is missing", layout.header_landmark);
        return Err(TableError::HeaderNotFound);
    };

    let header_word = |offset: usize| tokens.get(index + offset).ok_or(TableError::HeaderNotFound);

    let post_date_start = header_word(POST_DATE_OFFSET)?.x0 - layout.band_margin;
    let description_start = header_word(DESCRIPTION_OFFSET)?.x0 - layout.band_margin;
    let category_start = header_word(CATEGORY_OFFSET)?.x0 - layout.band_margin;
    let amount_header = header_word(AMOUNT_OFFSET)?;
    let amount_start = amount_header.x0 - layout.band_margin;
    let amount_end = bounds.right.max(amount_header.x1);

    let bands = ColumnBands::new(vec![
        ColumnBand {
            column: Column::TransactionDate,
            start: bounds.left,
            end: post_date_start,
        },
        ColumnBand {
            column: Column::PostDate,
            start: post_date_start,
            end: description_start,
        },
        ColumnBand {
            column: Column::Description,
            start: description_start,
            end: category_start,
        },
        ColumnBand {
            column: Column::Category,
            start: category_start,
            end: amount_start,
        },
        ColumnBand {
            column: Column::Amount,
            start: amount_start,
            end: amount_end,
        },
    ]);

    for band in bands.iter() {
        log::debug!("{} band: {}..{}", band.column, band.start, band.end);
    }

    Ok(bands)
}
