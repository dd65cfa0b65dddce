//! Table rectangle from the first and last table-token indices.

use statement_ledger_models::{TableBounds, Token};

/// Computes the table's extent from its first and last tokens.
///
/// `left`/`top` come from the first token, `bottom` from the last token,
/// and `right` is the last token's `x1` widened by `right_margin`.
///
/// Returns `None` if either index is outside the stream. Callers only reach
/// this once both landmarks have been found.
#[must_use]
pub fn resolve(
    first_index: usize,
    last_index: usize,
    tokens: &[Token],
    right_margin: f64,
) -> Option<TableBounds> {
    let first = tokens.get(first_index)?;
    let last = tokens.get(last_index)?;

    Some(TableBounds {
        top: first.top,
        left: first.x0,
        bottom: last.bottom,
        right: last.x1 + right_margin,
    })
}
