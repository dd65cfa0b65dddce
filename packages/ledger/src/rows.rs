//! Row synthesis: vertical clustering and horizontal column assignment.
//!
//! Tokens are walked in the extraction layer's reading order. A token joins
//! the open row when its truncated `top` is within `row_tolerance` of the
//! row key, landing in the first band that contains it. A token further away
//! either wraps the open row's description (when it starts right of the
//! transaction-date band) or opens a new row.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use statement_ledger_models::{Column, ColumnBands, Row, StatementLayout, Table, Token};

/// Vertical coordinate identifying a row: the truncated `top` of the token
/// that opened it.
pub type RowKey = i64;

#[allow(clippy::cast_possible_truncation)]
fn row_key(token: &Token) -> RowKey {
    token.top.trunc() as RowKey
}

/// Rows under construction, keyed by [`RowKey`] and kept in first-seen
/// order.
#[derive(Debug, Default)]
struct RowAccumulator {
    order: Vec<RowKey>,
    rows: BTreeMap<RowKey, Row>,
}

impl RowAccumulator {
    fn append(&mut self, key: RowKey, column: Column, text: &str) {
        let row = match self.rows.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.order.push(key);
                entry.insert(Row::new())
            }
        };
        row.append(column, text);
    }

    fn into_table(mut self) -> Table {
        self.order
            .iter()
            .filter_map(|key| self.rows.remove(key))
            .collect()
    }
}

/// Groups the tokens in `first_index..=last_index` into rows.
///
/// The open row starts out keyed by the page's very first token, so a
/// wrapped line that precedes any opening token still lands in a row of its
/// own. Artifact glyphs are skipped.
#[must_use]
pub fn synthesize(
    first_index: usize,
    last_index: usize,
    tokens: &[Token],
    bands: &ColumnBands,
    layout: &StatementLayout,
) -> Table {
    let Some(page_start) = tokens.first() else {
        return Table::new();
    };
    let date_band_end = bands
        .band(Column::TransactionDate)
        .map_or(f64::NEG_INFINITY, |band| band.end);

    let mut current = row_key(page_start);
    let mut rows = RowAccumulator::default();

    let table_tokens = tokens
        .iter()
        .enumerate()
        .take(last_index.saturating_add(1))
        .skip(first_index);

    for (index, token) in table_tokens {
        if layout.is_artifact(&token.text) {
            continue;
        }

        let key = row_key(token);

        if key.abs_diff(current) <= layout.row_tolerance {
            if let Some(column) = bands.containing(token) {
                log::trace!("token {index} {:?} -> {column}", token.text);
                rows.append(current, column, &token.text);
            } else {
                log::trace!("token {index} {:?} falls outside every band", token.text);
            }
        } else if token.x0 > date_band_end {
            log::trace!("token {index} {:?} wraps row {current}", token.text);
            rows.append(current, Column::Description, &token.text);
        } else {
            current = key;
            rows.append(current, Column::TransactionDate, &token.text);
        }
    }

    let table = rows.into_table();
    log::debug!(
        "Synthesized {} rows from tokens {first_index}..={last_index}",
        table.len()
    );
    table
}
