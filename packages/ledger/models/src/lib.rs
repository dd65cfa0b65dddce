#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared data types for statement ledger reconstruction.
//!
//! A PDF text-extraction layer produces [`Token`]s (one word plus its
//! bounding box). The ledger core turns a page's tokens into a [`Table`] of
//! [`Row`]s keyed by [`Column`], and the enrichment layer turns those raw
//! rows into typed [`Transaction`]s.
//!
//! Layout constants (landmark phrases, margins, tolerances) live in
//! [`layout::StatementLayout`].

pub mod layout;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

pub use layout::{CardIdentity, Landmark, LandmarkElement, LayoutError, StatementLayout};

/// A single word-level text fragment and its bounding box in page
/// coordinates (origin top-left, `x0 < x1`, `top < bottom`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The extracted word.
    pub text: String,
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Token {
    /// Creates a token from its text and bounding box.
    #[must_use]
    pub fn new(text: &str, x0: f64, x1: f64, top: f64, bottom: f64) -> Self {
        Self {
            text: text.to_owned(),
            x0,
            x1,
            top,
            bottom,
        }
    }
}

/// The rectangle enclosing a page's transaction table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableBounds {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// Output columns of a reconstructed ledger table, in left-to-right order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Column {
    TransactionDate,
    PostDate,
    Description,
    Category,
    Amount,
}

impl Column {
    /// All columns in declaration (left-to-right) order.
    pub const ALL: [Self; 5] = [
        Self::TransactionDate,
        Self::PostDate,
        Self::Description,
        Self::Category,
        Self::Amount,
    ];
}

/// A named horizontal interval on the page representing one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBand {
    pub column: Column,
    pub start: f64,
    pub end: f64,
}

impl ColumnBand {
    /// Whether the token lies inside this band.
    ///
    /// Containment is exclusive on the left and inclusive on the right, so a
    /// token sitting exactly on a shared boundary belongs to one band only.
    #[must_use]
    pub fn contains(&self, token: &Token) -> bool {
        self.start < token.x0 && token.x1 <= self.end
    }
}

/// The full set of column bands for one page, in [`Column::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBands {
    bands: Vec<ColumnBand>,
}

impl ColumnBands {
    /// Builds the band set from `(column, start, end)` triples. Bands are
    /// kept sorted by column so lookups are reproducible regardless of the
    /// order they were supplied in.
    #[must_use]
    pub fn new(mut bands: Vec<ColumnBand>) -> Self {
        bands.sort_by_key(|band| band.column);
        Self { bands }
    }

    /// Returns the band for `column`, if present.
    #[must_use]
    pub fn band(&self, column: Column) -> Option<&ColumnBand> {
        self.bands.iter().find(|band| band.column == column)
    }

    /// Returns the first band (in column order) that contains the token.
    #[must_use]
    pub fn containing(&self, token: &Token) -> Option<Column> {
        self.bands
            .iter()
            .find(|band| band.contains(token))
            .map(|band| band.column)
    }

    /// Iterates over the bands in column order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnBand> {
        self.bands.iter()
    }
}

/// One reconstructed table row: column name to accumulated cell text.
///
/// Cell text is every token assigned to the cell, each followed by a single
/// space, in encounter order. Columns that never received a token read as
/// the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: BTreeMap<Column, String>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token's text to the given cell.
    pub fn append(&mut self, column: Column, text: &str) {
        let cell = self.cells.entry(column).or_insert_with(String::new);
        cell.push_str(text);
        cell.push(' ');
    }

    /// Returns the raw cell text, or `""` when the cell is empty.
    #[must_use]
    pub fn get(&self, column: Column) -> &str {
        self.cells.get(&column).map_or("", String::as_str)
    }

    /// Builds a row directly from cell values (mostly useful for tests and
    /// for callers that already hold parsed cells).
    #[must_use]
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = (Column, S)>,
        S: Into<String>,
    {
        Self {
            cells: cells
                .into_iter()
                .map(|(column, value)| (column, value.into()))
                .collect(),
        }
    }
}

/// An ordered sequence of rows in top-to-bottom reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends every row of `other` after this table's rows.
    pub fn append(&mut self, other: Self) {
        self.rows.extend(other);
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Table {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// A fully typed and enriched statement transaction, ready for export.
///
/// Field order matches the exported CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub transaction_date: Option<NaiveDate>,
    pub post_date: Option<NaiveDate>,
    pub description: String,
    pub category: String,
    pub amount: Option<f64>,
    pub province: String,
    pub city: String,
    pub store_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_are_snake_case() {
        let names: Vec<String> = Column::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec![
                "transaction_date",
                "post_date",
                "description",
                "category",
                "amount"
            ]
        );
        assert_eq!(Column::PostDate.as_ref(), "post_date");
    }

    #[test]
    fn band_containment_is_left_exclusive_right_inclusive() {
        let band = ColumnBand {
            column: Column::PostDate,
            start: 68.0,
            end: 112.0,
        };
        assert!(!band.contains(&Token::new("a", 68.0, 80.0, 0.0, 1.0)));
        assert!(band.contains(&Token::new("b", 68.5, 112.0, 0.0, 1.0)));
        assert!(!band.contains(&Token::new("c", 100.0, 112.5, 0.0, 1.0)));
    }

    #[test]
    fn bands_resolve_boundary_token_to_single_column() {
        let bands = ColumnBands::new(vec![
            ColumnBand {
                column: Column::PostDate,
                start: 50.0,
                end: 100.0,
            },
            ColumnBand {
                column: Column::TransactionDate,
                start: 0.0,
                end: 50.0,
            },
        ]);
        let on_edge = Token::new("x", 40.0, 50.0, 0.0, 1.0);
        assert_eq!(bands.containing(&on_edge), Some(Column::TransactionDate));
        let starts_on_edge = Token::new("y", 50.0, 60.0, 0.0, 1.0);
        assert_eq!(bands.containing(&starts_on_edge), None);
        assert_eq!(
            bands.iter().map(|b| b.column).collect::<Vec<_>>(),
            vec![Column::TransactionDate, Column::PostDate]
        );
    }

    #[test]
    fn row_accumulates_with_trailing_space() {
        let mut row = Row::new();
        row.append(Column::Description, "Some");
        row.append(Column::Description, "Restaurant");
        assert_eq!(row.get(Column::Description), "Some Restaurant ");
        assert_eq!(row.get(Column::Amount), "");
    }

    #[test]
    fn table_append_preserves_order() {
        let mut first: Table = vec![Row::from_cells([(Column::Amount, "1.00 ")])]
            .into_iter()
            .collect();
        let second: Table = vec![
            Row::from_cells([(Column::Amount, "2.00 ")]),
            Row::from_cells([(Column::Amount, "3.00 ")]),
        ]
        .into_iter()
        .collect();

        first.append(second);

        let amounts: Vec<&str> = first.rows().iter().map(|r| r.get(Column::Amount)).collect();
        assert_eq!(amounts, vec!["1.00 ", "2.00 ", "3.00 "]);
    }

    #[test]
    fn token_deserializes_from_extraction_json() {
        let token: Token = serde_json::from_str(
            r#"{"text": "Jul", "x0": 36, "x1": 45, "top": 208, "bottom": 215}"#,
        )
        .unwrap();
        assert_eq!(token, Token::new("Jul", 36.0, 45.0, 208.0, 215.0));
    }
}
