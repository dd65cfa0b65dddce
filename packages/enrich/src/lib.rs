#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed, enriched transactions from raw ledger rows.
//!
//! The ledger core returns every cell as raw text. This crate parses dates
//! (statements print `Mon DD` without a year, so the statement year is
//! supplied separately) and amounts, and derives the merchant's province,
//! city, and store name from the description.

pub mod convert;
pub mod describe;

use statement_ledger_models::{Column, Row, Table, Transaction};

pub use convert::{parse_amount, parse_statement_date, statement_year};
pub use describe::{Merchant, UNKNOWN, describe};

/// Converts one raw row into a [`Transaction`].
#[must_use]
pub fn enrich_row(row: &Row, year: &str) -> Transaction {
    let description = row.get(Column::Description).trim().to_owned();
    let amount = parse_amount(row.get(Column::Amount));
    let Merchant {
        province,
        city,
        store_name,
    } = describe(&description, amount);

    Transaction {
        transaction_date: parse_statement_date(row.get(Column::TransactionDate), year),
        post_date: parse_statement_date(row.get(Column::PostDate), year),
        category: row.get(Column::Category).trim().to_owned(),
        description,
        amount,
        province,
        city,
        store_name,
    }
}

/// Converts every row of a table, in order.
#[must_use]
pub fn enrich_table(table: &Table, year: &str) -> Vec<Transaction> {
    let transactions: Vec<Transaction> =
        table.rows().iter().map(|row| enrich_row(row, year)).collect();

    let unparsed = transactions.iter().filter(|t| t.amount.is_none()).count();
    if unparsed > 0 {
        log::warn!("{unparsed} of {} rows have no parseable amount", transactions.len());
    }

    transactions
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn raw_row() -> Row {
        Row::from_cells([
            (Column::TransactionDate, "Jul 24 "),
            (Column::PostDate, "Jul 26 "),
            (Column::Description, "Some Restaurant TORONTO ON "),
            (Column::Category, "Restaurants "),
            (Column::Amount, "73.66 "),
        ])
    }

    #[test]
    fn enriches_a_raw_row() {
        let transaction = enrich_row(&raw_row(), "2024");

        assert_eq!(
            transaction,
            Transaction {
                transaction_date: NaiveDate::from_ymd_opt(2024, 7, 24),
                post_date: NaiveDate::from_ymd_opt(2024, 7, 26),
                description: "Some Restaurant TORONTO ON".to_owned(),
                category: "Restaurants".to_owned(),
                amount: Some(73.66),
                province: "ON".to_owned(),
                city: "TORONTO".to_owned(),
                store_name: "Some Restaurant TORONTO ON".to_owned(),
            }
        );
    }

    #[test]
    fn missing_cells_become_empty_values() {
        let row = Row::from_cells([(Column::Description, "Payment thank you ")]);

        let transaction = enrich_row(&row, "2024");

        assert_eq!(transaction.transaction_date, None);
        assert_eq!(transaction.amount, None);
        assert_eq!(transaction.category, "");
        assert_eq!(transaction.province, UNKNOWN);
    }

    #[test]
    fn empty_table_enriches_to_nothing() {
        assert!(enrich_table(&Table::new(), "2024").is_empty());
    }

    #[test]
    fn table_rows_keep_their_order() {
        let table: Table = vec![
            raw_row(),
            Row::from_cells([(Column::Amount, "-5.00"), (Column::Description, "REFUND")]),
        ]
        .into_iter()
        .collect();

        let transactions = enrich_table(&table, "2023");

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].amount, Some(-5.0));
        assert_eq!(transactions[1].store_name, UNKNOWN);
    }
}
