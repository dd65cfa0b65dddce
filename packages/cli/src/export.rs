//! CSV export of enriched transactions.

use std::io::Write;

use statement_ledger_models::{Column, Transaction};

/// Columns added by enrichment, after the ledger's own [`Column`]s.
const MERCHANT_HEADERS: [&str; 3] = ["province", "city", "store_name"];

/// Header row, in [`Transaction`] field order.
fn headers() -> Vec<String> {
    Column::ALL
        .iter()
        .map(|column| column.as_ref().to_owned())
        .chain(MERCHANT_HEADERS.map(str::to_owned))
        .collect()
}

/// Writes `transactions` as CSV with a header row. Dates are written as
/// `YYYY-MM-DD` and missing values as empty fields.
///
/// # Errors
///
/// Returns a [`csv::Error`] if serialization or the underlying writer fails.
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(&headers())?;
    for transaction in transactions {
        csv_writer.serialize(transaction)?;
    }
    csv_writer.flush()?;

    Ok(())
}
