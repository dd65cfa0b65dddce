//! Raw cell text to typed values.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static STATEMENT_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Statement\s+Date\s*([\s\S]+?)\n").unwrap_or_else(|_| unreachable!())
});

/// Parses a statement date cell such as `"Jul 24 "` in the given year.
///
/// Returns `None` if the cell is not a `Mon DD` date.
#[must_use]
pub fn parse_statement_date(raw: &str, year: &str) -> Option<NaiveDate> {
    let value = format!("{} {}", raw.trim(), year.trim());
    NaiveDate::parse_from_str(&value, "%b %d %Y").ok()
}

/// Parses an amount cell such as `"1,234.56 "` or `"-12.34"`.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    cleaned.parse().ok()
}

/// Finds the statement year in the text of a statement's first page.
///
/// The year is the last four characters following `Statement Date` on the
/// same line, e.g. `Statement Date January 15, 2024`.
#[must_use]
pub fn statement_year(first_page_text: &str) -> Option<String> {
    let captures = STATEMENT_DATE_RE.captures(first_page_text)?;
    let statement_date = captures.get(1)?.as_str().trim_end();

    let year: String = statement_date
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year)
    } else {
        log::debug!("Statement date {statement_date:?} does not end in a year");
        None
    }
}
