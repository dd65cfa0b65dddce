//! JSON token dumps.
//!
//! A dump is the token stream of a whole document, saved by an external
//! extraction tool: an array of pages, each an array of
//! `{"text", "x0", "x1", "top", "bottom"}` objects.

use std::io::{Read, Write};

use statement_ledger_models::Token;

use crate::PdfError;

/// Reads a token dump.
///
/// # Errors
///
/// Returns [`PdfError::Json`] if the input is not a valid dump.
pub fn read_dump<R: Read>(reader: R) -> Result<Vec<Vec<Token>>, PdfError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Writes pages of tokens as a dump.
///
/// # Errors
///
/// Returns [`PdfError::Json`] if serialization or the underlying write
/// fails.
pub fn write_dump<W: Write>(writer: W, pages: &[Vec<Token>]) -> Result<(), PdfError> {
    serde_json::to_writer_pretty(writer, pages)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_pages_of_tokens() {
        let json = r#"[
            [],
            [
                {"text": "Jul", "x0": 36, "x1": 45, "top": 208, "bottom": 215},
                {"text": "24", "x0": 47.5, "x1": 56, "top": 208, "bottom": 215}
            ]
        ]"#;

        let pages = read_dump(json.as_bytes()).unwrap();

        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_empty());
        assert_eq!(pages[1][1], Token::new("24", 47.5, 56.0, 208.0, 215.0));
    }

    #[test]
    fn written_dump_reads_back() {
        let pages = vec![vec![Token::new("Page", 481.0, 500.0, 513.0, 522.0)]];
        let mut buffer = Vec::new();

        write_dump(&mut buffer, &pages).unwrap();

        assert_eq!(read_dump(buffer.as_slice()).unwrap(), pages);
    }

    #[test]
    fn malformed_dump_is_rejected() {
        let result = read_dump(r#"[[{"text": "Jul"}]]"#.as_bytes());
        assert!(matches!(result, Err(PdfError::Json(_))));
    }
}
