//! Word-level token extraction from PDF content streams.
//!
//! The document is parsed with [`lopdf`], and [`pdf_extract`] reports one
//! glyph at a time through its [`OutputDev`] trait. [`WordCollector`]
//! groups consecutive glyphs into word [`Token`]s the way table-oriented
//! extractors do: a word ends at whitespace, at a
//! horizontal gap wider than [`X_TOLERANCE`], or when the baseline moves by
//! more than [`Y_TOLERANCE`]. Coordinates are flipped so the origin is the
//! top-left corner of the page.
//!
//! Content streams may draw text in any order, so each finished page is put
//! into reading order: tokens are clustered into lines by `top` within
//! [`Y_TOLERANCE`], lines run top to bottom, and each line runs by `x0`.

use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use statement_ledger_models::Token;

use crate::PdfError;

/// Maximum horizontal gap between glyphs of the same word.
pub const X_TOLERANCE: f64 = 3.0;

/// Maximum baseline shift between glyphs of the same word.
pub const Y_TOLERANCE: f64 = 3.0;

#[derive(Debug)]
struct PendingWord {
    text: String,
    x0: f64,
    x1: f64,
    top: f64,
    bottom: f64,
}

impl PendingWord {
    fn accepts(&self, x0: f64, bottom: f64) -> bool {
        (bottom - self.bottom).abs() <= Y_TOLERANCE && x0 >= self.x0 && x0 <= self.x1 + X_TOLERANCE
    }

    fn into_token(self) -> Token {
        Token {
            text: self.text,
            x0: self.x0,
            x1: self.x1,
            top: self.top,
            bottom: self.bottom,
        }
    }
}

/// An [`OutputDev`] that collects word tokens, one `Vec` per page.
#[derive(Debug, Default)]
pub struct WordCollector {
    pages: Vec<Vec<Token>>,
    /// Top edge of the current page's media box, in PDF units.
    page_top: f64,
    pending: Option<PendingWord>,
}

impl WordCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finishes collection and returns the tokens of every page.
    #[must_use]
    pub fn into_pages(mut self) -> Vec<Vec<Token>> {
        self.finish_page();
        self.pages
    }

    fn start_page(&mut self, page_top: f64) {
        self.finish_page();
        self.page_top = page_top;
        self.pages.push(Vec::new());
    }

    fn finish_page(&mut self) {
        self.flush();
        if let Some(page) = self.pages.last_mut() {
            let tokens = std::mem::take(page);
            *page = reading_order(tokens);
        }
    }

    fn flush(&mut self) {
        let Some(word) = self.pending.take() else {
            return;
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(word.into_token());
        }
    }

    /// Adds one glyph given in PDF user space (origin bottom-left).
    fn push_pdf_glyph(&mut self, glyph: &str, x: f64, y: f64, advance: f64, size: f64) {
        let baseline = self.page_top - y;
        self.push_glyph(glyph, x, x + advance, baseline - size, baseline);
    }

    /// Adds one glyph, already in top-left page coordinates.
    fn push_glyph(&mut self, glyph: &str, x0: f64, x1: f64, top: f64, bottom: f64) {
        if glyph.trim().is_empty() {
            self.flush();
            return;
        }

        match &mut self.pending {
            Some(word) if word.accepts(x0, bottom) => {
                word.text.push_str(glyph);
                word.x1 = word.x1.max(x1);
                word.top = word.top.min(top);
                word.bottom = word.bottom.max(bottom);
            }
            _ => {
                self.flush();
                self.pending = Some(PendingWord {
                    text: glyph.to_owned(),
                    x0,
                    x1,
                    top,
                    bottom,
                });
            }
        }
    }
}

/// Sorts a page's tokens into reading order.
fn reading_order(mut tokens: Vec<Token>) -> Vec<Token> {
    tokens.sort_by(|a, b| a.top.total_cmp(&b.top));

    let mut lines: Vec<Vec<Token>> = Vec::new();
    let mut line_top = f64::NEG_INFINITY;
    for token in tokens {
        let top = token.top;
        match lines.last_mut() {
            Some(line) if top - line_top <= Y_TOLERANCE => line.push(token),
            _ => lines.push(vec![token]),
        }
        line_top = top;
    }

    lines
        .into_iter()
        .flat_map(|mut line| {
            line.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            line
        })
        .collect()
}

impl OutputDev for WordCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.start_page(media_box.ury);
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.finish_page();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let scale = trm.m11.mul_add(trm.m22, -(trm.m12 * trm.m21)).abs().sqrt();
        let size = font_size * scale;
        self.push_pdf_glyph(char, trm.m31, trm.m32, width * size, size);
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        self.flush();
        Ok(())
    }
}

/// Decodes a PDF and returns the word tokens of every page, in page order.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the document cannot be parsed or its
/// content streams cannot be interpreted.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<Vec<Token>>, PdfError> {
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|e| PdfError::Extraction(format!("failed to load PDF: {e}")))?;

    let mut collector = WordCollector::new();
    pdf_extract::output_doc(&document, &mut collector)
        .map_err(|e| PdfError::Extraction(format!("failed to extract words from PDF: {e:?}")))?;

    let pages = collector.into_pages();
    log::debug!(
        "Extracted {} tokens across {} pages",
        pages.iter().map(Vec::len).sum::<usize>(),
        pages.len()
    );

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(collector: &mut WordCollector, text: &str, mut x: f64, baseline: f64) {
        for ch in text.chars() {
            let glyph = ch.to_string();
            collector.push_glyph(&glyph, x, x + 5.0, baseline - 7.0, baseline);
            x += 5.0;
        }
    }

    #[test]
    fn spaces_split_words() {
        let mut collector = WordCollector::new();
        collector.start_page(792.0);
        glyphs(&mut collector, "Jul 24", 36.0, 215.0);

        let pages = collector.into_pages();

        let words: Vec<&str> = pages[0].iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["Jul", "24"]);
        assert_eq!(pages[0][0], Token::new("Jul", 36.0, 51.0, 208.0, 215.0));
    }

    #[test]
    fn horizontal_gap_splits_words() {
        let mut collector = WordCollector::new();
        collector.start_page(792.0);
        glyphs(&mut collector, "Some", 122.0, 215.0);
        glyphs(&mut collector, "Restaurant", 150.0, 215.0);

        let pages = collector.into_pages();

        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[0][1].x0, 150.0);
    }

    #[test]
    fn baseline_change_splits_words() {
        let mut collector = WordCollector::new();
        collector.start_page(792.0);
        glyphs(&mut collector, "AMZN", 122.0, 215.0);
        glyphs(&mut collector, "Mktp", 142.0, 224.0);

        let pages = collector.into_pages();

        let words: Vec<&str> = pages[0].iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["AMZN", "Mktp"]);
    }

    #[test]
    fn page_tokens_come_out_in_reading_order() {
        let mut collector = WordCollector::new();
        collector.start_page(792.0);
        glyphs(&mut collector, "Coffee", 122.0, 215.0);
        glyphs(&mut collector, "Tea", 122.0, 233.0);
        glyphs(&mut collector, "4.25", 520.0, 215.0);
        glyphs(&mut collector, "Jul", 36.0, 216.0);

        let pages = collector.into_pages();

        let words: Vec<&str> = pages[0].iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["Jul", "Coffee", "4.25", "Tea"]);
    }

    #[test]
    fn each_page_is_ordered_when_it_ends() {
        let mut collector = WordCollector::new();
        collector.start_page(792.0);
        glyphs(&mut collector, "Total", 36.0, 300.0);
        glyphs(&mut collector, "Card", 36.0, 200.0);
        collector.end_page().unwrap();
        collector.start_page(792.0);
        glyphs(&mut collector, "Page", 36.0, 100.0);

        let pages = collector.into_pages();

        assert_eq!(pages[0][0].text, "Card");
        assert_eq!(pages[0][1].text, "Total");
        assert_eq!(pages[1][0].text, "Page");
    }

    #[test]
    fn page_is_flipped_around_media_box_top() {
        let mut collector = WordCollector::new();
        let media_box = MediaBox {
            llx: 0.0,
            lly: 50.0,
            urx: 612.0,
            ury: 842.0,
        };
        collector.begin_page(1, &media_box, None).unwrap();
        collector.push_pdf_glyph("A", 36.0, 742.0, 6.0, 8.0);

        let pages = collector.into_pages();

        assert_eq!(pages[0][0], Token::new("A", 36.0, 42.0, 92.0, 100.0));
    }

    #[test]
    fn words_stay_on_their_page() {
        let mut collector = WordCollector::new();
        collector.start_page(792.0);
        glyphs(&mut collector, "Cover", 36.0, 100.0);
        collector.start_page(792.0);
        glyphs(&mut collector, "Table", 36.0, 100.0);

        let pages = collector.into_pages();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0][0].text, "Cover");
        assert_eq!(pages[1][0].text, "Table");
    }

    #[test]
    fn garbage_bytes_are_an_extraction_error() {
        let result = extract_pages(b"not a pdf");
        assert!(matches!(result, Err(PdfError::Extraction(_))));
    }
}
