//! Statement layout configuration.
//!
//! [`StatementLayout`] holds every tunable constant of the statement format:
//! the landmark phrases that anchor the table, the margins applied to the
//! derived geometry, and the glyphs known to be decoding artifacts. The
//! default value describes the CIBC credit-card statement layout; a TOML
//! file can override any subset of fields.

use serde::Deserialize;

/// Literal that stands for "any single token" inside a landmark phrase.
pub const WILDCARD: &str = "_";

/// Placeholder replaced with the card's first four digits.
const FIRST_FOUR_PLACEHOLDER: &str = "{first}";

/// Placeholder replaced with the card's last four digits.
const LAST_FOUR_PLACEHOLDER: &str = "{last}";

/// Errors raised while loading a layout override.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The TOML document could not be parsed into a layout.
    #[error("Invalid layout TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// The first and last four digits of the statement's masked card number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardIdentity {
    pub first_four: String,
    pub last_four: String,
}

impl CardIdentity {
    #[must_use]
    pub fn new(first_four: &str, last_four: &str) -> Self {
        Self {
            first_four: first_four.to_owned(),
            last_four: last_four.to_owned(),
        }
    }
}

/// One element of a landmark phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandmarkElement {
    /// Matches a token whose text is exactly this string.
    Literal(String),
    /// Matches any single token.
    Wildcard,
}

impl LandmarkElement {
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == text,
            Self::Wildcard => true,
        }
    }
}

/// An ordered phrase of literals and wildcards used to find a known anchor
/// point in a token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landmark {
    elements: Vec<LandmarkElement>,
}

impl Landmark {
    /// Parses a phrase where `"_"` is the wildcard.
    #[must_use]
    pub fn parse<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            elements: words
                .iter()
                .map(|word| match word.as_ref() {
                    WILDCARD => LandmarkElement::Wildcard,
                    literal => LandmarkElement::Literal(literal.to_owned()),
                })
                .collect(),
        }
    }

    /// Parses a phrase template, substituting the `{first}` and `{last}`
    /// placeholders with the card identity.
    #[must_use]
    pub fn from_template<S: AsRef<str>>(words: &[S], card: &CardIdentity) -> Self {
        let substituted: Vec<String> = words
            .iter()
            .map(|word| {
                word.as_ref()
                    .replace(FIRST_FOUR_PLACEHOLDER, &card.first_four)
                    .replace(LAST_FOUR_PLACEHOLDER, &card.last_four)
            })
            .collect();
        Self::parse(&substituted)
    }

    #[must_use]
    pub fn elements(&self) -> &[LandmarkElement] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Tunable constants of the statement layout.
///
/// Every field is optional in TOML and falls back to [`Default`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatementLayout {
    /// Phrase immediately preceding the first table token (the masked card
    /// number line). Matched right-adjacent.
    pub start_landmark: Vec<String>,
    /// Candidate phrases immediately following the last table token.
    /// Matched left-adjacent; when several match, the last one listed wins.
    pub end_landmarks: Vec<Vec<String>>,
    /// The six-token column header phrase.
    pub header_landmark: Vec<String>,
    /// Extra width added to the right edge of the table, since some
    /// statements have their right-most glyph clipped by extraction.
    pub right_margin: f64,
    /// Amount subtracted from each header token's left edge to get the
    /// column boundary.
    pub band_margin: f64,
    /// Maximum vertical distance (in whole units) between a token and the
    /// open row's key for the token to join that row.
    pub row_tolerance: u64,
    /// Mis-decoded ligature glyphs that carry no content.
    pub artifact_glyphs: Vec<String>,
    /// Number of leading pages per document that never hold transactions.
    pub skip_leading_pages: usize,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            start_landmark: words(&["Card", "number", "{first}", "XXXX", "XXXX", "{last}"]),
            end_landmarks: vec![words(&["Page", "_", "of"]), words(&["Total", "for", "{first}"])],
            header_landmark: words(&[
                "date",
                "date",
                "Description",
                "Spend",
                "Categories",
                "Amount($)",
            ]),
            right_margin: 5.0,
            band_margin: 10.0,
            row_tolerance: 1,
            artifact_glyphs: words(&["Ý", "Ã"]),
            skip_leading_pages: 1,
        }
    }
}

impl StatementLayout {
    /// Parses a layout override from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Toml`] if the document is not valid TOML or a
    /// field has the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, LayoutError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// The table start landmark for the given card.
    #[must_use]
    pub fn start_landmark(&self, card: &CardIdentity) -> Landmark {
        Landmark::from_template(&self.start_landmark, card)
    }

    /// The table end landmark candidates for the given card, in priority
    /// order (later entries win).
    #[must_use]
    pub fn end_landmarks(&self, card: &CardIdentity) -> Vec<Landmark> {
        self.end_landmarks
            .iter()
            .map(|phrase| Landmark::from_template(phrase, card))
            .collect()
    }

    #[must_use]
    pub fn header_landmark(&self) -> Landmark {
        Landmark::parse(&self.header_landmark)
    }

    /// Whether the token text is a known decoding artifact.
    #[must_use]
    pub fn is_artifact(&self, text: &str) -> bool {
        self.artifact_glyphs.iter().any(|glyph| glyph == text)
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|&w| w.to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognises_wildcard() {
        let landmark = Landmark::parse(&["Page", "_", "of"]);
        assert_eq!(
            landmark.elements(),
            &[
                LandmarkElement::Literal("Page".to_owned()),
                LandmarkElement::Wildcard,
                LandmarkElement::Literal("of".to_owned()),
            ]
        );
        assert!(LandmarkElement::Wildcard.matches("anything"));
        assert!(!LandmarkElement::Literal("of".to_owned()).matches("Of"));
    }

    #[test]
    fn start_landmark_substitutes_card_digits() {
        let layout = StatementLayout::default();
        let card = CardIdentity::new("1234", "5678");
        assert_eq!(
            layout.start_landmark(&card),
            Landmark::parse(&["Card", "number", "1234", "XXXX", "XXXX", "5678"])
        );
        assert_eq!(
            layout.end_landmarks(&card)[1],
            Landmark::parse(&["Total", "for", "1234"])
        );
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let layout = StatementLayout::from_toml_str(
            r#"
            right_margin = 8.5
            skip_leading_pages = 0
            end_landmarks = [["Page", "_", "of"]]
            "#,
        )
        .unwrap();

        assert!((layout.right_margin - 8.5).abs() < f64::EPSILON);
        assert_eq!(layout.skip_leading_pages, 0);
        assert_eq!(layout.end_landmarks.len(), 1);
        assert_eq!(layout.header_landmark, StatementLayout::default().header_landmark);
        assert_eq!(layout.row_tolerance, 1);
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = StatementLayout::from_toml_str("right_margin = \"wide\"").unwrap_err();
        assert!(matches!(err, LayoutError::Toml(_)));
    }

    #[test]
    fn artifact_glyphs_are_recognised() {
        let layout = StatementLayout::default();
        assert!(layout.is_artifact("Ý"));
        assert!(layout.is_artifact("Ã"));
        assert!(!layout.is_artifact("Y"));
    }
}
