//! Landmark phrase search over a page's token stream.
//!
//! A landmark is an ordered phrase such as `Card number 1234 XXXX XXXX 5678`
//! or `Page _ of`. [`locate`] finds the phrase in the token stream and
//! returns the index of the token immediately before or after it. Absence is
//! an ordinary outcome (a cover page has no table) and is reported as
//! `None`, never as an error.

use statement_ledger_models::{Landmark, StatementLayout, Token};

/// Which neighbour of a matched phrase to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacent {
    /// The token just before the phrase.
    Left,
    /// The token just after the phrase.
    Right,
}

/// Finds the token adjacent to a landmark phrase.
///
/// Every candidate is scanned, in order, and the result of the *last*
/// candidate that matched anywhere in the stream is kept. Callers list a
/// generic phrase first and a more specific fallback after it so the
/// fallback wins when both are present.
///
/// If the resolved token is a known artifact glyph, the index moves one
/// further token in the resolution direction.
///
/// Returns `None` when no candidate matches, or when the adjacent index
/// falls outside the stream.
#[must_use]
pub fn locate(
    candidates: &[Landmark],
    tokens: &[Token],
    adjacent: Adjacent,
    layout: &StatementLayout,
) -> Option<usize> {
    let mut resolved = None;

    for landmark in candidates {
        if let Some(match_end) = find_match_end(landmark, tokens) {
            resolved = adjacent_index(match_end, landmark.len(), adjacent, tokens.len());
            log::trace!("landmark {landmark:?} matched ending at {match_end} -> {resolved:?}");
        }
    }

    let index = resolved?;
    if layout.is_artifact(&tokens[index].text) {
        log::debug!("stepping over artifact glyph at token {index}");
        return match adjacent {
            Adjacent::Left => index.checked_sub(1),
            Adjacent::Right => Some(index + 1).filter(|&next| next < tokens.len()),
        };
    }

    Some(index)
}

/// Returns the index of the last token of the first full match.
///
/// The scan never revisits earlier tokens: on a mismatch the match pointer
/// resets and only the current token is re-tested against the phrase's
/// first element.
fn find_match_end(landmark: &Landmark, tokens: &[Token]) -> Option<usize> {
    let elements = landmark.elements();
    if elements.is_empty() {
        return None;
    }

    let mut pointer = 0;
    for (i, token) in tokens.iter().enumerate() {
        if elements[pointer].matches(&token.text) {
            pointer += 1;
        } else {
            pointer = usize::from(elements[0].matches(&token.text));
        }

        if pointer == elements.len() {
            return Some(i);
        }
    }

    None
}

const fn adjacent_index(
    match_end: usize,
    phrase_len: usize,
    adjacent: Adjacent,
    token_count: usize,
) -> Option<usize> {
    match adjacent {
        Adjacent::Left => match_end.checked_sub(phrase_len),
        Adjacent::Right => {
            if match_end + 1 < token_count {
                Some(match_end + 1)
            } else {
                None
            }
        }
    }
}
