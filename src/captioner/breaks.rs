/*!
 * Mandatory line-break resolution.
 *
 * A mandatory break follows a word when its text ends a sentence or clause,
 * or when the word index was supplied as a semantic phrase end. The result
 * is a lookup table computed once over the whole stream and consumed
 * read-only by the segmenter.
 */

use log::debug;

use crate::transcript::{PhraseBoundaries, Word};

/// Punctuation that closes a sentence or clause
const CLAUSE_ENDERS: &[char] = &['.', '?', '!', ','];

/// Trailing characters ignored when looking for closing punctuation,
/// so `word."` and `word.)` still count as sentence ends
const TRAILING_WRAPPERS: &[char] = &[')', '"', '\''];

/// Why a mandatory break follows a word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakCause {
    /// The word text ends with clause punctuation
    Punctuation,
    /// The word index is a supplied phrase end
    PhraseBoundary,
}

/// Build the mandatory-break table: one slot per word, `Some(cause)` when a
/// line must close after that word.
///
/// Punctuation and phrase boundaries carry equal weight; the cause is kept
/// for diagnostics only. Boundaries are ignored unless
/// `use_semantic_boundaries` is set.
pub fn resolve_breaks(
    words: &[Word],
    use_semantic_boundaries: bool,
    boundaries: Option<&PhraseBoundaries>,
) -> Vec<Option<BreakCause>> {
    let table: Vec<Option<BreakCause>> = words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let stripped = word.text.trim_end_matches(TRAILING_WRAPPERS);
            if stripped.ends_with(CLAUSE_ENDERS) {
                Some(BreakCause::Punctuation)
            } else if use_semantic_boundaries
                && boundaries.is_some_and(|set| set.contains(&i))
            {
                Some(BreakCause::PhraseBoundary)
            } else {
                None
            }
        })
        .collect();

    let mandatory = table.iter().filter(|slot| slot.is_some()).count();
    debug!(
        "Resolved {} mandatory breaks over {} words",
        mandatory,
        words.len()
    );

    table
}
