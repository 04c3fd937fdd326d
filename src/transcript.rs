/*!
 * Transcript word types and adaptation.
 *
 * The speech-to-text provider returns raw per-word records whose text can
 * carry whitespace and truncation artifacts. Adaptation turns them into the
 * clean ordered word list the segmentation pipeline consumes.
 */

use std::collections::BTreeSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::CaptionError;

/// A recognized word exactly as the speech-to-text provider produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWord {
    /// Recognized text, possibly untrimmed
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl RawWord {
    /// Create a new raw word record
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        RawWord {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A cleaned transcript word ready for segmentation
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Trimmed text with truncation hyphens removed, never empty
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

/// Set of 0-based word indices marking phrase ends, supplied by the
/// external chunking capability
pub type PhraseBoundaries = BTreeSet<usize>;

/// Normalize raw provider words into the ordered list used by the segmenter.
///
/// Text is trimmed and a single trailing hyphen is removed (an artifact of
/// some recognition truncations). Tokens that end up empty are dropped.
/// Fails with `EmptyTranscript` when nothing usable remains.
pub fn adapt_words(raw: &[RawWord]) -> Result<Vec<Word>, CaptionError> {
    let mut words = Vec::with_capacity(raw.len());

    for record in raw {
        let trimmed = record.text.trim();
        let cleaned = trimmed.strip_suffix('-').unwrap_or(trimmed);

        if cleaned.is_empty() {
            warn!("Dropping empty word token at {:.2}s", record.start);
            continue;
        }

        words.push(Word {
            text: cleaned.to_string(),
            start: record.start,
            end: record.end,
        });
    }

    if words.is_empty() {
        return Err(CaptionError::EmptyTranscript);
    }

    debug!("Adapted {} raw records into {} words", raw.len(), words.len());
    Ok(words)
}
