/*!
 * Core segmentation state machine.
 *
 * Walks the word list once with a monotonic cursor, growing the line under
 * construction and closing it on mandatory breaks, length limits or end of
 * stream. The cursor never moves backward: when a character limit is
 * crossed, the triggering word stays in the line instead of being re-queued,
 * bounding the overage to one word. A one-word lookahead pulls very short
 * trailing words into the closing line so they never stand alone.
 */

use log::{debug, warn};

use crate::app_config::{CaptionConfig, SplitMode};
use crate::errors::CaptionError;
use crate::transcript::Word;

use super::CaptionLine;
use super::breaks::BreakCause;

/// Maximum text length for a word to qualify for the orphan pull
const ORPHAN_MAX_CHARS: usize = 3;

/// Why the line under construction is being closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    /// Punctuation or a phrase boundary after the current word
    MandatoryBreak,
    /// Word-count or character-count limit reached
    LengthLimit,
    /// Last word of the stream
    EndOfStream,
}

/// Split the word stream into caption lines.
///
/// `breaks` must be the table produced by `resolve_breaks` for the same
/// word list. Lines carry contiguous 1-based indices; `start` and `end`
/// are the first and last contained word's timestamps.
pub fn segment_words(
    words: &[Word],
    breaks: &[Option<BreakCause>],
    config: &CaptionConfig,
) -> Result<Vec<CaptionLine>, CaptionError> {
    if words.is_empty() {
        return Err(CaptionError::EmptyTranscript);
    }

    let last = words.len() - 1;
    let mut lines: Vec<CaptionLine> = Vec::new();
    let mut cursor = 0;
    let mut line_start = 0;
    let mut line_chars = 0;
    let mut emitted_words = 0;

    while cursor < words.len() {
        let word_chars = words[cursor].text.chars().count();
        line_chars = if cursor == line_start {
            word_chars
        } else {
            // One joining space per additional word
            line_chars + 1 + word_chars
        };

        let buffered = cursor - line_start + 1;

        let mut close = if breaks[cursor].is_some() {
            // Mandatory breaks suppress the length check for this word
            Some(CloseReason::MandatoryBreak)
        } else {
            match config.split_mode {
                SplitMode::Words if buffered >= config.split_value => {
                    Some(CloseReason::LengthLimit)
                }
                SplitMode::Chars if line_chars >= config.split_value => {
                    Some(CloseReason::LengthLimit)
                }
                _ => None,
            }
        };

        if close.is_none() && cursor == last {
            close = Some(CloseReason::EndOfStream);
        }

        match close {
            Some(reason) => {
                let mut line_end = cursor;
                if reason == CloseReason::LengthLimit
                    && cursor < last
                    && pull_qualifies(words, breaks, cursor + 1, last)
                {
                    // Bounded to exactly one extra word, never cascades
                    line_end = cursor + 1;
                }

                lines.push(build_line(lines.len() + 1, words, line_start, line_end));
                emitted_words += line_end - line_start + 1;

                cursor = line_end + 1;
                line_start = cursor;
                line_chars = 0;
            }
            None => {
                cursor += 1;
            }
        }
    }

    if emitted_words != words.len() {
        warn!(
            "Word count mismatch after segmentation: {} in, {} out",
            words.len(),
            emitted_words
        );
    }

    debug!(
        "Segmented {} words into {} caption lines",
        words.len(),
        lines.len()
    );

    Ok(lines)
}

/// A short next word qualifies for the orphan pull when it would otherwise
/// close a line by itself: it is the last word of the stream, or a
/// mandatory break follows it.
fn pull_qualifies(
    words: &[Word],
    breaks: &[Option<BreakCause>],
    next: usize,
    last: usize,
) -> bool {
    words[next].text.chars().count() <= ORPHAN_MAX_CHARS
        && (next == last || breaks[next].is_some())
}

/// Build a caption line from the inclusive word range `[first, last_word]`
fn build_line(index: usize, words: &[Word], first: usize, last_word: usize) -> CaptionLine {
    let content = words[first..=last_word]
        .iter()
        .map(|word| word.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    CaptionLine::new(index, words[first].start, words[last_word].end, content)
}
