/*!
 * Caption segmentation and timing pipeline.
 *
 * This module turns a cleaned word transcript into timed caption lines.
 * It is split into several submodules:
 *
 * - `breaks`: Mandatory line-break resolution (punctuation, phrase boundaries)
 * - `segmenter`: The cursor state machine emitting caption lines
 * - `timing`: Duration normalization and gap filling post-passes
 *
 * The pipeline itself is pure: it performs no I/O and is deterministic for
 * a given word list, configuration and boundary set.
 */

// Re-export main types for easier usage
pub use self::breaks::{BreakCause, resolve_breaks};
pub use self::segmenter::segment_words;
pub use self::timing::{MIN_CAPTION_SECS, SMALL_GAP_SECS, enforce_min_duration, fill_gaps};

// Submodules
pub mod breaks;
pub mod segmenter;
pub mod timing;

use crate::app_config::CaptionConfig;
use crate::errors::CaptionError;
use crate::transcript::{PhraseBoundaries, Word};

/// A timed caption line
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLine {
    /// 1-based sequence number, contiguous across the document
    pub index: usize,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds, the only field mutated after segmentation
    pub end: f64,

    /// Space-joined word texts in original order
    pub content: String,
}

impl CaptionLine {
    /// Create a new caption line
    pub fn new(index: usize, start: f64, end: f64, content: String) -> Self {
        CaptionLine {
            index,
            start,
            end,
            content,
        }
    }

    /// Visible duration in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Run the full segmentation pipeline over an adapted word list.
///
/// Resolves the mandatory-break table, segments the words into lines,
/// then applies the minimum-duration and gap-filling passes. The boundary
/// set is only consulted when `use_semantic_boundaries` is set.
pub fn generate_captions(
    words: &[Word],
    config: &CaptionConfig,
    boundaries: Option<&PhraseBoundaries>,
) -> Result<Vec<CaptionLine>, CaptionError> {
    config.validate()?;

    let breaks = resolve_breaks(words, config.use_semantic_boundaries, boundaries);
    let mut lines = segment_words(words, &breaks, config)?;
    enforce_min_duration(&mut lines);
    fill_gaps(&mut lines, config.continuous_timing);

    Ok(lines)
}
