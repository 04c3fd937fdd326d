/*!
 * Timing post-processing for caption lines.
 *
 * Two passes run after segmentation: a readability floor that stretches
 * captions shorter than `MIN_CAPTION_SECS`, and a gap pass that either
 * makes the track fully continuous or closes only small inter-caption
 * gaps, clipping any overlap the stretch pass introduced.
 */

use log::debug;

use super::CaptionLine;

/// Minimum on-screen duration for a caption, in seconds
pub const MIN_CAPTION_SECS: f64 = 1.2;

/// Gaps strictly shorter than this are closed in pause-preserving mode
pub const SMALL_GAP_SECS: f64 = 1.5;

/// Stretch every caption to at least `MIN_CAPTION_SECS`.
///
/// Only the end timestamp moves; starts are left where transcription put
/// them. Overlaps this creates against the next caption are resolved by
/// `fill_gaps`.
pub fn enforce_min_duration(lines: &mut [CaptionLine]) {
    let mut stretched = 0;

    for line in lines.iter_mut() {
        if line.end - line.start < MIN_CAPTION_SECS {
            line.end = line.start + MIN_CAPTION_SECS;
            stretched += 1;
        }
    }

    if stretched > 0 {
        debug!("Stretched {} captions to the minimum duration", stretched);
    }
}

/// Adjust end timestamps between consecutive captions.
///
/// With `continuous` set, every caption runs until the next one starts.
/// Otherwise only gaps shorter than `SMALL_GAP_SECS` are closed, so real
/// pauses in speech stay dark. Either way no caption may outlive the start
/// of its successor. The final caption keeps its end in both modes.
pub fn fill_gaps(lines: &mut [CaptionLine], continuous: bool) {
    if lines.len() < 2 {
        return;
    }

    for i in 0..lines.len() - 1 {
        let next_start = lines[i + 1].start;

        if continuous {
            lines[i].end = next_start;
            continue;
        }

        let gap = next_start - lines[i].end;
        if gap > 0.0 && gap < SMALL_GAP_SECS {
            lines[i].end = next_start;
        } else if gap < 0.0 {
            // The minimum-duration stretch pushed this caption past its
            // neighbor; clip it back so the track stays monotonic.
            lines[i].end = next_start;
        }
    }
}
