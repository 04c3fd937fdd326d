/*!
 * Integration tests for the segmentation pipeline.
 *
 * Exercises the caption generator with realistic transcripts and with
 * randomized word streams, checking the invariants that must hold for
 * any input.
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use autocap::app_config::{CaptionConfig, SplitMode};
use autocap::captioner::{self, CaptionLine};
use autocap::transcript::{PhraseBoundaries, Word};

/// Create a realistic lecture transcript with natural punctuation.
fn create_lecture_words() -> Vec<Word> {
    let script = [
        "Welcome", "back", "everyone.", "Today", "we", "are", "talking", "about",
        "memory", "safety,", "starting", "with", "ownership.", "Every", "value",
        "has", "a", "single", "owner.", "When", "the", "owner", "goes", "out",
        "of", "scope,", "the", "value", "is", "dropped.", "Simple,", "right?",
        "Now,", "borrowing", "is", "where", "it", "gets", "interesting.", "You",
        "can", "have", "many", "readers", "or", "one", "writer.", "Never", "both.",
    ];

    let mut clock = 0.0;
    script
        .iter()
        .map(|text| {
            let start = clock;
            let end = start + 0.3;
            clock = end + 0.1;
            Word {
                text: (*text).to_string(),
                start,
                end,
            }
        })
        .collect()
}

/// Build a pseudo-random word stream with strictly increasing timestamps.
fn random_words(rng: &mut StdRng, count: usize) -> Vec<Word> {
    let syllables = ["ka", "to", "mi", "ran", "bo", "su", "len", "da"];
    let mut clock = 0.0_f64;
    let mut words = Vec::with_capacity(count);

    for _ in 0..count {
        let mut text = String::new();
        for _ in 0..rng.random_range(1..=3) {
            text.push_str(syllables[rng.random_range(0..syllables.len())]);
        }
        if rng.random_bool(0.15) {
            text.push('.');
        }

        let start = clock + rng.random_range(0.0..0.8);
        let end = start + rng.random_range(0.1..0.6);
        clock = end;

        words.push(Word { text, start, end });
    }

    words
}

/// Total number of words across all caption lines.
fn word_count(lines: &[CaptionLine]) -> usize {
    lines.iter().map(|line| line.content.split(' ').count()).sum()
}

/// Whether a word text forces a break once trailing wrappers are ignored.
fn ends_in_break_punctuation(text: &str) -> bool {
    let effective = text.trim_end_matches([')', '"', '\'']);
    effective.ends_with(['.', '?', '!', ','])
}

/// Test that a realistic transcript conserves every word in order
#[test]
fn test_pipeline_withLectureTranscript_shouldConserveWordsInOrder() {
    let words = create_lecture_words();
    let config = CaptionConfig::default();

    let lines = captioner::generate_captions(&words, &config, None).unwrap();

    assert_eq!(word_count(&lines), words.len());

    let rebuilt: Vec<&str> = lines
        .iter()
        .flat_map(|line| line.content.split(' '))
        .collect();
    let original: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(rebuilt, original);
}

/// Test that a realistic transcript only breaks at punctuation or the limit
#[test]
fn test_pipeline_withLectureTranscript_shouldOnlyBreakAtPunctuationOrLimit() {
    let words = create_lecture_words();
    let config = CaptionConfig::default();

    let lines = captioner::generate_captions(&words, &config, None).unwrap();
    assert!(lines.len() > 1, "Lecture should not fit on one line");

    for line in &lines[..lines.len() - 1] {
        let count = line.content.split(' ').count();
        let last_word = line.content.split(' ').next_back().unwrap();
        assert!(
            count >= config.split_value || ends_in_break_punctuation(last_word),
            "Line closed early without a reason: {:?}",
            line.content
        );
    }
}

/// Test that random streams conserve words in both split modes
#[test]
fn test_pipeline_withRandomStreams_shouldConserveWords() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let count = rng.random_range(1..120);
        let words = random_words(&mut rng, count);
        let config = CaptionConfig {
            split_mode: if rng.random_bool(0.5) {
                SplitMode::Words
            } else {
                SplitMode::Chars
            },
            split_value: rng.random_range(1..40),
            use_semantic_boundaries: false,
            continuous_timing: rng.random_bool(0.5),
        };

        let lines = captioner::generate_captions(&words, &config, None).unwrap();

        assert_eq!(word_count(&lines), words.len());

        let rebuilt: Vec<&str> = lines
            .iter()
            .flat_map(|line| line.content.split(' '))
            .collect();
        let original: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(rebuilt, original);
    }
}

/// Test that random streams keep caption timing monotonic and overlap free
#[test]
fn test_pipeline_withRandomStreams_shouldStayMonotonicWithoutOverlap() {
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..50 {
        let count = rng.random_range(1..80);
        let words = random_words(&mut rng, count);
        let config = CaptionConfig {
            split_mode: SplitMode::Words,
            split_value: rng.random_range(1..12),
            use_semantic_boundaries: false,
            continuous_timing: rng.random_bool(0.5),
        };

        let lines = captioner::generate_captions(&words, &config, None).unwrap();

        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.index, i + 1, "Indices must stay contiguous from one");
            assert!(line.end > line.start, "Caption must not be empty in time");
        }

        for pair in lines.windows(2) {
            assert!(pair[0].start < pair[1].start, "Starts must move forward");
            assert!(
                pair[0].end <= pair[1].start,
                "Caption must not outlive the start of its successor"
            );
        }
    }
}

/// Test that phrase boundaries always end a line when segmentation is on
#[test]
fn test_pipeline_withRandomBoundaries_shouldBreakAtEveryBoundary() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..30 {
        let count = rng.random_range(4..60);
        let words = random_words(&mut rng, count);

        let mut boundaries = PhraseBoundaries::new();
        for index in 0..count {
            if rng.random_bool(0.2) {
                boundaries.insert(index);
            }
        }

        // A huge limit isolates the boundary behavior
        let config = CaptionConfig {
            split_mode: SplitMode::Words,
            split_value: 1000,
            use_semantic_boundaries: true,
            continuous_timing: false,
        };

        let lines = captioner::generate_captions(&words, &config, Some(&boundaries)).unwrap();

        // Collect the index of the last word of every line
        let mut line_ends = PhraseBoundaries::new();
        let mut consumed = 0;
        for line in &lines {
            consumed += line.content.split(' ').count();
            line_ends.insert(consumed - 1);
        }
        assert_eq!(consumed, count);

        for boundary in &boundaries {
            assert!(
                line_ends.contains(boundary),
                "Boundary at {} did not end a line",
                boundary
            );
        }

        for end in &line_ends {
            if *end == count - 1 {
                continue;
            }
            assert!(
                boundaries.contains(end) || ends_in_break_punctuation(&words[*end].text),
                "Line ended at {} without a mandatory break",
                end
            );
        }
    }
}

/// Test that the same input always produces the same captions
#[test]
fn test_pipeline_withSameSeed_shouldBeDeterministic() {
    let build = || {
        let mut rng = StdRng::seed_from_u64(1234);
        let words = random_words(&mut rng, 60);
        captioner::generate_captions(&words, &CaptionConfig::default(), None).unwrap()
    };

    assert_eq!(build(), build());
}
