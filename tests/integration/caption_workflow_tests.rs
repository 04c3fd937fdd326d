/*!
 * Integration tests for the full captioning workflow
 */

use std::path::Path;

use anyhow::Result;

use autocap::app_config::{CaptionConfig, SplitMode, WhisperModel};
use autocap::captioner;
use autocap::errors::{ChunkerError, TranscriberError};
use autocap::providers::mock::{MockChunker, MockTranscriber};
use autocap::providers::{PhraseChunker, Transcriber};
use autocap::srt;
use autocap::transcript;

use crate::common;

/// Test the full path from recognized words to a parseable caption file
#[tokio::test]
async fn test_captionWorkflow_fromRecognizedWords_shouldProduceSrtFile() -> Result<()> {
    let transcriber =
        MockTranscriber::working(common::make_raw_words(&["I", "am", "fine.", "Thanks"]));

    // 1. Transcribe the (scripted) audio
    let recognized = transcriber
        .transcribe(Path::new("talk.wav"), WhisperModel::Base, "en")
        .await?;

    // 2. Clean the raw words
    let words = transcript::adapt_words(&recognized)?;
    assert_eq!(words.len(), 4);

    // 3. Build caption lines with the default configuration
    let config = CaptionConfig::default();
    let lines = captioner::generate_captions(&words, &config, None)?;

    // 4. Write the caption file and read it back
    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("talk_captions.srt");
    srt::write_srt_file(&lines, &output_path)?;

    assert!(output_path.exists(), "Caption file should exist");
    let content = std::fs::read_to_string(&output_path)?;
    let parsed = srt::parse_srt(&content)?;

    // The sentence closes at "fine." and the tail becomes its own caption
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].content, "I am fine.");
    assert_eq!(parsed[1].content, "Thanks");
    assert_eq!(parsed[0].index, 1);
    assert_eq!(parsed[1].index, 2);

    // The gap between the captions was closed and the short tail stretched
    assert_eq!(parsed[0].end, 1.5);
    assert_eq!(parsed[1].start, 1.5);
    assert_eq!(parsed[1].end, 2.7);

    Ok(())
}

/// Test that character mode keeps the triggering word and clips overlaps
#[tokio::test]
async fn test_captionWorkflow_byChars_shouldSplitPerWordAndClipOverlaps() -> Result<()> {
    let transcriber =
        MockTranscriber::working(common::make_raw_words(&["Hello", "there", "friend"]));

    let recognized = transcriber
        .transcribe(Path::new("talk.wav"), WhisperModel::Base, "en")
        .await?;
    let words = transcript::adapt_words(&recognized)?;

    let config = CaptionConfig {
        split_mode: SplitMode::Chars,
        split_value: 5,
        ..CaptionConfig::default()
    };
    let lines = captioner::generate_captions(&words, &config, None)?;

    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("talk_captions.srt");
    srt::write_srt_file(&lines, &output_path)?;
    let parsed = srt::parse_srt(&std::fs::read_to_string(&output_path)?)?;

    // Every word hits the five character limit on its own
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0].content, "Hello");
    assert_eq!(parsed[1].content, "there");
    assert_eq!(parsed[2].content, "friend");

    // Minimum duration pushed each end past the next start, so ends were
    // clipped back while the final caption kept its full stretch
    assert_eq!(parsed[0].end, 0.5);
    assert_eq!(parsed[1].end, 1.0);
    assert_eq!(parsed[2].end, 2.2);

    Ok(())
}

/// Test that detected phrase boundaries drive the line breaks
#[tokio::test]
async fn test_captionWorkflow_withPhraseBoundaries_shouldBreakAtBoundaries() -> Result<()> {
    let words = common::make_words(&["when", "we", "left", "nobody", "noticed"]);

    let chunker = MockChunker::working([2]);
    let boundaries = chunker.chunk(&words).await?;
    assert_eq!(chunker.request_count(), 1);

    let config = CaptionConfig {
        use_semantic_boundaries: true,
        ..CaptionConfig::default()
    };
    let lines = captioner::generate_captions(&words, &config, Some(&boundaries))?;

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].content, "when we left");
    assert_eq!(lines[1].content, "nobody noticed");

    Ok(())
}

/// Test that boundaries are ignored when the feature is switched off
#[tokio::test]
async fn test_captionWorkflow_withBoundariesDisabled_shouldKeepSingleLine() -> Result<()> {
    let words = common::make_words(&["when", "we", "left", "nobody", "noticed"]);

    let chunker = MockChunker::working([2]);
    let boundaries = chunker.chunk(&words).await?;

    let config = CaptionConfig::default();
    let lines = captioner::generate_captions(&words, &config, Some(&boundaries))?;

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].content, "when we left nobody noticed");

    Ok(())
}

/// Test that continuous timing chains each caption to its successor
#[tokio::test]
async fn test_captionWorkflow_withContinuousTiming_shouldChainCaptions() -> Result<()> {
    let transcriber =
        MockTranscriber::working(common::make_raw_words(&["Hey.", "so", "anyway"]));

    let recognized = transcriber
        .transcribe(Path::new("talk.wav"), WhisperModel::Base, "en")
        .await?;
    let words = transcript::adapt_words(&recognized)?;

    let config = CaptionConfig {
        continuous_timing: true,
        ..CaptionConfig::default()
    };
    let lines = captioner::generate_captions(&words, &config, None)?;

    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("talk_captions.srt");
    srt::write_srt_file(&lines, &output_path)?;
    let parsed = srt::parse_srt(&std::fs::read_to_string(&output_path)?)?;

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].content, "Hey.");
    assert_eq!(parsed[1].content, "so anyway");

    // No gap survives between consecutive captions
    assert_eq!(parsed[0].end, parsed[1].start);

    Ok(())
}

/// Test that an unreachable boundary service reports itself as unavailable
#[tokio::test]
async fn test_captionWorkflow_withUnreachableChunker_shouldReportUnavailable() {
    let words = common::make_words(&["hello", "world"]);
    let chunker = MockChunker::unavailable();

    let result = chunker.chunk(&words).await;

    assert!(matches!(result, Err(ChunkerError::Unavailable(_))));
}

/// Test that speechless audio surfaces as a transcriber error
#[tokio::test]
async fn test_captionWorkflow_withSilentAudio_shouldReportNoSpeech() {
    let transcriber = MockTranscriber::silent();

    let result = transcriber
        .transcribe(Path::new("talk.wav"), WhisperModel::Base, "en")
        .await;

    assert!(matches!(result, Err(TranscriberError::NoSpeech)));
}

/// Test that raw words full of filler still fail cleanly after adaptation
#[tokio::test]
async fn test_captionWorkflow_withUnusableWords_shouldFailBeforeSegmentation() {
    let transcriber = MockTranscriber::working(common::make_raw_words(&["  ", "-", " "]));

    let recognized = transcriber
        .transcribe(Path::new("talk.wav"), WhisperModel::Base, "en")
        .await
        .unwrap();

    let result = transcript::adapt_words(&recognized);

    assert!(result.is_err(), "Nothing usable should remain after cleanup");
}
