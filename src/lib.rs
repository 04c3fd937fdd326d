/*!
 * # autocap - Automatic Captions from Speech
 *
 * A Rust library for generating SRT captions from the speech in media files.
 *
 * ## Features
 *
 * - Extract audio tracks from video and audio files with ffmpeg
 * - Transcribe speech to word-level timestamps with whisper.cpp
 * - Segment recognized words into caption lines:
 *   - By word count or by character count
 *   - At sentence punctuation
 *   - At phrase boundaries from an optional chunking service
 * - Readability timing: minimum display duration and gap filling
 * - Cache transcriptions locally to skip repeated runs
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `transcript`: Recognized word adaptation for captioning
 * - `captioner`: Caption line assembly:
 *   - `captioner::breaks`: Mandatory break resolution
 *   - `captioner::segmenter`: Word stream segmentation
 *   - `captioner::timing`: Duration and gap normalization
 * - `srt`: SRT serialization and parsing
 * - `media`: Audio extraction through ffmpeg
 * - `cache`: Local transcription cache
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `status`: Progress message sinks
 * - `providers`: External speech and chunking services:
 *   - `providers::whisper_cli`: whisper.cpp command line transcriber
 *   - `providers::chunker`: HTTP phrase chunking client
 *   - `providers::mock`: Scripted providers for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
// Add other lints you want to allow but not auto-fix

// Public modules
pub mod app_config;
pub mod cache;
pub mod captioner;
pub mod file_utils;
pub mod media;
pub mod srt;
pub mod status;
pub mod transcript;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{CaptionConfig, Config, SplitMode, WhisperModel};
pub use app_controller::Controller;
pub use captioner::{generate_captions, CaptionLine};
pub use transcript::{adapt_words, PhraseBoundaries, RawWord, Word};
pub use language_utils::{normalize_to_part2t, to_model_code, get_language_name};
pub use errors::{AppError, CaptionError, ChunkerError, TranscriberError};
