/*!
 * Provider implementations for the external speech collaborators.
 *
 * This module contains the clients the captioning pipeline talks to:
 * - WhisperCli: word-level transcription through the whisper.cpp CLI
 * - HttpChunker: phrase boundary detection over a local HTTP service
 * - Mocks: scripted providers for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::app_config::WhisperModel;
use crate::errors::{ChunkerError, TranscriberError};
use crate::transcript::{PhraseBoundaries, RawWord, Word};

/// Common trait for speech transcription providers
///
/// This trait defines the interface that all transcription implementations
/// must follow, allowing them to be swapped behind the controller.
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Transcribe an audio file into timed words
    ///
    /// # Arguments
    /// * `audio` - Path to a 16 kHz mono PCM WAV file
    /// * `model` - Model size to load
    /// * `language` - ISO 639-1 language code, or "auto"
    ///
    /// # Returns
    /// * `Result<Vec<RawWord>, TranscriberError>` - Timed words; never empty on success
    async fn transcribe(
        &self,
        audio: &Path,
        model: WhisperModel,
        language: &str,
    ) -> Result<Vec<RawWord>, TranscriberError>;

    /// Check that the provider is able to run at all
    ///
    /// # Returns
    /// * `Result<(), TranscriberError>` - Ok if the tool and model are reachable
    async fn test_availability(&self, model: WhisperModel) -> Result<(), TranscriberError>;
}

/// Common trait for phrase boundary providers
///
/// Implementations return the set of 0-based indices of words that end a
/// spoken phrase.
#[async_trait]
pub trait PhraseChunker: Send + Sync + Debug {
    /// Detect phrase-final word indices in an adapted word sequence
    async fn chunk(&self, words: &[Word]) -> Result<PhraseBoundaries, ChunkerError>;

    /// Test the connection to the chunking service
    async fn test_connection(&self) -> Result<(), ChunkerError>;
}

pub mod chunker;
pub mod mock;
pub mod whisper_cli;
