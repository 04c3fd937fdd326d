/*!
 * Mock provider implementations for testing.
 *
 * This module provides scripted providers that simulate different behaviors:
 * - `MockTranscriber::working(words)` - Always succeeds with the scripted words
 * - `MockTranscriber::failing()` - Always fails with a tool error
 * - `MockTranscriber::silent()` - Simulates audio without speech
 * - `MockChunker::working(boundaries)` - Returns the scripted boundary set
 * - `MockChunker::unavailable()` - Simulates an unreachable service
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app_config::WhisperModel;
use crate::errors::{ChunkerError, TranscriberError};
use crate::providers::{PhraseChunker, Transcriber};
use crate::transcript::{PhraseBoundaries, RawWord, Word};

/// Behavior mode for the mock transcriber
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockTranscriberBehavior {
    /// Always succeeds with the scripted words
    Working,
    /// Always fails with a tool error
    Failing,
    /// Simulates audio that contains no speech
    Silent,
    /// Simulates slow transcription (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock transcriber returning scripted word streams
#[derive(Debug)]
pub struct MockTranscriber {
    /// Behavior mode
    behavior: MockTranscriberBehavior,
    /// Words returned on success
    words: Vec<RawWord>,
    /// Counter of transcribe calls, shared across clones
    request_count: Arc<AtomicUsize>,
}

impl MockTranscriber {
    /// Create a new mock transcriber with the specified behavior
    pub fn new(behavior: MockTranscriberBehavior, words: Vec<RawWord>) -> Self {
        Self {
            behavior,
            words,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock that always returns the given words
    pub fn working(words: Vec<RawWord>) -> Self {
        Self::new(MockTranscriberBehavior::Working, words)
    }

    /// Create a failing mock that always errors
    pub fn failing() -> Self {
        Self::new(MockTranscriberBehavior::Failing, Vec::new())
    }

    /// Create a mock that reports no speech in the audio
    pub fn silent() -> Self {
        Self::new(MockTranscriberBehavior::Silent, Vec::new())
    }

    /// Create a slow mock for timeout testing
    pub fn slow(delay_ms: u64, words: Vec<RawWord>) -> Self {
        Self::new(MockTranscriberBehavior::Slow { delay_ms }, words)
    }

    /// Number of transcribe calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockTranscriber {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            words: self.words.clone(),
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        _audio: &Path,
        _model: WhisperModel,
        _language: &str,
    ) -> Result<Vec<RawWord>, TranscriberError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockTranscriberBehavior::Working => Ok(self.words.clone()),

            MockTranscriberBehavior::Failing => Err(TranscriberError::ToolError {
                status: 1,
                message: "Simulated transcription failure".to_string(),
            }),

            MockTranscriberBehavior::Silent => Err(TranscriberError::NoSpeech),

            MockTranscriberBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.words.clone())
            }
        }
    }

    async fn test_availability(&self, _model: WhisperModel) -> Result<(), TranscriberError> {
        match self.behavior {
            MockTranscriberBehavior::Failing => Err(TranscriberError::LaunchFailed(
                "Simulated missing tool".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Behavior mode for the mock chunker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockChunkerBehavior {
    /// Always succeeds with the scripted boundaries
    Working,
    /// Simulates an unreachable service
    Unavailable,
    /// Succeeds with an empty boundary set
    Empty,
}

/// Mock phrase chunker returning scripted boundary sets
#[derive(Debug)]
pub struct MockChunker {
    /// Behavior mode
    behavior: MockChunkerBehavior,
    /// Boundaries returned on success
    boundaries: PhraseBoundaries,
    /// Counter of chunk calls, shared across clones
    request_count: Arc<AtomicUsize>,
}

impl MockChunker {
    /// Create a new mock chunker with the specified behavior
    pub fn new(behavior: MockChunkerBehavior, boundaries: PhraseBoundaries) -> Self {
        Self {
            behavior,
            boundaries,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock that returns the given boundary indices
    pub fn working(boundaries: impl IntoIterator<Item = usize>) -> Self {
        Self::new(
            MockChunkerBehavior::Working,
            boundaries.into_iter().collect(),
        )
    }

    /// Create a mock that simulates an unreachable service
    pub fn unavailable() -> Self {
        Self::new(MockChunkerBehavior::Unavailable, PhraseBoundaries::new())
    }

    /// Create a mock that detects no phrase boundaries
    pub fn empty() -> Self {
        Self::new(MockChunkerBehavior::Empty, PhraseBoundaries::new())
    }

    /// Number of chunk calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockChunker {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            boundaries: self.boundaries.clone(),
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl PhraseChunker for MockChunker {
    async fn chunk(&self, _words: &[Word]) -> Result<PhraseBoundaries, ChunkerError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockChunkerBehavior::Working => Ok(self.boundaries.clone()),

            MockChunkerBehavior::Unavailable => Err(ChunkerError::Unavailable(
                "Simulated connection refused".to_string(),
            )),

            MockChunkerBehavior::Empty => Ok(PhraseBoundaries::new()),
        }
    }

    async fn test_connection(&self) -> Result<(), ChunkerError> {
        match self.behavior {
            MockChunkerBehavior::Unavailable => Err(ChunkerError::Unavailable(
                "Simulated connection refused".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
