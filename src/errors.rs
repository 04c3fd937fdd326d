/*!
 * Error types for the autocap application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur in the caption segmentation pipeline
#[derive(Error, Debug)]
pub enum CaptionError {
    /// Error when the adapted word list is empty
    #[error("Transcript contains no usable words")]
    EmptyTranscript,

    /// Error when caption settings are invalid
    #[error("Invalid caption configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur when running the speech-to-text provider
#[derive(Error, Debug)]
pub enum TranscriberError {
    /// Error when the transcription tool cannot be launched
    #[error("Failed to launch transcription tool: {0}")]
    LaunchFailed(String),

    /// Error returned by the transcription tool itself
    #[error("Transcription tool exited with status {status}: {message}")]
    ToolError {
        /// Exit status reported by the tool
        status: i32,
        /// Diagnostic output from the tool
        message: String,
    },

    /// Error when the tool produced output that cannot be parsed
    #[error("Failed to parse transcription output: {0}")]
    ParseError(String),

    /// Error when the model file could not be found
    #[error("Whisper model not found: {0}")]
    ModelNotFound(String),

    /// Error when transcription produced no words
    #[error("Transcription produced no words")]
    NoSpeech,

    /// Error when the transcription ran past its time limit
    #[error("Transcription timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors that can occur when calling the phrase-chunking service
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// Error when the service cannot be reached
    #[error("Chunking service unavailable: {0}")]
    Unavailable(String),

    /// Error when making a request fails
    #[error("Chunking request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a response fails
    #[error("Failed to parse chunking response: {0}")]
    ParseError(String),

    /// Error returned by the service itself
    #[error("Chunking service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from an external media tool exiting non-zero
    #[error("{tool} exited with status {status}: {message}")]
    ExternalToolFailure {
        /// Name of the external tool
        tool: String,
        /// Exit status reported by the tool
        status: i32,
        /// Filtered diagnostic output
        message: String,
    },

    /// Error from the caption pipeline
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Error from the transcription provider
    #[error("Transcription error: {0}")]
    Transcriber(#[from] TranscriberError),

    /// Error from the chunking service
    #[error("Chunker error: {0}")]
    Chunker(#[from] ChunkerError),

    /// Error when semantic boundaries were requested but cannot be produced
    #[error("Semantic boundaries requested but the chunking capability is unavailable: {0}")]
    SemanticCapabilityUnavailable(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
