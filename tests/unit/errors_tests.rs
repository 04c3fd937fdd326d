/*!
 * Tests for error types and conversions
 */

use autocap::errors::{AppError, CaptionError, ChunkerError, TranscriberError};

#[test]
fn test_captionError_emptyTranscript_shouldDisplayCorrectly() {
    let error = CaptionError::EmptyTranscript;
    let display = format!("{}", error);
    assert!(display.contains("no usable words"));
}

#[test]
fn test_captionError_invalidConfig_shouldDisplayReason() {
    let error = CaptionError::InvalidConfig("split_value must be at least 1".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Invalid caption configuration"));
    assert!(display.contains("split_value must be at least 1"));
}

#[test]
fn test_transcriberError_toolError_shouldDisplayStatusAndMessage() {
    let error = TranscriberError::ToolError {
        status: 2,
        message: "model load failed".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("status 2"));
    assert!(display.contains("model load failed"));
}

#[test]
fn test_transcriberError_timeout_shouldDisplaySeconds() {
    let error = TranscriberError::Timeout(1800);
    let display = format!("{}", error);
    assert!(display.contains("1800"));
    assert!(display.contains("timed out"));
}

#[test]
fn test_chunkerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ChunkerError::ApiError {
        status_code: 500,
        message: "internal error".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("internal error"));
}

#[test]
fn test_appError_fromCaptionError_shouldWrapVariant() {
    let error: AppError = CaptionError::EmptyTranscript.into();
    assert!(matches!(error, AppError::Caption(_)));
}

#[test]
fn test_appError_fromTranscriberError_shouldWrapVariant() {
    let error: AppError = TranscriberError::NoSpeech.into();
    assert!(matches!(error, AppError::Transcriber(_)));
    let display = format!("{}", error);
    assert!(display.contains("no words"));
}

#[test]
fn test_appError_fromChunkerError_shouldWrapVariant() {
    let error: AppError = ChunkerError::Unavailable("connection refused".to_string()).into();
    assert!(matches!(error, AppError::Chunker(_)));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.wav");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
    assert!(format!("{}", error).contains("missing.wav"));
}

#[test]
fn test_appError_semanticCapabilityUnavailable_shouldDisplayReason() {
    let error = AppError::SemanticCapabilityUnavailable("service not running".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Semantic boundaries requested"));
    assert!(display.contains("service not running"));
}
