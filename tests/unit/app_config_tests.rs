/*!
 * Tests for application configuration functionality
 */

use std::str::FromStr;

use autocap::app_config::{Config, LogLevel, SplitMode, WhisperModel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language, "auto");
    assert_eq!(config.captions.split_mode, SplitMode::Words);
    assert_eq!(config.captions.split_value, 7);
    assert!(!config.captions.use_semantic_boundaries);
    assert!(!config.captions.continuous_timing);
    assert_eq!(config.whisper.model, WhisperModel::Base);
    assert_eq!(config.whisper.binary, "whisper-cli");
    assert_eq!(config.whisper.timeout_secs, 1800);
    assert_eq!(config.chunker.endpoint, "http://localhost:8765");
    assert!(config.cache_enabled);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    // Start with a valid config
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Zero split value is rejected
    config.captions.split_value = 0;
    assert!(config.validate().is_err());
    config.captions.split_value = 7;

    // Unknown language code is rejected
    config.language = "xyz".to_string();
    assert!(config.validate().is_err());

    // Plain codes and "auto" pass
    config.language = "en".to_string();
    assert!(config.validate().is_ok());
    config.language = "auto".to_string();
    assert!(config.validate().is_ok());

    // Broken chunker endpoint is rejected
    config.chunker.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

/// Test loading configuration from a partial JSON file
#[test]
fn test_config_fromFile_withPartialJson_shouldFillDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let config_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "autocap.json",
        r#"{
            "language": "en",
            "captions": { "split_mode": "chars", "split_value": 42 }
        }"#,
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();

    assert_eq!(config.language, "en");
    assert_eq!(config.captions.split_mode, SplitMode::Chars);
    assert_eq!(config.captions.split_value, 42);
    // Untouched sections keep their defaults
    assert_eq!(config.whisper.model, WhisperModel::Base);
    assert!(config.cache_enabled);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test loading configuration from an invalid file
#[test]
fn test_config_fromFile_withBadJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let config_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "autocap.json",
        "{ not json",
    )
    .unwrap();

    assert!(Config::from_file(&config_path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
}

/// Test config serialization roundtrip
#[test]
fn test_config_serialization_shouldRoundtrip() {
    let mut config = Config::default();
    config.language = "fr".to_string();
    config.captions.split_mode = SplitMode::Chars;
    config.captions.continuous_timing = true;
    config.whisper.model = WhisperModel::Small;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.language, "fr");
    assert_eq!(parsed.captions.split_mode, SplitMode::Chars);
    assert!(parsed.captions.continuous_timing);
    assert_eq!(parsed.whisper.model, WhisperModel::Small);
}

/// Test split mode string conversions
#[test]
fn test_splitMode_conversions_shouldMatchLowercaseNames() {
    assert_eq!(SplitMode::Words.to_string(), "words");
    assert_eq!(SplitMode::Chars.to_string(), "chars");
    assert_eq!(SplitMode::from_str("words").unwrap(), SplitMode::Words);
    assert_eq!(SplitMode::from_str("CHARS").unwrap(), SplitMode::Chars);
    assert!(SplitMode::from_str("lines").is_err());
}

/// Test whisper model naming helpers
#[test]
fn test_whisperModel_filename_shouldUseGgmlNaming() {
    assert_eq!(WhisperModel::Tiny.filename(), "ggml-tiny.bin");
    assert_eq!(WhisperModel::Large.filename(), "ggml-large.bin");
    assert_eq!(WhisperModel::from_str("medium").unwrap(), WhisperModel::Medium);
    assert!(WhisperModel::from_str("huge").is_err());
}
