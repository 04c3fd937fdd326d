use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::errors::CaptionError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Spoken language code (ISO), or "auto" for model detection
    #[serde(default = "default_language")]
    pub language: String,

    /// Caption layout settings
    #[serde(default)]
    pub captions: CaptionConfig,

    /// Speech recognition settings
    #[serde(default)]
    pub whisper: WhisperConfig,

    /// Phrase chunking service settings
    #[serde(default)]
    pub chunker: ChunkerConfig,

    /// Reuse transcriptions from the local cache
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How caption line length is measured
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    // @mode: Count words per line
    #[default]
    Words,
    // @mode: Count joined characters per line
    Chars,
}

impl SplitMode {
    // @returns: Lowercase mode identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Words => "words".to_string(),
            Self::Chars => "chars".to_string(),
        }
    }
}

// Implement Display trait for SplitMode
impl std::fmt::Display for SplitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for SplitMode
impl std::str::FromStr for SplitMode {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, CaptionError> {
        match s.to_lowercase().as_str() {
            "words" => Ok(Self::Words),
            "chars" => Ok(Self::Chars),
            _ => Err(CaptionError::InvalidConfig(format!(
                "Unknown split mode '{}', expected 'words' or 'chars'",
                s
            ))),
        }
    }
}

/// Caption layout configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaptionConfig {
    /// Length measure for a caption line
    #[serde(default)]
    pub split_mode: SplitMode,

    /// Length limit in the unit of the split mode
    #[serde(default = "default_split_value")]
    pub split_value: usize,

    /// Break lines at phrase boundaries from the chunking service
    #[serde(default)]
    pub use_semantic_boundaries: bool,

    /// Extend every caption until the next one starts
    #[serde(default)]
    pub continuous_timing: bool,
}

impl CaptionConfig {
    /// Validate the caption settings
    pub fn validate(&self) -> Result<(), CaptionError> {
        if self.split_value == 0 {
            return Err(CaptionError::InvalidConfig(
                "split_value must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        CaptionConfig {
            split_mode: SplitMode::default(),
            split_value: default_split_value(),
            use_semantic_boundaries: false,
            continuous_timing: false,
        }
    }
}

/// Whisper model size
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WhisperModel {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    // @returns: Lowercase model identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Tiny => "tiny".to_string(),
            Self::Base => "base".to_string(),
            Self::Small => "small".to_string(),
            Self::Medium => "medium".to_string(),
            Self::Large => "large".to_string(),
        }
    }

    // @returns: Model file name in the models directory
    pub fn filename(&self) -> String {
        format!("ggml-{}.bin", self.to_lowercase_string())
    }
}

// Implement Display trait for WhisperModel
impl std::fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for WhisperModel
impl std::str::FromStr for WhisperModel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "base" => Ok(Self::Base),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(anyhow!("Invalid model size: {}", s)),
        }
    }
}

/// Speech recognition configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WhisperConfig {
    // @field: Model size
    #[serde(default)]
    pub model: WhisperModel,

    // @field: whisper.cpp binary name or path
    #[serde(default = "default_whisper_binary")]
    pub binary: String,

    // @field: Directory holding ggml model files (empty = platform default)
    #[serde(default = "String::new")]
    pub models_dir: String,

    // @field: Timeout seconds for one transcription run
    #[serde(default = "default_whisper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        WhisperConfig {
            model: WhisperModel::default(),
            binary: default_whisper_binary(),
            models_dir: String::new(),
            timeout_secs: default_whisper_timeout_secs(),
        }
    }
}

/// Phrase chunking service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkerConfig {
    // @field: Service URL
    #[serde(default = "default_chunker_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds per request
    #[serde(default = "default_chunker_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        ChunkerConfig {
            endpoint: default_chunker_endpoint(),
            timeout_secs: default_chunker_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| anyhow!("Failed to open config file {}: {}", path.display(), e))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.captions.validate()?;

        // "auto" defers language detection to the model
        if self.language != "auto" {
            let _language_name = crate::language_utils::get_language_name(&self.language)?;
        }

        Url::parse(&self.chunker.endpoint)
            .map_err(|e| anyhow!("Invalid chunker endpoint '{}': {}", self.chunker.endpoint, e))?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            captions: CaptionConfig::default(),
            whisper: WhisperConfig::default(),
            chunker: ChunkerConfig::default(),
            cache_enabled: true,
            log_level: LogLevel::default(),
        }
    }
}

fn default_language() -> String {
    "auto".to_string()
}

fn default_split_value() -> usize {
    7
}

fn default_true() -> bool {
    true
}

fn default_whisper_binary() -> String {
    "whisper-cli".to_string()
}

fn default_whisper_timeout_secs() -> u64 {
    1800
}

fn default_chunker_endpoint() -> String {
    "http://localhost:8765".to_string()
}

fn default_chunker_timeout_secs() -> u64 {
    10
}
