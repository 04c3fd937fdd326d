use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use tokio::process::Command;

use crate::app_config::{WhisperConfig, WhisperModel};
use crate::errors::TranscriberError;
use crate::providers::Transcriber;
use crate::transcript::RawWord;

/// Client for the whisper.cpp command line tool.
///
/// One transcription run produces a JSON file next to the input audio,
/// which is then parsed into word-level timings. Audio must already be
/// 16 kHz mono PCM WAV.
#[derive(Debug, Clone)]
pub struct WhisperCli {
    /// Binary name or path, resolved through PATH when bare
    binary: String,
    /// Directory holding ggml model files, None = platform default
    models_dir: Option<PathBuf>,
    /// Timeout for one transcription run
    timeout_secs: u64,
}

impl WhisperCli {
    /// Create a new client from the whisper section of the configuration
    pub fn new(config: &WhisperConfig) -> Self {
        let models_dir = if config.models_dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(&config.models_dir))
        };

        WhisperCli {
            binary: config.binary.clone(),
            models_dir,
            timeout_secs: config.timeout_secs,
        }
    }

    /// Resolve the model file path for a model size
    fn model_path(&self, model: WhisperModel) -> Result<PathBuf, TranscriberError> {
        let dir = match &self.models_dir {
            Some(dir) => dir.clone(),
            None => default_models_dir().ok_or_else(|| {
                TranscriberError::ModelNotFound(
                    "Could not determine a models directory".to_string(),
                )
            })?,
        };

        let path = dir.join(model.filename());
        if !path.exists() {
            return Err(TranscriberError::ModelNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        Ok(path)
    }
}

/// Default model directory under the platform data directory
fn default_models_dir() -> Option<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))?;

    Some(base_dir.join("autocap").join("models"))
}

/// Parse the full-JSON output of whisper.cpp into timed words.
///
/// Token entries come in two shapes depending on the tool version: `text`
/// with millisecond `offsets`, or `word` with second-unit `start`/`end`.
/// Bracketed non-speech markers and zero-length timings are dropped.
fn parse_words(json: &Value) -> Vec<RawWord> {
    let mut words = Vec::new();

    let segments = match json.get("transcription").and_then(|t| t.as_array()) {
        Some(segments) => segments,
        None => return words,
    };

    for segment in segments {
        let tokens = segment
            .get("tokens")
            .and_then(|t| t.as_array())
            .or_else(|| segment.get("words").and_then(|w| w.as_array()));

        let tokens = match tokens {
            Some(tokens) => tokens,
            None => continue,
        };

        for token in tokens {
            let (text, start_ms, end_ms) = if let (Some(text), Some(from), Some(to)) = (
                token.get("text").and_then(|t| t.as_str()),
                token
                    .get("offsets")
                    .and_then(|o| o.get("from"))
                    .and_then(|f| f.as_f64()),
                token
                    .get("offsets")
                    .and_then(|o| o.get("to"))
                    .and_then(|t| t.as_f64()),
            ) {
                (text, from, to)
            } else if let (Some(text), Some(start), Some(end)) = (
                token.get("word").and_then(|t| t.as_str()),
                token.get("start").and_then(|s| s.as_f64()),
                token.get("end").and_then(|e| e.as_f64()),
            ) {
                // Alternative shape carries seconds directly
                (text, start * 1000.0, end * 1000.0)
            } else {
                continue;
            };

            // Skip special tokens like [_BEG_] and empty or reversed timings
            let trimmed = text.trim();
            if trimmed.is_empty()
                || trimmed.starts_with('[')
                || trimmed.ends_with(']')
                || start_ms >= end_ms
            {
                continue;
            }

            words.push(RawWord::new(trimmed, start_ms / 1000.0, end_ms / 1000.0));
        }
    }

    words
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(
        &self,
        audio: &Path,
        model: WhisperModel,
        language: &str,
    ) -> Result<Vec<RawWord>, TranscriberError> {
        let model_path = self.model_path(model)?;
        let audio_str = audio.to_str().unwrap_or_default();

        debug!(
            "Running {} with model {} on {:?}",
            self.binary, model, audio
        );

        // The tool writes <audio>.json next to the input
        let whisper_future = Command::new(&self.binary)
            .arg("-m")
            .arg(&model_path)
            .arg("-l")
            .arg(language)
            .arg("--output-json-full")
            .arg("--no-prints")
            .arg("--word-thold")
            .arg("0.01")
            .arg("--max-len")
            .arg("0")
            .arg("--suppress-nst")
            .arg(audio_str)
            .kill_on_drop(true)
            .output();

        let timeout_duration = Duration::from_secs(self.timeout_secs);
        let output = tokio::select! {
            result = whisper_future => {
                result.map_err(|e| TranscriberError::LaunchFailed(
                    format!("{}: {}", self.binary, e)
                ))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(TranscriberError::Timeout(self.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriberError::ToolError {
                status: output.status.code().unwrap_or(-1),
                message: stderr.trim().chars().take(500).collect(),
            });
        }

        let json_path = format!("{}.json", audio_str);
        let content = tokio::fs::read_to_string(&json_path).await.map_err(|e| {
            TranscriberError::ParseError(format!(
                "Expected JSON output at {} was not readable: {}",
                json_path, e
            ))
        })?;

        let json: Value = serde_json::from_str(&content)
            .map_err(|e| TranscriberError::ParseError(e.to_string()))?;

        let words = parse_words(&json);
        if words.is_empty() {
            return Err(TranscriberError::NoSpeech);
        }

        debug!("Transcribed {} words from {:?}", words.len(), audio);
        Ok(words)
    }

    async fn test_availability(&self, model: WhisperModel) -> Result<(), TranscriberError> {
        self.model_path(model)?;

        Command::new(&self.binary)
            .arg("--help")
            .output()
            .await
            .map_err(|e| TranscriberError::LaunchFailed(format!("{}: {}", self.binary, e)))?;

        Ok(())
    }
}
