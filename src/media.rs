use std::path::Path;
use std::time::Duration;

use log::{debug, error};
use tokio::process::Command;

use crate::errors::AppError;

// @module: Audio extraction through ffmpeg

/// Timeout for one ffmpeg extraction run
const FFMPEG_TIMEOUT_SECS: u64 = 300;

/// Extract the audio track of a media file to 16 kHz mono PCM WAV.
///
/// The output sample format is what the speech model consumes directly,
/// so no further resampling happens downstream. Any video stream in the
/// input is dropped.
pub async fn extract_audio<P: AsRef<Path>>(input: P, output: P) -> Result<(), AppError> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(AppError::File(format!(
            "Media file does not exist: {:?}",
            input
        )));
    }

    debug!("Extracting audio from {:?} to {:?}", input, output);

    // Add timeout to prevent hanging on problematic files
    let ffmpeg_future = Command::new("ffmpeg")
        .args([
            "-i",
            input.to_str().unwrap_or_default(),
            "-vn", // Drop any video stream
            "-ar",
            "16000",
            "-ac",
            "1",
            "-c:a",
            "pcm_s16le",
            "-y", // Overwrite existing file
            output.to_str().unwrap_or_default(),
        ])
        .kill_on_drop(true)
        .output();

    let timeout_duration = Duration::from_secs(FFMPEG_TIMEOUT_SECS);
    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| AppError::ExternalToolFailure {
                tool: "ffmpeg".to_string(),
                status: -1,
                message: format!("Failed to execute ffmpeg: {}", e),
            })?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(AppError::ExternalToolFailure {
                tool: "ffmpeg".to_string(),
                status: -1,
                message: format!("ffmpeg timed out after {} seconds", FFMPEG_TIMEOUT_SECS),
            });
        }
    };

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("Audio extraction failed: {}", filtered);
        return Err(AppError::ExternalToolFailure {
            tool: "ffmpeg".to_string(),
            status: result.status.code().unwrap_or(-1),
            message: filtered,
        });
    }

    let file_size = std::fs::metadata(output)?.len();
    if file_size == 0 {
        return Err(AppError::ExternalToolFailure {
            tool: "ffmpeg".to_string(),
            status: 0,
            message: format!("Extracted audio file is empty: {:?}", output),
        });
    }

    debug!("Extracted {} bytes of audio", file_size);
    Ok(())
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "      Metadata:",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            if line.trim().is_empty() {
                return false;
            }
            !noise_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
