use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

// @module: File and directory utilities

/// Video container extensions handled by ffmpeg
/// This list is not exhaustive but covers the most common formats
const VIDEO_EXTENSIONS: [&str; 14] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ogv", "ts", "mts",
    "m2ts",
];

/// Audio-only extensions handled by ffmpeg
const AUDIO_EXTENSIONS: [&str; 8] = ["mp3", "wav", "m4a", "aac", "flac", "ogg", "opus", "wma"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Caption output path for a media file
    // @params: input_file, output_dir
    pub fn captions_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str("_captions.srt");

        output_dir.join(output_filename)
    }

    /// Find media files (video or audio) in a directory tree
    pub fn find_media_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    let ext_str = ext.to_string_lossy().to_lowercase();
                    if VIDEO_EXTENSIONS.contains(&ext_str.as_str())
                        || AUDIO_EXTENSIONS.contains(&ext_str.as_str())
                    {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Detect whether a file is video, audio-only or something else.
    ///
    /// The extension check covers the common cases; files with unusual or
    /// missing extensions fall through to an ffprobe stream inspection.
    pub fn detect_media_type<P: AsRef<Path>>(path: P) -> Result<MediaType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        // Check file extension
        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();

            if VIDEO_EXTENSIONS.contains(&ext_str.as_str()) {
                return Ok(MediaType::Video);
            }

            if AUDIO_EXTENSIONS.contains(&ext_str.as_str()) {
                return Ok(MediaType::Audio);
            }
        }

        // If extension check doesn't work, examine the streams with ffprobe
        let output = Command::new("ffprobe")
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("stream=codec_type")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(path)
            .output();

        if let Ok(output) = output {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
                let has_video = stdout.lines().any(|l| l.trim() == "video");
                let has_audio = stdout.lines().any(|l| l.trim() == "audio");

                if has_video && has_audio {
                    return Ok(MediaType::Video);
                }
                if has_audio {
                    return Ok(MediaType::Audio);
                }
            }
        }

        // Default to unknown if we couldn't determine the type
        Ok(MediaType::Unknown)
    }
}

/// Enum representing different media file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// Video file with an audio track to extract
    Video,
    /// Audio-only file
    Audio,
    /// Unknown file type
    Unknown,
}
