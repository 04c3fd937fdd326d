use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, WhisperModel};
use crate::cache::TranscriptionCache;
use crate::captioner;
use crate::errors::{AppError, ChunkerError};
use crate::file_utils::{FileManager, MediaType};
use crate::language_utils;
use crate::media;
use crate::providers::chunker::HttpChunker;
use crate::providers::whisper_cli::WhisperCli;
use crate::providers::{PhraseChunker, Transcriber};
use crate::srt;
use crate::status::{LogSink, StatusSink};
use crate::transcript::{self, PhraseBoundaries, RawWord, Word};

// @module: Application controller driving media files through captioning

/// Main application controller for caption generation
pub struct Controller {
    // @field: Application configuration
    config: Config,
    // @field: Speech-to-text provider
    transcriber: Arc<dyn Transcriber>,
    // @field: Phrase boundary provider
    chunker: Arc<dyn PhraseChunker>,
    // @field: Transcription cache, absent when caching is disabled or unavailable
    cache: Option<TranscriptionCache>,
    // @field: Receiver for user-facing progress messages
    status: Arc<dyn StatusSink>,
}

impl Controller {
    /// Creates a new controller instance with the provided config
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration to use
    ///
    /// # Returns
    ///
    /// * `Result<Controller>` - New controller instance or error
    pub fn with_config(config: Config) -> Result<Self> {
        let transcriber = Arc::new(WhisperCli::new(&config.whisper));
        let chunker = Arc::new(HttpChunker::new(&config.chunker)?);

        // A broken cache degrades to uncached operation instead of failing the run
        let cache = if config.cache_enabled {
            match TranscriptionCache::new_default() {
                Ok(cache) => Some(cache),
                Err(e) => {
                    warn!("Transcription cache unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            config,
            transcriber,
            chunker,
            cache,
            status: Arc::new(LogSink),
        })
    }

    /// Creates a controller with explicit providers, used by tests and embedders
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration to use
    /// * `transcriber` - Speech-to-text provider
    /// * `chunker` - Phrase boundary provider
    /// * `cache` - Optional transcription cache
    /// * `status` - Sink receiving progress messages
    ///
    /// # Returns
    ///
    /// * `Controller` - New controller instance
    pub fn with_providers(
        config: Config,
        transcriber: Arc<dyn Transcriber>,
        chunker: Arc<dyn PhraseChunker>,
        cache: Option<TranscriptionCache>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            config,
            transcriber,
            chunker,
            cache,
            status,
        }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates captions for a single media file
    ///
    /// # Arguments
    ///
    /// * `input_file` - Path to the input media file
    /// * `output_dir` - Directory where the caption file is written
    /// * `force_overwrite` - Whether to overwrite an existing caption file
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Success or error
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(input_file, output_dir, &multi_progress, force_overwrite)
            .await
    }

    /// Generates captions for a single file, reporting through a shared progress display
    async fn run_with_progress(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = Instant::now();

        // @checks: Input existence before any work
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(&output_dir)?;

        let output_path = FileManager::captions_output_path(&input_file, &output_dir);
        if FileManager::file_exists(&output_path) && !force_overwrite {
            warn!("Skipping file, captions already exist (use -f to force overwrite)");
            return Ok(());
        }

        if FileManager::detect_media_type(&input_file)? == MediaType::Unknown {
            return Err(anyhow!(
                "Unsupported input, no audio stream found: {:?}",
                input_file
            ));
        }

        let file_name = input_file
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        // Step 1: extract a mono 16 kHz track into a temp dir removed on every exit path
        self.status
            .update(&format!("Step 1/4: Extracting audio from '{}'...", file_name));
        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let audio_path = temp_dir.path().join("audio.wav");
        media::extract_audio(&input_file, &audio_path).await?;
        self.status.update("Audio extracted successfully.");

        // Step 2: transcribe, going through the cache when one is open
        let language = language_utils::to_model_code(&self.config.language)?;
        let model = self.config.whisper.model;
        self.status
            .update(&format!("Step 2/4: Transcribing with model '{}'...", model));

        let raw_words = self
            .transcribe_with_cache(&audio_path, model, &language, multi_progress)
            .await?;
        self.status.update(&format!(
            "Transcription complete. {} words recognized.",
            raw_words.len()
        ));

        let words = transcript::adapt_words(&raw_words).map_err(AppError::from)?;
        let boundaries = self.resolve_boundaries(&words).await?;

        // Step 3: segment the words and write the caption file in one shot
        self.status.update(&format!(
            "Step 3/4: Formatting captions (by {}, max {})...",
            self.config.captions.split_mode, self.config.captions.split_value
        ));
        let lines = captioner::generate_captions(&words, &self.config.captions, boundaries.as_ref())?;
        srt::write_srt_file(&lines, &output_path)?;
        self.status.update(&format!(
            "Caption file saved as '{}'",
            output_path.display()
        ));

        // Step 4: drop the temp dir and report
        self.status.update("Step 4/4: Cleaning up temporary files...");
        temp_dir
            .close()
            .context("Failed to remove temporary directory")?;

        info!(
            "Caption generation complete in {}. {} captions written.",
            Self::format_duration(start_time.elapsed()),
            lines.len()
        );
        self.status
            .update("Process complete! Your caption file is ready.");
        Ok(())
    }

    /// Transcribes audio, consulting the cache before launching the external tool
    async fn transcribe_with_cache(
        &self,
        audio: &Path,
        model: WhisperModel,
        language: &str,
        multi_progress: &MultiProgress,
    ) -> Result<Vec<RawWord>> {
        let audio_hash = match &self.cache {
            Some(_) => Some(TranscriptionCache::hash_file(audio)?),
            None => None,
        };

        if let (Some(cache), Some(hash)) = (&self.cache, &audio_hash) {
            match cache.get(hash, model, language).await {
                Ok(Some(words)) => {
                    self.status.update("Using cached transcription.");
                    return Ok(words);
                }
                Ok(None) => {}
                Err(e) => warn!("Cache lookup failed: {}", e),
            }
        }

        info!("🚀 autocap: whisper {} - {}", model, language);

        let spinner = multi_progress.add(ProgressBar::new_spinner());
        let template_result = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .or_else(|_| ProgressStyle::default_spinner().template("{spinner} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(template_result);
        spinner.set_message("Transcribing (this may take a while)");
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self.transcriber.transcribe(audio, model, language).await;
        spinner.finish_and_clear();
        let words = result.map_err(AppError::from)?;

        if let (Some(cache), Some(hash)) = (&self.cache, &audio_hash) {
            if let Err(e) = cache.put(hash, model, language, &words).await {
                warn!("Failed to cache transcription: {}", e);
            }
        }

        Ok(words)
    }

    /// Fetches phrase boundaries when semantic segmentation is enabled
    ///
    /// # Arguments
    ///
    /// * `words` - Adapted transcript words to chunk
    ///
    /// # Returns
    ///
    /// * `Result<Option<PhraseBoundaries>>` - The detected boundary set,
    ///   `None` when semantic segmentation is switched off
    pub async fn resolve_boundaries(&self, words: &[Word]) -> Result<Option<PhraseBoundaries>> {
        if !self.config.captions.use_semantic_boundaries {
            return Ok(None);
        }

        self.status.update("Detecting phrase boundaries...");
        match self.chunker.chunk(words).await {
            Ok(set) => {
                debug!("Received {} phrase boundaries", set.len());
                Ok(Some(set))
            }
            // Semantic segmentation was asked for, so a missing service is a hard error
            Err(ChunkerError::Unavailable(reason)) => {
                Err(AppError::SemanticCapabilityUnavailable(reason).into())
            }
            Err(e) => Err(AppError::from(e).into()),
        }
    }

    /// Generates captions for every media file in a folder
    ///
    /// # Arguments
    ///
    /// * `input_dir` - Directory scanned recursively for media files
    /// * `force_overwrite` - Whether to overwrite existing caption files
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Success or error
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let media_files = FileManager::find_media_files(&input_dir)?;
        if media_files.is_empty() {
            return Err(anyhow!("No media files found in directory: {:?}", input_dir));
        }
        info!("Found {} media files to process", media_files.len());

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(media_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut success_count = 0;
        let mut skip_count = 0;
        let mut error_count = 0;

        for media_file in media_files.iter() {
            let file_name = media_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            // Captions land next to their source file
            let output_dir = match media_file.parent() {
                Some(parent) => parent.to_path_buf(),
                None => input_dir.clone(),
            };

            let output_path = FileManager::captions_output_path(media_file, &output_dir);
            if FileManager::file_exists(&output_path) && !force_overwrite {
                warn!("Skipping file, captions already exist (use -f to force overwrite)");
                skip_count += 1;
                folder_pb.inc(1);
                continue;
            }

            match self
                .run_with_progress(
                    media_file.clone(),
                    output_dir,
                    &multi_progress,
                    force_overwrite,
                )
                .await
            {
                Ok(_) => success_count += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors - Duration: {}",
            success_count,
            skip_count,
            error_count,
            Self::format_duration(start_time.elapsed())
        );
        Ok(())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
