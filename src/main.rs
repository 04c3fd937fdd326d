// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, SplitMode, WhisperModel};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod cache;
mod captioner;
mod errors;
mod file_utils;
mod language_utils;
mod media;
mod providers;
mod srt;
mod status;
mod transcript;

/// CLI Wrapper for WhisperModel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliWhisperModel {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl From<CliWhisperModel> for WhisperModel {
    fn from(cli_model: CliWhisperModel) -> Self {
        match cli_model {
            CliWhisperModel::Tiny => WhisperModel::Tiny,
            CliWhisperModel::Base => WhisperModel::Base,
            CliWhisperModel::Small => WhisperModel::Small,
            CliWhisperModel::Medium => WhisperModel::Medium,
            CliWhisperModel::Large => WhisperModel::Large,
        }
    }
}

/// CLI Wrapper for SplitMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSplitMode {
    Words,
    Chars,
}

impl From<CliSplitMode> for SplitMode {
    fn from(cli_mode: CliSplitMode) -> Self {
        match cli_mode {
            CliSplitMode::Words => SplitMode::Words,
            CliSplitMode::Chars => SplitMode::Chars,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate SRT captions from the speech in media files (default command)
    #[command(alias = "run")]
    Caption(CaptionArgs),

    /// Generate shell completions for autocap
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct CaptionArgs {
    /// Input media file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing caption files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whisper model size to transcribe with
    #[arg(short, long, value_enum)]
    model: Option<CliWhisperModel>,

    /// Spoken language code, or 'auto' to detect (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    language: Option<String>,

    /// Output directory for caption files (single-file mode only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How caption length is measured when splitting
    #[arg(long, value_enum)]
    split_mode: Option<CliSplitMode>,

    /// Length threshold that closes a caption line
    #[arg(long)]
    split_value: Option<usize>,

    /// Split on phrase boundaries from the chunking service
    #[arg(long)]
    semantic: bool,

    /// Keep captions on screen until the next one starts
    #[arg(long)]
    continuous: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "autocap.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// autocap - Automatic captions from speech
///
/// A speech-to-caption tool that extracts the audio track from media files
/// and turns the recognized words into word-timed SRT captions.
#[derive(Parser, Debug)]
#[command(name = "autocap")]
#[command(author = "autocap Team")]
#[command(version = "1.0.0")]
#[command(about = "Speech-to-caption tool for video and audio files")]
#[command(long_about = "autocap listens to the audio track of a media file and writes word-timed SRT captions.

EXAMPLES:
    autocap talk.mp4                            # Caption using default config
    autocap -f talk.mp4                         # Force overwrite existing captions
    autocap -m small talk.mp4                   # Use the small whisper model
    autocap -l fr interview.mkv                 # Transcribe French speech
    autocap --split-mode chars --split-value 42 talk.mp4
    autocap --semantic lecture.mp4              # Split on phrase boundaries
    autocap --log-level debug /videos/          # Process a directory with debug logging
    autocap completions bash > autocap.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in autocap.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED MODELS:
    tiny | base | small | medium | large
    Models are ggml files resolved from the configured models directory.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input media file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing caption files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Whisper model size to transcribe with
    #[arg(short, long, value_enum)]
    model: Option<CliWhisperModel>,

    /// Spoken language code, or 'auto' to detect (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    language: Option<String>,

    /// Output directory for caption files (single-file mode only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How caption length is measured when splitting
    #[arg(long, value_enum)]
    split_mode: Option<CliSplitMode>,

    /// Length threshold that closes a caption line
    #[arg(long)]
    split_value: Option<usize>,

    /// Split on phrase boundaries from the chunking service
    #[arg(long)]
    semantic: bool,

    /// Keep captions on screen until the next one starts
    #[arg(long)]
    continuous: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "autocap.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color sequence for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());
            let emoji = Self::get_emoji_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// Map a config log level onto the log crate's filter
fn to_level_filter(level: app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "autocap", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Caption(args)) => run_caption(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let caption_args = CaptionArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                model: cli.model,
                language: cli.language,
                output: cli.output,
                split_mode: cli.split_mode,
                split_value: cli.split_value,
                semantic: cli.semantic,
                continuous: cli.continuous,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_caption(caption_args).await
        }
    }
}

async fn run_caption(options: CaptionArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(to_level_filter(cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(model) = &options.model {
        config.whisper.model = model.clone().into();
    }

    if let Some(language) = &options.language {
        config.language = language.clone();
    }

    if let Some(split_mode) = &options.split_mode {
        config.captions.split_mode = split_mode.clone().into();
    }

    if let Some(split_value) = options.split_value {
        config.captions.split_value = split_value;
    }

    // Boolean flags can only switch features on
    if options.semantic {
        config.captions.use_semantic_boundaries = true;
    }

    if options.continuous {
        config.captions.continuous_timing = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(to_level_filter(config.log_level.clone()));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the controller with the input file(s) and output directory
    if options.input_path.is_file() {
        // Process a single file
        let output_dir = match &options.output {
            Some(dir) => dir.clone(),
            None => {
                let parent = options.input_path.parent().unwrap_or(Path::new("."));
                if parent.as_os_str().is_empty() {
                    PathBuf::from(".")
                } else {
                    parent.to_path_buf()
                }
            }
        };

        controller.run(
            options.input_path.clone(),
            output_dir,
            options.force_overwrite
        ).await?;
    } else if options.input_path.is_dir() {
        // Process a directory, captions land next to each source file
        if options.output.is_some() {
            warn!("Ignoring --output in directory mode, captions are written next to their sources.");
        }

        controller.run_folder(
            options.input_path.clone(),
            options.force_overwrite
        ).await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}
