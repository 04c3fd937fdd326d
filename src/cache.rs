/*!
 * Local transcription cache.
 *
 * Transcription is by far the slowest stage of a captioning run, so results
 * are kept in a SQLite database keyed by audio content hash, model size and
 * language. Async access goes through spawn_blocking so the runtime is
 * never blocked on database work.
 */

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};

use crate::app_config::WhisperModel;
use crate::transcript::RawWord;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Default cache filename
const DEFAULT_CACHE_FILENAME: &str = "transcriptions.db";

/// Default cache directory name under the user's cache directory
const DEFAULT_CACHE_DIRNAME: &str = "autocap";

/// Thread-safe transcription cache over SQLite
#[derive(Clone)]
pub struct TranscriptionCache {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl TranscriptionCache {
    /// Open the cache at the default location
    pub fn new_default() -> Result<Self> {
        let db_path = Self::default_cache_path()?;
        Self::new(&db_path)
    }

    /// Open the cache at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory: {:?}", parent))?;
        }

        info!("Opening transcription cache at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open cache database: {:?}", db_path))?;

        initialize_schema(&conn)?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory cache (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory transcription cache");

        let conn =
            Connection::open_in_memory().context("Failed to create in-memory database")?;

        initialize_schema(&conn)?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default cache path
    pub fn default_cache_path() -> Result<PathBuf> {
        let base_dir = dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?;

        Ok(base_dir
            .join(DEFAULT_CACHE_DIRNAME)
            .join(DEFAULT_CACHE_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Hash a file's content with SHA-256
    pub fn hash_file<P: AsRef<Path>>(path: P) -> Result<String> {
        let mut file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file for hashing: {:?}", path.as_ref()))?;

        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher).context("Failed to hash file content")?;

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Execute a database operation asynchronously using spawn_blocking
    async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| anyhow::anyhow!("Failed to acquire cache lock: {}", e))?;

            f(&conn)
        })
        .await
        .context("Cache task panicked")?
    }

    /// Look up a cached transcription, bumping its hit counter on a hit
    pub async fn get(
        &self,
        audio_hash: &str,
        model: WhisperModel,
        language: &str,
    ) -> Result<Option<Vec<RawWord>>> {
        let audio_hash = audio_hash.to_string();
        let model = model.to_lowercase_string();
        let language = language.to_string();

        self.execute_async(move |conn| {
            let result: Option<(i64, String)> = conn
                .query_row(
                    r#"
                    SELECT id, words_json
                    FROM transcriptions
                    WHERE audio_hash = ?1 AND model = ?2 AND language = ?3
                    "#,
                    params![audio_hash, model, language],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            if let Some((id, words_json)) = result {
                conn.execute(
                    "UPDATE transcriptions SET hit_count = hit_count + 1 WHERE id = ?1",
                    [id],
                )?;

                let words: Vec<RawWord> = serde_json::from_str(&words_json)
                    .context("Failed to decode cached transcription")?;
                debug!("Cache hit for transcription ({} words)", words.len());
                Ok(Some(words))
            } else {
                Ok(None)
            }
        })
        .await
    }

    /// Store a transcription, replacing any previous entry for the same key
    pub async fn put(
        &self,
        audio_hash: &str,
        model: WhisperModel,
        language: &str,
        words: &[RawWord],
    ) -> Result<()> {
        let audio_hash = audio_hash.to_string();
        let model = model.to_lowercase_string();
        let language = language.to_string();
        let word_count = words.len() as i64;
        let words_json =
            serde_json::to_string(words).context("Failed to encode transcription for caching")?;

        self.execute_async(move |conn| {
            conn.execute(
                r#"
                INSERT INTO transcriptions (
                    audio_hash, model, language, words_json, word_count, created_at, hit_count
                ) VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'), 0)
                ON CONFLICT(audio_hash, model, language)
                DO UPDATE SET words_json = excluded.words_json,
                              word_count = excluded.word_count,
                              created_at = excluded.created_at
                "#,
                params![audio_hash, model, language, words_json, word_count],
            )?;

            debug!("Cached transcription with {} words", word_count);
            Ok(())
        })
        .await
    }

    /// Number of cached transcriptions
    pub async fn entry_count(&self) -> Result<i64> {
        self.execute_async(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM transcriptions", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }
}

/// Initialize the cache schema
fn initialize_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing transcription cache schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else {
        debug!("Transcription cache schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all cache tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // Enable WAL mode for better concurrency and crash recovery
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS transcriptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            audio_hash TEXT NOT NULL,
            model TEXT NOT NULL,
            language TEXT NOT NULL,
            words_json TEXT NOT NULL,
            word_count INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            hit_count INTEGER DEFAULT 0,
            UNIQUE(audio_hash, model, language)
        );

        CREATE INDEX IF NOT EXISTS idx_transcriptions_hash ON transcriptions(audio_hash);
        "#,
    )?;

    Ok(())
}
