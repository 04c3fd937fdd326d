/*!
 * Common test utilities for the autocap test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use autocap::transcript::{RawWord, Word};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a placeholder media file; the content is never decoded by tests
pub fn create_test_media_file(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "not really media")
}

/// Builds an adapted word list with evenly spaced timestamps
pub fn make_words(texts: &[&str]) -> Vec<Word> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Word {
            text: text.to_string(),
            start: i as f64 * 0.5,
            end: i as f64 * 0.5 + 0.4,
        })
        .collect()
}

/// Builds raw provider words with evenly spaced timestamps
pub fn make_raw_words(texts: &[&str]) -> Vec<RawWord> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| RawWord::new(*text, i as f64 * 0.5, i as f64 * 0.5 + 0.4))
        .collect()
}
