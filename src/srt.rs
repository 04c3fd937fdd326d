use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::captioner::CaptionLine;

// @module: SRT serialization for caption lines

// @const: SRT timing line regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Format a time in seconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse an SRT timestamp back to seconds - used by tests and the parser
pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
    let parts: Vec<&str> = timestamp.split(&[':', ','][..]).collect();
    if parts.len() != 4 {
        return Err(anyhow!("Invalid timestamp format: {}", timestamp));
    }

    let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
    let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
    let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
    let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

    if minutes >= 60 || seconds >= 60 {
        return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
    }

    let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
    Ok(total_ms as f64 / 1000.0)
}

impl fmt::Display for CaptionLine {
    // @format: index, timing line, text, blank separator
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            format_timestamp(self.start),
            format_timestamp(self.end)
        )?;
        writeln!(f, "{}", self.content)?;
        writeln!(f)
    }
}

/// Render all caption lines as one SRT document
pub fn compose(lines: &[CaptionLine]) -> String {
    let mut output = String::new();
    for line in lines {
        output.push_str(&line.to_string());
    }
    output
}

/// Write caption lines to an SRT file.
///
/// The whole document is composed in memory and written with a single
/// filesystem call; no partial file is ever observable.
pub fn write_srt_file<P: AsRef<Path>>(lines: &[CaptionLine], path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let content = compose(lines);
    fs::write(path, &content)
        .with_context(|| format!("Failed to write caption file: {}", path.display()))?;

    debug!("Wrote {} captions to {}", lines.len(), path.display());
    Ok(())
}

/// Parse SRT content back into caption lines - used by tests and tooling
pub fn parse_srt(content: &str) -> Result<Vec<CaptionLine>> {
    let mut lines = Vec::new();

    for block in content.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
        let mut rows = block.lines();

        let index: usize = rows
            .next()
            .ok_or_else(|| anyhow!("Empty caption block"))?
            .trim()
            .parse()
            .context("Failed to parse caption index")?;

        let timing = rows
            .next()
            .ok_or_else(|| anyhow!("Caption {} has no timing line", index))?;
        let captures = TIMESTAMP_REGEX
            .captures(timing)
            .ok_or_else(|| anyhow!("Invalid timing line for caption {}: {}", index, timing))?;

        let start = parse_timestamp(&format!(
            "{}:{}:{},{}",
            &captures[1], &captures[2], &captures[3], &captures[4]
        ))?;
        let end = parse_timestamp(&format!(
            "{}:{}:{},{}",
            &captures[5], &captures[6], &captures[7], &captures[8]
        ))?;

        let content = rows.collect::<Vec<_>>().join("\n");
        if content.is_empty() {
            return Err(anyhow!("Caption {} has no text", index));
        }

        lines.push(CaptionLine::new(index, start, end, content));
    }

    Ok(lines)
}
