use log::info;
use parking_lot::Mutex;

// @module: One-way status reporting for long-running jobs

/// Receiver for human-readable progress messages.
///
/// The pipeline fires and forgets; implementations must not block and
/// never report back.
pub trait StatusSink: Send + Sync {
    /// Deliver one progress message
    fn update(&self, message: &str);
}

/// Forwards every message to the logger at info level
#[derive(Debug, Default)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn update(&self, message: &str) {
        info!("{}", message);
    }
}

/// Records messages in memory for tests and embedding applications
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl StatusSink for MemorySink {
    fn update(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}
