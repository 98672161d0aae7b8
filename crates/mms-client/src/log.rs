//! User-visible log capability
//!
//! The host application shows sync outcomes in its GUI log. Components in
//! this crate only depend on the [`GuiLog`] trait; the default implementation
//! routes through `tracing`, and [`RecordingGuiLog`] captures lines for
//! assertions.

use parking_lot::Mutex;

/// Sink for human-readable, user-visible log lines
///
/// Every rejected or skipped operation produces exactly one line beginning
/// with a severity tag naming the affected element and the reason.
pub trait GuiLog: Send + Sync {
    /// Emit one complete log line
    fn log(&self, line: &str);

    /// Emit an `[ERROR]` line
    fn error(&self, message: &str) {
        self.log(&format!("[ERROR] {message}"));
    }

    /// Emit a `[WARNING]` line
    fn warning(&self, message: &str) {
        self.log(&format!("[WARNING] {message}"));
    }
}

/// Default sink: forwards to `tracing` at a level matching the severity tag
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingGuiLog;

impl GuiLog for TracingGuiLog {
    fn log(&self, line: &str) {
        if line.starts_with("[ERROR]") {
            tracing::error!(target: "mms::gui", "{line}");
        } else if line.starts_with("[WARNING]") {
            tracing::warn!(target: "mms::gui", "{line}");
        } else {
            tracing::info!(target: "mms::gui", "{line}");
        }
    }
}

/// Capturing sink for tests and automation reports
#[derive(Debug, Default)]
pub struct RecordingGuiLog {
    lines: Mutex<Vec<String>>,
}

impl RecordingGuiLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines logged so far
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of `[ERROR]` lines logged so far
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.starts_with("[ERROR]"))
            .count()
    }

    /// Number of `[WARNING]` lines logged so far
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.starts_with("[WARNING]"))
            .count()
    }
}

impl GuiLog for RecordingGuiLog {
    fn log(&self, line: &str) {
        self.lines.lock().push(line.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_helpers_prefix_lines() {
        let log = RecordingGuiLog::new();
        log.error("prop is not editable!");
        log.warning("authentication has expired");

        assert_eq!(log.lines()[0], "[ERROR] prop is not editable!");
        assert_eq!(log.lines()[1], "[WARNING] authentication has expired");
        assert_eq!(log.error_count(), 1);
        assert_eq!(log.warning_count(), 1);
    }
}
