//! Operational request log.
//!
//! The request handler writes one line when a request arrives and one when it
//! completes. Lines look like `<timestamp>\t--> <message>`. Writing is
//! best-effort and never reports failure to the caller.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tracing::info;

/// Target under which request log lines are emitted
pub const REQUEST_LOG_TARGET: &str = "eightball::requests";

/// Write-only sink for request log lines
pub trait RequestLog: Send + Sync + Debug {
    fn record(&self, message: &str);
}

/// Type alias for Arc-wrapped RequestLog trait objects
pub type RequestLogRef = Arc<dyn RequestLog>;

/// Render one log line for the given moment
pub fn format_line(at: DateTime<Local>, message: &str) -> String {
    format!("{}\t--> {}", at.format("%Y-%m-%d %H:%M:%S%.3f"), message)
}

/// Emits request log lines through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRequestLog;

impl RequestLog for TracingRequestLog {
    fn record(&self, message: &str) {
        info!(target: REQUEST_LOG_TARGET, "{}", format_line(Local::now(), message));
    }
}

/// Keeps request log lines in memory, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryRequestLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryRequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines recorded so far
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RequestLog for MemoryRequestLog {
    fn record(&self, message: &str) {
        let line = format_line(Local::now(), message);
        // A poisoned lock still holds usable data; logging must not fail the request
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_line() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            format_line(at, "Request completed in 3 milliseconds"),
            "2024-03-09 14:05:07.000\t--> Request completed in 3 milliseconds"
        );
    }

    #[test]
    fn test_memory_log_keeps_order() {
        let log = MemoryRequestLog::new();
        log.record("first");
        log.record("second");

        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("\t--> first"));
        assert!(lines[1].ends_with("\t--> second"));
    }

    #[test]
    fn test_tracing_log_does_not_panic_without_subscriber() {
        TracingRequestLog.record("nobody is listening");
    }
}
