//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, `severity` second, remaining fields sorted by key
//! - WARN and below go to stdout, ERROR and FATAL to stderr, unless the
//!   process routes every line to stderr (the CLI does, so its stdout
//!   carries only the response)
//! - Events below the process-wide threshold are dropped

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-operation detail
    Trace = 0,
    /// Diagnostics worth seeing by default
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn from_u8(level: u8) -> Self {
        match level {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);
static ALL_TO_STDERR: AtomicBool = AtomicBool::new(false);

/// Structured logger writing JSON lines
pub struct Logger;

impl Logger {
    /// Set the lowest severity that gets written.
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Send every line to stderr, whatever its severity.
    pub fn set_output_stderr(all: bool) {
        ALL_TO_STDERR.store(all, Ordering::Relaxed);
    }

    pub fn output_stderr() -> bool {
        ALL_TO_STDERR.load(Ordering::Relaxed)
    }

    /// Log a typed event
    pub fn event(severity: Severity, event: Event, fields: &[(&str, &str)]) {
        Self::log(severity, event.as_str(), fields);
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        if routes_to_stderr(severity, Self::output_stderr()) {
            Self::write_line(severity, event, fields, &mut io::stderr());
        } else {
            Self::write_line(severity, event, fields, &mut io::stdout());
        }
    }

    pub fn trace(event: Event, fields: &[(&str, &str)]) {
        Self::event(Severity::Trace, event, fields);
    }

    pub fn info(event: Event, fields: &[(&str, &str)]) {
        Self::event(Severity::Info, event, fields);
    }

    pub fn warn(event: Event, fields: &[(&str, &str)]) {
        Self::event(Severity::Warn, event, fields);
    }

    pub fn error(event: Event, fields: &[(&str, &str)]) {
        Self::event(Severity::Error, event, fields);
    }

    fn write_line<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], writer: &mut W) {
        let line = Self::format_line(severity, event, fields);
        // Logging failures are swallowed.
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);

        output.push_str("{\"event\":");
        push_json_str(&mut output, event);
        output.push_str(",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted {
            output.push(',');
            push_json_str(&mut output, key);
            output.push(':');
            push_json_str(&mut output, value);
        }

        output.push_str("}\n");
        output
    }
}

fn routes_to_stderr(severity: Severity, all_to_stderr: bool) -> bool {
    all_to_stderr || severity >= Severity::Error
}

fn push_json_str(output: &mut String, s: &str) {
    match serde_json::to_string(s) {
        Ok(quoted) => output.push_str(&quoted),
        Err(_) => output.push_str("\"\""),
    }
}

/// Render a log line without writing it, for tests
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::write_line(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_log_json_format() {
        let output = capture_log(Severity::Info, "STALE_INDEX_KEY", &[]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "STALE_INDEX_KEY");
        assert_eq!(parsed["severity"], "INFO");
    }

    #[test]
    fn test_fields_sorted_after_event_and_severity() {
        let output = capture_log(
            Severity::Trace,
            "RECORD_WRITTEN",
            &[("table", "tickets"), ("file", "ab12.json")],
        );

        assert!(output.starts_with("{\"event\":\"RECORD_WRITTEN\",\"severity\":\"TRACE\""));
        let file_pos = output.find("\"file\"").unwrap();
        let table_pos = output.find("\"table\"").unwrap();
        assert!(file_pos < table_pos);
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_escaping() {
        let output = capture_log(Severity::Info, "E", &[("key", "quote\" and\nnewline")]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["key"], "quote\" and\nnewline");
    }

    #[test]
    fn test_stream_routing() {
        assert!(!routes_to_stderr(Severity::Info, false));
        assert!(!routes_to_stderr(Severity::Warn, false));
        assert!(routes_to_stderr(Severity::Error, false));

        assert!(routes_to_stderr(Severity::Trace, true));
        assert!(routes_to_stderr(Severity::Info, true));
    }

    #[test]
    fn test_severity_from_level() {
        assert_eq!(Severity::from_u8(Severity::Info as u8), Severity::Info);
        assert_eq!(Severity::from_u8(200), Severity::Fatal);
    }
}
