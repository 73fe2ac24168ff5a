//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, DefaultLogger and the
//! error-building macros.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use crate::error::Error;
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "rp::test".to_string(),
        message: format!("{:?} message", severity),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_with_file_line() {
    let entry = entry(LogSeverity::Error, Some("render_process.rs"), Some(42));
    assert_eq!(entry.source, "rp::test");
    assert_eq!(entry.file, Some("render_process.rs"));
    assert_eq!(entry.line, Some(42));

    let cloned = entry.clone();
    assert_eq!(cloned.message, entry.message);
    assert_eq!(cloned.severity, LogSeverity::Error);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        // Both output branches, must not panic
        logger.log(&entry(severity, None, None));
        logger.log(&entry(severity, Some("log_tests.rs"), Some(1)));
    }
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}

// ============================================================================
// GLOBAL LOGGER AND MACROS
// ============================================================================

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn capture(source: &str, entries: &Arc<Mutex<Vec<LogEntry>>>) -> Vec<LogEntry> {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.source == source)
        .cloned()
        .collect()
}

#[test]
#[serial]
fn test_macros_route_to_custom_logger() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    crate::log::set_logger(CaptureLogger { entries: entries.clone() });

    crate::rp_debug!("rp::test::macros", "created {} textures", 3);
    crate::rp_warn!("rp::test::macros", "pass {} has no targets", 1);
    crate::rp_error!("rp::test::macros", "failure");

    crate::log::reset_logger();

    let captured = capture("rp::test::macros", &entries);
    assert_eq!(captured.len(), 3);
    assert_eq!(captured[0].severity, LogSeverity::Debug);
    assert_eq!(captured[0].message, "created 3 textures");
    assert!(captured[0].file.is_none());
    assert_eq!(captured[1].severity, LogSeverity::Warn);
    assert_eq!(captured[2].severity, LogSeverity::Error);
    assert!(captured[2].file.is_some());
    assert!(captured[2].line.is_some());
}

#[test]
#[serial]
fn test_rp_err_logs_and_builds_variant() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    crate::log::set_logger(CaptureLogger { entries: entries.clone() });

    let spec_err = crate::rp_err!("rp::test::err", InvalidSpecification => "scale {}", -1.0);
    let backend_err = crate::rp_err!("rp::test::err", "glCreateFramebuffer failed");

    crate::log::reset_logger();

    assert!(matches!(spec_err, Error::InvalidSpecification(ref m) if m == "scale -1"));
    assert!(matches!(backend_err, Error::BackendError(ref m) if m == "glCreateFramebuffer failed"));

    let captured = capture("rp::test::err", &entries);
    assert_eq!(captured.len(), 2);
    assert!(captured.iter().all(|e| e.severity == LogSeverity::Error));
}

#[test]
fn test_rp_bail_returns_error() {
    fn check(value: i32) -> crate::error::Result<i32> {
        if value < 0 {
            crate::rp_bail!("rp::test::bail", InvalidState => "negative value {}", value);
        }
        Ok(value)
    }

    assert_eq!(check(4).ok(), Some(4));
    assert!(matches!(check(-1), Err(Error::InvalidState(_))));
}
