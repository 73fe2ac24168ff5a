//! Integration tests for the logging system
//!
//! These tests swap the global logger and are serialized.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests


use std::sync::{Arc, Mutex};
use serial_test::serial;
use device_test_utils::RecordingDevice;
use render_process::glam::UVec2;
use render_process::rp::log::{self, LogEntry, LogSeverity, Logger};
use render_process::rp::{
    BufferSpec, Capabilities, Config, DataFormat, PassSpec, RenderProcess, RenderProcessManager,
    Target,
};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures render process entries
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source.starts_with("rp::") {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

fn process(label: &str) -> RenderProcessManager {
    let (device, _) = RecordingDevice::new();
    let config = Config { label: label.to_string(), ..Default::default() };
    RenderProcessManager::new(Box::new(device), Capabilities::default(), config)
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_create_is_logged() {
    let (logger, entries) = TestLogger::new();
    log::set_logger(logger);

    let mut process = process("hud");
    process.specify_buffer(0, BufferSpec::color(4, DataFormat::Default)).unwrap();
    process.specify_pass(0, PassSpec::new().with_target(Target::color(0, 0))).unwrap();
    process.create(UVec2::new(320, 200)).unwrap();

    log::reset_logger();

    let entries = entries.lock().unwrap();
    let info = entries
        .iter()
        .find(|e| e.severity == LogSeverity::Info && e.source == "rp::RenderProcess")
        .expect("create logs an info entry");
    assert!(info.message.starts_with("hud: created 1 textures, 1 framebuffers"));
    assert!(info.file.is_none());
}

#[test]
#[serial]
fn test_integration_errors_carry_location() {
    let (logger, entries) = TestLogger::new();
    log::set_logger(logger);

    let mut process = process("errors");
    let result = process.specify_buffer(0, BufferSpec::default().with_scale(f32::NAN));

    log::reset_logger();
    assert!(result.is_err());

    let entries = entries.lock().unwrap();
    let error = entries
        .iter()
        .find(|e| e.severity == LogSeverity::Error)
        .expect("invalid specification is logged");
    assert_eq!(error.source, "rp::BufferSpec");
    assert!(error.message.contains("scale"));
    assert!(error.file.is_some());
    assert!(error.line.is_some());
}
