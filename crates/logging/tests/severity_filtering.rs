//! Integration tests for severity bands and logger emission.

use std::sync::Mutex;

use logging::{Emit, LineMode, Logger, Record, Severity, SeverityFilter};

#[derive(Default)]
struct Collect(Mutex<Vec<Record>>);

impl Emit for Collect {
    fn emit(&self, record: Record) {
        self.0.lock().unwrap().push(record);
    }
}

// ============================================================================
// Bands
// ============================================================================

#[test]
fn bands_meet_at_info_and_warning() {
    assert!(SeverityFilter::InfoAndLess.accepts(Severity::INFO));
    assert!(!SeverityFilter::InfoAndLess.accepts(Severity::new(21)));
    assert!(SeverityFilter::WarnAndMore.accepts(Severity::WARNING));
    assert!(!SeverityFilter::WarnAndMore.accepts(Severity::new(29)));
    assert!(SeverityFilter::All.accepts(Severity::NOTSET));
}

// ============================================================================
// Logger
// ============================================================================

#[test]
fn convenience_methods_pick_standard_levels() {
    let sink = Collect::default();
    let logger = Logger::new(&sink, "app");
    logger.debug("d");
    logger.info("i");
    logger.warning("w");
    logger.error("e");
    logger.critical("c");

    let levels: Vec<Severity> = sink.0.lock().unwrap().iter().map(Record::severity).collect();
    assert_eq!(
        levels,
        [
            Severity::DEBUG,
            Severity::INFO,
            Severity::WARNING,
            Severity::ERROR,
            Severity::CRITICAL
        ]
    );
}

#[test]
fn no_newline_records_carry_the_policy() {
    let sink = Collect::default();
    let logger = Logger::new(&sink, "app");
    logger.log_no_newline(Severity::INFO, "50%");
    logger.log(Severity::INFO, "done");

    let records = sink.0.lock().unwrap();
    assert_eq!(records[0].line_mode(), LineMode::WithoutNewline);
    assert_eq!(records[1].line_mode(), LineMode::WithNewline);
}

#[test]
fn root_stream_displays_as_root() {
    let sink = Collect::default();
    Logger::new(&sink, "").info("boot");
    let records = sink.0.lock().unwrap();
    assert_eq!(records[0].stream(), "");
    assert_eq!(records[0].display_name(), "root");
}
