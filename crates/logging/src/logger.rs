//! crates/logging/src/logger.rs
//! The emission seam between producers and the router.

use std::sync::Arc;

use crate::levels::Severity;
use crate::record::Record;

/// Accepts records from producers.
///
/// Implementations must never fail towards the caller: delivery problems are
/// handled inside the implementation.
pub trait Emit {
    /// Hands `record` over for routing.
    fn emit(&self, record: Record);
}

impl<E: Emit + ?Sized> Emit for &E {
    fn emit(&self, record: Record) {
        (**self).emit(record);
    }
}

impl<E: Emit + ?Sized> Emit for Arc<E> {
    fn emit(&self, record: Record) {
        (**self).emit(record);
    }
}

impl<E: Emit + ?Sized> Emit for Box<E> {
    fn emit(&self, record: Record) {
        (**self).emit(record);
    }
}

/// A handle that emits records on one named stream.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use logging::{Emit, Logger, Record, Severity};
///
/// #[derive(Default)]
/// struct Collect(RefCell<Vec<Record>>);
///
/// impl Emit for Collect {
///     fn emit(&self, record: Record) {
///         self.0.borrow_mut().push(record);
///     }
/// }
///
/// let sink = Collect::default();
/// let logger = Logger::new(&sink, "app");
/// logger.warning("disk almost full");
///
/// let records = sink.0.borrow();
/// assert_eq!(records[0].stream(), "app");
/// assert_eq!(records[0].severity(), Severity::WARNING);
/// ```
#[derive(Clone, Debug)]
pub struct Logger<E> {
    emitter: E,
    stream: String,
}

impl<E> Logger<E> {
    /// Binds `emitter` to `stream`.
    pub fn new(emitter: E, stream: impl Into<String>) -> Self {
        Self {
            emitter,
            stream: stream.into(),
        }
    }

    /// Returns the stream routing key.
    #[must_use]
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Borrows the underlying emitter.
    #[must_use]
    pub const fn emitter(&self) -> &E {
        &self.emitter
    }
}

impl<E: Emit> Logger<E> {
    /// Emits `message` at `severity`.
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        self.emitter
            .emit(Record::new(self.stream.clone(), severity, message));
    }

    /// Emits `message` without a trailing newline, for progress updates.
    pub fn log_no_newline(&self, severity: Severity, message: impl Into<String>) {
        self.emitter.emit(
            Record::new(self.stream.clone(), severity, message).with_skip_newline(true),
        );
    }

    /// Emits at [`Severity::DEBUG`].
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::DEBUG, message);
    }

    /// Emits at [`Severity::INFO`].
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::INFO, message);
    }

    /// Emits at [`Severity::WARNING`].
    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::WARNING, message);
    }

    /// Emits at [`Severity::ERROR`].
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::ERROR, message);
    }

    /// Emits at [`Severity::CRITICAL`].
    pub fn critical(&self, message: impl Into<String>) {
        self.log(Severity::CRITICAL, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<Record>>);

    impl Emit for Collect {
        fn emit(&self, record: Record) {
            self.0.lock().unwrap().push(record);
        }
    }

    #[test]
    fn helpers_use_expected_severities() {
        let sink = Arc::new(Collect::default());
        let logger = Logger::new(Arc::clone(&sink), "db");
        logger.debug("d");
        logger.info("i");
        logger.warning("w");
        logger.error("e");
        logger.critical("c");

        let severities: Vec<Severity> = sink
            .0
            .lock()
            .unwrap()
            .iter()
            .map(Record::severity)
            .collect();
        assert_eq!(
            severities,
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
    fn log_no_newline_marks_record() {
        let sink = Collect::default();
        Logger::new(&sink, "app").log_no_newline(Severity::INFO, "working...");
        let records = sink.0.lock().unwrap();
        assert!(records[0].skip_newline());
        assert_eq!(records[0].message(), "working...");
    }
}
