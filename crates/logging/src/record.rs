//! crates/logging/src/record.rs
//! Immutable diagnostic records.

use crate::levels::Severity;
use crate::line_mode::LineMode;
use crate::streams::ROOT;

/// A captured diagnostic event.
///
/// The message is already fully formatted text; sinks only decorate it (name
/// prefix, colour, trailing newline) and never re-render it. The sequence
/// number is stamped by the router when the record enters it and reflects the
/// capture order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    stream: String,
    severity: Severity,
    message: String,
    skip_newline: bool,
    sequence: u64,
}

impl Record {
    /// Creates a record for `stream`.
    #[must_use]
    pub fn new(stream: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            severity,
            message: message.into(),
            skip_newline: false,
            sequence: 0,
        }
    }

    /// Suppresses the trailing newline, used for in-place progress updates.
    #[must_use]
    pub fn with_skip_newline(mut self, skip_newline: bool) -> Self {
        self.skip_newline = skip_newline;
        self
    }

    /// Stamps the capture sequence number.
    #[must_use]
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Returns the routing key of the stream the record was emitted on.
    #[must_use]
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Returns the stream name as shown in `name: message` output.
    ///
    /// The unnamed root stream is displayed as `root`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.stream == ROOT { "root" } else { &self.stream }
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the formatted message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Reports whether the trailing newline is suppressed.
    #[must_use]
    pub const fn skip_newline(&self) -> bool {
        self.skip_newline
    }

    /// Returns the newline policy implied by [`skip_newline`](Self::skip_newline).
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        LineMode::for_skip_newline(self.skip_newline)
    }

    /// Returns the capture sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}
