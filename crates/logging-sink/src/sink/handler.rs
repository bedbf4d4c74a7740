//! crates/logging-sink/src/sink/handler.rs
//! A severity-filtered, formatted writer bound to one output target.

use std::io;

use logging::{Record, Severity, SeverityFilter};
use tracing::debug;

use crate::destination::{Outputs, Target};
use crate::terminal::Palette;

/// How a handler lays out a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// The message alone.
    Message,
    /// `name: message`, with the root stream shown as `root`.
    #[default]
    Named,
}

impl Format {
    fn layout(self, record: &Record) -> String {
        match self {
            Self::Message => record.message().to_owned(),
            Self::Named => format!("{}: {}", record.display_name(), record.message()),
        }
    }
}

/// Writes accepted records to the destination its [`Target`] resolves to.
///
/// A record is accepted when its severity is at least the handler's level and
/// falls inside the handler's [`SeverityFilter`] band. Write failures are
/// reported through `tracing` and never reach the emitting caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handler {
    target: Target,
    level: Severity,
    filter: SeverityFilter,
    format: Format,
    palette: Palette,
}

impl Handler {
    /// A handler accepting everything, in `name: message` format, uncoloured.
    #[must_use]
    pub const fn new(target: Target) -> Self {
        Self {
            target,
            level: Severity::NOTSET,
            filter: SeverityFilter::All,
            format: Format::Named,
            palette: Palette::plain(),
        }
    }

    /// Sets the minimum severity.
    #[must_use]
    pub const fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Sets the band filter.
    #[must_use]
    pub const fn with_filter(mut self, filter: SeverityFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the layout.
    #[must_use]
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets the colour palette.
    #[must_use]
    pub const fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Returns the output target.
    #[must_use]
    pub const fn target(&self) -> Target {
        self.target
    }

    /// Returns the minimum severity.
    #[must_use]
    pub const fn level(&self) -> Severity {
        self.level
    }

    /// Reports whether the handler would write `record`.
    #[must_use]
    pub fn accepts(&self, record: &Record) -> bool {
        record.severity() >= self.level && self.filter.accepts(record.severity())
    }

    /// Renders `record` exactly as it would be written, terminator included.
    #[must_use]
    pub fn render(&self, record: &Record) -> String {
        let laid_out = self.format.layout(record);
        let mut rendered = self.palette.paint(record.severity(), &laid_out).into_owned();
        rendered.push_str(record.line_mode().terminator());
        rendered
    }

    /// Writes `record` if accepted.
    pub fn handle(&self, record: &Record, outputs: &Outputs) {
        if !self.accepts(record) {
            return;
        }

        let destination = outputs.resolve(self.target);
        let rendered = self.render(record);
        if let Err(error) = destination
            .write_str(&rendered)
            .and_then(|()| destination.flush())
        {
            self.handle_error(record, &error);
        }
    }

    fn handle_error(&self, record: &Record, error: &io::Error) {
        debug!(
            stream = record.stream(),
            output = ?self.target,
            %error,
            "sink delivery failed"
        );
    }
}
