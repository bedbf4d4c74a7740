//! crates/logging-sink/src/sink/mod.rs
//! The per-stream sink variants bound in the routing table.

mod handler;

pub use handler::{Format, Handler};

use logging::Record;

use crate::destination::Outputs;

/// What a routing-table entry does with records of its stream.
///
/// Replacing the sink of a stream swaps the whole value, so a stream never has
/// two sinks at once and never has none while being replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sink {
    /// Hold records in the deferred buffer until routing is final.
    ///
    /// The owner of the buffer resolves this variant; [`Sink::deliver`]
    /// ignores it.
    Buffered,
    /// Hand records to every handler in order.
    Direct(Vec<Handler>),
    /// Discard records.
    Null,
}

impl Sink {
    /// A sink with a single handler.
    #[must_use]
    pub fn direct(handler: Handler) -> Self {
        Self::Direct(vec![handler])
    }

    /// A sink that splits records between two handlers with disjoint bands.
    #[must_use]
    pub fn split(low: Handler, high: Handler) -> Self {
        Self::Direct(vec![low, high])
    }

    /// Reports whether the sink discards everything.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the handlers of a direct sink.
    #[must_use]
    pub fn handlers(&self) -> &[Handler] {
        match self {
            Self::Direct(handlers) => handlers,
            Self::Buffered | Self::Null => &[],
        }
    }

    /// Delivers `record` through every handler that accepts it.
    pub fn deliver(&self, record: &Record, outputs: &Outputs) {
        for handler in self.handlers() {
            handler.handle(record, outputs);
        }
    }
}
