//! crates/routing/src/table.rs
//! Stream name to sink mapping with a root catch-all.

use std::collections::BTreeMap;

use logging::Record;
use logging::streams::ROOT;
use logging_sink::{Outputs, Sink};

/// Maps stream names to their [`Sink`].
///
/// A stream without an entry falls back to the root (`""`) entry. There is
/// no hierarchical propagation: `a.b` never reaches `a`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingTable {
    entries: BTreeMap<String, Sink>,
}

impl RoutingTable {
    /// Creates an empty table that drops every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `sink` to `stream`, returning the sink it replaced.
    pub fn attach(&mut self, stream: impl Into<String>, sink: Sink) -> Option<Sink> {
        self.entries.insert(stream.into(), sink)
    }

    /// Removes the entry of `stream`.
    pub fn detach(&mut self, stream: &str) -> Option<Sink> {
        self.entries.remove(stream)
    }

    /// Returns the entry bound to `stream` itself.
    #[must_use]
    pub fn get(&self, stream: &str) -> Option<&Sink> {
        self.entries.get(stream)
    }

    /// Returns the sink a record of `stream` is delivered through.
    #[must_use]
    pub fn resolve(&self, stream: &str) -> Option<&Sink> {
        self.entries.get(stream).or_else(|| self.entries.get(ROOT))
    }

    /// Delivers `record` through its resolved sink.
    ///
    /// Returns `false` when the record found no live sink.
    pub fn dispatch(&self, record: &Record, outputs: &Outputs) -> bool {
        match self.resolve(record.stream()) {
            Some(sink @ Sink::Direct(_)) => {
                sink.deliver(record, outputs);
                true
            }
            Some(Sink::Buffered | Sink::Null) | None => false,
        }
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sink)> {
        self.entries.iter().map(|(name, sink)| (name.as_str(), sink))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
