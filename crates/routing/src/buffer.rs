//! crates/routing/src/buffer.rs
//! Ordered store of records emitted before routing is final.

use logging::Record;
use logging_sink::Outputs;
use tracing::trace;

use crate::table::RoutingTable;

/// Holds early records until they are replayed once.
///
/// Records come back out in exactly the order they were captured. After
/// [`DeferredBuffer::drain_into`] or [`DeferredBuffer::discard`] the buffer
/// refuses further captures.
#[derive(Debug, Default)]
pub struct DeferredBuffer {
    records: Vec<Record>,
    drained: bool,
}

impl DeferredBuffer {
    /// Creates an empty, open buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record`, or hands it back once the buffer was drained.
    pub fn capture(&mut self, record: Record) -> Result<(), Record> {
        if self.drained {
            return Err(record);
        }
        self.records.push(record);
        Ok(())
    }

    /// Records currently held.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Reports whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reports whether the buffer has been drained or discarded.
    #[must_use]
    pub const fn is_drained(&self) -> bool {
        self.drained
    }

    /// Replays every record through `table` in capture order and empties
    /// the buffer. Returns how many records reached a live sink.
    pub fn drain_into(&mut self, table: &RoutingTable, outputs: &Outputs) -> usize {
        self.drained = true;
        let records = std::mem::take(&mut self.records);
        let total = records.len();
        let first = records.first().map(Record::sequence);
        let last = records.last().map(Record::sequence);
        let delivered = records
            .iter()
            .filter(|record| table.dispatch(record, outputs))
            .count();
        trace!(total, delivered, ?first, ?last, "replayed deferred records");
        delivered
    }

    /// Drops every record without replay and closes the buffer.
    pub fn discard(&mut self) -> usize {
        self.drained = true;
        let dropped = self.records.len();
        self.records.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::Severity;
    use logging_sink::{Destination, Format, Handler, Sink, Target};

    #[test]
    fn replay_preserves_capture_order() {
        let mut buffer = DeferredBuffer::new();
        for (stream, message) in [("a", "1"), ("b", "2"), ("a", "3")] {
            buffer
                .capture(Record::new(stream, Severity::INFO, message))
                .unwrap();
        }

        let mut table = RoutingTable::new();
        table.attach(
            "a",
            Sink::direct(Handler::new(Target::Out).with_format(Format::Message)),
        );
        table.attach("b", Sink::direct(Handler::new(Target::Out)));
        let outputs = Outputs::shared(Destination::memory());

        assert_eq!(buffer.drain_into(&table, &outputs), 3);
        assert_eq!(outputs.out.contents().as_deref(), Some("1\nb: 2\n3\n"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn drained_buffer_refuses_captures() {
        let mut buffer = DeferredBuffer::new();
        buffer.drain_into(&RoutingTable::new(), &Outputs::shared(Destination::Null));
        let record = Record::new("a", Severity::INFO, "late");
        assert_eq!(buffer.capture(record.clone()), Err(record));
    }

    #[test]
    fn discard_drops_everything() {
        let mut buffer = DeferredBuffer::new();
        buffer.capture(Record::new("a", Severity::INFO, "x")).unwrap();
        assert_eq!(buffer.discard(), 1);
        assert!(buffer.is_drained());
        assert!(buffer.is_empty());
    }
}
