//! crates/logging-sink/src/line_writer.rs
//! Byte-oriented writer that turns complete lines into records.
//!
//! Partial writes are held until a newline arrives. Every complete line is
//! prefixed and fanned out to all bound loggers. [`LineBufferedWriter::flush_pending`]
//! (and [`std::io::Write::flush`]) emit an incomplete fragment as a line of its
//! own. The writer never reports itself as a terminal.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use logging::{Emit, Logger, Severity};

/// Something holding a partial line that can be forced out at shutdown.
pub trait PendingFlush: Send + Sync {
    /// Emits whatever is pending.
    fn flush_pending(&self);
}

struct LineState<E> {
    prefix: String,
    severity: Severity,
    targets: Vec<Logger<E>>,
    pending: Vec<u8>,
}

impl<E: Emit> LineState<E> {
    fn push(&mut self, data: &[u8]) {
        let mut parts = data.split(|byte| *byte == b'\n');
        if let Some(first) = parts.next() {
            self.pending.extend_from_slice(first);
        }

        let rest: Vec<&[u8]> = parts.collect();
        let Some((last, complete)) = rest.split_last() else {
            return;
        };

        let head = std::mem::take(&mut self.pending);
        self.emit_line(&head);
        for line in complete {
            self.emit_line(line);
        }
        self.pending.extend_from_slice(last);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit_line(&line);
        }
    }

    fn emit_line(&self, line: &[u8]) {
        let message = format!("{}{}", self.prefix, String::from_utf8_lossy(line));
        for target in &self.targets {
            target.log(self.severity, message.clone());
        }
    }
}

struct Shared<E>(Mutex<LineState<E>>);

impl<E> Shared<E> {
    fn lock(&self) -> MutexGuard<'_, LineState<E>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> PendingFlush for Shared<E>
where
    E: Emit + Send + Sync,
{
    fn flush_pending(&self) {
        self.lock().flush();
    }
}

/// Line-buffering adapter in front of one or more loggers.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
/// use logging::{Emit, Logger, Record, Severity};
/// use logging_sink::LineBufferedWriter;
///
/// #[derive(Default)]
/// struct Collect(Mutex<Vec<String>>);
///
/// impl Emit for Collect {
///     fn emit(&self, record: Record) {
///         self.0.lock().unwrap().push(record.message().to_owned());
///     }
/// }
///
/// let sink = Collect::default();
/// let writer = LineBufferedWriter::new("", Severity::DEBUG, vec![Logger::new(&sink, "test")]);
/// writer.write_str("ab");
/// writer.write_str("c\nde\n");
/// writer.write_str("f");
/// assert_eq!(*sink.0.lock().unwrap(), ["abc", "de"]);
///
/// writer.flush_pending();
/// assert_eq!(*sink.0.lock().unwrap(), ["abc", "de", "f"]);
/// ```
pub struct LineBufferedWriter<E: Emit> {
    shared: Arc<Shared<E>>,
}

impl<E: Emit> LineBufferedWriter<E> {
    /// Creates an adapter emitting `prefix + line` at `severity` on every target.
    pub fn new(prefix: impl Into<String>, severity: Severity, targets: Vec<Logger<E>>) -> Self {
        Self {
            shared: Arc::new(Shared(Mutex::new(LineState {
                prefix: prefix.into(),
                severity,
                targets,
                pending: Vec::new(),
            }))),
        }
    }

    /// Feeds raw bytes.
    pub fn write_bytes(&self, data: &[u8]) {
        self.shared.lock().push(data);
    }

    /// Feeds text.
    pub fn write_str(&self, data: &str) {
        self.write_bytes(data.as_bytes());
    }

    /// Feeds each chunk in order.
    pub fn write_lines<I, S>(&self, chunks: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.shared.lock();
        for chunk in chunks {
            state.push(chunk.as_ref().as_bytes());
        }
    }

    /// Emits the incomplete trailing fragment, if any.
    pub fn flush_pending(&self) {
        self.shared.lock().flush();
    }

    /// Reports whether a partial line is waiting for its newline.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.shared.lock().pending.is_empty()
    }

    /// Always `false`; consumers must not attempt terminal operations.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        false
    }
}

impl<E> LineBufferedWriter<E>
where
    E: Emit + Send + Sync + 'static,
{
    /// Returns a weak handle that flushes this adapter while it is alive.
    #[must_use]
    pub fn pending_flush_handle(&self) -> Weak<dyn PendingFlush> {
        let weak: Weak<Shared<E>> = Arc::downgrade(&self.shared);
        weak
    }
}

impl<E: Emit> io::Write for LineBufferedWriter<E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending();
        Ok(())
    }
}

impl<E: Emit> Drop for LineBufferedWriter<E> {
    fn drop(&mut self) {
        self.flush_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::Record;
    use std::io::Write;

    #[derive(Default)]
    struct Collect(Mutex<Vec<Record>>);

    impl Emit for Collect {
        fn emit(&self, record: Record) {
            self.0.lock().unwrap().push(record);
        }
    }

    impl Collect {
        fn messages(&self) -> Vec<String> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .map(|record| record.message().to_owned())
                .collect()
        }
    }

    #[test]
    fn coalesces_partial_writes() {
        let sink = Collect::default();
        let writer = LineBufferedWriter::new("", Severity::DEBUG, vec![Logger::new(&sink, "t")]);

        writer.write_str("ab");
        assert!(sink.messages().is_empty());
        writer.write_str("c\nde\n");
        assert_eq!(sink.messages(), ["abc", "de"]);

        writer.write_str("f");
        assert_eq!(sink.messages(), ["abc", "de"]);
        assert!(writer.has_pending());

        writer.flush_pending();
        assert_eq!(sink.messages(), ["abc", "de", "f"]);
        assert!(!writer.has_pending());
    }

    #[test]
    fn blank_lines_are_emitted() {
        let sink = Collect::default();
        let writer = LineBufferedWriter::new("", Severity::DEBUG, vec![Logger::new(&sink, "t")]);
        writer.write_str("\n\nx\n");
        assert_eq!(sink.messages(), ["", "", "x"]);
    }

    #[test]
    fn flush_without_pending_emits_nothing() {
        let sink = Collect::default();
        let writer = LineBufferedWriter::new("", Severity::DEBUG, vec![Logger::new(&sink, "t")]);
        writer.write_str("done\n");
        writer.flush_pending();
        assert_eq!(sink.messages(), ["done"]);
    }

    #[test]
    fn prefix_and_severity_apply_to_every_target() {
        let first = Collect::default();
        let second = Collect::default();
        let writer = LineBufferedWriter::new(
            "[stdout] ",
            Severity::INFO,
            vec![Logger::new(&first, "job"), Logger::new(&second, "test")],
        );
        writer.write_str("hello\n");

        for (sink, stream) in [(&first, "job"), (&second, "test")] {
            let records = sink.0.lock().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].message(), "[stdout] hello");
            assert_eq!(records[0].severity(), Severity::INFO);
            assert_eq!(records[0].stream(), stream);
        }
    }

    #[test]
    fn split_utf8_sequences_survive() {
        let sink = Collect::default();
        let mut writer =
            LineBufferedWriter::new("", Severity::DEBUG, vec![Logger::new(&sink, "t")]);
        let bytes = "né\n".as_bytes();
        writer.write_all(&bytes[..2]).unwrap();
        writer.write_all(&bytes[2..]).unwrap();
        assert_eq!(sink.messages(), ["né"]);
    }

    #[test]
    fn io_flush_and_drop_emit_pending() {
        let sink = Collect::default();
        {
            let mut writer =
                LineBufferedWriter::new("", Severity::DEBUG, vec![Logger::new(&sink, "t")]);
            write!(writer, "partial").unwrap();
            writer.flush().unwrap();
            write!(writer, "tail").unwrap();
        }
        assert_eq!(sink.messages(), ["partial", "tail"]);
    }

    #[test]
    fn never_a_terminal() {
        let sink = Collect::default();
        let writer = LineBufferedWriter::new("", Severity::DEBUG, vec![Logger::new(&sink, "t")]);
        assert!(!writer.is_terminal());
    }

    #[test]
    fn weak_handle_flushes_while_alive() {
        let sink = Arc::new(Collect::default());
        let writer = LineBufferedWriter::new(
            "",
            Severity::DEBUG,
            vec![Logger::new(Arc::clone(&sink), "t")],
        );
        let handle = writer.pending_flush_handle();
        writer.write_str("half");
        handle.upgrade().expect("writer alive").flush_pending();
        assert_eq!(sink.messages(), ["half"]);

        drop(writer);
        assert!(handle.upgrade().is_none());
    }
}
