//! crates/logging-sink/src/destination.rs
//! Swappable output destinations and the primary/secondary pair the router writes to.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::pager::Paginator;

/// Shared in-memory byte buffer.
///
/// Clones share the same storage, so a test can hand one clone to the router
/// and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `text`.
    pub fn push_str(&self, text: &str) {
        self.lock().extend_from_slice(text.as_bytes());
    }

    /// Returns the captured text, replacing invalid UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Removes and returns the captured text.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Reports whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

/// A process-level output target.
///
/// Destinations are cheap handles; cloning a memory or pager destination
/// shares the underlying buffer or viewer.
#[derive(Clone)]
pub enum Destination {
    /// The process standard output.
    Stdout,
    /// The process standard error.
    Stderr,
    /// An in-memory capture.
    Memory(MemoryBuffer),
    /// Discards everything.
    Null,
    /// An external full-screen viewer.
    Pager(Arc<Paginator>),
}

impl Destination {
    /// Creates a fresh in-memory destination.
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(MemoryBuffer::new())
    }

    /// Writes `text` to the destination.
    ///
    /// Pager destinations never fail; a severed viewer silently swallows the
    /// text.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().lock().write_all(text.as_bytes()),
            Self::Stderr => io::stderr().lock().write_all(text.as_bytes()),
            Self::Memory(buffer) => {
                buffer.push_str(text);
                Ok(())
            }
            Self::Null => Ok(()),
            Self::Pager(pager) => {
                pager.write_str(text);
                Ok(())
            }
        }
    }

    /// Flushes buffered output.
    pub fn flush(&self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().flush(),
            Self::Stderr => io::stderr().flush(),
            Self::Memory(_) | Self::Null => Ok(()),
            Self::Pager(pager) => {
                pager.flush();
                Ok(())
            }
        }
    }

    /// Returns the captured text of a memory destination.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        match self {
            Self::Memory(buffer) => Some(buffer.contents()),
            _ => None,
        }
    }

    /// Returns the pager behind a pager destination.
    #[must_use]
    pub fn as_pager(&self) -> Option<&Arc<Paginator>> {
        match self {
            Self::Pager(pager) => Some(pager),
            _ => None,
        }
    }

    /// Reports whether both handles refer to the same target.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Stdout, Self::Stdout) | (Self::Stderr, Self::Stderr) | (Self::Null, Self::Null) => {
                true
            }
            (Self::Memory(a), Self::Memory(b)) => a.ptr_eq(b),
            (Self::Pager(a), Self::Pager(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Stderr => f.write_str("Stderr"),
            Self::Memory(_) => f.write_str("Memory"),
            Self::Null => f.write_str("Null"),
            Self::Pager(pager) => f.debug_tuple("Pager").field(pager).finish(),
        }
    }
}

/// Which of the two ambient destinations a handler writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// The primary ("out") destination.
    Out,
    /// The secondary ("err") destination.
    Err,
}

/// The primary and secondary destinations handlers resolve their [`Target`] against.
#[derive(Clone, Debug)]
pub struct Outputs {
    /// Primary destination.
    pub out: Destination,
    /// Secondary destination.
    pub err: Destination,
}

impl Outputs {
    /// The real process streams.
    #[must_use]
    pub const fn process() -> Self {
        Self {
            out: Destination::Stdout,
            err: Destination::Stderr,
        }
    }

    /// Both targets share one destination.
    #[must_use]
    pub fn shared(destination: Destination) -> Self {
        Self {
            out: destination.clone(),
            err: destination,
        }
    }

    /// Returns the destination for `target`.
    #[must_use]
    pub const fn resolve(&self, target: Target) -> &Destination {
        match target {
            Target::Out => &self.out,
            Target::Err => &self.err,
        }
    }
}

impl Default for Outputs {
    fn default() -> Self {
        Self::process()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clones_share_storage() {
        let buffer = MemoryBuffer::new();
        let destination = Destination::Memory(buffer.clone());
        destination.write_str("hello\n").unwrap();
        assert_eq!(buffer.contents(), "hello\n");
        assert_eq!(buffer.take(), "hello\n");
        assert!(buffer.is_empty());
    }

    #[test]
    fn null_discards() {
        assert!(Destination::Null.write_str("gone").is_ok());
        assert_eq!(Destination::Null.contents(), None);
    }

    #[test]
    fn same_as_compares_identity() {
        let a = Destination::memory();
        let b = a.clone();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&Destination::memory()));
        assert!(Destination::Stderr.same_as(&Destination::Stderr));
        assert!(!Destination::Stdout.same_as(&Destination::Stderr));
    }

    #[test]
    fn shared_outputs_resolve_to_one_destination() {
        let outputs = Outputs::shared(Destination::memory());
        outputs.resolve(Target::Out).write_str("a").unwrap();
        outputs.resolve(Target::Err).write_str("b").unwrap();
        assert_eq!(outputs.out.contents().as_deref(), Some("ab"));
    }
}
