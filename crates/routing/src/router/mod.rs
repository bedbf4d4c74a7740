//! crates/routing/src/router/mod.rs
//! The shared router handle and its early/finalized state machine.
//!
//! A [`Router`] is created in [`Phase::Early`], where records on streams
//! without a live sink are held in a [`DeferredBuffer`]. [`Router::finalize`]
//! rebuilds the routing table once from [`RouterOptions`], moves to
//! [`Phase::Finalized`], and replays the buffer in emission order while
//! still holding the router lock, so no concurrently emitted record can
//! overtake a replayed one.

mod builder;
mod finalize;

pub use builder::{PagerCommand, RouterBuilder};

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use logging::streams::{EARLY, ROOT, TEST};
use logging::{BuiltinStream, Emit, Logger, Record, Severity, StreamSpec};
use logging_sink::{
    Destination, Handler, LineBufferedWriter, MemoryBuffer, Outputs, Paginator, Palette,
    PendingFlush, Sink, Target,
};
use tracing::{debug, trace};

use crate::buffer::DeferredBuffer;
use crate::error::RoutingError;
use crate::options::EnvOverrides;
use crate::table::RoutingTable;

/// Lifecycle phase of a [`Router`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Records are buffered until routing is known.
    Early,
    /// Routing is final and records are delivered immediately.
    Finalized,
}

struct RouterState {
    phase: Phase,
    env: EnvOverrides,
    table: RoutingTable,
    buffer: DeferredBuffer,
    /// Destinations in effect before the router touched anything.
    original: Outputs,
    /// Where sinks deliver: the originals, or a pager standing in for them.
    direct: Outputs,
    /// Where raw writes through [`Router::out`] and [`Router::err`] go.
    current: Outputs,
    capture: Option<MemoryBuffer>,
    pager: Option<Arc<Paginator>>,
    pager_command: PagerCommand,
    terminal_probe: fn(bool) -> bool,
    palette: Palette,
    silenced: bool,
    effective: Vec<String>,
    next_sequence: u64,
    flushers: Vec<Weak<dyn PendingFlush>>,
}

impl RouterState {
    fn deliver(&mut self, record: Record) {
        if self.silenced && record.severity() <= Severity::CRITICAL {
            return;
        }
        match self.table.resolve(record.stream()) {
            Some(Sink::Buffered) => {
                if let Err(record) = self.buffer.capture(record) {
                    trace!(stream = record.stream(), "record arrived after replay");
                }
            }
            Some(sink) => sink.deliver(&record, &self.direct),
            None => {}
        }
    }

    /// Ends early capture of raw writes, optionally replaying the captured
    /// text on the secondary destination.
    fn release_capture(&mut self, replay: bool) {
        if let Some(capture) = self.capture.take() {
            let text = capture.take();
            if replay && !text.is_empty() {
                if let Err(error) = self.direct.err.write_str(&text) {
                    debug!(%error, "captured output could not be restored");
                }
            }
        }
        self.current = self.direct.clone();
    }

    fn require_finalized(&self) -> Result<(), RoutingError> {
        match self.phase {
            Phase::Finalized => Ok(()),
            Phase::Early => Err(RoutingError::NotFinalized),
        }
    }
}

/// Shared handle to the process-wide stream router.
///
/// Cloning is cheap; every clone drives the same state. The router is the
/// [`Emit`] implementation behind every [`Logger`] it hands out.
///
/// ```
/// use logging_sink::{Destination, Outputs};
/// use routing::{EnvOverrides, Router, RouterOptions};
///
/// let outputs = Outputs { out: Destination::memory(), err: Destination::memory() };
/// let router = Router::builder(EnvOverrides::default())
///     .outputs(outputs.clone())
///     .terminal_probe(|_| false)
///     .build();
///
/// let app = router.logger("app");
/// app.info("starting");
/// app.error("disk full");
/// router.finalize(&RouterOptions::default()).unwrap();
///
/// assert_eq!(outputs.out.contents().as_deref(), Some("starting\n"));
/// assert_eq!(outputs.err.contents().as_deref(), Some("disk full\n"));
/// ```
#[derive(Clone)]
pub struct Router {
    state: Arc<Mutex<RouterState>>,
}

impl Router {
    /// Creates a router on the process streams.
    #[must_use]
    pub fn new(env: EnvOverrides) -> Self {
        RouterBuilder::new(env).build()
    }

    /// Creates a router with overrides read from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(EnvOverrides::from_env())
    }

    /// Starts configuring a router.
    #[must_use]
    pub fn builder(env: EnvOverrides) -> RouterBuilder {
        RouterBuilder::new(env)
    }

    fn lock(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a logger emitting on `stream`.
    #[must_use]
    pub fn logger(&self, stream: impl Into<String>) -> Logger<Self> {
        Logger::new(self.clone(), stream)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Records waiting for replay.
    #[must_use]
    pub fn pending_records(&self) -> usize {
        self.lock().buffer.len()
    }

    /// Streams enabled by finalization and later [`Router::enable`] calls.
    #[must_use]
    pub fn effective_streams(&self) -> Vec<String> {
        self.lock().effective.clone()
    }

    /// Reports whether `name` currently has a sink that can deliver.
    ///
    /// `name` is a built-in selection name or a custom stream name.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        let key = BuiltinStream::from_name(name).map_or(name, |stream| stream.route_key());
        self.lock()
            .table
            .get(key)
            .is_some_and(|sink| matches!(sink, Sink::Direct(_)))
    }

    /// Destination for raw primary output.
    ///
    /// Before finalization this is an in-memory capture unless the early
    /// override is set.
    #[must_use]
    pub fn out(&self) -> Destination {
        self.lock().current.out.clone()
    }

    /// Destination for raw secondary output.
    #[must_use]
    pub fn err(&self) -> Destination {
        self.lock().current.err.clone()
    }

    /// Writes text captured from raw output so far to the secondary
    /// destination and stops capturing.
    ///
    /// Used when errors must reach the user before finalization.
    pub fn enable_direct_output(&self) {
        self.lock().release_capture(true);
    }

    /// Binds a sink for `item` after finalization.
    ///
    /// `item` is a built-in name or `name[:level]`. Enabling an already
    /// enabled stream leaves it with exactly one sink.
    pub fn enable(&self, item: &str) -> Result<(), RoutingError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        state.require_finalized()?;

        let entries = match BuiltinStream::from_name(item) {
            Some(stream) => finalize::builtin_entries(stream, state.palette, state.env),
            None => {
                let spec = StreamSpec::parse(item)?;
                vec![(spec.name().to_owned(), custom_sink(&spec))]
            }
        };
        for (key, sink) in entries {
            state.table.attach(key, sink);
        }
        if !state.effective.iter().any(|selected| selected == item) {
            state.effective.push(item.to_owned());
        }
        debug!(stream = item, "stream enabled");
        Ok(())
    }

    /// Silences `item` after finalization. Idempotent.
    pub fn disable(&self, item: &str) -> Result<(), RoutingError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        state.require_finalized()?;

        let name = match BuiltinStream::from_name(item) {
            Some(stream) => {
                for key in route_keys(stream) {
                    state.table.attach(key, Sink::Null);
                }
                stream.name().to_owned()
            }
            None => {
                let spec = StreamSpec::parse(item)?;
                state.table.attach(spec.name(), Sink::Null);
                spec.name().to_owned()
            }
        };
        let custom_prefix = format!("{name}:");
        state
            .effective
            .retain(|selected| *selected != name && !selected.starts_with(&custom_prefix));
        debug!(stream = item, "stream disabled");
        Ok(())
    }

    /// Returns a line-buffering adapter feeding every stream in `streams`.
    ///
    /// The adapter is flushed by [`Router::shutdown`] if still alive.
    #[must_use]
    pub fn line_writer(
        &self,
        prefix: impl Into<String>,
        severity: Severity,
        streams: &[&str],
    ) -> LineBufferedWriter<Self> {
        let targets = streams.iter().map(|stream| self.logger(*stream)).collect();
        let writer = LineBufferedWriter::new(prefix, severity, targets);
        self.register_pending_flush(writer.pending_flush_handle());
        writer
    }

    /// Registers something to flush at shutdown.
    pub fn register_pending_flush(&self, handle: Weak<dyn PendingFlush>) {
        let mut state = self.lock();
        state.flushers.retain(|flusher| flusher.strong_count() > 0);
        state.flushers.push(handle);
    }

    /// Flushes live adapters, restores the original destinations, and closes
    /// the pager if one was started. Safe to call more than once.
    pub fn shutdown(&self) {
        let flushers = std::mem::take(&mut self.lock().flushers);
        for flusher in flushers.iter().filter_map(Weak::upgrade) {
            flusher.flush_pending();
        }

        let pager = {
            let mut state = self.lock();
            state.capture = None;
            state.direct = state.original.clone();
            state.current = state.original.clone();
            state.pager.take()
        };
        if let Some(pager) = pager {
            pager.close();
            debug!("pager closed");
        }
    }
}

impl Emit for Router {
    fn emit(&self, record: Record) {
        let mut state = self.lock();
        let record = record.with_sequence(state.next_sequence);
        state.next_sequence += 1;
        state.deliver(record);
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Router")
            .field("phase", &state.phase)
            .field("pending", &state.buffer.len())
            .field("effective", &state.effective)
            .finish_non_exhaustive()
    }
}

/// A `name: message` sink on the secondary destination.
fn secondary_sink(level: Severity) -> Sink {
    Sink::direct(Handler::new(Target::Err).with_level(level))
}

fn custom_sink(spec: &StreamSpec) -> Sink {
    secondary_sink(spec.severity())
}

/// Table keys governed by a built-in stream.
fn route_keys(stream: BuiltinStream) -> Vec<&'static str> {
    match stream {
        BuiltinStream::Early => vec![ROOT, EARLY, TEST],
        other => vec![other.route_key()],
    }
}
