//! crates/routing/src/router/builder.rs
//! Construction of a router in its early phase.

use std::sync::{Arc, Mutex};

use logging::Severity;
use logging::streams::{APP_DEBUG, ROOT, TEST};
use logging_sink::{Destination, MemoryBuffer, Outputs, Palette, Sink, is_colored_term};

use super::{Phase, Router, RouterState, secondary_sink};
use crate::buffer::DeferredBuffer;
use crate::options::EnvOverrides;
use crate::table::RoutingTable;

/// Which viewer a paginated router starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PagerCommand {
    /// `PAGER`, else `less -FRSX` when available.
    #[default]
    Resolve,
    /// Exactly this shell command; `None` always falls back to direct output.
    Fixed(Option<String>),
}

/// Configures a [`Router`] before it starts capturing.
///
/// ```
/// use logging_sink::{Destination, Outputs};
/// use routing::{EnvOverrides, Router};
///
/// let outputs = Outputs { out: Destination::memory(), err: Destination::memory() };
/// let router = Router::builder(EnvOverrides::default())
///     .outputs(outputs.clone())
///     .build();
/// router.logger("app").info("queued");
/// assert_eq!(router.pending_records(), 1);
/// assert_eq!(outputs.out.contents().as_deref(), Some(""));
/// ```
#[derive(Clone, Debug)]
pub struct RouterBuilder {
    env: EnvOverrides,
    outputs: Outputs,
    terminal_probe: fn(bool) -> bool,
    pager: PagerCommand,
}

impl RouterBuilder {
    /// Starts from the real process streams.
    #[must_use]
    pub fn new(env: EnvOverrides) -> Self {
        Self {
            env,
            outputs: Outputs::process(),
            terminal_probe: is_colored_term,
            pager: PagerCommand::Resolve,
        }
    }

    /// Uses `outputs` as the original destinations.
    #[must_use]
    pub fn outputs(mut self, outputs: Outputs) -> Self {
        self.outputs = outputs;
        self
    }

    /// Replaces colour terminal detection.
    ///
    /// The probe receives the user's colour setting and answers whether the
    /// output is an interactive colour terminal.
    #[must_use]
    pub fn terminal_probe(mut self, probe: fn(bool) -> bool) -> Self {
        self.terminal_probe = probe;
        self
    }

    /// Chooses the pager command.
    #[must_use]
    pub fn pager(mut self, pager: PagerCommand) -> Self {
        self.pager = pager;
        self
    }

    /// Builds the router in the early phase.
    #[must_use]
    pub fn build(self) -> Router {
        let mut table = RoutingTable::new();
        let (current, capture) = if self.env.early_verbose {
            table.attach(ROOT, secondary_sink(Severity::DEBUG));
            table.attach(TEST, secondary_sink(Severity::DEBUG));
            (self.outputs.clone(), None)
        } else {
            table.attach(ROOT, Sink::Buffered);
            let capture = MemoryBuffer::new();
            (
                Outputs::shared(Destination::Memory(capture.clone())),
                Some(capture),
            )
        };
        if self.env.debug_verbose {
            table.attach(APP_DEBUG, secondary_sink(Severity::DEBUG));
        }

        let state = RouterState {
            phase: Phase::Early,
            env: self.env,
            table,
            buffer: DeferredBuffer::new(),
            direct: self.outputs.clone(),
            original: self.outputs,
            current,
            capture,
            pager: None,
            pager_command: self.pager,
            terminal_probe: self.terminal_probe,
            palette: Palette::plain(),
            silenced: false,
            effective: Vec::new(),
            next_sequence: 0,
            flushers: Vec::new(),
        };
        Router {
            state: Arc::new(Mutex::new(state)),
        }
    }
}
