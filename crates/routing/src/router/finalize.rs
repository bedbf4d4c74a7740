//! crates/routing/src/router/finalize.rs
//! One-time reconfiguration from early capture to final routing.

use std::sync::Arc;

use logging::streams::{APP, EARLY, REMOTE, ROOT, TEST, is_builtin};
use logging::{BuiltinStream, Severity, SeverityFilter, StreamSpec};
use logging_sink::{Destination, Format, Handler, Outputs, Paginator, Palette, Sink, Target};
use tracing::debug;

use super::{PagerCommand, Phase, Router, RouterState, custom_sink, secondary_sink};
use crate::error::RoutingError;
use crate::options::{EnvOverrides, RouterOptions};
use crate::table::RoutingTable;

/// The `app` sink: INFO and below to the primary destination, WARNING and
/// above to the secondary, message only.
fn app_sink(palette: Palette) -> Sink {
    let handler = |target, filter| {
        Handler::new(target)
            .with_filter(filter)
            .with_format(Format::Message)
            .with_palette(palette)
    };
    Sink::split(
        handler(Target::Out, SeverityFilter::InfoAndLess),
        handler(Target::Err, SeverityFilter::WarnAndMore),
    )
}

/// Sinks a built-in stream binds when enabled.
pub(super) fn builtin_entries(
    stream: BuiltinStream,
    palette: Palette,
    env: EnvOverrides,
) -> Vec<(String, Sink)> {
    let entry = |key: &str, sink: Sink| (key.to_owned(), sink);
    match stream {
        BuiltinStream::App => vec![entry(APP, app_sink(palette))],
        BuiltinStream::Early => [ROOT, EARLY, TEST]
            .into_iter()
            .map(|key| entry(key, secondary_sink(Severity::DEBUG)))
            .collect(),
        BuiltinStream::Test => vec![entry(TEST, secondary_sink(Severity::DEBUG))],
        BuiltinStream::Remote => vec![entry(REMOTE, secondary_sink(Severity::INFO))],
        BuiltinStream::Debug => {
            let level = if env.debug_verbose {
                Severity::DEBUG
            } else {
                Severity::INFO
            };
            vec![entry(stream.route_key(), secondary_sink(level))]
        }
    }
}

/// Parses every non-built-in selection item.
fn custom_specs(effective: &[String]) -> Result<Vec<StreamSpec>, RoutingError> {
    effective
        .iter()
        .filter(|item| !is_builtin(item))
        .map(|item| StreamSpec::parse(item).map_err(RoutingError::from))
        .collect()
}

impl RouterState {
    fn silence(&mut self) {
        let null = Outputs::shared(Destination::Null);
        self.capture = None;
        self.direct = null.clone();
        self.current = null;
        self.table = RoutingTable::new();
        let dropped = self.buffer.discard();
        self.silenced = true;
        self.effective.clear();
        self.phase = Phase::Finalized;
        debug!(dropped, "stream routing finalized silent");
    }

    fn start_pager(&mut self) {
        let fallback = self.original.out.clone();
        let pager = match &self.pager_command {
            PagerCommand::Resolve => Paginator::spawn(fallback),
            PagerCommand::Fixed(command) => Paginator::with_command(command.as_deref(), fallback),
        };
        let pager = Arc::new(pager);
        self.direct = Outputs::shared(Destination::Pager(Arc::clone(&pager)));
        self.pager = Some(pager);
    }

    fn build_table(&self, effective: &[String], custom: &[StreamSpec]) -> RoutingTable {
        let enabled = |stream: BuiltinStream| effective.iter().any(|item| item == stream.name());
        let mut table = RoutingTable::new();

        for stream in BuiltinStream::ALL {
            let live = match stream {
                // Bound together with `early`.
                BuiltinStream::Test => continue,
                BuiltinStream::Early => self.env.early_verbose || enabled(stream),
                BuiltinStream::Debug => self.env.debug_verbose || enabled(stream),
                other => enabled(other),
            };
            if live {
                for (key, sink) in builtin_entries(stream, self.palette, self.env) {
                    table.attach(key, sink);
                }
            } else {
                for key in super::route_keys(stream) {
                    table.attach(key, Sink::Null);
                }
            }
        }

        for spec in custom {
            table.attach(spec.name(), custom_sink(spec));
        }
        table
    }
}

impl Router {
    /// Rebuilds routing from `options` and replays buffered records.
    ///
    /// Silent options finalize straight away without looking at the stream
    /// selection. Otherwise custom stream levels are validated before
    /// anything changes, so a malformed `name:level` leaves the router in
    /// [`Phase::Early`] with its buffer intact. Replay happens under the router lock: every buffered
    /// record is delivered, in emission order, before any record emitted
    /// after this call.
    ///
    /// # Errors
    ///
    /// [`RoutingError::AlreadyFinalized`] on a second call, and
    /// [`RoutingError::InvalidStreamLevel`] for a custom stream whose level
    /// is not a severity.
    pub fn finalize(&self, options: &RouterOptions) -> Result<(), RoutingError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.phase == Phase::Finalized {
            return Err(RoutingError::AlreadyFinalized);
        }

        if options.silent {
            state.silence();
            return Ok(());
        }

        let effective = options.effective_streams(state.env);
        let custom = custom_specs(&effective)?;

        let interactive = (state.terminal_probe)(options.colored);
        if options.paginated && interactive {
            state.start_pager();
        }
        state.palette = if interactive {
            Palette::colored()
        } else {
            Palette::plain()
        };

        let early_on = effective.iter().any(|item| item == EARLY);
        state.release_capture(early_on);
        state.table = state.build_table(&effective, &custom);
        state.effective = effective;
        state.phase = Phase::Finalized;

        let replayed = state.buffer.drain_into(&state.table, &state.direct);
        debug!(
            replayed,
            streams = ?state.effective,
            paginated = state.pager.is_some(),
            "stream routing finalized"
        );
        Ok(())
    }
}
