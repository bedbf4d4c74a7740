//! crates/routing/src/bridge.rs
//! Bridge between the tracing crate and the stream router.
//!
//! [`RouterLayer`] forwards `tracing` events into a [`Router`], so code that
//! already uses `tracing::info!` and friends takes part in early buffering,
//! replay, and per-stream selection. The event target becomes the stream
//! name with `::` replaced by `.`:
//!
//! ```rust,ignore
//! let router = Router::from_env();
//! routing::init_tracing(router.clone())?;
//!
//! // Delivered on stream `myapp.db`.
//! tracing::warn!(target: "myapp::db", "pool exhausted");
//! ```
//!
//! Events from the router's own crates are ignored so that diagnostics
//! raised while a record is being delivered never loop back into the
//! router.

use std::fmt::{self, Write as _};

use logging::{Emit, Record, Severity};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::util::TryInitError;

use crate::router::Router;

/// Target prefixes whose events never reach the router.
const INTERNAL_TARGETS: [&str; 3] = ["routing", "logging_sink", "logging"];

/// A tracing layer that emits every event as a router record.
#[derive(Clone, Debug)]
pub struct RouterLayer {
    router: Router,
}

impl RouterLayer {
    /// Creates a layer feeding `router`.
    #[must_use]
    pub const fn new(router: Router) -> Self {
        Self { router }
    }

    /// Maps an event target to a stream name.
    fn stream_for(target: &str) -> String {
        target.replace("::", ".")
    }

    /// Maps a tracing level to a severity.
    const fn severity_for(level: &Level) -> Severity {
        match *level {
            Level::TRACE => Severity::TRACE,
            Level::DEBUG => Severity::DEBUG,
            Level::INFO => Severity::INFO,
            Level::WARN => Severity::WARNING,
            Level::ERROR => Severity::ERROR,
        }
    }

    fn is_internal(target: &str) -> bool {
        INTERNAL_TARGETS.iter().any(|internal| {
            target
                .strip_prefix(internal)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
        })
    }
}

impl<S> Layer<S> for RouterLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if Self::is_internal(target) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.router.emit(Record::new(
            Self::stream_for(target),
            Self::severity_for(metadata.level()),
            visitor.finish(),
        ));
    }
}

/// Collects the `message` field, then any other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            if !self.fields.is_empty() {
                self.fields.push(' ');
            }
            let _ = write!(self.fields, "{}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.record_debug(field, &value);
        }
    }
}

/// Installs a [`RouterLayer`] for `router` as the global subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already set.
pub fn init_tracing(router: Router) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(RouterLayer::new(router))
        .try_init()
}

/// Installs a [`RouterLayer`] behind `filter` as the global subscriber.
///
/// Only events `filter` lets through reach the router, for example an
/// `EnvFilter` narrowing which application targets are bridged.
///
/// # Errors
///
/// Fails when a global subscriber is already set.
pub fn init_tracing_with_filter<F>(router: Router, filter: F) -> Result<(), TryInitError>
where
    F: Layer<Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(RouterLayer::new(router))
        .try_init()
}
