#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/routing/src/lib.rs
//!
//! # Overview
//!
//! `routing` decides where diagnostic records go. A process creates one
//! [`Router`] as early as possible. Until its configuration is known the
//! router holds records in a [`DeferredBuffer`] and captures raw output in
//! memory. [`Router::finalize`] then applies [`RouterOptions`] exactly once:
//! it binds a [`logging_sink::Sink`] to every known stream in the
//! [`RoutingTable`], optionally routes all output through a pager, and
//! replays the buffer in emission order. Afterwards streams can be toggled
//! with [`Router::enable`] and [`Router::disable`], and
//! [`Router::shutdown`] flushes line adapters and restores the original
//! destinations.
//!
//! # Streams
//!
//! | selection | routing key | when enabled |
//! |-----------|-------------|--------------|
//! | `app`     | `app`       | INFO and below to out, WARNING and above to err, message only |
//! | `early`   | `""`, `early`, `test` | everything to err as `name: message` |
//! | `remote`  | `remote`    | INFO and above to err as `name: message` |
//! | `debug`   | `app.debug` | INFO and above to err (DEBUG under the debug override) |
//! | `name[:level]` | `name` | `level` (default DEBUG) and above to err |
//!
//! Records on a stream with no entry fall back to the root (`""`) entry.
//!
//! # Errors
//!
//! Fallible operations return [`RoutingError`]; a malformed custom level is
//! reported as [`RoutingError::InvalidStreamLevel`], which maps to
//! [`logging::ExitCode::Fail`].
//!
//! # Examples
//!
//! ```
//! use logging_sink::{Destination, Outputs};
//! use routing::{EnvOverrides, Router, RouterOptions};
//!
//! let outputs = Outputs { out: Destination::memory(), err: Destination::memory() };
//! let router = Router::builder(EnvOverrides::default())
//!     .outputs(outputs.clone())
//!     .terminal_probe(|_| false)
//!     .build();
//!
//! router.logger("remote").info("connecting");
//! router.logger("app").info("job started");
//!
//! let options = RouterOptions {
//!     enabled: Some(vec!["app".into(), "remote".into()]),
//!     ..RouterOptions::default()
//! };
//! router.finalize(&options).unwrap();
//! router.shutdown();
//!
//! assert_eq!(outputs.err.contents().as_deref(), Some("remote: connecting\n"));
//! assert_eq!(outputs.out.contents().as_deref(), Some("job started\n"));
//! ```

pub mod bridge;
mod buffer;
mod error;
pub mod options;
mod router;
mod table;

pub use bridge::{RouterLayer, init_tracing, init_tracing_with_filter};
pub use buffer::DeferredBuffer;
pub use error::RoutingError;
pub use options::{EnvOverrides, RouterOptions, StreamSelection};
pub use router::{PagerCommand, Phase, Router, RouterBuilder};
pub use table::RoutingTable;
