#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the output side of diagnostic stream routing:
//! process-level [`Destination`] handles that can be swapped at runtime
//! (terminal streams, in-memory captures, a null sink, or a [`Paginator`]),
//! the [`Handler`] that filters and formats records for one destination, the
//! [`Sink`] variant bound to each stream, and the [`LineBufferedWriter`] that
//! lets byte-oriented producers feed complete lines into the router.
//!
//! # Design
//!
//! Handlers do not own a writer. They name a [`Target`] (`Out` or `Err`) that
//! is resolved against an [`Outputs`] pair at delivery time, so swapping the
//! pair (for example to a pager, or back to the terminal at shutdown)
//! retargets every handler at once.
//!
//! # Invariants
//!
//! - Delivery failures never propagate to the code that emitted the record.
//! - A [`Paginator`] never fails a write; once its viewer exits, writes are
//!   discarded.
//! - [`LineBufferedWriter::is_terminal`] is always `false`.
//!
//! # Examples
//!
//! ```
//! use logging::{Record, Severity, SeverityFilter};
//! use logging_sink::{Destination, Format, Handler, Outputs, Sink, Target};
//!
//! let outputs = Outputs { out: Destination::memory(), err: Destination::memory() };
//! let sink = Sink::split(
//!     Handler::new(Target::Out).with_filter(SeverityFilter::InfoAndLess).with_format(Format::Message),
//!     Handler::new(Target::Err).with_filter(SeverityFilter::WarnAndMore).with_format(Format::Message),
//! );
//!
//! sink.deliver(&Record::new("app", Severity::WARNING, "low disk"), &outputs);
//! assert_eq!(outputs.err.contents().as_deref(), Some("low disk\n"));
//! assert_eq!(outputs.out.contents().as_deref(), Some(""));
//! ```

mod destination;
mod line_writer;
pub mod pager;
mod sink;
pub mod terminal;

pub use destination::{Destination, MemoryBuffer, Outputs, Target};
pub use line_writer::{LineBufferedWriter, PendingFlush};
pub use pager::Paginator;
pub use sink::{Format, Handler, Sink};
pub use terminal::{Palette, is_colored_term};
