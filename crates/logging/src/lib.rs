#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging/src/lib.rs
//!
//! # Overview
//!
//! `logging` holds the vocabulary shared by every part of the diagnostic
//! stream routing workspace: the [`Severity`] ladder and its band filters, the
//! built-in stream catalog, the `name[:level]` [`StreamSpec`] parser, the
//! immutable [`Record`], the [`LineMode`] newline policy, and the [`Emit`]
//! seam through which producers hand records to the router.
//!
//! # Design
//!
//! Producers never talk to destinations. They hold a [`Logger`] bound to a
//! stream name and an emitter (normally the router handle). The router decides
//! whether a record is buffered, delivered, or dropped.
//!
//! # Invariants
//!
//! - [`SeverityFilter::InfoAndLess`] and [`SeverityFilter::WarnAndMore`] are
//!   disjoint, so a split stream never delivers a record twice.
//! - [`Record`] values are immutable once emitted; only the router stamps the
//!   sequence number.
//!
//! # Examples
//!
//! ```
//! use logging::{Severity, StreamSpec, streams};
//!
//! let spec: StreamSpec = "cache:info".parse().unwrap();
//! assert_eq!(spec.severity(), Severity::INFO);
//! assert!(streams::is_builtin("app"));
//! ```

mod config;
mod exit_code;
mod levels;
mod line_mode;
mod logger;
mod record;
pub mod streams;

pub use config::{StreamSpec, StreamSpecError};
pub use exit_code::ExitCode;
pub use levels::{Severity, SeverityFilter, SeverityParseError};
pub use line_mode::LineMode;
pub use logger::{Emit, Logger};
pub use record::Record;
pub use streams::{BuiltinStream, StreamSetAlias};
