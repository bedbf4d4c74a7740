//! crates/logging/src/streams.rs
//! Built-in stream catalog, routing keys, and stream-set aliases.

/// Routing key of the application stream.
pub const APP: &str = "app";
/// Routing key of the debugging stream (selected as `debug`).
pub const APP_DEBUG: &str = "app.debug";
/// Routing key of the test output stream.
pub const TEST: &str = "test";
/// Routing key of the remote transport stream.
pub const REMOTE: &str = "remote";
/// Routing key of the early stream.
pub const EARLY: &str = "early";
/// Routing key of the unnamed root stream.
///
/// The root entry doubles as the catch-all for records whose stream has no
/// entry of its own in the routing table.
pub const ROOT: &str = "";

/// Streams known to the router without user configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinStream {
    /// Application output.
    App,
    /// Test output.
    Test,
    /// Tracebacks and other debugging info.
    Debug,
    /// Remote transport debug output.
    Remote,
    /// Early logging of other streams.
    Early,
}

impl BuiltinStream {
    /// Every built-in stream in catalog order.
    pub const ALL: [Self; 5] = [Self::App, Self::Test, Self::Debug, Self::Remote, Self::Early];

    /// Returns the name used to select the stream.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Test => "test",
            Self::Debug => "debug",
            Self::Remote => "remote",
            Self::Early => "early",
        }
    }

    /// Returns the human description shown in stream listings.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::App => "application output",
            Self::Test => "test output",
            Self::Debug => "tracebacks and other debugging info",
            Self::Remote => "remote transport debug output",
            Self::Early => "early logging of other streams (very verbose)",
        }
    }

    /// Returns the routing key records carry when emitted on this stream.
    #[must_use]
    pub const fn route_key(self) -> &'static str {
        match self {
            Self::App => APP,
            Self::Test => TEST,
            Self::Debug => APP_DEBUG,
            Self::Remote => REMOTE,
            Self::Early => EARLY,
        }
    }

    /// Resolves a selection name to a built-in stream.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stream| stream.name() == name)
    }
}

/// Names that expand to a set of streams when selecting output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamSetAlias {
    /// Every built-in stream.
    All,
    /// No console output at all.
    None,
}

impl StreamSetAlias {
    /// Every alias in listing order.
    pub const ALL: [Self; 2] = [Self::All, Self::None];

    /// Returns the alias as typed by users.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::None => "none",
        }
    }

    /// Returns the description shown in stream listings.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::All => "all builtin streams",
            Self::None => "disable console logging completely",
        }
    }

    /// Resolves an alias by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alias| alias.name() == name)
    }
}

/// Reports whether `name` selects a built-in stream.
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BuiltinStream::from_name(name).is_some()
}
