//! crates/logging/src/levels.rs
//! Severity vocabulary and the band predicates applied by sinks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Numeric severity attached to every record.
///
/// Larger values are more severe. The named constants follow the conventional
/// ladder `DEBUG < INFO < WARNING < ERROR < CRITICAL`; any value in between is
/// a valid custom level and sorts numerically.
///
/// # Examples
///
/// ```
/// use logging::Severity;
///
/// assert!(Severity::DEBUG < Severity::INFO);
/// assert_eq!("warning".parse::<Severity>(), Ok(Severity::WARNING));
/// assert_eq!("15".parse::<Severity>(), Ok(Severity::new(15)));
/// assert_eq!(Severity::new(15).to_string(), "Level 15");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Severity(u8);

impl Severity {
    /// Lowest possible level; passes every threshold.
    pub const NOTSET: Self = Self(0);
    /// Finer than debug, used for `tracing::Level::TRACE`.
    pub const TRACE: Self = Self(5);
    /// Debugging detail.
    pub const DEBUG: Self = Self(10);
    /// Informational messages.
    pub const INFO: Self = Self(20);
    /// Something unexpected that does not stop the process.
    pub const WARNING: Self = Self(30);
    /// An operation failed.
    pub const ERROR: Self = Self(40);
    /// The process cannot continue.
    pub const CRITICAL: Self = Self(50);

    /// Creates a severity from its numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the canonical upper-case name when the value is one of the named levels.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("NOTSET"),
            5 => Some("TRACE"),
            10 => Some("DEBUG"),
            20 => Some("INFO"),
            30 => Some("WARNING"),
            40 => Some("ERROR"),
            50 => Some("CRITICAL"),
            _ => None,
        }
    }

    /// Looks up a level by name, ignoring ASCII case.
    ///
    /// `WARN` and `FATAL` are accepted as aliases of `WARNING` and `CRITICAL`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let level = match name.to_ascii_uppercase().as_str() {
            "NOTSET" => Self::NOTSET,
            "TRACE" => Self::TRACE,
            "DEBUG" => Self::DEBUG,
            "INFO" => Self::INFO,
            "WARNING" | "WARN" => Self::WARNING,
            "ERROR" => Self::ERROR,
            "CRITICAL" | "FATAL" => Self::CRITICAL,
            _ => return None,
        };
        Some(level)
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::DEBUG
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Level {}", self.0),
        }
    }
}

/// Failure to interpret a severity specification.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SeverityParseError {
    /// The specification was empty.
    #[error("empty severity")]
    Empty,
    /// The name does not match any known level.
    #[error("unknown severity name '{0}'")]
    UnknownName(String),
    /// The numeric value does not fit the level range.
    #[error("numeric severity '{0}' is out of range (0-255)")]
    OutOfRange(String),
}

impl FromStr for Severity {
    type Err = SeverityParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Err(SeverityParseError::Empty);
        }

        if text.bytes().all(|byte| byte.is_ascii_digit()) {
            return text
                .parse::<u8>()
                .map(Self)
                .map_err(|_| SeverityParseError::OutOfRange(text.to_owned()));
        }

        Self::from_name(text).ok_or_else(|| SeverityParseError::UnknownName(text.to_owned()))
    }
}

/// Band predicate a handler applies on top of its minimum severity.
///
/// The `app` stream splits its output with two handlers: one accepting
/// [`InfoAndLess`](Self::InfoAndLess) for the primary destination and one
/// accepting [`WarnAndMore`](Self::WarnAndMore) for the secondary destination.
/// The two bands are disjoint, so no record is delivered to both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeverityFilter {
    /// Accept every severity.
    #[default]
    All,
    /// Accept severities up to and including INFO.
    InfoAndLess,
    /// Accept WARNING and everything above it.
    WarnAndMore,
}

impl SeverityFilter {
    /// Reports whether `severity` falls inside the band.
    #[must_use]
    pub const fn accepts(self, severity: Severity) -> bool {
        match self {
            Self::All => true,
            Self::InfoAndLess => severity.0 <= Severity::INFO.0,
            Self::WarnAndMore => severity.0 >= Severity::WARNING.0,
        }
    }
}
