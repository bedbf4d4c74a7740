//! crates/logging/src/config.rs
//! Parsing of user stream specifications of the form `name[:level]`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::levels::{Severity, SeverityParseError};

/// A user-defined stream together with the minimum severity it should show.
///
/// The name and level are separated by the first unescaped colon. A literal
/// colon inside the name is written as `\:`. Without a level the stream shows
/// everything from [`Severity::DEBUG`] upwards.
///
/// # Examples
///
/// ```
/// use logging::{Severity, StreamSpec};
///
/// let spec: StreamSpec = "db.pool:warning".parse()?;
/// assert_eq!(spec.name(), "db.pool");
/// assert_eq!(spec.severity(), Severity::WARNING);
///
/// let spec: StreamSpec = r"host\:port".parse()?;
/// assert_eq!(spec.name(), "host:port");
/// assert_eq!(spec.severity(), Severity::DEBUG);
/// # Ok::<(), logging::StreamSpecError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamSpec {
    name: String,
    severity: Severity,
}

/// Malformed stream specification.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StreamSpecError {
    /// The level portion could not be interpreted as a severity.
    #[error("invalid level '{value}' for stream '{stream}': {source}")]
    InvalidLevel {
        /// Stream name with escapes resolved.
        stream: String,
        /// The level text as supplied.
        value: String,
        /// Why the level was rejected.
        #[source]
        source: SeverityParseError,
    },
}

impl StreamSpecError {
    /// Returns the stream name the error refers to.
    #[must_use]
    pub fn stream(&self) -> &str {
        match self {
            Self::InvalidLevel { stream, .. } => stream,
        }
    }

    /// Returns the rejected level text.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidLevel { value, .. } => value,
        }
    }
}

impl StreamSpec {
    /// Creates a specification from already-resolved parts.
    #[must_use]
    pub fn new(name: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            severity,
        }
    }

    /// Parses `name[:level]`.
    pub fn parse(spec: &str) -> Result<Self, StreamSpecError> {
        let (name, level) = split_level(spec);
        let severity = match level {
            None => Severity::DEBUG,
            Some(value) => value
                .parse::<Severity>()
                .map_err(|source| StreamSpecError::InvalidLevel {
                    stream: name.clone(),
                    value: value.to_owned(),
                    source,
                })?,
        };
        Ok(Self { name, severity })
    }

    /// Returns the stream name with escapes resolved.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the minimum severity the stream shows.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }
}

impl FromStr for StreamSpec {
    type Err = StreamSpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        Self::parse(spec)
    }
}

impl fmt::Display for StreamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.name.chars() {
            if ch == ':' {
                f.write_str("\\:")?;
            } else {
                write!(f, "{ch}")?;
            }
        }
        match self.severity.name() {
            Some(level) => write!(f, ":{level}"),
            None => write!(f, ":{}", self.severity.value()),
        }
    }
}

/// Splits at the first colon not preceded by a backslash, unescaping `\:` in the name.
fn split_level(spec: &str) -> (String, Option<&str>) {
    let mut name = String::with_capacity(spec.len());
    let mut chars = spec.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' if matches!(chars.peek(), Some((_, ':'))) => {
                name.push(':');
                chars.next();
            }
            ':' => return (name, Some(&spec[index + 1..])),
            _ => name.push(ch),
        }
    }

    (name, None)
}
