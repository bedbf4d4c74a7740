//! crates/routing/src/error.rs
//! Errors surfaced by the router.

use logging::{ExitCode, SeverityParseError, StreamSpecError};
use thiserror::Error;

/// Failures of router operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// A user-defined stream carries a level that is not a severity.
    ///
    /// This is a fatal configuration error: the process should report it and
    /// exit with [`ExitCode::Fail`].
    #[error("failed to set logger for stream '{stream}' with level '{value}': {source}")]
    InvalidStreamLevel {
        /// The stream name.
        stream: String,
        /// The rejected level text.
        value: String,
        /// Why the level was rejected.
        #[source]
        source: SeverityParseError,
    },
    /// `finalize` ran before.
    #[error("stream routing has already been finalized")]
    AlreadyFinalized,
    /// A post-finalization operation was attempted while still buffering.
    #[error("stream routing has not been finalized yet")]
    NotFinalized,
}

impl RoutingError {
    /// Returns the process exit status this error maps to.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        ExitCode::Fail
    }
}

impl From<StreamSpecError> for RoutingError {
    fn from(error: StreamSpecError) -> Self {
        match error {
            StreamSpecError::InvalidLevel {
                stream,
                value,
                source,
            } => Self::InvalidStreamLevel {
                stream,
                value,
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::StreamSpec;

    #[test]
    fn spec_errors_become_configuration_errors() {
        let error: RoutingError = StreamSpec::parse("custom:notalevel").unwrap_err().into();
        assert!(matches!(
            &error,
            RoutingError::InvalidStreamLevel { stream, value, .. }
                if stream == "custom" && value == "notalevel"
        ));
        assert_eq!(error.exit_code(), ExitCode::Fail);
        assert!(error.to_string().contains("custom"));
    }
}
