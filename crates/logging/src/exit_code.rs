//! crates/logging/src/exit_code.rs
//! Process exit statuses reserved by the diagnostics layer.

use std::fmt;

/// Exit statuses of a process using stream routing.
///
/// The values are bit flags so a job runner can combine them; the router only
/// ever produces [`ExitCode::Fail`], for a malformed stream specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Everything succeeded.
    AllOk = 0,
    /// At least one test failed.
    TestsFail = 1,
    /// The job could not run to completion.
    JobFail = 2,
    /// General failure, including configuration errors.
    Fail = 4,
    /// The job was interrupted.
    JobInterrupted = 8,
}

impl ExitCode {
    /// Returns the numeric status.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns a short description of the status.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AllOk => "success",
            Self::TestsFail => "tests failed",
            Self::JobFail => "job failed",
            Self::Fail => "general failure",
            Self::JobInterrupted => "job interrupted",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.as_i32() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_is_four() {
        assert_eq!(ExitCode::Fail.as_i32(), 4);
        assert_eq!(ExitCode::Fail.to_string(), "general failure (4)");
    }

    #[test]
    fn statuses_are_distinct_bits() {
        let codes = [
            ExitCode::TestsFail,
            ExitCode::JobFail,
            ExitCode::Fail,
            ExitCode::JobInterrupted,
        ];
        let combined = codes.iter().fold(0, |acc, code| acc | code.as_i32());
        assert_eq!(combined, 15);
    }
}
