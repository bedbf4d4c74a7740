//! crates/logging/src/line_mode.rs
//! Trailing newline policy for rendered records.

/// Whether a sink terminates a rendered record with a newline.
///
/// Progress records such as `RESULTS    : ` leave the line open so the
/// next record on the same destination continues it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// End the record with `\n`.
    #[default]
    WithNewline,
    /// Leave the line open.
    WithoutNewline,
}

impl LineMode {
    /// Picks the mode for a record that may suppress its newline.
    ///
    /// ```
    /// use logging::LineMode;
    ///
    /// assert_eq!(LineMode::for_skip_newline(true), LineMode::WithoutNewline);
    /// assert_eq!(LineMode::for_skip_newline(false).terminator(), "\n");
    /// ```
    #[must_use]
    pub const fn for_skip_newline(skip_newline: bool) -> Self {
        if skip_newline {
            Self::WithoutNewline
        } else {
            Self::WithNewline
        }
    }

    /// Text a sink writes after the rendered message.
    #[must_use]
    pub const fn terminator(self) -> &'static str {
        match self {
            Self::WithNewline => "\n",
            Self::WithoutNewline => "",
        }
    }
}

#[cfg(test)]
mod tests;
