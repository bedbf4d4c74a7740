//! crates/logging-sink/src/terminal.rs
//! Colour terminal detection and severity-band colouring.

use std::borrow::Cow;
use std::env;
use std::io;

use is_terminal::IsTerminal;
use logging::Severity;

/// `TERM` values known to understand ANSI colours.
pub const COLOR_TERMS: [&str; 6] = [
    "linux",
    "xterm",
    "xterm-256color",
    "vt100",
    "screen",
    "screen-256color",
];

const BLUE: &str = "\x1b[94m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const END: &str = "\x1b[0m";

/// Reports whether process output goes to an interactive colour terminal.
///
/// `colored` is the user's colour setting; when it is off the answer is
/// always `false`.
#[must_use]
pub fn is_colored_term(colored: bool) -> bool {
    colored && io::stdout().is_terminal() && term_supports_color(env::var("TERM").ok().as_deref())
}

fn term_supports_color(term: Option<&str>) -> bool {
    term.is_some_and(|term| COLOR_TERMS.contains(&term))
}

/// Wraps messages in the colour of their severity band.
///
/// Below INFO is left plain, INFO is blue, WARNING yellow, and ERROR or above
/// red. A disabled palette returns messages untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// A palette that never colours.
    #[must_use]
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    /// A palette that always colours.
    #[must_use]
    pub const fn colored() -> Self {
        Self { enabled: true }
    }

    /// Reports whether colouring is active.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }

    const fn color_for(severity: Severity) -> Option<&'static str> {
        let value = severity.value();
        if value < Severity::INFO.value() {
            None
        } else if value < Severity::WARNING.value() {
            Some(BLUE)
        } else if value < Severity::ERROR.value() {
            Some(YELLOW)
        } else {
            Some(RED)
        }
    }

    /// Colours `message` for `severity`.
    #[must_use]
    pub fn paint<'a>(self, severity: Severity, message: &'a str) -> Cow<'a, str> {
        match Self::color_for(severity) {
            Some(color) if self.enabled => Cow::Owned(format!("{color}{message}{END}")),
            _ => Cow::Borrowed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_terms_support_color() {
        assert!(term_supports_color(Some("xterm-256color")));
        assert!(!term_supports_color(Some("dumb")));
        assert!(!term_supports_color(None));
    }

    #[test]
    fn colour_setting_off_disables_detection() {
        assert!(!is_colored_term(false));
    }

    #[test]
    fn plain_palette_borrows() {
        let painted = Palette::plain().paint(Severity::ERROR, "boom");
        assert!(matches!(painted, Cow::Borrowed("boom")));
    }

    #[test]
    fn bands_pick_colours() {
        let palette = Palette::colored();
        assert_eq!(palette.paint(Severity::DEBUG, "d"), "d");
        assert_eq!(palette.paint(Severity::INFO, "i"), "\x1b[94mi\x1b[0m");
        assert_eq!(palette.paint(Severity::WARNING, "w"), "\x1b[93mw\x1b[0m");
        assert_eq!(palette.paint(Severity::ERROR, "e"), "\x1b[91me\x1b[0m");
        assert_eq!(palette.paint(Severity::CRITICAL, "c"), "\x1b[91mc\x1b[0m");
    }
}
