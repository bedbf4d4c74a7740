//! crates/logging-sink/src/pager.rs
//! Output destination that pipes text through an external full-screen viewer.
//!
//! The viewer is resolved from `PAGER`, falling back to `less -FRSX` when
//! `less` is on `PATH`. Without a viewer the paginator forwards everything to
//! the destination it was created with, so callers cannot tell the difference.
//! A viewer the user quits early severs the pipe; from then on writes are
//! silently discarded.

use std::env;
use std::fmt;
use std::io::Write;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::destination::Destination;

/// Arguments passed to `less` when no `PAGER` is configured.
pub const LESS_FLAGS: &str = "-FRSX";

enum PagerState {
    Piped {
        child: Child,
        stdin: Option<ChildStdin>,
    },
    Fallback(Destination),
    Closed,
}

/// A destination backed by an external viewer process.
pub struct Paginator {
    state: Mutex<PagerState>,
}

impl Paginator {
    /// Starts the configured viewer, or falls back to `fallback`.
    #[must_use]
    pub fn spawn(fallback: Destination) -> Self {
        Self::with_command(resolve_command().as_deref(), fallback)
    }

    /// Starts `command` through the shell, or falls back to `fallback` when
    /// `command` is `None` or cannot be started.
    #[must_use]
    pub fn with_command(command: Option<&str>, fallback: Destination) -> Self {
        let state = match command.map(spawn_viewer) {
            Some(Ok(mut child)) => {
                let stdin = child.stdin.take();
                PagerState::Piped { child, stdin }
            }
            Some(Err(error)) => {
                debug!(%error, "pager could not be started, writing directly");
                PagerState::Fallback(fallback)
            }
            None => {
                debug!("no pager available, writing directly");
                PagerState::Fallback(fallback)
            }
        };
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reports whether text currently flows into a live viewer.
    #[must_use]
    pub fn is_piped(&self) -> bool {
        matches!(&*self.lock(), PagerState::Piped { stdin: Some(_), .. })
    }

    /// Reports whether [`close`](Self::close) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(&*self.lock(), PagerState::Closed)
    }

    /// Forwards `text` to the viewer. Never fails.
    pub fn write_str(&self, text: &str) {
        match &mut *self.lock() {
            PagerState::Piped { stdin, .. } => {
                let severed = stdin
                    .as_mut()
                    .and_then(|pipe| pipe.write_all(text.as_bytes()).err());
                if let Some(error) = severed {
                    debug!(%error, "pager pipe severed, discarding further output");
                    *stdin = None;
                }
            }
            PagerState::Fallback(destination) => {
                if let Err(error) = destination.write_str(text) {
                    debug!(%error, "pager fallback write failed");
                }
            }
            PagerState::Closed => {}
        }
    }

    /// Flushes the pipe. Never fails.
    pub fn flush(&self) {
        match &mut *self.lock() {
            PagerState::Piped { stdin, .. } => {
                let severed = stdin.as_mut().and_then(|pipe| pipe.flush().err());
                if let Some(error) = severed {
                    debug!(%error, "pager pipe severed on flush");
                    *stdin = None;
                }
            }
            PagerState::Fallback(destination) => {
                if let Err(error) = destination.flush() {
                    debug!(%error, "pager fallback flush failed");
                }
            }
            PagerState::Closed => {}
        }
    }

    /// Closes the pipe and waits for the viewer to exit.
    ///
    /// Safe to call any number of times, and tolerant of a pipe the viewer
    /// already closed.
    pub fn close(&self) {
        let previous = std::mem::replace(&mut *self.lock(), PagerState::Closed);
        match previous {
            PagerState::Piped { mut child, stdin } => {
                drop(stdin);
                if let Err(error) = child.wait() {
                    debug!(%error, "pager did not exit cleanly");
                }
            }
            PagerState::Fallback(destination) => {
                if let Err(error) = destination.flush() {
                    debug!(%error, "pager fallback flush failed on close");
                }
            }
            PagerState::Closed => {}
        }
    }
}

impl Drop for Paginator {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.lock() {
            PagerState::Piped { stdin: Some(_), .. } => "piped",
            PagerState::Piped { stdin: None, .. } => "severed",
            PagerState::Fallback(_) => "fallback",
            PagerState::Closed => "closed",
        };
        f.debug_struct("Paginator").field("state", &state).finish()
    }
}

/// Resolves the viewer command line.
///
/// A non-empty `PAGER` wins; otherwise `less -FRSX` when `less` is found on
/// `PATH`.
#[must_use]
pub fn resolve_command() -> Option<String> {
    match env::var("PAGER") {
        Ok(pager) if !pager.trim().is_empty() => Some(pager),
        Ok(_) => None,
        Err(_) => less_command(),
    }
}

/// `less` from `PATH` with [`LESS_FLAGS`].
fn less_command() -> Option<String> {
    let less = which::which("less").ok()?;
    Some(format!("{} {LESS_FLAGS}", less.display()))
}

fn spawn_viewer(command: &str) -> std::io::Result<Child> {
    #[cfg(unix)]
    let mut shell = {
        let mut shell = Command::new("sh");
        shell.arg("-c").arg(command);
        shell
    };
    #[cfg(not(unix))]
    let mut shell = {
        let mut shell = Command::new("cmd");
        shell.arg("/C").arg(command);
        shell
    };
    shell.stdin(Stdio::piped()).spawn()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_command_falls_back_to_destination() {
        let fallback = Destination::memory();
        let pager = Paginator::with_command(None, fallback.clone());
        assert!(!pager.is_piped());

        pager.write_str("line one\n");
        pager.write_str("line two\n");
        assert_eq!(
            fallback.contents().as_deref(),
            Some("line one\nline two\n")
        );
    }

    #[test]
    fn close_is_idempotent() {
        let pager = Paginator::with_command(None, Destination::memory());
        pager.close();
        pager.close();
        assert!(pager.is_closed());
    }

    #[test]
    fn writes_after_close_are_discarded() {
        let fallback = Destination::memory();
        let pager = Paginator::with_command(None, fallback.clone());
        pager.close();
        pager.write_str("late\n");
        assert_eq!(fallback.contents().as_deref(), Some(""));
    }

    #[test]
    fn less_is_started_by_absolute_path() {
        if let Some(command) = less_command() {
            let program = command.strip_suffix(" -FRSX").expect("less flags");
            assert!(std::path::Path::new(program).is_absolute());
        }
    }

    #[cfg(unix)]
    #[test]
    fn viewer_receives_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("viewer.txt");
        let command = format!("cat > '{}'", out.display());

        let pager = Paginator::with_command(Some(&command), Destination::Null);
        assert!(pager.is_piped());
        pager.write_str("paged\n");
        pager.close();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "paged\n");
    }

    #[cfg(unix)]
    #[test]
    fn viewer_exiting_early_is_not_an_error() {
        let pager = Paginator::with_command(Some("exit 0"), Destination::Null);
        std::thread::sleep(std::time::Duration::from_millis(100));
        for _ in 0..64 {
            pager.write_str(&"x".repeat(4096));
        }
        pager.flush();
        pager.close();
        pager.close();
    }
}
