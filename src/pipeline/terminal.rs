//! Terminal raw-mode and cursor lifecycle.
//!
//! One guard per render session. Setup enables raw mode (only when stdin
//! is actually a TTY, so piped and test runs still render) and hides the
//! cursor; restore undoes both, best-effort; a failure to restore is
//! reported as [`Error::Teardown`] but never blocks exit. The guard also
//! restores on Drop so abnormal unwinds leave the terminal usable.

use std::io::{self, IsTerminal, Write};

use crossterm::tty::IsTty;
use crossterm::{cursor, execute, terminal};

use crate::error::{Error, Result};

/// Terminal size in (columns, rows), with a conventional fallback when
/// the stream is not a terminal.
pub fn detect_size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}

/// Raw-mode/cursor guard for one render session.
pub struct TerminalGuard {
    raw_enabled: bool,
    cursor_hidden: bool,
    restored: bool,
}

impl TerminalGuard {
    pub fn new() -> Self {
        Self {
            raw_enabled: false,
            cursor_hidden: false,
            restored: true,
        }
    }

    /// Enter raw mode and hide the cursor on the session's output stream.
    pub fn setup(&mut self, mut out: &mut dyn Write, raw_mode: bool, hide_cursor: bool) -> Result<()> {
        self.restored = false;
        if raw_mode && io::stdin().is_tty() {
            terminal::enable_raw_mode()?;
            self.raw_enabled = true;
        }
        if hide_cursor {
            execute!(&mut out, cursor::Hide)?;
            self.cursor_hidden = true;
        }
        Ok(())
    }

    /// Restore the terminal's original state.
    ///
    /// Both steps are attempted regardless of individual failures; the
    /// first failure is reported as [`Error::Teardown`].
    pub fn restore(&mut self, mut out: &mut dyn Write) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        let mut first_err: Option<io::Error> = None;

        if self.raw_enabled {
            self.raw_enabled = false;
            if let Err(err) = terminal::disable_raw_mode() {
                first_err.get_or_insert(err);
            }
        }
        if self.cursor_hidden {
            self.cursor_hidden = false;
            if let Err(err) = execute!(&mut out, cursor::Show) {
                first_err.get_or_insert(err);
            }
        }

        match first_err {
            Some(err) => {
                tracing::warn!(error = %err, "failed to restore terminal state");
                Err(Error::Teardown(err))
            }
            None => Ok(()),
        }
    }
}

impl Default for TerminalGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Abnormal-exit path: the session's output stream is gone, so the
        // cursor is re-shown on stdout directly.
        if !self.restored {
            if self.raw_enabled {
                let _ = terminal::disable_raw_mode();
            }
            if self.cursor_hidden && io::stdout().is_terminal() {
                let _ = execute!(io::stdout(), cursor::Show);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
