//! Frame-identity diffing against the previous paint.
//!
//! The writer retains exactly one frame: the last one that reached the
//! terminal. A new frame that is byte-identical produces zero terminal
//! writes. That is the contract that makes "only changed output triggers
//! a write" hold. A differing frame is preceded by clear-screen and
//! cursor-home. Cell-level minimal diffing is deliberately not attempted;
//! frame-level suppression is what correctness requires, and full redraws
//! are fast at terminal sizes.

use std::io::{self, Write};

use super::ansi;

/// Writes frames to the terminal stream, skipping unchanged ones.
pub struct FrameWriter {
    previous: Option<String>,
}

impl FrameWriter {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Write `frame` unless it is byte-identical to the previous one.
    ///
    /// Returns whether anything was written. The frame is retained only
    /// after a fully successful write, so a failed write is retried in
    /// full by the next paint.
    pub fn present(&mut self, out: &mut dyn Write, frame: &str) -> io::Result<bool> {
        if self.previous.as_deref() == Some(frame) {
            tracing::trace!("frame unchanged, skipping terminal write");
            return Ok(false);
        }

        out.write_all(ansi::CLEAR_SCREEN.as_bytes())?;
        out.write_all(ansi::CURSOR_HOME.as_bytes())?;
        out.write_all(frame.as_bytes())?;
        out.flush()?;

        self.previous = Some(frame.to_string());
        Ok(true)
    }

    /// Drop the retained frame; the next present rewrites unconditionally.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
