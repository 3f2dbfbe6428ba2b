//! Error taxonomy for the rendering core.
//!
//! Each failure class carries its own propagation rule:
//!
//! - [`Error::Structural`] - the caller handed the mutation API a node that
//!   is not where it claimed (missing anchor, foreign child, text op on an
//!   element). Fatal to the operation, never absorbed: it means the
//!   reconciler driving the tree has a bug.
//! - [`Error::Configuration`] - a malformed style value. The offending
//!   write is dropped and everything else continues; one bad style must
//!   not blank the UI.
//! - [`Error::Layout`] - the flexbox engine itself failed. Allocation
//!   failures are fatal; compute failures abort the paint pass.
//! - [`Error::Paint`] - a failure while composing or writing a frame. The
//!   frame is abandoned, the previous frame stays on screen, and the
//!   session remains usable.
//! - [`Error::Teardown`] - terminal state could not be restored on exit.
//!   Best-effort: logged, never allowed to block shutdown.

use std::io;

use thiserror::Error;

/// Errors surfaced by the scene graph, layout adapter and paint pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The mutation API was called with nodes that violate the tree's
    /// structure contract.
    #[error("structural violation: {0}")]
    Structural(String),

    /// A style property write carried a value that could not be parsed.
    #[error("invalid style value for `{key}`: {reason}")]
    Configuration { key: String, reason: String },

    /// The layout engine reported a failure.
    #[error("layout engine: {0}")]
    Layout(String),

    /// Frame composition or the terminal write failed; the frame was
    /// abandoned uncommitted.
    #[error("paint failed: {0}")]
    Paint(String),

    /// Terminal setup I/O failure outside the paint path.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Terminal state could not be fully restored at session teardown.
    #[error("terminal restore failed: {0}")]
    Teardown(#[source] io::Error),
}

impl Error {
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        Error::Structural(msg.into())
    }

    pub(crate) fn configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Configuration {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn layout(err: impl std::fmt::Display) -> Self {
        Error::Layout(err.to_string())
    }

    pub(crate) fn paint(err: impl std::fmt::Display) -> Self {
        Error::Paint(err.to_string())
    }

    /// True for errors the render loop reports and survives.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Paint(_) | Error::Layout(_) | Error::Configuration { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
