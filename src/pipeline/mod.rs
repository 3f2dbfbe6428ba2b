//! Render loop driver.
//!
//! - [`session`] - the session context: tree + focus + input + terminal
//! - [`scheduler`] - Idle/Scheduled coalescing repaint state
//! - [`terminal`] - raw-mode and cursor lifecycle
//! - [`reader`] - stdin reader thread feeding the run loop

pub mod reader;
pub mod scheduler;
pub mod session;
pub mod terminal;

pub use scheduler::{PaintScheduler, FRAME_INTERVAL};
pub use session::{Session, SessionOptions};
pub use terminal::{detect_size, TerminalGuard};
