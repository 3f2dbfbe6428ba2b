//! Focus and input routing.
//!
//! - [`focus`] - ordered focus-token registry with cyclic navigation
//! - [`keyboard`] - raw byte decoding into structured key events
//! - [`input`] - handler subscriptions with activity predicates

pub mod focus;
pub mod input;
pub mod keyboard;

pub use focus::{FocusRegistry, FocusToken};
pub use input::{HandlerId, InputRouter};
pub use keyboard::{InputDecoder, KeyCode, KeyEvent, Modifier};
