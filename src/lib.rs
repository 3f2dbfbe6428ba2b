//! # ember-tui
//!
//! Retained-tree rendering core for reactive terminal UIs.
//!
//! A fine-grained reactive view layer drives a mutable scene graph through
//! a small mutation API; flexbox layout is computed over the graph by
//! [Taffy](https://docs.rs/taffy), and the positioned tree is painted as
//! cursor-addressed ANSI text, with a full-frame diff suppressing writes
//! when nothing changed.
//!
//! ## Pipeline
//!
//! ```text
//! reactive effects → SceneTree mutations → revision signal
//!                                             │
//!                                       render effect
//!                                             │
//!                                      PaintScheduler (~16ms coalescing)
//!                                             │
//!                    layout (taffy) → compose frame → diff → terminal
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - the retained scene graph and its mutation API
//! - [`layout`] - style table and the flexbox engine adapter
//! - [`renderer`] - frame composition and frame-identity diffing
//! - [`state`] - focus registry, key decoding, input routing
//! - [`pipeline`] - the session context and the render loop driver
//! - [`types`] - shared vocabulary (dimensions, colors, property values)

pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export the working surface.
pub use engine::{NodeId, SceneTree};
pub use error::{Error, Result};
pub use layout::{ComputedBox, StyleKey};
pub use pipeline::{Session, SessionOptions, FRAME_INTERVAL};
pub use renderer::FrameWriter;
pub use state::{
    FocusRegistry, FocusToken, HandlerId, InputDecoder, InputRouter, KeyCode, KeyEvent, Modifier,
};
pub use types::{
    AlignItems, AlignSelf, Dimension, Display, FlexDirection, FlexWrap, JustifyContent, PropValue,
    TextAttr, TextColor,
};
