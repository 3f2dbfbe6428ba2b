//! Flexbox layout for the scene graph.
//!
//! - [`taffy_bridge`] - adapter owning the retained Taffy tree
//! - [`style`] - the closed style-key table and value parsing
//! - [`text_measure`] - cell-width measurement for text payloads

pub mod style;
pub mod taffy_bridge;
pub mod text_measure;

pub use style::{parse_style_value, StyleKey, StyleTable, StyleValue};
pub use taffy_bridge::{ComputedBox, LayoutEngine};
pub use text_measure::{line_count, max_line_width, string_width};
