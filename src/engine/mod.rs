//! Scene graph: the retained tree and its mutation API.
//!
//! - [`node`] - arena node storage (elements, text)
//! - [`tree`] - the [`SceneTree`] mutation and query surface

pub mod node;
pub mod tree;

pub use node::NodeId;
pub use tree::SceneTree;
