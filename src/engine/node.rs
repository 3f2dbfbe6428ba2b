//! Node storage for the scene graph.
//!
//! Nodes live in an arena indexed by [`NodeId`]; the id is the only thing
//! external code ever holds. An element owns its layout-engine handle, its
//! ordered children, the closed style table and the open property bag. A
//! text node owns just its payload: its extent is implied by the rendered
//! length, so it has no layout handle.

use std::collections::HashMap;

use crate::layout::StyleTable;
use crate::types::PropValue;

/// Opaque handle to a node in the scene tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// The untyped per-element property bag (paint-only values).
pub(crate) type PropMap = HashMap<String, PropValue>;

/// An element node: a styled flex container that may hold children.
pub(crate) struct ElementData {
    pub tag: String,
    pub handle: taffy::NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub style: StyleTable,
    pub props: PropMap,
}

/// A text node: a string payload positioned by its enclosing element.
pub(crate) struct TextData {
    pub content: String,
    pub parent: Option<NodeId>,
}

/// A slot in the arena.
pub(crate) enum NodeData {
    Element(ElementData),
    Text(TextData),
}

impl NodeData {
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            NodeData::Element(el) => el.parent,
            NodeData::Text(text) => text.parent,
        }
    }

    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            NodeData::Element(el) => el.parent = parent,
            NodeData::Text(text) => text.parent = parent,
        }
    }
}
