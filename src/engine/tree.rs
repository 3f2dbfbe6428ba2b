//! The retained scene tree and its mutation API.
//!
//! This is the surface a reconciler driver calls from inside reactive
//! effects: create element/text nodes, set text and properties, splice
//! children. Every mutation bumps a revision signal: the render loop's
//! one effect observes it and schedules a repaint; nothing here ever calls
//! back into widget code, so mutations are safe at arbitrary times.
//!
//! Structure contract: a node has at most one parent, child order is
//! exactly insertion order, and handing this API a node that is not where
//! the caller claims is a [`Error::Structural`], surfaced loudly because
//! it means the reconciler is buggy, never absorbed.

use std::collections::HashMap;

use spark_signals::{signal, Signal};
use taffy::Size;

use crate::error::{Error, Result};
use crate::layout::text_measure::{line_count, max_line_width};
use crate::layout::{parse_style_value, ComputedBox, LayoutEngine, StyleKey, StyleTable};
use crate::types::PropValue;

use super::node::{ElementData, NodeData, NodeId, TextData};

// =============================================================================
// SCENE TREE
// =============================================================================

/// The mutable retained tree of element and text nodes.
///
/// Owns the layout engine adapter; element handles are created with their
/// element and released exactly once, at session teardown.
pub struct SceneTree {
    slots: Vec<Option<NodeData>>,
    free: Vec<usize>,
    layout: LayoutEngine,
    revision: Signal<u64>,
    root: NodeId,
    handles_released: bool,
}

impl SceneTree {
    /// Create a tree with its distinguished root element.
    pub fn new() -> Result<Self> {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            layout: LayoutEngine::new(),
            revision: signal(0),
            root: NodeId::from_index(0),
            handles_released: false,
        };
        tree.root = tree.create_element("root")?;
        Ok(tree)
    }

    /// The root element representing the terminal viewport.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The revision signal bumped by every mutation.
    ///
    /// The render loop driver registers the one effect that observes this;
    /// reading it from a derived/effect creates the dependency.
    pub fn revision(&self) -> Signal<u64> {
        self.revision.clone()
    }

    fn bump(&self) {
        self.revision.set(self.revision.get().wrapping_add(1));
    }

    // =========================================================================
    // Node creation
    // =========================================================================

    /// Create a detached element node with a fresh layout handle.
    ///
    /// Fails only if the layout engine itself fails to allocate, which is
    /// fatal and non-recoverable.
    pub fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        let id = self.reserve();
        let handle = match self.layout.create_node(id) {
            Ok(handle) => handle,
            Err(err) => {
                self.free.push(id.index());
                return Err(err);
            }
        };
        self.slots[id.index()] = Some(NodeData::Element(ElementData {
            tag: tag.to_string(),
            handle,
            parent: None,
            children: Vec::new(),
            style: StyleTable::new(),
            props: HashMap::new(),
        }));
        self.bump();
        Ok(id)
    }

    /// Create a detached text node. No layout handle is allocated.
    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        let id = self.reserve();
        self.slots[id.index()] = Some(NodeData::Text(TextData {
            content: value.into(),
            parent: None,
        }));
        self.bump();
        id
    }

    fn reserve(&mut self) -> NodeId {
        match self.free.pop() {
            Some(index) => NodeId::from_index(index),
            None => {
                self.slots.push(None);
                NodeId::from_index(self.slots.len() - 1)
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace a text node's payload. O(1), no structural effect.
    pub fn set_text(&mut self, node: NodeId, value: impl Into<String>) -> Result<()> {
        match self.data_mut(node)? {
            NodeData::Text(text) => {
                text.content = value.into();
                self.bump();
                Ok(())
            }
            NodeData::Element(_) => Err(Error::structural("set_text called on an element node")),
        }
    }

    /// Write a property.
    ///
    /// `style:`-prefixed keys are parsed into the closed style table and
    /// forwarded to the layout engine; a malformed value is a
    /// [`Error::Configuration`] and leaves the previous value untouched.
    /// Unknown style keys are ignored. Everything else lands verbatim in
    /// the element's property bag for the paint pipeline to pull.
    pub fn set_property(
        &mut self,
        node: NodeId,
        key: &str,
        value: impl Into<PropValue>,
    ) -> Result<()> {
        let value = value.into();

        let Some(style_key) = key.strip_prefix("style:") else {
            match self.data_mut(node)? {
                NodeData::Element(el) => {
                    el.props.insert(key.to_string(), value);
                    self.bump();
                    return Ok(());
                }
                NodeData::Text(_) => {
                    return Err(Error::structural("set_property called on a text node"));
                }
            }
        };

        let Ok(parsed_key) = style_key.parse::<StyleKey>() else {
            // Unknown style keys are ignored so newer view layers keep working.
            tracing::debug!(key = style_key, "ignoring unknown style key");
            return Ok(());
        };
        let parsed = parse_style_value(parsed_key, &value)?;

        let Self { slots, layout, .. } = self;
        match slots.get_mut(node.index()).and_then(|slot| slot.as_mut()) {
            Some(NodeData::Element(el)) => {
                el.style.set(parsed_key, parsed);
                layout.apply_style(el.handle, &el.style, None)?;
            }
            Some(NodeData::Text(_)) => {
                return Err(Error::structural("style properties are not valid on text nodes"));
            }
            None => return Err(Error::structural("set_property on a destroyed node")),
        }
        self.bump();
        Ok(())
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// An already-attached child is moved (detached from its old parent
    /// first), preserving the single-parent invariant during reorders.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_can_attach(parent, child)?;
        self.detach(child)?;
        let index = self.element(parent)?.children.len();
        self.attach_at(parent, child, index)
    }

    /// Insert `child` at `anchor`'s current index under `parent`.
    ///
    /// An anchor that is not among `parent`'s children is a
    /// [`Error::Structural`] and leaves the tree unmodified; it is never
    /// silently turned into an append.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, anchor: NodeId) -> Result<()> {
        self.ensure_can_attach(parent, child)?;
        if !self.element(parent)?.children.contains(&anchor) {
            return Err(Error::structural(
                "insert_before anchor is not a child of the given parent",
            ));
        }
        if child == anchor {
            // Inserting a node before itself leaves it where it is.
            return Ok(());
        }
        self.detach(child)?;
        // Re-locate the anchor: detaching an earlier sibling shifts it.
        let index = self
            .element(parent)?
            .children
            .iter()
            .position(|&c| c == anchor)
            .ok_or_else(|| {
                Error::structural("insert_before anchor is not a child of the given parent")
            })?;
        self.attach_at(parent, child, index)
    }

    /// Remove `child` from `parent`, clearing the parent link.
    ///
    /// Descendant layout handles are NOT released: detached subtrees are
    /// commonly reattached during list reordering and must not pay the
    /// allocation cost twice. Handles are released once, at teardown.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.data(child)?.parent() != Some(parent) {
            return Err(Error::structural(
                "remove_child: node is not a child of the given parent",
            ));
        }
        self.remove_from(parent, child)?;
        self.bump();
        Ok(())
    }

    fn ensure_can_attach(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if !matches!(self.data(parent)?, NodeData::Element(_)) {
            return Err(Error::structural("text nodes cannot have children"));
        }
        self.data(child)?;
        if child == self.root {
            return Err(Error::structural("the root cannot be inserted under another node"));
        }
        if child == parent {
            return Err(Error::structural("a node cannot be inserted into itself"));
        }
        let mut cursor = self.data(parent)?.parent();
        while let Some(node) = cursor {
            if node == child {
                return Err(Error::structural(
                    "a node cannot be inserted under its own descendant",
                ));
            }
            cursor = self.data(node)?.parent();
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> Result<()> {
        match self.data(child)?.parent() {
            Some(old_parent) => self.remove_from(old_parent, child),
            None => Ok(()),
        }
    }

    fn remove_from(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let child_handle = self.layout_handle(child);
        let parent_handle = self.element(parent)?.handle;
        {
            let el = self.element_mut(parent)?;
            let index = el
                .children
                .iter()
                .position(|&c| c == child)
                .ok_or_else(|| {
                    Error::structural("remove_child: node is not a child of the given parent")
                })?;
            el.children.remove(index);
        }
        self.data_mut(child)?.set_parent(None);
        if let Some(child_handle) = child_handle {
            self.layout.remove_child(parent_handle, child_handle)?;
        }
        Ok(())
    }

    fn attach_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        let child_handle = self.layout_handle(child);
        let parent_handle = self.element(parent)?.handle;
        // Text siblings own no layout handle, so the layout child index is
        // the count of element siblings before the insertion point.
        let layout_index = {
            let children = &self.element(parent)?.children;
            children[..index]
                .iter()
                .filter(|&&c| self.layout_handle(c).is_some())
                .count()
        };
        self.element_mut(parent)?.children.insert(index, child);
        self.data_mut(child)?.set_parent(Some(parent));
        if let Some(child_handle) = child_handle {
            self.layout.insert_child_at(parent_handle, layout_index, child_handle)?;
        }
        self.bump();
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(NodeData::parent)
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        match self.node(node)? {
            NodeData::Element(el) => el.children.first().copied(),
            NodeData::Text(_) => None,
        }
    }

    /// The sibling after `node`, found by scanning the parent's children.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let children = match self.node(parent)? {
            NodeData::Element(el) => &el.children,
            NodeData::Text(_) => return None,
        };
        let index = children.iter().position(|&c| c == node)?;
        children.get(index + 1).copied()
    }

    /// Children of an element, empty for text nodes.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.node(node) {
            Some(NodeData::Element(el)) => &el.children,
            _ => &[],
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.node(node), Some(NodeData::Text(_)))
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.node(node)? {
            NodeData::Element(el) => Some(&el.tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn text_content(&self, node: NodeId) -> Option<&str> {
        match self.node(node)? {
            NodeData::Text(text) => Some(&text.content),
            NodeData::Element(_) => None,
        }
    }

    /// Current value of a bag property, if set.
    pub fn property(&self, node: NodeId, key: &str) -> Option<&PropValue> {
        match self.node(node)? {
            NodeData::Element(el) => el.props.get(key),
            NodeData::Text(_) => None,
        }
    }

    /// The element's style table (None for text nodes).
    pub fn style(&self, node: NodeId) -> Option<&StyleTable> {
        match self.node(node)? {
            NodeData::Element(el) => Some(&el.style),
            NodeData::Text(_) => None,
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Run a layout pass with the root pinned to `cols` x `rows`.
    pub fn compute_layout(&mut self, cols: u16, rows: u16) -> Result<()> {
        let root = self.root;
        let Self { slots, layout, .. } = self;
        let root_handle = match slots.get(root.index()).and_then(|slot| slot.as_ref()) {
            Some(NodeData::Element(el)) => {
                layout.apply_style(el.handle, &el.style, Some((cols, rows)))?;
                el.handle
            }
            _ => return Err(Error::structural("scene tree has no root element")),
        };
        let slots: &[Option<NodeData>] = slots;
        layout.compute(root_handle, cols, rows, |owner, known, _avail| {
            measure_leaf(slots, owner, known)
        })
    }

    /// Solved box for an element, relative to its parent. None for text.
    pub fn layout_box(&self, node: NodeId) -> Option<ComputedBox> {
        self.layout_handle(node).map(|handle| self.layout.box_of(handle))
    }

    /// Release every still-allocated layout handle.
    ///
    /// Called once by session teardown; covers attached nodes and subtrees
    /// that were detached without being reattached. Idempotent.
    pub fn release_handles(&mut self) {
        if self.handles_released {
            return;
        }
        self.handles_released = true;
        let handles: Vec<taffy::NodeId> = self
            .slots
            .iter()
            .flatten()
            .filter_map(|data| match data {
                NodeData::Element(el) => Some(el.handle),
                NodeData::Text(_) => None,
            })
            .collect();
        for handle in handles {
            self.layout.release(handle);
        }
    }

    // =========================================================================
    // Internal accessors
    // =========================================================================

    pub(crate) fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.slots.get(id.index()).and_then(|slot| slot.as_ref())
    }

    fn data(&self, id: NodeId) -> Result<&NodeData> {
        self.node(id)
            .ok_or_else(|| Error::structural("operation on a destroyed or unknown node"))
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.slots
            .get_mut(id.index())
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| Error::structural("operation on a destroyed or unknown node"))
    }

    pub(crate) fn element(&self, id: NodeId) -> Result<&ElementData> {
        match self.data(id)? {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(Error::structural("expected an element node")),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData> {
        match self.data_mut(id)? {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(Error::structural("expected an element node")),
        }
    }

    fn layout_handle(&self, id: NodeId) -> Option<taffy::NodeId> {
        match self.node(id)? {
            NodeData::Element(el) => Some(el.handle),
            NodeData::Text(_) => None,
        }
    }
}

/// Intrinsic size for elements whose children are all text nodes.
///
/// Such elements are leaves in the layout tree (text contributes no
/// handle), so the solver asks for their content size here: column
/// direction stacks line counts, row direction runs widths side by side.
fn measure_leaf(
    slots: &[Option<NodeData>],
    owner: NodeId,
    known: Size<Option<f32>>,
) -> Size<f32> {
    let Some(NodeData::Element(el)) = slots.get(owner.index()).and_then(|slot| slot.as_ref())
    else {
        return Size::ZERO;
    };

    let row = el.style.flex_direction().is_row();
    let mut width: u16 = 0;
    let mut height: u16 = 0;
    let mut any_text = false;

    for &child in &el.children {
        let Some(NodeData::Text(text)) = slots.get(child.index()).and_then(|slot| slot.as_ref())
        else {
            continue;
        };
        any_text = true;
        let w = max_line_width(&text.content);
        let h = line_count(&text.content);
        if row {
            width = width.saturating_add(w);
            height = height.max(h);
        } else {
            width = width.max(w);
            height = height.saturating_add(h);
        }
    }

    if !any_text {
        return Size::ZERO;
    }

    Size {
        width: known.width.unwrap_or(width as f32),
        height: known.height.unwrap_or(height as f32),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dimension;

    fn tree() -> SceneTree {
        SceneTree::new().unwrap()
    }

    #[test]
    fn test_create_nodes() {
        let mut t = tree();
        let el = t.create_element("box").unwrap();
        let text = t.create_text("hello");

        assert_eq!(t.tag(el), Some("box"));
        assert_eq!(t.text_content(text), Some("hello"));
        assert!(!t.is_text(el));
        assert!(t.is_text(text));
        assert_eq!(t.parent(el), None);
        assert_eq!(t.parent(text), None);
    }

    #[test]
    fn test_append_sets_parent_and_order() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_element("box").unwrap();
        let b = t.create_text("b");
        t.append_child(root, a).unwrap();
        t.append_child(root, b).unwrap();

        assert_eq!(t.children(root), &[a, b]);
        assert_eq!(t.parent(a), Some(root));
        assert_eq!(t.parent(b), Some(root));
        assert_eq!(t.first_child(root), Some(a));
        assert_eq!(t.next_sibling(a), Some(b));
        assert_eq!(t.next_sibling(b), None);
    }

    #[test]
    fn test_insert_before() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_text("a");
        let c = t.create_text("c");
        let b = t.create_text("b");
        t.append_child(root, a).unwrap();
        t.append_child(root, c).unwrap();
        t.insert_before(root, b, c).unwrap();

        assert_eq!(t.children(root), &[a, b, c]);
    }

    #[test]
    fn test_insert_before_missing_anchor_errors_and_leaves_tree() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_text("a");
        let b = t.create_text("b");
        let stranger = t.create_text("x");
        t.append_child(root, a).unwrap();

        let err = t.insert_before(root, b, stranger).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
        assert_eq!(t.children(root), &[a]);
        assert_eq!(t.parent(b), None);
    }

    #[test]
    fn test_remove_child() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_element("box").unwrap();
        let b = t.create_text("b");
        t.append_child(root, a).unwrap();
        t.append_child(root, b).unwrap();
        t.remove_child(root, a).unwrap();

        assert_eq!(t.children(root), &[b]);
        assert_eq!(t.parent(a), None);
    }

    #[test]
    fn test_remove_foreign_child_errors() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_element("box").unwrap();
        let b = t.create_text("b");
        t.append_child(root, a).unwrap();

        let err = t.remove_child(a, b).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
        assert_eq!(t.children(root), &[a]);
    }

    #[test]
    fn test_reinsert_moves_node() {
        let mut t = tree();
        let root = t.root();
        let inner = t.create_element("box").unwrap();
        let child = t.create_text("x");
        t.append_child(root, inner).unwrap();
        t.append_child(root, child).unwrap();

        // Moving the child under `inner` detaches it from the root first.
        t.append_child(inner, child).unwrap();
        assert_eq!(t.children(root), &[inner]);
        assert_eq!(t.children(inner), &[child]);
        assert_eq!(t.parent(child), Some(inner));
    }

    #[test]
    fn test_reorder_by_insert_before() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_text("a");
        let b = t.create_text("b");
        let c = t.create_text("c");
        t.append_child(root, a).unwrap();
        t.append_child(root, b).unwrap();
        t.append_child(root, c).unwrap();

        // Move c before a without removing it first, as reconcilers do.
        t.insert_before(root, c, a).unwrap();
        assert_eq!(t.children(root), &[c, a, b]);
    }

    #[test]
    fn test_child_order_matches_list_model() {
        // Replay a mutation sequence against a plain Vec and compare.
        let mut t = tree();
        let root = t.root();
        let mut model: Vec<NodeId> = Vec::new();

        let nodes: Vec<NodeId> = (0..5).map(|i| t.create_text(format!("n{i}"))).collect();

        for &n in &nodes {
            t.append_child(root, n).unwrap();
            model.push(n);
        }

        t.remove_child(root, nodes[2]).unwrap();
        model.retain(|&n| n != nodes[2]);

        t.insert_before(root, nodes[2], nodes[4]).unwrap();
        let pos = model.iter().position(|&n| n == nodes[4]).unwrap();
        model.insert(pos, nodes[2]);

        t.insert_before(root, nodes[0], nodes[1]).unwrap();
        model.retain(|&n| n != nodes[0]);
        let pos = model.iter().position(|&n| n == nodes[1]).unwrap();
        model.insert(pos, nodes[0]);

        t.remove_child(root, nodes[3]).unwrap();
        model.retain(|&n| n != nodes[3]);

        assert_eq!(t.children(root), model.as_slice());
    }

    #[test]
    fn test_cycle_rejected() {
        let mut t = tree();
        let root = t.root();
        let outer = t.create_element("box").unwrap();
        let inner = t.create_element("box").unwrap();
        t.append_child(root, outer).unwrap();
        t.append_child(outer, inner).unwrap();

        let err = t.append_child(inner, outer).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));

        let err = t.append_child(outer, outer).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
    }

    #[test]
    fn test_set_text() {
        let mut t = tree();
        let text = t.create_text("before");
        t.set_text(text, "after").unwrap();
        assert_eq!(t.text_content(text), Some("after"));

        let el = t.create_element("box").unwrap();
        let err = t.set_text(el, "nope").unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
    }

    #[test]
    fn test_text_cannot_hold_children() {
        let mut t = tree();
        let text = t.create_text("leaf");
        let child = t.create_text("child");
        let err = t.append_child(text, child).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
    }

    #[test]
    fn test_style_property_updates_table() {
        let mut t = tree();
        let el = t.create_element("box").unwrap();
        t.set_property(el, "style:width", 40u16).unwrap();
        t.set_property(el, "style:flexDirection", "row").unwrap();

        let style = t.style(el).unwrap();
        assert_eq!(style.dimension(StyleKey::Width), Dimension::Cells(40));
        assert!(style.flex_direction().is_row());
    }

    #[test]
    fn test_malformed_style_value_keeps_previous() {
        let mut t = tree();
        let el = t.create_element("box").unwrap();
        t.set_property(el, "style:width", "50%").unwrap();

        let err = t.set_property(el, "style:width", "what%").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(
            t.style(el).unwrap().dimension(StyleKey::Width),
            Dimension::Percent(50.0)
        );
    }

    #[test]
    fn test_unknown_style_key_ignored() {
        let mut t = tree();
        let el = t.create_element("box").unwrap();
        t.set_property(el, "style:borderRadius", 3u16).unwrap();
        assert!(t.style(el).unwrap().get(StyleKey::Width).is_none());
    }

    #[test]
    fn test_paint_property_stored_verbatim() {
        let mut t = tree();
        let el = t.create_element("text").unwrap();
        t.set_property(el, "color", "red").unwrap();
        t.set_property(el, "bold", true).unwrap();

        assert_eq!(t.property(el, "color"), Some(&PropValue::from("red")));
        assert_eq!(t.property(el, "bold"), Some(&PropValue::Bool(true)));
        assert_eq!(t.property(el, "dim"), None);
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let mut t = tree();
        let rev = t.revision();
        let before = rev.get();
        let text = t.create_text("x");
        let root = t.root();
        t.append_child(root, text).unwrap();
        assert!(rev.get() > before);
    }

    #[test]
    fn test_layout_after_mutations() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_element("box").unwrap();
        t.set_property(a, "style:width", 10u16).unwrap();
        t.set_property(a, "style:height", 4u16).unwrap();
        let b = t.create_element("box").unwrap();
        t.set_property(b, "style:width", 10u16).unwrap();
        t.set_property(b, "style:height", 6u16).unwrap();
        t.append_child(root, a).unwrap();
        t.append_child(root, b).unwrap();

        t.compute_layout(80, 24).unwrap();

        let box_a = t.layout_box(a).unwrap();
        let box_b = t.layout_box(b).unwrap();
        assert_eq!((box_a.y, box_a.height), (0, 4));
        assert_eq!((box_b.y, box_b.height), (4, 6));

        // Text nodes have no box of their own.
        let text = t.create_text("x");
        t.append_child(root, text).unwrap();
        assert_eq!(t.layout_box(text), None);
    }

    #[test]
    fn test_percentage_against_parent() {
        let mut t = tree();
        let root = t.root();
        let parent = t.create_element("box").unwrap();
        t.set_property(parent, "style:width", 100u16).unwrap();
        t.set_property(parent, "style:height", 10u16).unwrap();
        let child = t.create_element("box").unwrap();
        t.set_property(child, "style:width", "50%").unwrap();
        t.set_property(child, "style:height", 1u16).unwrap();
        t.append_child(root, parent).unwrap();
        t.append_child(parent, child).unwrap();

        t.compute_layout(120, 40).unwrap();

        assert_eq!(t.layout_box(child).unwrap().width, 50);
    }

    #[test]
    fn test_text_children_measure_element() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_element("box").unwrap();
        let first = t.create_text("a");
        let second = t.create_text("b");
        t.append_child(root, a).unwrap();
        t.append_child(a, first).unwrap();
        t.append_child(a, second).unwrap();

        t.compute_layout(80, 24).unwrap();

        // Column direction: two texts stack to two rows.
        assert_eq!(t.layout_box(a).unwrap().height, 2);
    }

    #[test]
    fn test_release_handles_is_idempotent() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_element("box").unwrap();
        t.append_child(root, a).unwrap();
        t.remove_child(root, a).unwrap();

        t.release_handles();
        t.release_handles();
    }
}
