//! Frame composition: positioned tree -> full-frame string.
//!
//! After a layout pass, the walk visits elements depth-first in child
//! order, accumulating each ancestor's offset to get absolute cell
//! coordinates, and emits every text run as a cursor-positioning sequence
//! plus the decorated text. The result is one string, the candidate
//! frame, which the diff writer compares against the previous frame.
//!
//! Decoration lookup is pull-based: property bags are read here, at paint
//! time, never cached. For each property the nearest enclosing element
//! wins; non-overlapping properties from different ancestors merge (an
//! outer `bold` and an inner `color` both apply).
//!
//! Any error mid-walk abandons the whole frame: partial frames must never
//! reach the terminal.

use std::rc::Rc;

use crate::engine::node::NodeData;
use crate::engine::{NodeId, SceneTree};
use crate::error::{Error, Result};
use crate::layout::text_measure::{line_count, max_line_width};
use crate::layout::StyleKey;
use crate::types::{Display, PropValue, TextAttr, TextColor};

use super::ansi;

/// Compose the frame for the whole tree. Requires a completed layout pass.
pub fn compose(tree: &SceneTree) -> Result<String> {
    let mut walker = Walker {
        tree,
        out: String::new(),
    };
    let mut stack = Vec::new();
    walker.walk(tree.root(), 0, 0, &mut stack)?;
    Ok(walker.out)
}

struct Walker<'a> {
    tree: &'a SceneTree,
    out: String,
}

impl Walker<'_> {
    fn walk(
        &mut self,
        id: NodeId,
        origin_x: u16,
        origin_y: u16,
        stack: &mut Vec<NodeId>,
    ) -> Result<()> {
        let tree = self.tree;
        let el = tree.element(id)?;
        if el.style.display() == Display::None {
            return Ok(());
        }

        stack.push(id);

        let pad_left = el.style.edge(StyleKey::PaddingLeft, StyleKey::Padding).max(0.0) as u16;
        let pad_top = el.style.edge(StyleKey::PaddingTop, StyleKey::Padding).max(0.0) as u16;
        let row_axis = el.style.flex_direction().is_row();

        // Text children own no layout box; successive runs flow along the
        // element's main axis from its content origin.
        let mut flow_x: u16 = 0;
        let mut flow_y: u16 = 0;

        for &child in &el.children {
            match tree.node(child) {
                Some(NodeData::Element(_)) => {
                    let b = tree.layout_box(child).unwrap_or_default();
                    self.walk(
                        child,
                        origin_x.saturating_add(b.x),
                        origin_y.saturating_add(b.y),
                        stack,
                    )?;
                }
                Some(NodeData::Text(text)) => {
                    if text.content.is_empty() {
                        continue;
                    }
                    let decor = resolve_decorations(tree, stack)?;
                    let content = match &decor.transform {
                        Some(f) => f(&text.content),
                        None => text.content.clone(),
                    };
                    let prefix = ansi::style_prefix(decor.color, decor.attrs());

                    let base_x = origin_x.saturating_add(pad_left).saturating_add(flow_x);
                    let base_y = origin_y.saturating_add(pad_top).saturating_add(flow_y);
                    for (i, line) in content.split('\n').enumerate() {
                        if line.is_empty() {
                            continue;
                        }
                        ansi::cursor_to(&mut self.out, base_x, base_y.saturating_add(i as u16));
                        match &prefix {
                            Some(p) => {
                                self.out.push_str(p);
                                self.out.push_str(line);
                                self.out.push_str(ansi::RESET);
                            }
                            None => self.out.push_str(line),
                        }
                    }

                    if row_axis {
                        flow_x = flow_x.saturating_add(max_line_width(&content));
                    } else {
                        flow_y = flow_y.saturating_add(line_count(&content));
                    }
                }
                None => {
                    stack.pop();
                    return Err(Error::paint("tree references a destroyed node"));
                }
            }
        }

        stack.pop();
        Ok(())
    }
}

// =============================================================================
// DECORATION RESOLUTION
// =============================================================================

#[derive(Default)]
struct Decor {
    color: Option<TextColor>,
    bold: Option<bool>,
    dim: Option<bool>,
    italic: Option<bool>,
    underline: Option<bool>,
    strikethrough: Option<bool>,
    transform: Option<Rc<dyn Fn(&str) -> String>>,
}

impl Decor {
    fn attrs(&self) -> TextAttr {
        let mut attrs = TextAttr::empty();
        if self.bold == Some(true) {
            attrs |= TextAttr::BOLD;
        }
        if self.dim == Some(true) {
            attrs |= TextAttr::DIM;
        }
        if self.italic == Some(true) {
            attrs |= TextAttr::ITALIC;
        }
        if self.underline == Some(true) {
            attrs |= TextAttr::UNDERLINE;
        }
        if self.strikethrough == Some(true) {
            attrs |= TextAttr::STRIKETHROUGH;
        }
        attrs
    }
}

fn fill_flag(slot: &mut Option<bool>, value: Option<&PropValue>) {
    if slot.is_none() {
        if let Some(PropValue::Bool(b)) = value {
            *slot = Some(*b);
        }
    }
}

/// Resolve paint-time decorations for a text run.
///
/// `stack` holds the enclosing elements outermost-first; walking it in
/// reverse makes the nearest ancestor's value win per property.
fn resolve_decorations(tree: &SceneTree, stack: &[NodeId]) -> Result<Decor> {
    let mut decor = Decor::default();
    for &id in stack.iter().rev() {
        let Ok(el) = tree.element(id) else { continue };

        if decor.color.is_none() {
            if let Some(PropValue::Str(s)) = el.props.get("color") {
                if s.starts_with('#') {
                    let parsed = TextColor::from_hex(s)
                        .ok_or_else(|| Error::paint(format!("invalid hex color `{s}`")))?;
                    decor.color = Some(parsed);
                } else {
                    // Unknown color names decorate nothing, matching the
                    // view layer's lenient named-color lookup.
                    decor.color = TextColor::from_name(s);
                }
            }
        }
        fill_flag(&mut decor.bold, el.props.get("bold"));
        fill_flag(&mut decor.dim, el.props.get("dim"));
        fill_flag(&mut decor.italic, el.props.get("italic"));
        fill_flag(&mut decor.underline, el.props.get("underline"));
        fill_flag(&mut decor.strikethrough, el.props.get("strikethrough"));
        if decor.transform.is_none() {
            if let Some(PropValue::Transform(f)) = el.props.get("transform") {
                decor.transform = Some(f.clone());
            }
        }
    }
    Ok(decor)
}

// =============================================================================
// TESTS
// =============================================================================
