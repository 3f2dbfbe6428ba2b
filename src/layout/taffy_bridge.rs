//! Layout engine adapter over Taffy.
//!
//! The scene graph never talks to the flexbox solver directly; this bridge
//! owns the retained [`TaffyTree`], mirrors the scene graph's element
//! hierarchy into it, converts the style table into `taffy::Style`, and
//! exposes solved boxes in integer terminal cells. Any flexbox-capable
//! engine with create/insert/remove/compute/readback could sit behind this
//! interface.

use taffy::{
    AlignItems as TaffyAlignItems, AlignSelf as TaffyAlignSelf, AvailableSpace,
    Dimension as TaffyDimension, Display as TaffyDisplay, FlexDirection as TaffyFlexDirection,
    FlexWrap as TaffyFlexWrap, JustifyContent as TaffyJustifyContent, LengthPercentage,
    LengthPercentageAuto, NodeId as TaffyNodeId, Rect, Size, Style, TaffyTree,
};

use crate::engine::NodeId;
use crate::error::{Error, Result};
use crate::types::{
    AlignItems, AlignSelf, Dimension, Display, FlexDirection, FlexWrap, JustifyContent,
};

use super::style::{StyleKey, StyleTable};

// =============================================================================
// COMPUTED BOX
// =============================================================================

/// A solved layout box in terminal cells, relative to the parent element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputedBox {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

// =============================================================================
// CONVERSIONS
// =============================================================================

fn to_taffy_dimension(dim: Dimension) -> TaffyDimension {
    match dim {
        Dimension::Auto => TaffyDimension::Auto,
        Dimension::Cells(n) => TaffyDimension::Length(n as f32),
        Dimension::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

fn to_taffy_flex_direction(dir: FlexDirection) -> TaffyFlexDirection {
    match dir {
        FlexDirection::Row => TaffyFlexDirection::Row,
        FlexDirection::Column => TaffyFlexDirection::Column,
        FlexDirection::RowReverse => TaffyFlexDirection::RowReverse,
        FlexDirection::ColumnReverse => TaffyFlexDirection::ColumnReverse,
    }
}

fn to_taffy_flex_wrap(wrap: FlexWrap) -> TaffyFlexWrap {
    match wrap {
        FlexWrap::NoWrap => TaffyFlexWrap::NoWrap,
        FlexWrap::Wrap => TaffyFlexWrap::Wrap,
        FlexWrap::WrapReverse => TaffyFlexWrap::WrapReverse,
    }
}

fn to_taffy_justify_content(justify: JustifyContent) -> Option<TaffyJustifyContent> {
    Some(match justify {
        JustifyContent::FlexStart => TaffyJustifyContent::FlexStart,
        JustifyContent::Center => TaffyJustifyContent::Center,
        JustifyContent::FlexEnd => TaffyJustifyContent::FlexEnd,
        JustifyContent::SpaceBetween => TaffyJustifyContent::SpaceBetween,
        JustifyContent::SpaceAround => TaffyJustifyContent::SpaceAround,
        JustifyContent::SpaceEvenly => TaffyJustifyContent::SpaceEvenly,
    })
}

fn to_taffy_align_items(align: AlignItems) -> Option<TaffyAlignItems> {
    Some(match align {
        AlignItems::Stretch => TaffyAlignItems::Stretch,
        AlignItems::FlexStart => TaffyAlignItems::FlexStart,
        AlignItems::Center => TaffyAlignItems::Center,
        AlignItems::FlexEnd => TaffyAlignItems::FlexEnd,
        AlignItems::Baseline => TaffyAlignItems::Baseline,
    })
}

fn to_taffy_align_self(align: AlignSelf) -> Option<TaffyAlignSelf> {
    match align {
        AlignSelf::Auto => None,
        AlignSelf::Stretch => Some(TaffyAlignSelf::Stretch),
        AlignSelf::FlexStart => Some(TaffyAlignSelf::FlexStart),
        AlignSelf::Center => Some(TaffyAlignSelf::Center),
        AlignSelf::FlexEnd => Some(TaffyAlignSelf::FlexEnd),
        AlignSelf::Baseline => Some(TaffyAlignSelf::Baseline),
    }
}

/// Build a `taffy::Style` from an element's style table.
///
/// `forced_size` overrides the table's width/height; the session uses it to
/// pin the root to the terminal viewport before each compute pass.
fn build_style(table: &StyleTable, forced_size: Option<(u16, u16)>) -> Style {
    let size = match forced_size {
        Some((w, h)) => Size {
            width: TaffyDimension::Length(w as f32),
            height: TaffyDimension::Length(h as f32),
        },
        None => Size {
            width: to_taffy_dimension(table.dimension(StyleKey::Width)),
            height: to_taffy_dimension(table.dimension(StyleKey::Height)),
        },
    };

    let gap = LengthPercentage::Length(table.edge(StyleKey::Gap, StyleKey::Gap));

    Style {
        display: match table.display() {
            Display::Flex => TaffyDisplay::Flex,
            Display::None => TaffyDisplay::None,
        },

        flex_direction: to_taffy_flex_direction(table.flex_direction()),
        flex_wrap: to_taffy_flex_wrap(table.flex_wrap()),
        justify_content: to_taffy_justify_content(table.justify_content()),
        align_items: to_taffy_align_items(table.align_items()),

        flex_grow: table.number(StyleKey::FlexGrow, 0.0),
        flex_shrink: table.number(StyleKey::FlexShrink, 1.0),
        flex_basis: to_taffy_dimension(table.dimension(StyleKey::FlexBasis)),
        align_self: to_taffy_align_self(table.align_self()),

        size,
        min_size: Size {
            width: to_taffy_dimension(table.dimension(StyleKey::MinWidth)),
            height: to_taffy_dimension(table.dimension(StyleKey::MinHeight)),
        },
        max_size: Size {
            width: to_taffy_dimension(table.dimension(StyleKey::MaxWidth)),
            height: to_taffy_dimension(table.dimension(StyleKey::MaxHeight)),
        },

        margin: Rect {
            left: LengthPercentageAuto::Length(table.edge(StyleKey::MarginLeft, StyleKey::Margin)),
            right: LengthPercentageAuto::Length(table.edge(StyleKey::MarginRight, StyleKey::Margin)),
            top: LengthPercentageAuto::Length(table.edge(StyleKey::MarginTop, StyleKey::Margin)),
            bottom: LengthPercentageAuto::Length(table.edge(StyleKey::MarginBottom, StyleKey::Margin)),
        },
        padding: Rect {
            left: LengthPercentage::Length(table.edge(StyleKey::PaddingLeft, StyleKey::Padding)),
            right: LengthPercentage::Length(table.edge(StyleKey::PaddingRight, StyleKey::Padding)),
            top: LengthPercentage::Length(table.edge(StyleKey::PaddingTop, StyleKey::Padding)),
            bottom: LengthPercentage::Length(table.edge(StyleKey::PaddingBottom, StyleKey::Padding)),
        },
        gap: Size {
            width: gap,
            height: gap,
        },

        ..Default::default()
    }
}

fn default_style() -> Style {
    build_style(&StyleTable::new(), None)
}

// =============================================================================
// LAYOUT ENGINE
// =============================================================================

/// Owns the retained Taffy tree mirroring the scene graph's elements.
///
/// Each element node in the scene graph holds exactly one handle in this
/// tree, created with the element and released once at session teardown.
pub struct LayoutEngine {
    tree: TaffyTree<NodeId>,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
        }
    }

    /// Allocate a layout node for a new element.
    ///
    /// The owning scene-graph id is stored as the node context so the
    /// measure pass can find the element's text payload.
    pub fn create_node(&mut self, owner: NodeId) -> Result<TaffyNodeId> {
        self.tree
            .new_leaf_with_context(default_style(), owner)
            .map_err(Error::layout)
    }

    /// Re-apply an element's style table after a style write.
    pub fn apply_style(
        &mut self,
        handle: TaffyNodeId,
        table: &StyleTable,
        forced_size: Option<(u16, u16)>,
    ) -> Result<()> {
        self.tree
            .set_style(handle, build_style(table, forced_size))
            .map_err(Error::layout)
    }

    pub fn append_child(&mut self, parent: TaffyNodeId, child: TaffyNodeId) -> Result<()> {
        self.tree.add_child(parent, child).map_err(Error::layout)
    }

    pub fn insert_child_at(
        &mut self,
        parent: TaffyNodeId,
        index: usize,
        child: TaffyNodeId,
    ) -> Result<()> {
        self.tree
            .insert_child_at_index(parent, index, child)
            .map_err(Error::layout)
    }

    pub fn remove_child(&mut self, parent: TaffyNodeId, child: TaffyNodeId) -> Result<()> {
        self.tree
            .remove_child(parent, child)
            .map(|_| ())
            .map_err(Error::layout)
    }

    /// Release a layout node. Used only by session teardown.
    pub fn release(&mut self, handle: TaffyNodeId) {
        let _ = self.tree.remove(handle);
    }

    /// Run the solver over the subtree rooted at `root`.
    ///
    /// `measure` supplies intrinsic sizes for leaf elements (elements whose
    /// children are all text nodes); it receives the owning scene-graph id.
    pub fn compute(
        &mut self,
        root: TaffyNodeId,
        cols: u16,
        rows: u16,
        mut measure: impl FnMut(NodeId, Size<Option<f32>>, Size<AvailableSpace>) -> Size<f32>,
    ) -> Result<()> {
        let available = Size {
            width: AvailableSpace::Definite(cols as f32),
            height: AvailableSpace::Definite(rows as f32),
        };

        self.tree
            .compute_layout_with_measure(
                root,
                available,
                |known_dimensions, available_space, _node_id, context, _style| match context {
                    Some(&mut owner) => measure(owner, known_dimensions, available_space),
                    None => Size::ZERO,
                },
            )
            .map_err(Error::layout)
    }

    /// Read back the solved box for a handle, rounded to whole cells.
    pub fn box_of(&self, handle: TaffyNodeId) -> ComputedBox {
        match self.tree.layout(handle) {
            Ok(layout) => ComputedBox {
                x: layout.location.x.round().max(0.0) as u16,
                y: layout.location.y.round().max(0.0) as u16,
                width: layout.size.width.round().max(0.0) as u16,
                height: layout.size.height.round().max(0.0) as u16,
            },
            Err(_) => ComputedBox::default(),
        }
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
