//! Core types for ember-tui.
//!
//! These types define the vocabulary shared by the scene graph, the layout
//! adapter and the paint pipeline: dimensions and flex enums for the style
//! table, text attributes and colors for paint-time decoration, and the
//! untyped values that live in an element's property bag.

use std::fmt;
use std::rc::Rc;

// =============================================================================
// DIMENSION
// =============================================================================

/// A size constraint in terminal cells, a percentage of the parent, or auto.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Let the layout engine decide.
    #[default]
    Auto,
    /// Absolute size in terminal cells.
    Cells(u16),
    /// Percentage of the parent's size (0-100).
    Percent(f32),
}

impl From<u16> for Dimension {
    fn from(cells: u16) -> Self {
        Dimension::Cells(cells)
    }
}

// =============================================================================
// FLEX ENUMS
// =============================================================================

/// Main-axis direction of a flex container.
///
/// Defaults to `Column`, matching how terminal UIs stack content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
    RowReverse,
    ColumnReverse,
}

impl FlexDirection {
    /// Parse a CSS-style keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "row" => Some(Self::Row),
            "column" => Some(Self::Column),
            "row-reverse" => Some(Self::RowReverse),
            "column-reverse" => Some(Self::ColumnReverse),
            _ => None,
        }
    }

    /// True when the main axis runs horizontally.
    pub fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }
}

/// Main-axis distribution of a flex container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl JustifyContent {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "flex-start" => Some(Self::FlexStart),
            "center" => Some(Self::Center),
            "flex-end" => Some(Self::FlexEnd),
            "space-between" => Some(Self::SpaceBetween),
            "space-around" => Some(Self::SpaceAround),
            "space-evenly" => Some(Self::SpaceEvenly),
            _ => None,
        }
    }
}

/// Cross-axis alignment of a flex container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
    Center,
    FlexEnd,
    Baseline,
}

impl AlignItems {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "stretch" => Some(Self::Stretch),
            "flex-start" => Some(Self::FlexStart),
            "center" => Some(Self::Center),
            "flex-end" => Some(Self::FlexEnd),
            "baseline" => Some(Self::Baseline),
            _ => None,
        }
    }
}

/// Per-item override of the parent's cross-axis alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignSelf {
    /// Inherit from the parent's `align-items`.
    #[default]
    Auto,
    Stretch,
    FlexStart,
    Center,
    FlexEnd,
    Baseline,
}

impl AlignSelf {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "stretch" => Some(Self::Stretch),
            "flex-start" => Some(Self::FlexStart),
            "center" => Some(Self::Center),
            "flex-end" => Some(Self::FlexEnd),
            "baseline" => Some(Self::Baseline),
            _ => None,
        }
    }
}

/// Wrapping behavior of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

impl FlexWrap {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "nowrap" | "no-wrap" => Some(Self::NoWrap),
            "wrap" => Some(Self::Wrap),
            "wrap-reverse" => Some(Self::WrapReverse),
            _ => None,
        }
    }
}

/// Whether a node participates in layout and paint at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Flex,
    None,
}

impl Display {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "flex" => Some(Self::Flex),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

// =============================================================================
// TEXT DECORATION
// =============================================================================

bitflags::bitflags! {
    /// SGR text attributes applied to a painted text run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextAttr: u8 {
        const BOLD          = 1 << 0;
        const DIM           = 1 << 1;
        const ITALIC        = 1 << 2;
        const UNDERLINE     = 1 << 3;
        const STRIKETHROUGH = 1 << 4;
    }
}

/// A foreground color: one of the 16 standard terminal colors or truecolor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Rgb(u8, u8, u8),
}

impl TextColor {
    /// Look up a named color. Returns `None` for names we don't know,
    /// which the paint pipeline treats as "no color set".
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "black" => Some(Self::Black),
            "red" => Some(Self::Red),
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "blue" => Some(Self::Blue),
            "magenta" => Some(Self::Magenta),
            "cyan" => Some(Self::Cyan),
            "white" => Some(Self::White),
            "gray" | "grey" => Some(Self::Gray),
            "redBright" | "bright-red" => Some(Self::BrightRed),
            "greenBright" | "bright-green" => Some(Self::BrightGreen),
            "yellowBright" | "bright-yellow" => Some(Self::BrightYellow),
            "blueBright" | "bright-blue" => Some(Self::BrightBlue),
            "magentaBright" | "bright-magenta" => Some(Self::BrightMagenta),
            "cyanBright" | "bright-cyan" => Some(Self::BrightCyan),
            "whiteBright" | "bright-white" => Some(Self::BrightWhite),
            _ => None,
        }
    }

    /// Parse a `#rrggbb` hex color. Returns `None` when malformed.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self::Rgb(r, g, b))
    }
}

// =============================================================================
// PROPERTY BAG VALUES
// =============================================================================

/// A value stored in an element's property bag.
///
/// The bag is untyped by design: the scene graph stores whatever the
/// reconciler writes, and the paint pipeline pulls and interprets values
/// when it needs them. Closures are first-class so a widget can register a
/// text-decoration transform.
#[derive(Clone)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Str(String),
    /// A text transform applied to each text run under the element.
    Transform(Rc<dyn Fn(&str) -> String>),
}

impl PropValue {
    /// Wrap a text-transform closure.
    pub fn transform(f: impl Fn(&str) -> String + 'static) -> Self {
        PropValue::Transform(Rc::new(f))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "Bool({b})"),
            PropValue::Number(n) => write!(f, "Number({n})"),
            PropValue::Str(s) => write!(f, "Str({s:?})"),
            PropValue::Transform(_) => write!(f, "Transform(..)"),
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Transform(a), PropValue::Transform(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<u16> for PropValue {
    fn from(value: u16) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flex_direction_keywords() {
        assert_eq!(FlexDirection::from_keyword("row"), Some(FlexDirection::Row));
        assert_eq!(FlexDirection::from_keyword("column"), Some(FlexDirection::Column));
        assert_eq!(
            FlexDirection::from_keyword("row-reverse"),
            Some(FlexDirection::RowReverse)
        );
        assert_eq!(FlexDirection::from_keyword("diagonal"), None);
    }

    #[test]
    fn test_color_names() {
        assert_eq!(TextColor::from_name("red"), Some(TextColor::Red));
        assert_eq!(TextColor::from_name("gray"), Some(TextColor::Gray));
        assert_eq!(TextColor::from_name("grey"), Some(TextColor::Gray));
        assert_eq!(TextColor::from_name("redBright"), Some(TextColor::BrightRed));
        assert_eq!(TextColor::from_name("mauve"), None);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(TextColor::from_hex("#ff8000"), Some(TextColor::Rgb(255, 128, 0)));
        assert_eq!(TextColor::from_hex("#FFFFFF"), Some(TextColor::Rgb(255, 255, 255)));
        assert_eq!(TextColor::from_hex("#fff"), None);
        assert_eq!(TextColor::from_hex("#zzzzzz"), None);
        assert_eq!(TextColor::from_hex("ff8000"), None);
    }

    #[test]
    fn test_prop_value_equality() {
        assert_eq!(PropValue::from(true), PropValue::Bool(true));
        assert_eq!(PropValue::from("red"), PropValue::Str("red".to_string()));
        assert_ne!(PropValue::from(1.0), PropValue::from(2.0));

        let t = PropValue::transform(|s| s.to_uppercase());
        assert_eq!(t, t.clone());
        assert_ne!(t, PropValue::transform(|s| s.to_string()));
    }
}
