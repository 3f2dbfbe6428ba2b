//! The closed style table.
//!
//! Style writes arrive as `style:`-prefixed property keys with untyped
//! values. This module gives them a closed vocabulary: every recognized key
//! is a [`StyleKey`] variant, every stored value a typed [`StyleValue`].
//! Unknown keys are ignored for forward compatibility; recognized keys with
//! malformed values are rejected with [`Error::Configuration`] and leave
//! the previous value in place.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::{
    AlignItems, AlignSelf, Dimension, Display, FlexDirection, FlexWrap, JustifyContent, PropValue,
};

// =============================================================================
// STYLE KEYS
// =============================================================================

/// Every style property the layout adapter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    FlexBasis,
    Padding,
    PaddingLeft,
    PaddingRight,
    PaddingTop,
    PaddingBottom,
    Margin,
    MarginLeft,
    MarginRight,
    MarginTop,
    MarginBottom,
    Gap,
    FlexGrow,
    FlexShrink,
    FlexDirection,
    FlexWrap,
    JustifyContent,
    AlignItems,
    AlignSelf,
    Display,
}

impl FromStr for StyleKey {
    type Err = ();

    /// Keys use the camelCase spelling the view layer writes.
    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "width" => Ok(Self::Width),
            "height" => Ok(Self::Height),
            "minWidth" => Ok(Self::MinWidth),
            "minHeight" => Ok(Self::MinHeight),
            "maxWidth" => Ok(Self::MaxWidth),
            "maxHeight" => Ok(Self::MaxHeight),
            "flexBasis" => Ok(Self::FlexBasis),
            "padding" => Ok(Self::Padding),
            "paddingLeft" => Ok(Self::PaddingLeft),
            "paddingRight" => Ok(Self::PaddingRight),
            "paddingTop" => Ok(Self::PaddingTop),
            "paddingBottom" => Ok(Self::PaddingBottom),
            "margin" => Ok(Self::Margin),
            "marginLeft" => Ok(Self::MarginLeft),
            "marginRight" => Ok(Self::MarginRight),
            "marginTop" => Ok(Self::MarginTop),
            "marginBottom" => Ok(Self::MarginBottom),
            "gap" => Ok(Self::Gap),
            "flexGrow" => Ok(Self::FlexGrow),
            "flexShrink" => Ok(Self::FlexShrink),
            "flexDirection" => Ok(Self::FlexDirection),
            "flexWrap" => Ok(Self::FlexWrap),
            "justifyContent" => Ok(Self::JustifyContent),
            "alignItems" => Ok(Self::AlignItems),
            "alignSelf" => Ok(Self::AlignSelf),
            "display" => Ok(Self::Display),
            _ => Err(()),
        }
    }
}

// =============================================================================
// STYLE VALUES
// =============================================================================

/// A parsed style value, typed per key class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleValue {
    /// Sizes and flex-basis: cells, percent or auto.
    Dim(Dimension),
    /// Edge lengths (padding/margin/gap) in cells.
    Len(f32),
    /// Unit-less numbers (flex-grow/shrink).
    Num(f32),
    Direction(FlexDirection),
    Wrap(FlexWrap),
    Justify(JustifyContent),
    AlignItems(AlignItems),
    AlignSelf(AlignSelf),
    Display(Display),
}

/// Parse a percentage string of the form `"42%"` / `"12.5%"`.
///
/// The `%` suffix has already been spotted by the caller; everything before
/// it must be a plain number or the value is malformed.
fn parse_percent(key: &str, s: &str) -> Result<f32> {
    let number = s
        .strip_suffix('%')
        .ok_or_else(|| Error::configuration(key, format!("`{s}` is not a percentage")))?;
    number
        .trim()
        .parse::<f32>()
        .map_err(|_| Error::configuration(key, format!("`{s}` is not a valid percentage")))
}

/// Parse a dimension value: number, `"auto"`, or `"N%"`.
fn parse_dimension(key: &str, value: &PropValue) -> Result<Dimension> {
    match value {
        PropValue::Number(n) if *n >= 0.0 => Ok(Dimension::Cells(*n as u16)),
        PropValue::Number(n) => Err(Error::configuration(key, format!("negative size {n}"))),
        PropValue::Str(s) if s == "auto" => Ok(Dimension::Auto),
        PropValue::Str(s) if s.ends_with('%') => Ok(Dimension::Percent(parse_percent(key, s)?)),
        other => Err(Error::configuration(key, format!("expected number, `auto` or `N%`, got {other:?}"))),
    }
}

fn parse_length(key: &str, value: &PropValue) -> Result<f32> {
    value
        .as_number()
        .map(|n| n as f32)
        .ok_or_else(|| Error::configuration(key, format!("expected a number, got {value:?}")))
}

fn parse_number(key: &str, value: &PropValue) -> Result<f32> {
    value
        .as_number()
        .map(|n| n as f32)
        .ok_or_else(|| Error::configuration(key, format!("expected a number, got {value:?}")))
}

fn parse_keyword<T>(key: &str, value: &PropValue, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    let s = value
        .as_str()
        .ok_or_else(|| Error::configuration(key, format!("expected a keyword, got {value:?}")))?;
    parse(s).ok_or_else(|| Error::configuration(key, format!("unknown keyword `{s}`")))
}

/// Parse a raw property-bag value into the typed value for `key`.
pub fn parse_style_value(key: StyleKey, raw: &PropValue) -> Result<StyleValue> {
    use StyleKey as K;
    let name = style_key_name(key);
    Ok(match key {
        K::Width | K::Height | K::MinWidth | K::MinHeight | K::MaxWidth | K::MaxHeight
        | K::FlexBasis => StyleValue::Dim(parse_dimension(name, raw)?),
        K::Padding | K::PaddingLeft | K::PaddingRight | K::PaddingTop | K::PaddingBottom
        | K::Margin | K::MarginLeft | K::MarginRight | K::MarginTop | K::MarginBottom | K::Gap => {
            StyleValue::Len(parse_length(name, raw)?)
        }
        K::FlexGrow | K::FlexShrink => StyleValue::Num(parse_number(name, raw)?),
        K::FlexDirection => StyleValue::Direction(parse_keyword(name, raw, FlexDirection::from_keyword)?),
        K::FlexWrap => StyleValue::Wrap(parse_keyword(name, raw, FlexWrap::from_keyword)?),
        K::JustifyContent => StyleValue::Justify(parse_keyword(name, raw, JustifyContent::from_keyword)?),
        K::AlignItems => StyleValue::AlignItems(parse_keyword(name, raw, AlignItems::from_keyword)?),
        K::AlignSelf => StyleValue::AlignSelf(parse_keyword(name, raw, AlignSelf::from_keyword)?),
        K::Display => StyleValue::Display(parse_keyword(name, raw, Display::from_keyword)?),
    })
}

fn style_key_name(key: StyleKey) -> &'static str {
    use StyleKey as K;
    match key {
        K::Width => "width",
        K::Height => "height",
        K::MinWidth => "minWidth",
        K::MinHeight => "minHeight",
        K::MaxWidth => "maxWidth",
        K::MaxHeight => "maxHeight",
        K::FlexBasis => "flexBasis",
        K::Padding => "padding",
        K::PaddingLeft => "paddingLeft",
        K::PaddingRight => "paddingRight",
        K::PaddingTop => "paddingTop",
        K::PaddingBottom => "paddingBottom",
        K::Margin => "margin",
        K::MarginLeft => "marginLeft",
        K::MarginRight => "marginRight",
        K::MarginTop => "marginTop",
        K::MarginBottom => "marginBottom",
        K::Gap => "gap",
        K::FlexGrow => "flexGrow",
        K::FlexShrink => "flexShrink",
        K::FlexDirection => "flexDirection",
        K::FlexWrap => "flexWrap",
        K::JustifyContent => "justifyContent",
        K::AlignItems => "alignItems",
        K::AlignSelf => "alignSelf",
        K::Display => "display",
    }
}

// =============================================================================
// STYLE TABLE
// =============================================================================

/// The per-element table of set style properties.
///
/// Only explicitly written keys are present; getters fall back to the
/// flexbox defaults the paint and measure paths rely on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleTable {
    entries: HashMap<StyleKey, StyleValue>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: StyleKey, value: StyleValue) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: StyleKey) -> Option<&StyleValue> {
        self.entries.get(&key)
    }

    /// Dimension-class value, `Auto` when unset.
    pub fn dimension(&self, key: StyleKey) -> Dimension {
        match self.entries.get(&key) {
            Some(StyleValue::Dim(d)) => *d,
            _ => Dimension::Auto,
        }
    }

    /// Edge length with per-edge override of the aggregate key.
    pub fn edge(&self, edge_key: StyleKey, aggregate_key: StyleKey) -> f32 {
        match self.entries.get(&edge_key).or_else(|| self.entries.get(&aggregate_key)) {
            Some(StyleValue::Len(v)) => *v,
            _ => 0.0,
        }
    }

    pub fn number(&self, key: StyleKey, default: f32) -> f32 {
        match self.entries.get(&key) {
            Some(StyleValue::Num(v)) => *v,
            _ => default,
        }
    }

    pub fn flex_direction(&self) -> FlexDirection {
        match self.entries.get(&StyleKey::FlexDirection) {
            Some(StyleValue::Direction(d)) => *d,
            _ => FlexDirection::default(),
        }
    }

    pub fn flex_wrap(&self) -> FlexWrap {
        match self.entries.get(&StyleKey::FlexWrap) {
            Some(StyleValue::Wrap(w)) => *w,
            _ => FlexWrap::default(),
        }
    }

    pub fn justify_content(&self) -> JustifyContent {
        match self.entries.get(&StyleKey::JustifyContent) {
            Some(StyleValue::Justify(j)) => *j,
            _ => JustifyContent::default(),
        }
    }

    pub fn align_items(&self) -> AlignItems {
        match self.entries.get(&StyleKey::AlignItems) {
            Some(StyleValue::AlignItems(a)) => *a,
            _ => AlignItems::default(),
        }
    }

    pub fn align_self(&self) -> AlignSelf {
        match self.entries.get(&StyleKey::AlignSelf) {
            Some(StyleValue::AlignSelf(a)) => *a,
            _ => AlignSelf::default(),
        }
    }

    pub fn display(&self) -> Display {
        match self.entries.get(&StyleKey::Display) {
            Some(StyleValue::Display(d)) => *d,
            _ => Display::default(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        assert_eq!("width".parse::<StyleKey>(), Ok(StyleKey::Width));
        assert_eq!("flexDirection".parse::<StyleKey>(), Ok(StyleKey::FlexDirection));
        assert_eq!("paddingLeft".parse::<StyleKey>(), Ok(StyleKey::PaddingLeft));
        assert!("borderRadius".parse::<StyleKey>().is_err());
    }

    #[test]
    fn test_dimension_values() {
        let v = parse_style_value(StyleKey::Width, &PropValue::from(40u16)).unwrap();
        assert_eq!(v, StyleValue::Dim(Dimension::Cells(40)));

        let v = parse_style_value(StyleKey::Width, &PropValue::from("auto")).unwrap();
        assert_eq!(v, StyleValue::Dim(Dimension::Auto));

        let v = parse_style_value(StyleKey::Width, &PropValue::from("50%")).unwrap();
        assert_eq!(v, StyleValue::Dim(Dimension::Percent(50.0)));

        let v = parse_style_value(StyleKey::Height, &PropValue::from("12.5%")).unwrap();
        assert_eq!(v, StyleValue::Dim(Dimension::Percent(12.5)));
    }

    #[test]
    fn test_malformed_percentage_rejected() {
        let err = parse_style_value(StyleKey::Width, &PropValue::from("what%")).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = parse_style_value(StyleKey::Width, &PropValue::from("12px")).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_keyword_values() {
        let v = parse_style_value(StyleKey::FlexDirection, &PropValue::from("row")).unwrap();
        assert_eq!(v, StyleValue::Direction(FlexDirection::Row));

        let v = parse_style_value(StyleKey::JustifyContent, &PropValue::from("space-between")).unwrap();
        assert_eq!(v, StyleValue::Justify(JustifyContent::SpaceBetween));

        let err = parse_style_value(StyleKey::FlexDirection, &PropValue::from("sideways")).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = parse_style_value(StyleKey::Display, &PropValue::from(1.0)).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_edge_fallback() {
        let mut table = StyleTable::new();
        table.set(StyleKey::Padding, StyleValue::Len(2.0));
        table.set(StyleKey::PaddingLeft, StyleValue::Len(4.0));

        assert_eq!(table.edge(StyleKey::PaddingLeft, StyleKey::Padding), 4.0);
        assert_eq!(table.edge(StyleKey::PaddingTop, StyleKey::Padding), 2.0);
        assert_eq!(table.edge(StyleKey::MarginTop, StyleKey::Margin), 0.0);
    }

    #[test]
    fn test_defaults() {
        let table = StyleTable::new();
        assert_eq!(table.flex_direction(), FlexDirection::Column);
        assert_eq!(table.display(), Display::Flex);
        assert_eq!(table.dimension(StyleKey::Width), Dimension::Auto);
        assert_eq!(table.number(StyleKey::FlexShrink, 1.0), 1.0);
    }
}
