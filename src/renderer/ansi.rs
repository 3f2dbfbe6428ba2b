//! ANSI escape sequences used by the paint pipeline.
//!
//! The frame is a plain string of cursor-positioning sequences and SGR
//! runs; these helpers are the only place escape bytes are spelled out.

use std::fmt::Write;

use crate::types::{TextAttr, TextColor};

pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const CURSOR_HOME: &str = "\x1b[H";
pub const RESET: &str = "\x1b[0m";

/// Append a cursor-positioning sequence for 0-based cell coordinates.
pub fn cursor_to(out: &mut String, x: u16, y: u16) {
    // CSI row;col H is 1-based.
    let _ = write!(out, "\x1b[{};{}H", y as u32 + 1, x as u32 + 1);
}

/// SGR parameter string for a foreground color.
fn color_params(color: TextColor) -> String {
    match color {
        TextColor::Black => "30".into(),
        TextColor::Red => "31".into(),
        TextColor::Green => "32".into(),
        TextColor::Yellow => "33".into(),
        TextColor::Blue => "34".into(),
        TextColor::Magenta => "35".into(),
        TextColor::Cyan => "36".into(),
        TextColor::White => "37".into(),
        TextColor::Gray => "90".into(),
        TextColor::BrightRed => "91".into(),
        TextColor::BrightGreen => "92".into(),
        TextColor::BrightYellow => "93".into(),
        TextColor::BrightBlue => "94".into(),
        TextColor::BrightMagenta => "95".into(),
        TextColor::BrightCyan => "96".into(),
        TextColor::BrightWhite => "97".into(),
        TextColor::Rgb(r, g, b) => format!("38;2;{r};{g};{b}"),
    }
}

/// Build the SGR prefix for a text run, or `None` when undecorated.
pub fn style_prefix(color: Option<TextColor>, attrs: TextAttr) -> Option<String> {
    let mut params: Vec<String> = Vec::new();
    if attrs.contains(TextAttr::BOLD) {
        params.push("1".into());
    }
    if attrs.contains(TextAttr::DIM) {
        params.push("2".into());
    }
    if attrs.contains(TextAttr::ITALIC) {
        params.push("3".into());
    }
    if attrs.contains(TextAttr::UNDERLINE) {
        params.push("4".into());
    }
    if attrs.contains(TextAttr::STRIKETHROUGH) {
        params.push("9".into());
    }
    if let Some(color) = color {
        params.push(color_params(color));
    }
    if params.is_empty() {
        None
    } else {
        Some(format!("\x1b[{}m", params.join(";")))
    }
}
