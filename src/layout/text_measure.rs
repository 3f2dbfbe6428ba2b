//! Text measurement in terminal cells.
//!
//! Text nodes own no layout handle; their extent is the rendered length of
//! their payload. These helpers give the layout adapter and the paint walk
//! a shared definition of that length, using display cell widths rather
//! than char counts so CJK and other wide glyphs measure correctly.

use unicode_width::UnicodeWidthStr;

/// Display width of a single line in terminal cells.
pub fn string_width(s: &str) -> u16 {
    s.width() as u16
}

/// Width of the widest line in a (possibly multi-line) payload.
pub fn max_line_width(s: &str) -> u16 {
    s.lines().map(string_width).max().unwrap_or(0)
}

/// Number of rows the payload occupies. Empty text takes no rows.
pub fn line_count(s: &str) -> u16 {
    if s.is_empty() {
        0
    } else {
        s.split('\n').count() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width() {
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width("héllo"), 5);
        // CJK glyphs are two cells wide
        assert_eq!(string_width("日本"), 4);
    }

    #[test]
    fn test_max_line_width() {
        assert_eq!(max_line_width("a\nlonger\nxy"), 6);
        assert_eq!(max_line_width(""), 0);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("one"), 1);
        assert_eq!(line_count("one\ntwo"), 2);
        assert_eq!(line_count("trailing\n"), 2);
    }
}
