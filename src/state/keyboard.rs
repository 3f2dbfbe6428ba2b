//! Raw-input decoding: terminal byte sequences -> structured key events.
//!
//! The decoder is a small state machine over the raw stdin byte stream:
//! C0 control bytes become ctrl-modified characters, CSI and SS3 escape
//! sequences become navigation keys, `ESC <char>` becomes an alt-modified
//! character, and multi-byte UTF-8 becomes printable characters. Bytes of
//! an incomplete sequence buffer across chunks; the host flushes the
//! buffer after a poll timeout to tell a genuine ESC press apart from the
//! start of a sequence.
//!
//! Every event carries the consumed raw bytes so printable-character
//! handling can work on the input string directly.

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifier: u8 {
        const NONE  = 0;
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
    }
}

/// Decoded key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Null,
}

/// One decoded key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifier,
    /// The raw bytes this event was decoded from, lossily as UTF-8.
    pub raw: String,
}

impl KeyEvent {
    pub fn is_ctrl(&self) -> bool {
        self.modifiers.contains(Modifier::CTRL)
    }

    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }
}

// =============================================================================
// DECODER
// =============================================================================

enum Step {
    /// A decoded key consuming `usize` bytes.
    Key(KeyCode, Modifier, usize),
    /// Unrecognized sequence; consume and drop `usize` bytes.
    Skip(usize),
    /// The buffer holds the start of a sequence; wait for more bytes.
    Incomplete,
}

impl Step {
    fn key(code: KeyCode, modifiers: Modifier, len: usize) -> Self {
        Step::Key(code, modifiers, len)
    }
}

/// Streaming decoder from raw bytes to [`KeyEvent`]s.
pub struct InputDecoder {
    buf: Vec<u8>,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed a chunk of raw bytes; returns every event that completed.
    pub fn decode(&mut self, bytes: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(bytes);
        let mut events = Vec::new();
        self.drain(&mut events, false);
        events
    }

    /// Whether an incomplete sequence is buffered.
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve buffered bytes after a poll timeout.
    ///
    /// A lone buffered ESC is a genuine Escape press; any other stuck
    /// bytes are forced through one at a time.
    pub fn flush_pending(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        self.drain(&mut events, true);
        events
    }

    fn drain(&mut self, events: &mut Vec<KeyEvent>, force: bool) {
        while !self.buf.is_empty() {
            match step(&self.buf) {
                Step::Key(code, modifiers, len) => {
                    let raw = String::from_utf8_lossy(&self.buf[..len]).into_owned();
                    self.buf.drain(..len);
                    events.push(KeyEvent {
                        code,
                        modifiers,
                        raw,
                    });
                }
                Step::Skip(len) => {
                    self.buf.drain(..len);
                }
                Step::Incomplete => {
                    if !force {
                        return;
                    }
                    let byte = self.buf[0];
                    self.buf.drain(..1);
                    let code = if byte == 0x1b {
                        KeyCode::Escape
                    } else {
                        KeyCode::Char(byte as char)
                    };
                    events.push(KeyEvent {
                        code,
                        modifiers: Modifier::NONE,
                        raw: (byte as char).to_string(),
                    });
                }
            }
        }
    }
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SEQUENCE PARSING
// =============================================================================

fn step(buf: &[u8]) -> Step {
    match buf[0] {
        0x1b => step_escape(buf),
        0x0d | 0x0a => Step::key(KeyCode::Enter, Modifier::NONE, 1),
        0x09 => Step::key(KeyCode::Tab, Modifier::NONE, 1),
        0x08 | 0x7f => Step::key(KeyCode::Backspace, Modifier::NONE, 1),
        0x00 => Step::key(KeyCode::Null, Modifier::CTRL, 1),
        // Remaining C0 bytes are Ctrl+letter.
        b @ 0x01..=0x1a => Step::key(KeyCode::Char((b - 0x01 + b'a') as char), Modifier::CTRL, 1),
        0x1c..=0x1f => Step::Skip(1),
        b @ 0x20..=0x7e => Step::key(KeyCode::Char(b as char), Modifier::NONE, 1),
        _ => step_utf8(buf),
    }
}

fn step_escape(buf: &[u8]) -> Step {
    if buf.len() < 2 {
        return Step::Incomplete;
    }
    match buf[1] {
        b'[' => step_csi(buf),
        b'O' => step_ss3(buf),
        0x1b => Step::key(KeyCode::Escape, Modifier::ALT, 2),
        b @ 0x20..=0x7e => Step::key(KeyCode::Char(b as char), Modifier::ALT, 2),
        _ => Step::key(KeyCode::Escape, Modifier::NONE, 1),
    }
}

fn step_csi(buf: &[u8]) -> Step {
    if buf.len() < 3 {
        return Step::Incomplete;
    }

    // Find the final byte (0x40-0x7E).
    let mut end = 2;
    while end < buf.len() {
        if (0x40..=0x7e).contains(&buf[end]) {
            break;
        }
        end += 1;
    }
    if end >= buf.len() {
        return Step::Incomplete;
    }

    let final_byte = buf[end];
    let params: Vec<u32> = String::from_utf8_lossy(&buf[2..end])
        .split(';')
        .map(|s| s.parse::<u32>().unwrap_or(0))
        .collect();
    let consumed = end + 1;

    let modifiers = if params.len() >= 2 && params[1] > 0 {
        decode_modifier(params[1])
    } else {
        Modifier::NONE
    };

    match final_byte {
        b'A' => Step::key(KeyCode::Up, modifiers, consumed),
        b'B' => Step::key(KeyCode::Down, modifiers, consumed),
        b'C' => Step::key(KeyCode::Right, modifiers, consumed),
        b'D' => Step::key(KeyCode::Left, modifiers, consumed),
        b'H' => Step::key(KeyCode::Home, modifiers, consumed),
        b'F' => Step::key(KeyCode::End, modifiers, consumed),
        b'Z' => Step::key(KeyCode::Tab, Modifier::SHIFT, consumed),
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => Step::key(KeyCode::Home, modifiers, consumed),
            3 => Step::key(KeyCode::Delete, modifiers, consumed),
            4 | 8 => Step::key(KeyCode::End, modifiers, consumed),
            5 => Step::key(KeyCode::PageUp, modifiers, consumed),
            6 => Step::key(KeyCode::PageDown, modifiers, consumed),
            _ => Step::Skip(consumed),
        },
        _ => Step::Skip(consumed),
    }
}

fn step_ss3(buf: &[u8]) -> Step {
    if buf.len() < 3 {
        return Step::Incomplete;
    }
    match buf[2] {
        b'A' => Step::key(KeyCode::Up, Modifier::NONE, 3),
        b'B' => Step::key(KeyCode::Down, Modifier::NONE, 3),
        b'C' => Step::key(KeyCode::Right, Modifier::NONE, 3),
        b'D' => Step::key(KeyCode::Left, Modifier::NONE, 3),
        b'H' => Step::key(KeyCode::Home, Modifier::NONE, 3),
        b'F' => Step::key(KeyCode::End, Modifier::NONE, 3),
        _ => Step::Skip(3),
    }
}

fn step_utf8(buf: &[u8]) -> Step {
    let first = buf[0];
    let expected_len = if first & 0xe0 == 0xc0 {
        2
    } else if first & 0xf0 == 0xe0 {
        3
    } else if first & 0xf8 == 0xf0 {
        4
    } else {
        return Step::Skip(1);
    };

    if buf.len() < expected_len {
        return Step::Incomplete;
    }

    match std::str::from_utf8(&buf[..expected_len]) {
        Ok(s) => match s.chars().next() {
            Some(ch) => Step::key(KeyCode::Char(ch), Modifier::NONE, expected_len),
            None => Step::Skip(expected_len),
        },
        Err(_) => Step::Skip(1),
    }
}

/// Decode a CSI modifier parameter (1-based encoding).
fn decode_modifier(param: u32) -> Modifier {
    let val = param.saturating_sub(1);
    let mut m = Modifier::NONE;
    if val & 1 != 0 {
        m |= Modifier::SHIFT;
    }
    if val & 2 != 0 {
        m |= Modifier::ALT;
    }
    if val & 4 != 0 {
        m |= Modifier::CTRL;
    }
    m
}

// =============================================================================
// TESTS
// =============================================================================
