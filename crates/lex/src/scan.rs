// Byte cursor shared by the four lexers.

pub struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, bytes: src.as_bytes(), pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    pub fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.bytes
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(s.as_bytes()))
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.src[start..self.pos]
    }

    pub fn is_ident_start(c: u8) -> bool {
        c == b'_' || (c as char).is_ascii_alphabetic()
    }

    pub fn is_ident_continue(c: u8) -> bool {
        c == b'_' || (c as char).is_ascii_alphanumeric()
    }

    /// Assumes the cursor sits on an identifier-start byte.
    pub fn scan_ident(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if Self::is_ident_continue(c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.slice_from(start)
    }

    /// Integer or decimal literal, optional type suffix letter kept in the
    /// text (`1.5f`, `10L`).
    pub fn scan_number(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if (c as char).is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.')
            && matches!(self.peek_at(1), Some(c) if (c as char).is_ascii_digit())
        {
            self.pos += 1;
            while matches!(self.peek(), Some(c) if (c as char).is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'f' | b'F' | b'l' | b'L' | b'd' | b'D')) {
            self.pos += 1;
        }
        self.slice_from(start)
    }

    /// Content between quotes, escapes kept as written. The opening quote
    /// must already be consumed; an unterminated literal ends at EOF.
    pub fn scan_string(&mut self, quote: u8) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == b'\\' {
                self.advance(2);
                continue;
            }
            if c == quote {
                break;
            }
            self.pos += 1;
        }
        let content = self.slice_from(start).to_string();
        if self.peek() == Some(quote) {
            self.pos += 1;
        }
        content
    }

    /// Rest of the current line; the newline itself is not consumed.
    pub fn scan_to_eol(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == b'\n' {
                break;
            }
            self.pos += 1;
        }
        self.slice_from(start)
    }

    /// Content of a `/* ... */` comment; the opener must already be
    /// consumed, the closer is consumed if present.
    pub fn scan_block_comment(&mut self) -> String {
        let start = self.pos;
        while !self.eof() && !self.starts_with("*/") {
            self.pos += 1;
        }
        let content = self.slice_from(start).to_string();
        if self.starts_with("*/") {
            self.pos += 2;
        }
        content
    }
}

/// Longest-match lookup against a language's multi-character operator
/// table. Tables are ordered longest first.
pub fn match_operator(cur: &Cursor, table: &[&'static str]) -> Option<&'static str> {
    table.iter().copied().find(|op| cur.starts_with(op))
}
