//! Byte cursor over header source
//!
//! The grammar is ASCII-only, so the scanner works on bytes and only slices
//! the source at ASCII boundaries.

/// Cursor over a source string.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Rewind or advance to a position previously returned by [`Scanner::pos`].
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.source.len());
    }

    pub fn eos(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// 1-based line number of the current position.
    pub fn line(&self) -> usize {
        self.source.as_bytes()[..self.pos]
            .iter()
            .filter(|b| **b == b'\n')
            .count()
            + 1
    }

    fn peek_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    /// Skip whitespace, including newlines.
    pub fn skip_whitespace(&mut self) {
        while self.peek_byte().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Skip spaces and tabs on the current line.
    pub fn skip_blanks(&mut self) {
        while matches!(self.peek_byte(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    pub fn peek(&self, literal: &str) -> bool {
        self.rest().starts_with(literal)
    }

    /// Consume `literal` if the input starts with it.
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.peek(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Consume `keyword` only when it is not followed by another word character.
    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        if !self.peek(keyword) {
            return false;
        }
        let end = self.pos + keyword.len();
        if self.source.as_bytes().get(end).copied().is_some_and(is_word_byte) {
            return false;
        }
        self.pos = end;
        true
    }

    /// Consume a run of word characters (`[A-Za-z0-9_]+`).
    pub fn scan_word(&mut self) -> Option<&'a str> {
        self.scan_while(is_word_byte)
    }

    /// Consume a run of bytes matching `predicate`; `None` if the run is empty.
    pub fn scan_while(&mut self, predicate: impl Fn(u8) -> bool) -> Option<&'a str> {
        let start = self.pos;
        while self.peek_byte().is_some_and(&predicate) {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(&self.source[start..self.pos])
        }
    }

    /// Consume everything up to `delimiter` and the delimiter itself.
    ///
    /// Returns the text before the delimiter; on a miss nothing is consumed.
    pub fn scan_until(&mut self, delimiter: &str) -> Option<&'a str> {
        let offset = self.rest().find(delimiter)?;
        let text = &self.source[self.pos..self.pos + offset];
        self.pos += offset + delimiter.len();
        Some(text)
    }

    /// Consume the rest of the current line, newline included.
    ///
    /// At the last line without a trailing newline the remaining text is
    /// returned and the scanner reaches the end.
    pub fn scan_line(&mut self) -> &'a str {
        match self.scan_until("\n") {
            Some(line) => line.strip_suffix('\r').unwrap_or(line),
            None => {
                let line = self.rest();
                self.pos = self.source.len();
                line
            }
        }
    }

    /// Move past the next newline. Returns `false` if there is none.
    pub fn skip_line(&mut self) -> bool {
        self.scan_until("\n").is_some()
    }
}
