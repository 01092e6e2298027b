use std::str::Chars;

use text_size::{TextLen, TextSize};

pub(crate) const EOF_CHAR: char = '\0';

/// Character cursor over the remaining input.
///
/// `EOF_CHAR` is only a lookahead sentinel. Runs are driven by the real
/// characters, so a literal NUL in the source is still consumed.
pub(crate) struct Cursor<'a> {
    chars: Chars<'a>,
    len: TextSize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { chars: text.chars(), len: text.text_len() }
    }

    /// Length of the input not yet consumed.
    pub(crate) fn len(&self) -> TextSize {
        self.chars.as_str().text_len()
    }

    pub(crate) fn as_str(&self) -> &'a str {
        self.chars.as_str()
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub(crate) fn pos_within_token(&self) -> TextSize {
        self.len - self.len()
    }

    pub(crate) fn reset_pos_within_token(&mut self) {
        self.len = self.len();
    }

    pub(crate) fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn second(&self) -> char {
        self.chars.clone().nth(1).unwrap_or(EOF_CHAR)
    }

    pub(crate) fn third(&self) -> char {
        self.chars.clone().nth(2).unwrap_or(EOF_CHAR)
    }

    pub(crate) fn matches(&self, c: char) -> bool {
        self.chars.clone().next() == Some(c)
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    pub(crate) fn advance(&mut self) {
        self.chars.next();
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool) {
        while self.chars.clone().next().is_some_and(&f) {
            self.chars.next();
        }
    }

    /// Consumes up to, but not including, the next line break.
    pub(crate) fn advance_line(&mut self) {
        self.advance_while(|c| !is_line_break(c));
    }
}

pub(crate) fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

pub(crate) fn is_horizontal_space(c: char) -> bool {
    c == ' ' || c == '\t'
}
