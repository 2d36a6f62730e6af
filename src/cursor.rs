//! A codepoint cursor shared by the JSON lexer and the path compiler.
//!
//! The cursor only ever moves forward, except for explicit backtracking to a saved stamp. Stamps
//! are pushed before scanning a token and popped afterwards to compute the token's span or slice.

use std::collections::HashMap;
use std::sync::Arc;

use crate::span::SourceSpan;

pub(crate) fn is_sign(c: char) -> bool {
    c == '+' || c == '-'
}

pub(crate) fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub(crate) fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    cursor: usize,
    column: usize,
    line: usize,
    line_start: usize,
}

#[derive(Debug)]
pub(crate) struct Cursor {
    chars: Vec<char>,
    stamps: Vec<Position>,
    lines: HashMap<usize, Arc<str>>,
    cursor: usize,
    column: usize,
    line: usize,
    line_start: usize,
}

impl Cursor {
    pub(crate) fn new(source: &str) -> Self {
        Cursor {
            chars: source.chars().collect(),
            stamps: Vec::new(),
            lines: HashMap::new(),
            cursor: 0,
            column: 1,
            line: 1,
            line_start: 0,
        }
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    pub(crate) fn peek_ahead(&self, amount: usize) -> Option<char> {
        self.chars.get(self.cursor + amount).copied()
    }

    pub(crate) fn can_read(&self) -> bool {
        self.cursor < self.chars.len()
    }

    pub(crate) fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_start = self.cursor;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Skips whitespace and reports whether anything is left to read.
    pub(crate) fn skip_whitespace(&mut self) -> bool {
        while self.peek().is_some_and(is_whitespace) {
            self.read();
        }
        self.can_read()
    }

    pub(crate) fn position(&self) -> Position {
        Position {
            cursor: self.cursor,
            column: self.column,
            line: self.line,
            line_start: self.line_start,
        }
    }

    pub(crate) fn push_stamp(&mut self) {
        let position = self.position();
        self.stamps.push(position);
    }

    pub(crate) fn pop_stamp(&mut self) -> Position {
        self.stamps.pop().unwrap_or_else(|| self.position())
    }

    pub(crate) fn peek_stamp(&self) -> Position {
        self.stamps.last().copied().unwrap_or_else(|| self.position())
    }

    pub(crate) fn backtrack(&mut self, position: Position) {
        self.cursor = position.cursor;
        self.column = position.column;
        self.line = position.line;
        self.line_start = position.line_start;
    }

    /// Pops the last stamp and spans everything consumed since.
    pub(crate) fn span(&mut self) -> SourceSpan {
        let start = self.pop_stamp();
        self.span_from(start)
    }

    /// Spans from `start` up to the last consumed codepoint. A region that crossed a line break is
    /// clipped to the line it started on.
    pub(crate) fn span_from(&mut self, start: Position) -> SourceSpan {
        if start.line == self.line {
            let text = self.line_text(self.line, self.line_start);
            let end = (self.column - 1).max(start.column);
            return SourceSpan::new(
                text,
                self.line,
                start.column,
                end,
                start.cursor..self.cursor.max(start.cursor + 1),
            );
        }
        let text = self.line_text(start.line, start.line_start);
        let width = text.chars().count().max(start.column);
        SourceSpan::new(
            text,
            start.line,
            start.column,
            width,
            start.cursor..start.line_start + width,
        )
    }

    /// Spans the codepoint under the cursor.
    pub(crate) fn char_span(&mut self) -> SourceSpan {
        let text = self.line_text(self.line, self.line_start);
        SourceSpan::char_wide(text, self.line, self.column, self.cursor)
    }

    /// Spans `left` codepoints behind the cursor and `right` codepoints ahead of it.
    pub(crate) fn relative_span(&mut self, left: usize, right: usize) -> SourceSpan {
        let text = self.line_text(self.line, self.line_start);
        let left = left.min(self.column - 1);
        let start = self.column - left;
        let end = (self.column + right).saturating_sub(1).max(start);
        SourceSpan::new(
            text,
            self.line,
            start,
            end,
            self.cursor - left..self.cursor - left + (end - start + 1),
        )
    }

    /// Pops the last stamp and returns the text consumed since.
    pub(crate) fn slice(&mut self) -> String {
        let start = self.pop_stamp();
        self.chars[start.cursor..self.cursor].iter().collect()
    }

    fn line_text(&mut self, line: usize, line_start: usize) -> Arc<str> {
        let chars = &self.chars;
        Arc::clone(self.lines.entry(line).or_insert_with(|| {
            let text: String = chars[line_start.min(chars.len())..]
                .iter()
                .take_while(|&&c| c != '\n')
                .collect();
            Arc::from(text.strip_suffix('\r').unwrap_or(&text))
        }))
    }
}
