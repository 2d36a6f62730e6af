//! Converts JSON text into a stream of [`Lexeme`]s, one at a time.

use std::fmt;

use tracing::*;

use crate::cursor::{self, Cursor};
use crate::error::JsonError;
use crate::span::SourceSpan;

const SEPARATORS: [char; 6] = ['{', '}', '[', ']', ':', ','];

fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexemeKind {
    Separator,
    String,
    Number,
    Boolean,
    Null,
}

impl fmt::Display for LexemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexemeKind::Separator => "separator",
            LexemeKind::String => "string",
            LexemeKind::Number => "number",
            LexemeKind::Boolean => "boolean",
            LexemeKind::Null => "null",
        })
    }
}

/// The decoded value of a lexeme. String values have their escapes already translated.
#[derive(Debug, Clone, PartialEq)]
pub enum LexemeValue {
    Separator(char),
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl fmt::Display for LexemeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexemeValue::Separator(c) => write!(f, "{c}"),
            LexemeValue::String(s) => write!(f, "\"{s}\""),
            LexemeValue::Number(n) => write!(f, "{n}"),
            LexemeValue::Boolean(b) => write!(f, "{b}"),
            LexemeValue::Null => f.write_str("null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub value: LexemeValue,
    pub span: SourceSpan,
}

impl Lexeme {
    pub fn kind(&self) -> LexemeKind {
        match self.value {
            LexemeValue::Separator(_) => LexemeKind::Separator,
            LexemeValue::String(_) => LexemeKind::String,
            LexemeValue::Number(_) => LexemeKind::Number,
            LexemeValue::Boolean(_) => LexemeKind::Boolean,
            LexemeValue::Null => LexemeKind::Null,
        }
    }

    pub fn is_separator(&self, c: char) -> bool {
        self.value == LexemeValue::Separator(c)
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} | {}) @{}", self.kind(), self.value, self.span)
    }
}

pub struct Lexer {
    cursor: Cursor,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
        }
    }

    /// Returns the next lexeme, or `None` at the end of input.
    pub fn next_lexeme(&mut self) -> Result<Option<Lexeme>, JsonError> {
        if !self.cursor.skip_whitespace() {
            return Ok(None);
        }
        let Some(c) = self.cursor.peek() else {
            return Ok(None);
        };
        let lexeme = if is_separator(c) {
            self.cursor.read();
            Lexeme {
                value: LexemeValue::Separator(c),
                span: self.cursor.relative_span(1, 0),
            }
        } else if c == '"' {
            self.read_string()?
        } else if cursor::is_digit(c)
            || (c == '-' && self.cursor.peek_ahead(1).is_some_and(cursor::is_digit))
        {
            self.read_number()?
        } else {
            self.read_generic()?
        };
        trace!(%lexeme);
        Ok(Some(lexeme))
    }

    fn read_generic(&mut self) -> Result<Lexeme, JsonError> {
        self.cursor.push_stamp();
        while let Some(c) = self.cursor.peek() {
            if cursor::is_whitespace(c) || is_separator(c) || c == '"' {
                break;
            }
            self.cursor.read();
        }
        let span = self.cursor.span_from(self.cursor.peek_stamp());
        let text = self.cursor.slice();
        let value = match text.as_str() {
            "null" => LexemeValue::Null,
            "true" => LexemeValue::Boolean(true),
            "false" => LexemeValue::Boolean(false),
            _ => {
                return Err(JsonError::syntax(format!("Unexpected lexeme '{text}'."))
                    .with_span(Some(span)))
            }
        };
        Ok(Lexeme { value, span })
    }

    fn read_number(&mut self) -> Result<Lexeme, JsonError> {
        let mut reading_decimal = false;
        let mut reading_exponent = false;
        self.cursor.push_stamp();
        if self.cursor.peek() == Some('-') {
            self.cursor.read();
        }
        while let Some(c) = self.cursor.peek() {
            match c {
                '.' if reading_decimal => {
                    self.cursor.pop_stamp();
                    return Err(
                        JsonError::syntax("Encountered an out-of-place decimal dot.")
                            .with_span(Some(self.cursor.char_span())),
                    );
                }
                '.' => {
                    reading_decimal = true;
                    self.cursor.read();
                }
                'e' | 'E' if reading_exponent => {
                    self.cursor.pop_stamp();
                    return Err(JsonError::syntax("Encountered an out-of-place exponent.")
                        .with_span(Some(self.cursor.char_span())));
                }
                'e' | 'E' => {
                    reading_exponent = true;
                    self.cursor.read();
                    if self.cursor.peek().is_some_and(cursor::is_sign) {
                        self.cursor.read();
                    }
                }
                c if cursor::is_digit(c) => {
                    self.cursor.read();
                }
                _ => break,
            }
        }
        let span = self.cursor.span_from(self.cursor.peek_stamp());
        let text = self.cursor.slice();
        match text.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Lexeme {
                value: LexemeValue::Number(number),
                span,
            }),
            _ => Err(
                JsonError::syntax(format!("Encountered an invalid number literal '{text}'."))
                    .with_span(Some(span)),
            ),
        }
    }

    fn read_string(&mut self) -> Result<Lexeme, JsonError> {
        self.cursor.push_stamp();
        self.cursor.read(); // opening quote
        let mut value = String::new();
        while let Some(c) = self.cursor.read() {
            match c {
                '"' => {
                    let span = self.cursor.span();
                    return Ok(Lexeme {
                        value: LexemeValue::String(value),
                        span,
                    });
                }
                '\\' => {
                    let escaped = match self.cursor.read() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => self.read_unicode_escape()?,
                        Some(other) => {
                            self.cursor.pop_stamp();
                            return Err(JsonError::syntax(format!(
                                "Encountered an unknown escape sequence '\\{other}'."
                            ))
                            .with_span(Some(self.cursor.relative_span(2, 0))));
                        }
                        None => break,
                    };
                    value.push(escaped);
                }
                c => value.push(c),
            }
        }
        let span = self.cursor.span();
        Err(JsonError::syntax("Encountered an unterminated string literal.").with_span(Some(span)))
    }

    /// Reads the four hex digits after `\u`, pairing a high surrogate with the low surrogate
    /// escape that must follow it.
    fn read_unicode_escape(&mut self) -> Result<char, JsonError> {
        let start = self.cursor.position();
        let high = self.read_hex_quad()?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if self.cursor.peek() != Some('\\') || self.cursor.peek_ahead(1) != Some('u') {
                return Err(self.invalid_escape(start));
            }
            self.cursor.read();
            self.cursor.read();
            let low = self.read_hex_quad()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.invalid_escape(start));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| self.invalid_escape(start))
    }

    fn read_hex_quad(&mut self) -> Result<u32, JsonError> {
        let mut result = 0;
        for _ in 0..4 {
            match self.cursor.peek() {
                Some(c) if cursor::is_hex_digit(c) => {
                    self.cursor.read();
                    result = result * 16 + c.to_digit(16).unwrap_or_default();
                }
                Some(c) => {
                    self.cursor.pop_stamp();
                    return Err(JsonError::syntax(format!(
                        "Encountered an invalid hex digit '{c}'."
                    ))
                    .with_span(Some(self.cursor.char_span())));
                }
                None => {
                    let span = self.cursor.span();
                    return Err(JsonError::syntax("Encountered an unterminated string literal.")
                        .with_span(Some(span)));
                }
            }
        }
        Ok(result)
    }

    fn invalid_escape(&mut self, start: crate::cursor::Position) -> JsonError {
        self.cursor.pop_stamp();
        let span = self.cursor.span_from(start);
        JsonError::syntax("Encountered an invalid unicode escape.").with_span(Some(span))
    }
}

impl Iterator for Lexer {
    type Item = Result<Lexeme, JsonError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_lexeme().transpose()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn lex(source: &str) -> Result<Vec<LexemeValue>, JsonError> {
        Lexer::new(source)
            .map(|lexeme| lexeme.map(|lexeme| lexeme.value))
            .collect()
    }

    #[test]
    fn lexes_every_kind() {
        let values = lex(r#"{ "a" : [1, -2.5e3, true, false, null] }"#).unwrap();
        assert_eq!(
            values,
            vec![
                LexemeValue::Separator('{'),
                LexemeValue::String("a".into()),
                LexemeValue::Separator(':'),
                LexemeValue::Separator('['),
                LexemeValue::Number(1.0),
                LexemeValue::Separator(','),
                LexemeValue::Number(-2500.0),
                LexemeValue::Separator(','),
                LexemeValue::Boolean(true),
                LexemeValue::Separator(','),
                LexemeValue::Boolean(false),
                LexemeValue::Separator(','),
                LexemeValue::Null,
                LexemeValue::Separator(']'),
                LexemeValue::Separator('}'),
            ]
        );
    }

    #[rstest]
    #[case(r#""\"\\\/\b\f\n\r\t""#, "\"\\/\u{8}\u{c}\n\r\t")]
    #[case(r#""\u0041\u00e9""#, "Aé")]
    #[case(r#""\ud83d\ude00""#, "\u{1F600}")]
    #[case("\"\u{1F600} raw\"", "\u{1F600} raw")]
    fn translates_escapes(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(lex(source).unwrap(), vec![LexemeValue::String(expected.into())]);
    }

    #[rstest]
    #[case("1.2.3", "Encountered an out-of-place decimal dot.", 4)]
    #[case("1e2e3", "Encountered an out-of-place exponent.", 4)]
    #[case("1e", "Encountered an invalid number literal '1e'.", 1)]
    #[case("nul", "Unexpected lexeme 'nul'.", 1)]
    #[case(r#""\q""#, "Encountered an unknown escape sequence '\\q'.", 2)]
    #[case(r#""\u12x4""#, "Encountered an invalid hex digit 'x'.", 6)]
    #[case(r#""abc"#, "Encountered an unterminated string literal.", 1)]
    #[case(r#""\ud83d""#, "Encountered an invalid unicode escape.", 4)]
    fn reports_located_errors(#[case] source: &str, #[case] message: &str, #[case] column: usize) {
        let error = lex(source).unwrap_err();
        assert_eq!(error.message(), message);
        assert_eq!(error.span().map(SourceSpan::start), Some(column));
    }

    #[test]
    fn separator_spans_are_one_column() {
        let lexeme = Lexer::new("  [").next_lexeme().unwrap().unwrap();
        assert_eq!((lexeme.span.start(), lexeme.span.end()), (3, 3));
        assert_eq!(lexeme.span.offsets(), 2..3);

        let lexeme = Lexer::new("[ ").next_lexeme().unwrap().unwrap();
        assert_eq!(lexeme.span.offsets(), 0..1);
    }

    #[test]
    fn string_span_includes_quotes() {
        let lexeme = Lexer::new(r#" "ab" "#).next_lexeme().unwrap().unwrap();
        assert_eq!((lexeme.span.start(), lexeme.span.end()), (2, 5));
    }

    #[test]
    fn lone_minus_is_not_a_number() {
        assert_eq!(lex("-").unwrap_err().message(), "Unexpected lexeme '-'.");
    }
}
