//! Recursive-descent parser turning [`Lexeme`]s into an [`Element`] tree.
//!
//! ```text
//! value    := object | array | string | number | boolean | null
//! object   := '{' (member (',' member)*)? '}'
//! member   := string ':' value
//! array    := '[' (value (',' value)*)? ']'
//! ```

use std::collections::VecDeque;

use indexmap::IndexMap;
use tracing::*;

use crate::element::{Element, ElementKind};
use crate::error::JsonError;
use crate::lexer::{Lexeme, LexemeValue, Lexer};
use crate::span::SourceSpan;

/// How deeply arrays and objects may nest before parsing gives up.
pub const MAX_DEPTH: usize = 128;

pub struct Parser {
    lexer: Lexer,
    buffer: VecDeque<Lexeme>,
    depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            buffer: VecDeque::with_capacity(1),
            depth: 0,
        }
    }

    /// Parses exactly one element, leaving any following lexemes unread.
    pub fn parse(&mut self) -> Result<Element, JsonError> {
        let Some(lexeme) = self.peek()? else {
            return Err(JsonError::syntax(
                "Encountered an EOF in place of a JSON element.",
            ));
        };
        let span = lexeme.span.clone();
        let kind = match &lexeme.value {
            LexemeValue::Separator('{') => return self.parse_nested(span, Self::parse_object),
            LexemeValue::Separator('[') => return self.parse_nested(span, Self::parse_array),
            LexemeValue::Separator(c) => {
                return Err(
                    JsonError::syntax(format!("Encountered an unexpected lexeme '{c}'."))
                        .with_span(Some(span)),
                )
            }
            LexemeValue::String(value) => ElementKind::String(value.clone()),
            LexemeValue::Number(value) => ElementKind::Number(*value),
            LexemeValue::Boolean(value) => ElementKind::Boolean(*value),
            LexemeValue::Null => ElementKind::Null,
        };
        self.read()?;
        Ok(Element::new(kind).with_span(Some(span)))
    }

    /// Reports whether every lexeme has been consumed.
    pub fn is_exhausted(&mut self) -> Result<bool, JsonError> {
        Ok(self.peek()?.is_none())
    }

    fn parse_nested(
        &mut self,
        start: SourceSpan,
        parse: fn(&mut Self, SourceSpan) -> Result<Element, JsonError>,
    ) -> Result<Element, JsonError> {
        if self.depth >= MAX_DEPTH {
            return Err(JsonError::syntax(format!(
                "Encountered a composite nested deeper than {MAX_DEPTH} levels."
            ))
            .with_span(Some(start)));
        }
        self.depth += 1;
        let result = parse(self, start);
        self.depth -= 1;
        result
    }

    fn parse_object(&mut self, start: SourceSpan) -> Result<Element, JsonError> {
        self.read()?; // '{'
        let mut entries = IndexMap::new();
        if let Some(end) = self.read_if_separator('}')? {
            return Ok(Element::new(ElementKind::Object(entries)).with_span(Some(start.extend(&end))));
        }
        loop {
            let key = match self.read()? {
                Some(Lexeme {
                    value: LexemeValue::String(key),
                    ..
                }) => key,
                Some(other) => {
                    return Err(JsonError::syntax(format!(
                        "Expected a property name but found '{}'.",
                        other.value
                    ))
                    .with_span(Some(other.span)))
                }
                None => break,
            };
            match self.read()? {
                Some(lexeme) if lexeme.is_separator(':') => {}
                Some(other) => {
                    return Err(JsonError::syntax(format!(
                        "Expected a colon but found '{}'.",
                        other.value
                    ))
                    .with_span(Some(other.span)))
                }
                None => break,
            }
            let value = self.parse().map_err(|e| unterminated(e, "object", &start))?;
            entries.insert(key, value);
            match self.read()? {
                Some(lexeme) if lexeme.is_separator('}') => {
                    let span = start.extend(&lexeme.span);
                    return Ok(Element::new(ElementKind::Object(entries)).with_span(Some(span)));
                }
                Some(lexeme) if lexeme.is_separator(',') => continue,
                Some(other) => {
                    return Err(
                        JsonError::syntax("Expected either a comma or a closing brace.")
                            .with_span(Some(other.span)),
                    )
                }
                None => break,
            }
        }
        Err(JsonError::syntax("Encountered an unterminated object literal.").with_span(Some(start)))
    }

    fn parse_array(&mut self, start: SourceSpan) -> Result<Element, JsonError> {
        self.read()?; // '['
        let mut elements = Vec::new();
        if let Some(end) = self.read_if_separator(']')? {
            return Ok(Element::new(ElementKind::Array(elements)).with_span(Some(start.extend(&end))));
        }
        loop {
            elements.push(self.parse().map_err(|e| unterminated(e, "array", &start))?);
            match self.read()? {
                Some(lexeme) if lexeme.is_separator(']') => {
                    let span = start.extend(&lexeme.span);
                    return Ok(Element::new(ElementKind::Array(elements)).with_span(Some(span)));
                }
                Some(lexeme) if lexeme.is_separator(',') => continue,
                Some(other) => {
                    return Err(
                        JsonError::syntax("Expected either a comma or a closing bracket.")
                            .with_span(Some(other.span)),
                    )
                }
                None => break,
            }
        }
        Err(JsonError::syntax("Encountered an unterminated array literal.").with_span(Some(start)))
    }

    fn read_if_separator(&mut self, c: char) -> Result<Option<SourceSpan>, JsonError> {
        match self.peek()? {
            Some(lexeme) if lexeme.is_separator(c) => {
                let span = lexeme.span.clone();
                self.read()?;
                Ok(Some(span))
            }
            _ => Ok(None),
        }
    }

    fn peek(&mut self) -> Result<Option<&Lexeme>, JsonError> {
        if self.buffer.is_empty() {
            if let Some(lexeme) = self.lexer.next_lexeme()? {
                self.buffer.push_back(lexeme);
            }
        }
        Ok(self.buffer.front())
    }

    fn read(&mut self) -> Result<Option<Lexeme>, JsonError> {
        match self.buffer.pop_front() {
            Some(lexeme) => Ok(Some(lexeme)),
            None => self.lexer.next_lexeme(),
        }
    }
}

/// An element missing at the end of input inside a composite is reported as the composite being
/// unterminated.
fn unterminated(error: JsonError, what: &str, start: &SourceSpan) -> JsonError {
    if error.span().is_none() {
        JsonError::syntax(format!("Encountered an unterminated {what} literal."))
            .with_span(Some(start.clone()))
    } else {
        error
    }
}

/// Parses a complete JSON document. Anything but whitespace after the first element is an error.
#[instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Element, JsonError> {
    let mut parser = Parser::new(source);
    let element = parser.parse()?;
    if let Some(trailing) = parser.read()? {
        return Err(JsonError::syntax(format!(
            "Encountered an unexpected trailing lexeme '{}'.",
            trailing.value
        ))
        .with_span(Some(trailing.span)));
    }
    debug!(kind = element.kind_desc(), "parsed document");
    Ok(element)
}
