//! A JSON library that keeps track of where every value came from.
//!
//! Text is parsed into an immutable [`Element`] tree whose nodes remember their [`SourceSpan`],
//! so that anything going wrong later on, be it a failed [`Path`] lookup or a value not fitting a
//! [`Template`], can point at the offending text.

mod cursor;

pub mod diagnostics;
pub mod element;
pub mod error;
pub mod interop;
pub mod lexer;
pub mod outcome;
pub mod parser;
pub mod path;
pub mod span;
pub mod stringify;
pub mod template;

pub use element::{Element, ElementKind};
pub use error::{ErrorKind, JsonError};
pub use lexer::{Lexeme, LexemeKind, LexemeValue, Lexer};
pub use outcome::Outcome;
pub use parser::{parse, Parser};
pub use path::{Path, Segment};
pub use span::SourceSpan;
pub use stringify::stringify;
pub use template::{Template, TemplateRef};

/// Parses `source` and then the resulting element with `template`.
pub fn parse_as<T: Template + ?Sized>(source: &str, template: &T) -> Result<T::Value, JsonError> {
    parse(source)?.expect(template)
}

/// Turns `value` into an element with `template`. Elements produced this way carry no spans, so
/// neither do the errors.
pub fn serialize<T: Template + ?Sized>(value: &T::Value, template: &T) -> Result<Element, JsonError> {
    template.serialize_and_promote(value).into_result()
}
