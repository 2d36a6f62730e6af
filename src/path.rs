//! Compiled paths into an element tree.
//!
//! ```text
//! path      := '.'? subscript* ('/' segment)* '/'?
//! segment   := (unquoted | quoted) subscript*
//! subscript := '[' digit+ ']'
//! ```
//!
//! Unquoted names run up to the next `/` or `[`; a literal `.`, `/`, `[` or `\` inside them must be
//! escaped with `\`. Quoted names are delimited by `"` or `'` and only need the quote itself and
//! `\` escaped.

use std::fmt;
use std::str::FromStr;

use tracing::*;

use crate::cursor::{self, Cursor};
use crate::element::Element;
use crate::error::JsonError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The element itself.
    This,
    Property(String),
    /// Indexes into the array its operand resolves to.
    Subscript(Box<Segment>, usize),
}

impl Segment {
    /// The number of lookups resolving this segment performs.
    pub fn depth(&self) -> usize {
        match self {
            Segment::This => 0,
            Segment::Property(_) => 1,
            Segment::Subscript(operand, _) => operand.depth() + 1,
        }
    }

    pub fn resolve<'a>(&self, element: &'a Element) -> Result<&'a Element, JsonError> {
        match self {
            Segment::This => Ok(element),
            Segment::Property(name) => element.property(name),
            Segment::Subscript(operand, index) => operand.resolve(element)?.subscript(*index),
        }
    }

    /// Whether the innermost operand is [`Segment::This`].
    fn is_relative(&self) -> bool {
        match self {
            Segment::This => true,
            Segment::Property(_) => false,
            Segment::Subscript(operand, _) => operand.is_relative(),
        }
    }

    fn rebase(self, base: Segment) -> Segment {
        match self {
            Segment::This => base,
            Segment::Subscript(operand, index) => Segment::Subscript(Box::new(operand.rebase(base)), index),
            property => property,
        }
    }
}

fn needs_quotes(name: &str) -> bool {
    name.is_empty()
        || name.starts_with(['"', '\''])
        || name.starts_with(cursor::is_whitespace)
        || name.ends_with(cursor::is_whitespace)
        || name.contains(['.', '/', '[', '\\'])
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::This => f.write_str("."),
            Segment::Property(name) if needs_quotes(name) => {
                f.write_str("\"")?;
                for c in name.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("\"")
            }
            Segment::Property(name) => f.write_str(name),
            Segment::Subscript(operand, index) => write!(f, "{operand}[{index}]"),
        }
    }
}

/// A compiled, reusable path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The path resolving to the element it is applied to.
    pub fn this() -> Self {
        Path {
            segments: vec![Segment::This],
        }
    }

    #[instrument(level = "debug", skip_all, fields(path = source))]
    pub fn compile(source: &str) -> Result<Path, JsonError> {
        let segments = Compiler::new(source).compile()?;
        trace!(count = segments.len(), "compiled path");
        Ok(Path { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The number of lookups [`Path::traverse`] performs.
    pub fn depth(&self) -> usize {
        self.segments.iter().map(Segment::depth).sum()
    }

    /// Resolves every segment in turn, starting at `root`.
    pub fn traverse<'a>(&self, root: &'a Element) -> Result<&'a Element, JsonError> {
        self.segments
            .iter()
            .try_fold(root, |element, segment| segment.resolve(element))
    }

    /// Appends `other` to this path.
    pub fn resolve(&self, other: &Path) -> Path {
        let mut segments = Vec::with_capacity(self.len() + other.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&other.segments);
        Path { segments }
    }

    pub fn starts_with(&self, other: &Path) -> bool {
        self.segments.starts_with(&other.segments)
    }

    /// Drops `.` segments that do not change the result and fuses subscripts of `.` onto the
    /// segment before them, so that equal paths compare equal. The depth is unchanged.
    pub fn normalize(&self) -> Path {
        let mut segments: Vec<Segment> = Vec::with_capacity(self.len());
        for segment in &self.segments {
            match segment {
                Segment::This => {}
                segment if segment.is_relative() => match segments.pop() {
                    Some(base) => segments.push(segment.clone().rebase(base)),
                    None => segments.push(segment.clone()),
                },
                segment => segments.push(segment.clone()),
            }
        }
        if segments.is_empty() && !self.segments.is_empty() {
            segments.push(Segment::This);
        }
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str(".");
        }
        // A relative segment past the first has no syntax of its own.
        let normalized;
        let segments = if self.segments.iter().skip(1).any(Segment::is_relative) {
            normalized = self.normalize();
            &normalized.segments
        } else {
            &self.segments
        };
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = JsonError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Path::compile(source)
    }
}

struct Compiler {
    cursor: Cursor,
}

impl Compiler {
    fn new(source: &str) -> Self {
        Compiler {
            cursor: Cursor::new(source),
        }
    }

    fn compile(mut self) -> Result<Vec<Segment>, JsonError> {
        if !self.cursor.skip_whitespace() {
            return Err(JsonError::syntax("Encountered an empty path expression."));
        }
        let mut segments = Vec::new();
        if self.cursor.peek() == Some('.') {
            self.cursor.read();
            segments.push(self.process(Segment::This)?);
        }
        while self.cursor.skip_whitespace() {
            let segment = match self.cursor.peek() {
                Some(quote @ ('"' | '\'')) => self.read_quoted(quote)?,
                _ => self.read_unquoted()?,
            };
            segments.push(self.process(segment)?);
        }
        Ok(segments)
    }

    fn read_unquoted(&mut self) -> Result<Segment, JsonError> {
        let mut name = String::new();
        while let Some(c) = self.cursor.peek() {
            match c {
                '\\' => {
                    self.cursor.read();
                    name.push(self.read_escaped()?);
                }
                '.' => {
                    return Err(JsonError::syntax(
                        "Encountered an out-of-place relative prefix. Consider escaping it with '\\' to use it as a part of the property name.",
                    )
                    .with_span(Some(self.cursor.char_span())))
                }
                '/' | '[' => break,
                c => {
                    self.cursor.read();
                    name.push(c);
                }
            }
        }
        let name = name.trim_end_matches(cursor::is_whitespace);
        if name.is_empty() {
            return Err(
                JsonError::syntax("Encountered an empty unquoted property segment.")
                    .with_span(Some(self.cursor.char_span())),
            );
        }
        Ok(Segment::Property(name.to_owned()))
    }

    fn read_quoted(&mut self, quote: char) -> Result<Segment, JsonError> {
        self.cursor.push_stamp();
        self.cursor.read();
        let mut name = String::new();
        while let Some(c) = self.cursor.read() {
            match c {
                '\\' if self.cursor.peek() == Some(quote) => {
                    self.cursor.read();
                    name.push(quote);
                }
                '\\' => name.push(self.read_escaped()?),
                c if c == quote => {
                    let span = self.cursor.span();
                    if name.is_empty() {
                        return Err(
                            JsonError::syntax("Encountered an empty quoted property segment.")
                                .with_span(Some(span)),
                        );
                    }
                    return Ok(Segment::Property(name));
                }
                c => name.push(c),
            }
        }
        let span = self.cursor.span();
        Err(JsonError::syntax("Encountered an unterminated quoted property segment.")
            .with_span(Some(span)))
    }

    fn read_escaped(&mut self) -> Result<char, JsonError> {
        match self.cursor.read() {
            Some(c @ ('.' | '/' | '\\' | '[')) => Ok(c),
            Some(c) => Err(JsonError::syntax(format!(
                "Encountered an unknown escape sequence '\\{c}'."
            ))
            .with_span(Some(self.cursor.relative_span(2, 0)))),
            None => Err(JsonError::syntax("Encountered an unterminated escape sequence.")
                .with_span(Some(self.cursor.relative_span(1, 0)))),
        }
    }

    /// Reads what may follow a segment: a separator, subscripts, or the end of the path.
    fn process(&mut self, segment: Segment) -> Result<Segment, JsonError> {
        if !self.cursor.skip_whitespace() {
            return Ok(segment);
        }
        match self.cursor.read() {
            Some('/') | None => Ok(segment),
            Some('[') => {
                let index = self.read_index()?;
                self.process(Segment::Subscript(Box::new(segment), index))
            }
            Some(c) => Err(JsonError::syntax(format!(
                "Encountered an unexpected character '{c}' after a property segment."
            ))
            .with_span(Some(self.cursor.relative_span(1, 0)))),
        }
    }

    /// Reads the digits and the closing bracket of a subscript.
    fn read_index(&mut self) -> Result<usize, JsonError> {
        let start = self.cursor.position();
        let mut index: Option<usize> = None;
        while let Some(c) = self.cursor.read() {
            if let Some(digit) = c.to_digit(10) {
                let value = index
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|value| value.checked_add(digit as usize));
                match value {
                    Some(value) => index = Some(value),
                    None => {
                        return Err(JsonError::syntax(
                            "Encountered a subscript index that does not fit in an unsigned integer.",
                        )
                        .with_span(Some(self.cursor.span_from(start))))
                    }
                }
                continue;
            }
            return match (c, index) {
                (']', Some(index)) => Ok(index),
                (']', None) => Err(JsonError::syntax("Encountered an empty subscript operator.")
                    .with_span(Some(self.cursor.relative_span(2, 0)))),
                (c, _) => Err(JsonError::syntax(format!(
                    "Encountered an invalid index digit within a subscript operator '{c}'."
                ))
                .with_span(Some(self.cursor.relative_span(1, 0)))),
            };
        }
        Err(JsonError::syntax("Encountered an unterminated subscript operator.")
            .with_span(Some(self.cursor.relative_span(1, 0))))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::parse;

    fn property(name: &str) -> Segment {
        Segment::Property(name.to_owned())
    }

    #[test]
    fn compiles_segments_and_subscripts() {
        let path = Path::compile(r#"a/b[0][1]/"quoted key""#).unwrap();
        assert_eq!(
            path.segments(),
            [
                property("a"),
                Segment::Subscript(
                    Box::new(Segment::Subscript(Box::new(property("b")), 0)),
                    1
                ),
                property("quoted key"),
            ]
        );
        assert_eq!(path.len(), 3);
        assert_eq!(path.depth(), 5);
    }

    #[rstest]
    #[case(".", vec![Segment::This])]
    #[case("./a", vec![Segment::This, property("a")])]
    #[case(".[2]", vec![Segment::Subscript(Box::new(Segment::This), 2)])]
    #[case("  a b  / c ", vec![property("a b"), property("c")])]
    #[case(r"a\.b\/c\[d\\", vec![property(r"a.b/c[d\")])]
    #[case(r#"'it\'s'/"a.b""#, vec![property("it's"), property("a.b")])]
    #[case("a/", vec![property("a")])]
    fn compiles(#[case] source: &str, #[case] expected: Vec<Segment>) {
        assert_eq!(Path::compile(source).unwrap().segments(), expected);
    }

    #[rstest]
    #[case("", "Encountered an empty path expression.")]
    #[case("   ", "Encountered an empty path expression.")]
    #[case("a.b", "Encountered an out-of-place relative prefix. Consider escaping it with '\\' to use it as a part of the property name.")]
    #[case("/a", "Encountered an empty unquoted property segment.")]
    #[case("''", "Encountered an empty quoted property segment.")]
    #[case("'abc", "Encountered an unterminated quoted property segment.")]
    #[case(r"a\q", "Encountered an unknown escape sequence '\\q'.")]
    #[case("a[]", "Encountered an empty subscript operator.")]
    #[case("a[1x]", "Encountered an invalid index digit within a subscript operator 'x'.")]
    #[case("a[1", "Encountered an unterminated subscript operator.")]
    #[case("a[99999999999999999999999]", "Encountered a subscript index that does not fit in an unsigned integer.")]
    #[case("'a'b", "Encountered an unexpected character 'b' after a property segment.")]
    fn rejects(#[case] source: &str, #[case] message: &str) {
        let error = Path::compile(source).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.message(), message);
    }

    #[test]
    fn error_points_into_the_path() {
        let error = Path::compile("a[1x]").unwrap_err();
        let span = error.span().unwrap();
        assert_eq!((span.start(), span.end()), (4, 4));
        assert_eq!(span.source_line(), "a[1x]");
    }

    #[test]
    fn traverses_left_to_right() {
        let element = parse(r#"{"a":{"b":[10,20]}}"#).unwrap();
        let path = Path::compile("a/b[0]").unwrap();
        assert_eq!(path.traverse(&element).unwrap().as_f64(), Some(10.0));
        assert_eq!(Path::this().traverse(&element).unwrap(), &element);

        let empty = parse(r#"{"a":{"b":[]}}"#).unwrap();
        let error = path.traverse(&empty).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IndexOutOfRange);
        assert_eq!(error.span().map(|span| span.start()), Some(11));
    }

    #[test]
    fn resolve_and_starts_with() {
        let base = Path::compile("a/b").unwrap();
        let full = base.resolve(&Path::compile("c[1]").unwrap());
        assert_eq!(full.to_string(), "a/b/c[1]");
        assert!(full.starts_with(&base));
        assert!(!base.starts_with(&full));
        assert!(!full.starts_with(&Path::compile("b").unwrap()));
    }

    #[test]
    fn normalize_fuses_this() {
        let path = Path::compile("a").unwrap().resolve(&Path::compile(".[0][1]").unwrap());
        let normalized = path.normalize();
        assert_eq!(normalized, Path::compile("a[0][1]").unwrap());
        assert_eq!(normalized.depth(), path.depth());

        let this = Path::compile(".").unwrap().resolve(&Path::this());
        assert_eq!(this.normalize(), Path::this());
        assert_eq!(
            Path::compile("./a").unwrap().normalize(),
            Path::compile("a").unwrap()
        );
    }

    #[rstest]
    #[case(".")]
    #[case("./a")]
    #[case(".[0]/b")]
    #[case("a/b[0][1]")]
    #[case(r#""a.b"/c"#)]
    #[case(r#""\"x\\"/y"#)]
    fn display_compiles_back(#[case] source: &str) {
        let path: Path = source.parse().unwrap();
        assert_eq!(path.to_string(), source);
        assert_eq!(path.to_string().parse::<Path>().unwrap(), path);
    }

    #[rstest]
    #[case("a", ".[0]", "a[0]")]
    #[case("a", ".", "a")]
    #[case(".", "./b", "b")]
    #[case(".", ".[1]", ".[1]")]
    #[case("a/b[2]", ".[0][1]/c", "a/b[2][0][1]/c")]
    fn resolved_relative_segments_display_compilably(
        #[case] base: &str,
        #[case] other: &str,
        #[case] expected: &str,
    ) {
        let path = Path::compile(base).unwrap().resolve(&Path::compile(other).unwrap());
        let text = path.to_string();
        assert_eq!(text, expected);
        assert_eq!(Path::compile(&text).unwrap(), path.normalize());
    }

    #[test]
    fn empty_path_displays_as_this() {
        assert_eq!(Path::compile("a").unwrap().resolve(&Path { segments: vec![] }).to_string(), "a");
        assert_eq!(Path { segments: vec![] }.to_string(), ".");
    }
}
