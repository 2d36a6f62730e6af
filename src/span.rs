use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use ariadne::{Color, Fmt};

/// A [`SourceSpan`] represents a contiguous region of a single source line. It is used to
/// correspond a parsed node (or a path segment) to the text it came from, purely for diagnostics.
///
/// Columns are 1-based and inclusive, counted in codepoints. `lo..hi` is the same region expressed
/// as codepoint offsets into the whole source, which is what report renderers expect. An invariant
/// to be maintained is that `start <= end + 1` and `lo <= hi`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    source_line: Arc<str>,
    line: usize,
    start: usize,
    end: usize,
    lo: usize,
    hi: usize,
}

impl SourceSpan {
    pub fn new(
        source_line: Arc<str>,
        line: usize,
        start: usize,
        end: usize,
        offsets: Range<usize>,
    ) -> Self {
        debug_assert!(offsets.start <= offsets.end, "`lo` must not be larger than `hi`");
        SourceSpan {
            source_line,
            line,
            start,
            end,
            lo: offsets.start,
            hi: offsets.end,
        }
    }

    /// A span covering exactly one column.
    pub fn char_wide(source_line: Arc<str>, line: usize, column: usize, offset: usize) -> Self {
        Self::new(source_line, line, column, column, offset..offset + 1)
    }

    /// A span covering the whole of a single-line text, e.g. a value rendered for an error.
    pub fn line_wide(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let width = text.chars().count();
        Self::new(text, 1, 1, width, 0..width)
    }

    pub fn source_line(&self) -> &str {
        &self.source_line
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Codepoint offsets into the original source.
    pub fn offsets(&self) -> Range<usize> {
        self.lo..self.hi
    }

    /// Merges two spans on the same line, taking the outermost columns. Spans on different lines
    /// are not merged; the left operand is returned unchanged.
    pub fn extend(&self, other: &SourceSpan) -> SourceSpan {
        if other.line != self.line {
            return self.clone();
        }
        SourceSpan {
            source_line: Arc::clone(&self.source_line),
            line: self.line,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    /// Renders the source line with a caret underline below the spanned columns.
    pub fn underline(&self, color: bool) -> String {
        let chars: Vec<char> = self.source_line.chars().collect();
        let len = chars.len();
        let start = self.start.saturating_sub(1).min(len);
        let end = self.end.min(len).max(start);

        let before: String = chars[..start].iter().collect();
        let marked: String = chars[start..end].iter().collect();
        let after: String = chars[end..].iter().collect();
        let carets = "^".repeat((self.end + 1).saturating_sub(self.start).max(1));
        let padding = " ".repeat(start);

        if color {
            format!(
                "{}{}{}\n{}{}",
                before.fg(Color::White),
                marked.fg(Color::Red),
                after.fg(Color::White),
                padding,
                carets.fg(Color::BrightBlack),
            )
        } else {
            format!("{before}{marked}{after}\n{padding}{carets}")
        }
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{}-{})", self.line, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(line: usize, start: usize, end: usize) -> SourceSpan {
        SourceSpan::new(Arc::from("{\"a\": }"), line, start, end, start - 1..end)
    }

    #[test]
    fn extend_same_line_takes_outer_columns() {
        let merged = span(1, 1, 1).extend(&span(1, 7, 7));
        assert_eq!((merged.start(), merged.end()), (1, 7));
        assert_eq!(merged.offsets(), 0..7);
    }

    #[test]
    fn extend_across_lines_keeps_left() {
        let left = span(1, 2, 3);
        assert_eq!(left.extend(&span(2, 1, 9)), left);
    }

    #[test]
    fn underline_marks_columns() {
        let rendered = span(1, 7, 7).underline(false);
        assert_eq!(rendered, "{\"a\": }\n      ^");
    }

    #[test]
    fn display_is_line_and_columns() {
        assert_eq!(span(1, 2, 4).to_string(), "(1:2-4)");
    }

    #[test]
    fn line_wide_covers_text() {
        let span = SourceSpan::line_wide("hello");
        assert_eq!((span.start(), span.end()), (1, 5));
        assert_eq!(span.underline(false), "hello\n^^^^^");
    }
}
