//! [`ariadne`] reports for [`JsonError`]s.

use std::io;
use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::error::JsonError;

pub type DiagnosticReport<'a> = Report<'a, (&'a str, Range<usize>)>;

/// Builds a report for `error` raised against `source`, which is identified by `name`.
///
/// The message heads the report; located errors additionally label the offending text with the
/// error kind. Errors without a span, e.g. those raised while serializing programmatically built
/// values, produce a bare report anchored at the start of the source.
pub fn report<'a>(error: &JsonError, name: &'a str, source: &str, color: bool) -> DiagnosticReport<'a> {
    let offsets = error
        .span()
        .map(|span| clamp(span.offsets(), source.chars().count()));
    let mut builder = Report::build(
        ReportKind::Error,
        name,
        offsets.as_ref().map_or(0, |offsets| offsets.start),
    )
    .with_config(Config::default().with_color(color))
    .with_message(error.message());

    if let Some(offsets) = offsets {
        let mut label = Label::new((name, offsets)).with_message(error.kind());
        if color {
            label = label.with_color(Color::Red);
        }
        builder = builder.with_label(label);
    }

    builder.finish()
}

/// Keeps `offsets` within a source of `len` codepoints. An error at the end of input points at
/// the last codepoint.
fn clamp(offsets: Range<usize>, len: usize) -> Range<usize> {
    let start = offsets.start.min(len.saturating_sub(1));
    let end = offsets.end.min(len).max(start + 1).min(len.max(start));
    start..end
}

/// Renders the report for `error` against `source` into a string.
pub fn render(error: &JsonError, name: &str, source: &str, color: bool) -> io::Result<String> {
    let mut buffer = Vec::new();
    report(error, name, source, color).write((name, Source::from(source)), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Prints the report for `error` against `source` to stderr.
pub fn eprint(error: &JsonError, name: &str, source: &str, color: bool) -> io::Result<()> {
    report(error, name, source, color).eprint((name, Source::from(source)))
}
