//! Rendering element trees back into JSON text.

use std::fmt::Write;

use crate::element::{Element, ElementKind};

/// Renders `element` as JSON. With an `indent` of zero the output is minified; otherwise every
/// array element and object entry goes on its own line, indented by `indent` spaces per level.
///
/// Non-finite numbers cannot be represented in JSON and are written as `null`.
pub fn stringify(element: &Element, indent: usize) -> String {
    let mut output = String::new();
    Writer {
        output: &mut output,
        indent,
    }
    .write(element, 0);
    output
}

struct Writer<'a> {
    output: &'a mut String,
    indent: usize,
}

impl Writer<'_> {
    fn write(&mut self, element: &Element, level: usize) {
        match element.kind() {
            ElementKind::Null => self.output.push_str("null"),
            ElementKind::Boolean(value) => {
                let _ = write!(self.output, "{value}");
            }
            ElementKind::Number(value) if value.is_finite() => {
                let _ = write!(self.output, "{value}");
            }
            ElementKind::Number(_) => self.output.push_str("null"),
            ElementKind::String(value) => self.write_string(value),
            ElementKind::Array(elements) if elements.is_empty() => self.output.push_str("[]"),
            ElementKind::Array(elements) => {
                self.output.push('[');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.output.push(',');
                    }
                    self.newline(level + 1);
                    self.write(element, level + 1);
                }
                self.newline(level);
                self.output.push(']');
            }
            ElementKind::Object(entries) if entries.is_empty() => self.output.push_str("{}"),
            ElementKind::Object(entries) => {
                self.output.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        self.output.push(',');
                    }
                    self.newline(level + 1);
                    self.write_string(key);
                    self.output.push(':');
                    if self.indent > 0 {
                        self.output.push(' ');
                    }
                    self.write(value, level + 1);
                }
                self.newline(level);
                self.output.push('}');
            }
        }
    }

    fn newline(&mut self, level: usize) {
        if self.indent > 0 {
            self.output.push('\n');
            self.output
                .extend(std::iter::repeat(' ').take(self.indent * level));
        }
    }

    fn write_string(&mut self, value: &str) {
        self.output.push('"');
        for c in value.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\u{8}' => self.output.push_str("\\b"),
                '\u{c}' => self.output.push_str("\\f"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if u32::from(c) < 0x20 => {
                    let _ = write!(self.output, "\\u{:04x}", u32::from(c));
                }
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn minified_keeps_key_order() {
        let element = parse(r#" { "b" : [ true , null ], "a" : 1.5 } "#).unwrap();
        assert_eq!(stringify(&element, 0), r#"{"b":[true,null],"a":1.5}"#);
    }

    #[test]
    fn indented() {
        let element = parse(r#"{"a":1,"b":[true,{}],"c":[]}"#).unwrap();
        assert_eq!(
            stringify(&element, 2),
            "{\n  \"a\": 1,\n  \"b\": [\n    true,\n    {}\n  ],\n  \"c\": []\n}"
        );
    }

    #[test]
    fn escapes_strings() {
        let element = Element::string("quote \" slash \\ tab \t bell \u{7}");
        assert_eq!(
            stringify(&element, 0),
            r#""quote \" slash \\ tab \t bell \u0007""#
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(stringify(&Element::number(-0.25), 0), "-0.25");
        assert_eq!(stringify(&Element::number(1e3), 0), "1000");
        assert_eq!(stringify(&Element::number(f64::NAN), 0), "null");
    }
}
