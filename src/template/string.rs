use std::collections::HashSet;

use crate::element::{Element, ElementKind};
use crate::outcome::Outcome;
use crate::template::Template;

/// Matches exactly one string.
#[derive(Debug, Clone)]
pub struct Literal {
    literal: String,
    case_sensitive: bool,
}

pub fn literal(literal: impl Into<String>) -> Literal {
    Literal {
        literal: literal.into(),
        case_sensitive: true,
    }
}

impl Literal {
    /// Also accepts the literal with different letter case. Parsing yields the string as
    /// written in the input.
    pub fn case_insensitive(self) -> Self {
        Literal {
            case_sensitive: false,
            ..self
        }
    }

    fn matches(&self, value: &str) -> bool {
        if self.case_sensitive {
            value == self.literal
        } else {
            value.to_lowercase() == self.literal.to_lowercase()
        }
    }
}

impl Template for Literal {
    type Value = String;

    fn parse(&self, element: &Element) -> Outcome<String> {
        match element.kind() {
            ElementKind::String(value) if self.matches(value) => Outcome::Success(value.clone()),
            _ => Outcome::Mismatch,
        }
    }

    fn serialize(&self, value: &String) -> Outcome<Element> {
        if self.matches(value) {
            Outcome::Success(Element::string(value.as_str()))
        } else {
            Outcome::Mismatch
        }
    }

    fn describe(&self, _: &mut HashSet<usize>) -> String {
        format!("\"{}\"", self.literal)
    }
}

/// Matches strings that the regular expression matches as a whole.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: regex::Regex,
}

pub fn pattern(source: &str) -> Result<Pattern, regex::Error> {
    Ok(Pattern {
        source: source.to_owned(),
        regex: regex::Regex::new(&format!("^(?:{source})$"))?,
    })
}

impl Pattern {
    pub fn case_insensitive(self) -> Result<Self, regex::Error> {
        let regex = regex::RegexBuilder::new(&format!("^(?:{})$", self.source))
            .case_insensitive(true)
            .build()?;
        Ok(Pattern { regex, ..self })
    }
}

impl Template for Pattern {
    type Value = String;

    fn parse(&self, element: &Element) -> Outcome<String> {
        match element.kind() {
            ElementKind::String(value) if self.regex.is_match(value) => {
                Outcome::Success(value.clone())
            }
            _ => Outcome::Mismatch,
        }
    }

    fn serialize(&self, value: &String) -> Outcome<Element> {
        if self.regex.is_match(value) {
            Outcome::Success(Element::string(value.as_str()))
        } else {
            Outcome::Mismatch
        }
    }

    fn describe(&self, _: &mut HashSet<usize>) -> String {
        self.source.clone()
    }
}
