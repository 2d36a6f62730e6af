//! The immutable JSON element tree.
//!
//! Note that we deviate from usual JSON (de-)serialization libraries in that every parsed node
//! keeps the [`SourceSpan`] it came from. We're more like an AST. Nodes built programmatically
//! carry no span.

use indexmap::IndexMap;

use crate::error::{ErrorKind, JsonError};
use crate::path::Path;
use crate::span::SourceSpan;
use crate::template::Template;

#[derive(Debug, Clone)]
pub enum ElementKind {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Element>),
    /// Keys are unique and keep their insertion order. When a key repeats during construction the
    /// last value wins, in the position of the first occurrence.
    Object(IndexMap<String, Element>),
}

/// A JSON node together with its optional source location.
///
/// Equality is structural and ignores spans, so a parsed tree compares equal to the same tree
/// built by hand.
#[derive(Debug, Clone)]
pub struct Element {
    span: Option<SourceSpan>,
    kind: ElementKind,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ElementKind::Null, ElementKind::Null) => true,
            (ElementKind::Boolean(a), ElementKind::Boolean(b)) => a == b,
            (ElementKind::Number(a), ElementKind::Number(b)) => a == b,
            (ElementKind::String(a), ElementKind::String(b)) => a == b,
            (ElementKind::Array(a), ElementKind::Array(b)) => a == b,
            (ElementKind::Object(a), ElementKind::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Element { span: None, kind }
    }

    pub fn null() -> Self {
        Self::new(ElementKind::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(ElementKind::Boolean(value))
    }

    pub fn number(value: f64) -> Self {
        Self::new(ElementKind::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ElementKind::String(value.into()))
    }

    pub fn array(elements: impl IntoIterator<Item = Element>) -> Self {
        Self::new(ElementKind::Array(elements.into_iter().collect()))
    }

    /// Builds an object; repeated keys keep the last value.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Element)>) -> Self {
        Self::new(ElementKind::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        ))
    }

    pub fn with_span(mut self, span: Option<SourceSpan>) -> Self {
        self.span = span;
        self
    }

    pub fn span(&self) -> Option<&SourceSpan> {
        self.span.as_ref()
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn kind_desc(&self) -> &'static str {
        match self.kind {
            ElementKind::Null => "null",
            ElementKind::Boolean(_) => "boolean",
            ElementKind::Number(_) => "number",
            ElementKind::String(_) => "string",
            ElementKind::Array(_) => "array",
            ElementKind::Object(_) => "object",
        }
    }

    /// 1 for leaves, the entry count for objects, the element count for arrays.
    pub fn length(&self) -> usize {
        match &self.kind {
            ElementKind::Array(elements) => elements.len(),
            ElementKind::Object(entries) => entries.len(),
            _ => 1,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ElementKind::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ElementKind::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            ElementKind::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Element]> {
        match &self.kind {
            ElementKind::Array(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Element>> {
        match &self.kind {
            ElementKind::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a property, failing on non-objects and on absent keys.
    pub fn property(&self, name: &str) -> Result<&Element, JsonError> {
        let ElementKind::Object(entries) = &self.kind else {
            return Err(self.error(ErrorKind::NotAnObject, "Expected an object.".to_owned()));
        };
        entries.get(name).ok_or_else(|| {
            self.error(
                ErrorKind::MissingProperty,
                format!("Expected the object to include '{name}' as a property."),
            )
        })
    }

    /// Indexes into an array, failing on non-arrays and out-of-range indices.
    pub fn subscript(&self, index: usize) -> Result<&Element, JsonError> {
        let ElementKind::Array(elements) = &self.kind else {
            return Err(self.error(ErrorKind::NotAnArray, "Expected an array.".to_owned()));
        };
        elements.get(index).ok_or_else(|| {
            self.error(
                ErrorKind::IndexOutOfRange,
                format!(
                    "Expected the array to contain at least {} elements.",
                    index + 1
                ),
            )
        })
    }

    /// Returns a copy of this object with `name` inserted as its first entry. Non-objects are
    /// returned unchanged.
    pub fn with(&self, name: &str, value: Element) -> Element {
        let ElementKind::Object(entries) = &self.kind else {
            return self.clone();
        };
        let mut updated = IndexMap::with_capacity(entries.len() + 1);
        updated.insert(name.to_owned(), value);
        for (key, entry) in entries {
            if key != name {
                updated.insert(key.clone(), entry.clone());
            }
        }
        Element {
            span: self.span.clone(),
            kind: ElementKind::Object(updated),
        }
    }

    /// Compiles `path` and resolves it relative to this element.
    pub fn get(&self, path: &str) -> Result<&Element, JsonError> {
        Path::compile(path)?.traverse(self)
    }

    /// Resolves `path` and parses the element found there with `template`.
    pub fn get_as<T: Template + ?Sized>(
        &self,
        path: &str,
        template: &T,
    ) -> Result<T::Value, JsonError> {
        self.get(path)?.expect(template)
    }

    /// Parses this element with `template`, promoting a mismatch into a located error.
    pub fn expect<T: Template + ?Sized>(&self, template: &T) -> Result<T::Value, JsonError> {
        template.parse_and_promote(self).into_result()
    }

    fn error(&self, kind: ErrorKind, message: String) -> JsonError {
        JsonError::new(kind, message).with_span(self.span.clone())
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::boolean(value)
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::number(value)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::string(value)
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::string(value)
    }
}

impl From<Vec<Element>> for Element {
    fn from(elements: Vec<Element>) -> Self {
        Element::new(ElementKind::Array(elements))
    }
}

impl From<IndexMap<String, Element>> for Element {
    fn from(entries: IndexMap<String, Element>) -> Self {
        Element::new(ElementKind::Object(entries))
    }
}
