use std::collections::HashSet;
use std::marker::PhantomData;

use crate::element::{Element, ElementKind};
use crate::outcome::Outcome;
use crate::template::Template;

/// Accepts every element as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyTemplate;

#[derive(Debug, Clone, Copy, Default)]
pub struct NullTemplate;

#[derive(Debug, Clone, Copy, Default)]
pub struct StringTemplate;

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberTemplate;

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanTemplate;

pub const ANY: AnyTemplate = AnyTemplate;
pub const NULL: NullTemplate = NullTemplate;
pub const STRING: StringTemplate = StringTemplate;
pub const NUMBER: NumberTemplate = NumberTemplate;
pub const BOOLEAN: BooleanTemplate = BooleanTemplate;

impl Template for AnyTemplate {
    type Value = Element;

    fn parse(&self, element: &Element) -> Outcome<Element> {
        Outcome::Success(element.clone())
    }

    fn serialize(&self, value: &Element) -> Outcome<Element> {
        Outcome::Success(value.clone())
    }

    fn describe(&self, _: &mut HashSet<usize>) -> String {
        "any".to_owned()
    }
}

impl Template for NullTemplate {
    type Value = ();

    fn parse(&self, element: &Element) -> Outcome<()> {
        match element.kind() {
            ElementKind::Null => Outcome::Success(()),
            _ => Outcome::Mismatch,
        }
    }

    fn serialize(&self, _: &()) -> Outcome<Element> {
        Outcome::Success(Element::null())
    }

    fn describe(&self, _: &mut HashSet<usize>) -> String {
        "null".to_owned()
    }
}

impl Template for StringTemplate {
    type Value = String;

    fn parse(&self, element: &Element) -> Outcome<String> {
        match element.kind() {
            ElementKind::String(value) => Outcome::Success(value.clone()),
            _ => Outcome::Mismatch,
        }
    }

    fn serialize(&self, value: &String) -> Outcome<Element> {
        Outcome::Success(Element::string(value.as_str()))
    }

    fn describe(&self, _: &mut HashSet<usize>) -> String {
        "string".to_owned()
    }
}

impl Template for NumberTemplate {
    type Value = f64;

    fn parse(&self, element: &Element) -> Outcome<f64> {
        match element.kind() {
            ElementKind::Number(value) => Outcome::Success(*value),
            _ => Outcome::Mismatch,
        }
    }

    fn serialize(&self, value: &f64) -> Outcome<Element> {
        Outcome::Success(Element::number(*value))
    }

    fn describe(&self, _: &mut HashSet<usize>) -> String {
        "number".to_owned()
    }
}

impl Template for BooleanTemplate {
    type Value = bool;

    fn parse(&self, element: &Element) -> Outcome<bool> {
        match element.kind() {
            ElementKind::Boolean(value) => Outcome::Success(*value),
            _ => Outcome::Mismatch,
        }
    }

    fn serialize(&self, value: &bool) -> Outcome<Element> {
        Outcome::Success(Element::boolean(*value))
    }

    fn describe(&self, _: &mut HashSet<usize>) -> String {
        "boolean".to_owned()
    }
}

/// Mismatches in both directions. Useful for resolver branches that must never be taken.
pub struct Never<T>(PhantomData<fn() -> T>);

pub fn never<T>() -> Never<T> {
    Never(PhantomData)
}

impl<T> Template for Never<T> {
    type Value = T;

    fn parse(&self, _: &Element) -> Outcome<T> {
        Outcome::Mismatch
    }

    fn serialize(&self, _: &T) -> Outcome<Element> {
        Outcome::Mismatch
    }

    fn describe(&self, _: &mut HashSet<usize>) -> String {
        "never".to_owned()
    }
}
