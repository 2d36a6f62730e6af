use std::collections::HashSet;
use std::fmt::Display;

use crate::element::Element;
use crate::outcome::Outcome;
use crate::template::Template;

/// Converts the produced value with a total pair of functions.
#[derive(Clone)]
pub struct Map<T, F, G> {
    template: T,
    mapper: F,
    remapper: G,
}

impl<T, F, G> Map<T, F, G> {
    pub(crate) fn new(template: T, mapper: F, remapper: G) -> Self {
        Map {
            template,
            mapper,
            remapper,
        }
    }
}

impl<T, V, F, G> Template for Map<T, F, G>
where
    T: Template,
    F: Fn(T::Value) -> V + Send + Sync,
    G: Fn(&V) -> T::Value + Send + Sync,
{
    type Value = V;

    fn parse(&self, element: &Element) -> Outcome<V> {
        self.template.parse(element).map(&self.mapper)
    }

    fn serialize(&self, value: &V) -> Outcome<Element> {
        self.template.serialize(&(self.remapper)(value))
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        self.template.describe(encountered)
    }
}

#[derive(Clone)]
pub struct FlatMap<T, F, G> {
    template: T,
    mapper: F,
    remapper: G,
}

impl<T, F, G> FlatMap<T, F, G> {
    pub(crate) fn new(template: T, mapper: F, remapper: G) -> Self {
        FlatMap {
            template,
            mapper,
            remapper,
        }
    }
}

impl<T, V, E, F, G> Template for FlatMap<T, F, G>
where
    T: Template,
    E: Display,
    F: Fn(T::Value) -> Result<V, E> + Send + Sync,
    G: Fn(&V) -> T::Value + Send + Sync,
{
    type Value = V;

    fn parse(&self, element: &Element) -> Outcome<V> {
        self.template
            .parse(element)
            .and_then(|value| match (self.mapper)(value) {
                Ok(value) => Outcome::Success(value),
                Err(error) => Outcome::error(error.to_string(), element.span().cloned()),
            })
    }

    fn serialize(&self, value: &V) -> Outcome<Element> {
        self.template.serialize(&(self.remapper)(value))
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        self.template.describe(encountered)
    }
}

#[derive(Clone)]
pub struct Variant<T, F, G> {
    template: T,
    wrap: F,
    unwrap: G,
}

impl<T, F, G> Variant<T, F, G> {
    pub(crate) fn new(template: T, wrap: F, unwrap: G) -> Self {
        Variant {
            template,
            wrap,
            unwrap,
        }
    }
}

impl<T, V, F, G> Template for Variant<T, F, G>
where
    T: Template,
    F: Fn(T::Value) -> V + Send + Sync,
    G: for<'a> Fn(&'a V) -> Option<&'a T::Value> + Send + Sync,
{
    type Value = V;

    fn parse(&self, element: &Element) -> Outcome<V> {
        self.template.parse(element).map(&self.wrap)
    }

    fn serialize(&self, value: &V) -> Outcome<Element> {
        match (self.unwrap)(value) {
            Some(inner) => self.template.serialize(inner),
            None => Outcome::Mismatch,
        }
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        self.template.describe(encountered)
    }
}

/// Re-validates values after parsing and before serializing.
#[derive(Clone)]
pub struct Refine<T, P> {
    template: T,
    predicate: P,
    message: String,
}

impl<T, P> Refine<T, P> {
    pub(crate) fn new(template: T, predicate: P, message: String) -> Self {
        Refine {
            template,
            predicate,
            message,
        }
    }
}

impl<T, P> Template for Refine<T, P>
where
    T: Template,
    P: Fn(&T::Value) -> bool + Send + Sync,
{
    type Value = T::Value;

    fn parse(&self, element: &Element) -> Outcome<T::Value> {
        let value = crate::try_outcome!(self.template.parse(element));
        if (self.predicate)(&value) {
            Outcome::Success(value)
        } else {
            Outcome::error(self.message.as_str(), element.span().cloned())
        }
    }

    fn serialize(&self, value: &T::Value) -> Outcome<Element> {
        if (self.predicate)(value) {
            self.template.serialize(value)
        } else {
            Outcome::error(self.message.as_str(), None)
        }
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        self.template.describe(encountered)
    }
}
