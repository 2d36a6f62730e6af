use std::collections::HashSet;

use indexmap::IndexMap;

use crate::element::{Element, ElementKind};
use crate::outcome::Outcome;
use crate::template::Template;

/// Objects with arbitrary keys whose values all satisfy one template.
#[derive(Debug, Clone)]
pub struct MapOf<T> {
    template: T,
}

pub fn map_of<T: Template>(template: T) -> MapOf<T> {
    MapOf { template }
}

impl<T: Template> Template for MapOf<T> {
    type Value = IndexMap<String, T::Value>;

    fn parse(&self, element: &Element) -> Outcome<Self::Value> {
        let ElementKind::Object(entries) = element.kind() else {
            return Outcome::Mismatch;
        };
        let mut values = IndexMap::with_capacity(entries.len());
        for (key, value) in entries {
            let value = crate::try_outcome!(self.template.parse_and_promote(value));
            values.insert(key.clone(), value);
        }
        Outcome::Success(values)
    }

    fn serialize(&self, values: &Self::Value) -> Outcome<Element> {
        let mut entries = IndexMap::with_capacity(values.len());
        for (key, value) in values {
            let element = crate::try_outcome!(self.template.serialize_and_promote(value));
            entries.insert(key.clone(), element);
        }
        Outcome::Success(Element::from(entries))
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        format!("{{ [key: string]: {} }}", self.template.describe(encountered))
    }
}
