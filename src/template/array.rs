use std::collections::HashSet;

use crate::element::{Element, ElementKind};
use crate::outcome::Outcome;
use crate::template::Template;

/// Every element of an array, in index order.
#[derive(Debug, Clone)]
pub struct Array<T> {
    template: T,
}

impl<T> Array<T> {
    pub(crate) fn new(template: T) -> Self {
        Array { template }
    }
}

impl<T: Template> Template for Array<T> {
    type Value = Vec<T::Value>;

    fn parse(&self, element: &Element) -> Outcome<Vec<T::Value>> {
        let ElementKind::Array(elements) = element.kind() else {
            return Outcome::Mismatch;
        };
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(crate::try_outcome!(self.template.parse_and_promote(element)));
        }
        Outcome::Success(values)
    }

    fn serialize(&self, values: &Vec<T::Value>) -> Outcome<Element> {
        let mut elements = Vec::with_capacity(values.len());
        for value in values {
            elements.push(crate::try_outcome!(self.template.serialize_and_promote(value)));
        }
        Outcome::Success(Element::from(elements))
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        format!("{}[]", self.template.describe(encountered))
    }
}
