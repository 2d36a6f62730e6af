use std::collections::HashSet;

use crate::element::{Element, ElementKind};
use crate::outcome::Outcome;
use crate::template::{Property, Template, TemplateRef};

/// Picks the template for an object from the value of one of its properties.
///
/// When serializing, the discriminator is read from the instance through the property's accessor
/// and written as the first entry of the resulting object, so the variant templates need not
/// declare it themselves.
pub struct DiscriminatedUnion<I, D: Template, R> {
    discriminator: Property<I, D>,
    resolver: R,
}

pub fn discriminated<I, D, R>(discriminator: Property<I, D>, resolver: R) -> DiscriminatedUnion<I, D, R>
where
    D: Template,
    R: Fn(&D::Value) -> TemplateRef<I> + Send + Sync,
{
    DiscriminatedUnion {
        discriminator,
        resolver,
    }
}

impl<I, D, R> Template for DiscriminatedUnion<I, D, R>
where
    D: Template,
    R: Fn(&D::Value) -> TemplateRef<I> + Send + Sync,
{
    type Value = I;

    fn parse(&self, element: &Element) -> Outcome<I> {
        if !matches!(element.kind(), ElementKind::Object(_)) {
            return Outcome::Mismatch;
        }
        let discriminator = crate::try_outcome!(self.discriminator.parse_and_promote(element));
        (self.resolver)(&discriminator).parse_and_promote(element)
    }

    fn serialize(&self, value: &I) -> Outcome<Element> {
        let discriminator = self.discriminator.access(value);
        let element = crate::try_outcome!((self.resolver)(&discriminator).serialize(value));
        if !matches!(element.kind(), ElementKind::Object(_)) {
            return Outcome::Success(element);
        }
        let property = crate::try_outcome!(self.discriminator.serialize(&discriminator));
        Outcome::Success(element.with(self.discriminator.key(), property))
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        format!("{{ {}, ... }}", self.discriminator.describe(encountered))
    }
}
