use std::collections::HashSet;
use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::element::{Element, ElementKind};
use crate::outcome::Outcome;
use crate::template::{Property, Template};

/// An ordered tuple of properties of the same instance type `I`.
///
/// Implemented for tuples of one to twelve [`Property`] values.
pub trait Fields<I>: Send + Sync {
    /// The tuple of parsed property values, in declaration order.
    type Values;

    fn parse_fields(
        &self,
        object: &Element,
        entries: &IndexMap<String, Element>,
    ) -> Outcome<Self::Values>;

    fn serialize_fields(&self, instance: &I, entries: &mut IndexMap<String, Element>)
        -> Outcome<()>;

    fn describe_fields(&self, encountered: &mut HashSet<usize>) -> Vec<String>;
}

macro_rules! impl_fields {
    ($($field:ident $index:tt),+) => {
        impl<I, $($field: Template),+> Fields<I> for ($(Property<I, $field>,)+) {
            type Values = ($(<$field as Template>::Value,)+);

            fn parse_fields(
                &self,
                object: &Element,
                entries: &IndexMap<String, Element>,
            ) -> Outcome<Self::Values> {
                Outcome::Success(($(
                    crate::try_outcome!(self.$index.parse_entry(object, entries)),
                )+))
            }

            fn serialize_fields(
                &self,
                instance: &I,
                entries: &mut IndexMap<String, Element>,
            ) -> Outcome<()> {
                $(crate::try_outcome!(self.$index.serialize_entry(instance, entries));)+
                Outcome::Success(())
            }

            fn describe_fields(&self, encountered: &mut HashSet<usize>) -> Vec<String> {
                vec![$(self.$index.describe(encountered)),+]
            }
        }
    };
}

impl_fields!(A 0);
impl_fields!(A 0, B 1);
impl_fields!(A 0, B 1, C 2);
impl_fields!(A 0, B 1, C 2, D 3);
impl_fields!(A 0, B 1, C 2, D 3, E 4);
impl_fields!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_fields!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_fields!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
impl_fields!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, J 8);
impl_fields!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, J 8, K 9);
impl_fields!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, J 8, K 9, L 10);
impl_fields!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, J 8, K 9, L 10, M 11);

/// An object with a fixed set of properties, built into an `I` by a constructor.
pub struct Record<I, F, C> {
    fields: F,
    constructor: C,
    instance: PhantomData<fn(&I) -> I>,
}

/// Builds a record template from a tuple of properties and a constructor receiving the tuple of
/// their parsed values.
pub fn record<I, F, C>(fields: F, constructor: C) -> Record<I, F, C>
where
    F: Fields<I>,
    C: Fn(F::Values) -> I + Send + Sync,
{
    Record {
        fields,
        constructor,
        instance: PhantomData,
    }
}

impl<I, F, C> Template for Record<I, F, C>
where
    F: Fields<I>,
    C: Fn(F::Values) -> I + Send + Sync,
{
    type Value = I;

    fn parse(&self, element: &Element) -> Outcome<I> {
        let ElementKind::Object(entries) = element.kind() else {
            return Outcome::Mismatch;
        };
        let values = crate::try_outcome!(self.fields.parse_fields(element, entries));
        Outcome::Success((self.constructor)(values))
    }

    fn serialize(&self, value: &I) -> Outcome<Element> {
        let mut entries = IndexMap::new();
        crate::try_outcome!(self.fields.serialize_fields(value, &mut entries));
        Outcome::Success(Element::from(entries))
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        let identity = self as *const Self as *const () as usize;
        let registered = encountered.insert(identity);
        let name = format!("{{ {} }}", self.fields.describe_fields(encountered).join(", "));
        if registered {
            encountered.remove(&identity);
        }
        name
    }
}
