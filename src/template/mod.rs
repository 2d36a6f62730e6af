//! Bidirectional schemas.
//!
//! A [`Template`] both validates an [`Element`] while parsing it into a typed value and turns such a
//! value back into an [`Element`]. Templates are immutable and are composed out of smaller ones
//! through the combinator methods below, e.g.
//!
//! ```
//! use john::template::{record, Template, NUMBER, STRING};
//!
//! struct Person {
//!     name: String,
//!     age: f64,
//! }
//!
//! let person = record(
//!     (
//!         STRING.property("name", |p: &Person| p.name.clone()),
//!         NUMBER.property("age", |p: &Person| p.age),
//!     ),
//!     |(name, age)| Person { name, age },
//! );
//! assert_eq!(person.name(), "{ name: string, age: number }");
//! ```

use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use crate::element::Element;
use crate::outcome::Outcome;

mod array;
mod discriminated;
mod lazy;
mod map;
mod number;
mod optional;
mod primitive;
mod property;
mod record;
mod string;
mod transform;
mod union;

pub use array::Array;
pub use discriminated::{discriminated, DiscriminatedUnion};
pub use lazy::{lazy, LazyTemplate};
pub use map::{map_of, MapOf};
pub use number::{max, min, range, Bounded, NumericTemplate, Whole};
pub use optional::{Optional, OptionalOrElse};
pub use primitive::{
    never, AnyTemplate, BooleanTemplate, Never, NullTemplate, NumberTemplate, StringTemplate, ANY,
    BOOLEAN, NULL, NUMBER, STRING,
};
pub use property::Property;
pub use record::{record, Fields, Record};
pub use string::{literal, pattern, Literal, Pattern};
pub use transform::{FlatMap, Map, Refine, Variant};
pub use union::{union, Or, Union};

/// A type-erased, shareable template.
pub type TemplateRef<T> = Arc<dyn Template<Value = T>>;

/// Marker rendered in place of a template that is already being described further up.
pub const RECURSION_MARKER: &str = "...";

pub(crate) fn mismatch_message(name: &str) -> String {
    format!("Expected a value that would satisfy the template of type '{name}'.")
}

pub trait Template: Send + Sync {
    type Value;

    /// Parses `element`, yielding [`Outcome::Mismatch`] when the template does not apply to it.
    fn parse(&self, element: &Element) -> Outcome<Self::Value>;

    fn serialize(&self, value: &Self::Value) -> Outcome<Element>;

    /// Renders the schema. `encountered` holds the identities of recursive templates currently
    /// being rendered; a revisit renders [`RECURSION_MARKER`] instead.
    fn describe(&self, encountered: &mut HashSet<usize>) -> String;

    fn name(&self) -> String {
        self.describe(&mut HashSet::new())
    }

    /// Like [`Template::parse`], but a mismatch becomes an error located at `element`.
    fn parse_and_promote(&self, element: &Element) -> Outcome<Self::Value> {
        self.parse(element)
            .promote_mismatch(|| mismatch_message(&self.name()), element.span())
    }

    /// Like [`Template::serialize`], but a mismatch becomes a (span-less) error.
    fn serialize_and_promote(&self, value: &Self::Value) -> Outcome<Element> {
        self.serialize(value)
            .promote_mismatch(|| mismatch_message(&self.name()), None)
    }

    fn array(self) -> Array<Self>
    where
        Self: Sized,
    {
        Array::new(self)
    }

    /// A required property read from and written to `name`.
    fn property<I, F>(self, name: impl Into<String>, accessor: F) -> Property<I, Self>
    where
        Self: Sized,
        F: Fn(&I) -> Self::Value + Send + Sync + 'static,
    {
        Property::required(name.into(), self, accessor)
    }

    /// A property that may be absent or `null`, parsing to `None` in both cases. `None` is
    /// omitted entirely when serializing.
    fn optional_property<I, F>(
        self,
        name: impl Into<String>,
        accessor: F,
    ) -> Property<I, Optional<Self>>
    where
        Self: Sized,
        Self::Value: 'static,
        F: Fn(&I) -> Option<Self::Value> + Send + Sync + 'static,
    {
        Property::optional(name.into(), Optional::unmarked(self), accessor)
    }

    fn map<V, F, G>(self, mapper: F, remapper: G) -> Map<Self, F, G>
    where
        Self: Sized,
        F: Fn(Self::Value) -> V + Send + Sync,
        G: Fn(&V) -> Self::Value + Send + Sync,
    {
        Map::new(self, mapper, remapper)
    }

    /// Like [`Template::map`], but the forward conversion may fail. The failure is reported at
    /// the parsed element.
    fn flat_map<V, E, F, G>(self, mapper: F, remapper: G) -> FlatMap<Self, F, G>
    where
        Self: Sized,
        E: Display,
        F: Fn(Self::Value) -> Result<V, E> + Send + Sync,
        G: Fn(&V) -> Self::Value + Send + Sync,
    {
        FlatMap::new(self, mapper, remapper)
    }

    /// Embeds this template's values into a wider type `V`, e.g. one variant of an enum. Values
    /// that `unwrap` rejects mismatch when serializing.
    fn variant<V, F, G>(self, wrap: F, unwrap: G) -> Variant<Self, F, G>
    where
        Self: Sized,
        F: Fn(Self::Value) -> V + Send + Sync,
        G: for<'a> Fn(&'a V) -> Option<&'a Self::Value> + Send + Sync,
    {
        Variant::new(self, wrap, unwrap)
    }

    fn refine<P>(self, predicate: P, message: impl Into<String>) -> Refine<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Value) -> bool + Send + Sync,
    {
        Refine::new(self, predicate, message.into())
    }

    /// Lets `null` parse to `None`.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional::new(self)
    }

    /// Lets `null` parse to whatever `fallback` supplies.
    fn optional_or_else<F>(self, fallback: F) -> OptionalOrElse<Self, F>
    where
        Self: Sized,
        F: Fn() -> Self::Value + Send + Sync,
    {
        OptionalOrElse::new(self, fallback)
    }

    fn or<O>(self, other: O) -> Or<Self, O>
    where
        Self: Sized,
        O: Template<Value = Self::Value>,
    {
        Or::new(self, other)
    }

    fn boxed(self) -> TemplateRef<Self::Value>
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

impl<T: Template + ?Sized> Template for Arc<T> {
    type Value = T::Value;

    fn parse(&self, element: &Element) -> Outcome<T::Value> {
        (**self).parse(element)
    }

    fn serialize(&self, value: &T::Value) -> Outcome<Element> {
        (**self).serialize(value)
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        (**self).describe(encountered)
    }
}

impl<T: Template + ?Sized> Template for Box<T> {
    type Value = T::Value;

    fn parse(&self, element: &Element) -> Outcome<T::Value> {
        (**self).parse(element)
    }

    fn serialize(&self, value: &T::Value) -> Outcome<Element> {
        (**self).serialize(value)
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        (**self).describe(encountered)
    }
}

impl<T: Template + ?Sized> Template for &T {
    type Value = T::Value;

    fn parse(&self, element: &Element) -> Outcome<T::Value> {
        (**self).parse(element)
    }

    fn serialize(&self, value: &T::Value) -> Outcome<Element> {
        (**self).serialize(value)
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        (**self).describe(encountered)
    }
}
