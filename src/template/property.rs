use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::element::{Element, ElementKind};
use crate::outcome::Outcome;
use crate::template::{Optional, Template};

type Accessor<I, V> = Arc<dyn Fn(&I) -> V + Send + Sync>;
type Supplier<V> = Arc<dyn Fn() -> V + Send + Sync>;
type Predicate<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;

enum Missing<V> {
    Required,
    Fallback(Supplier<V>),
}

/// One named entry of a record: where it lives in the object, how to read it from an instance
/// of `I`, and what happens when it is absent.
///
/// Used on its own as a [`Template`], a property parses an object by looking up its entry.
pub struct Property<I, T: Template> {
    name: String,
    template: T,
    accessor: Accessor<I, T::Value>,
    missing: Missing<T::Value>,
    omit: Option<Predicate<T::Value>>,
}

impl<I, T: Template> Property<I, T> {
    pub(crate) fn required<F>(name: String, template: T, accessor: F) -> Self
    where
        F: Fn(&I) -> T::Value + Send + Sync + 'static,
    {
        Property {
            name,
            template,
            accessor: Arc::new(accessor),
            missing: Missing::Required,
            omit: None,
        }
    }

    /// Supplies `value` when the property is absent. The property is always written back.
    pub fn or_else(self, value: T::Value) -> Self
    where
        T::Value: Clone + Send + Sync + 'static,
    {
        self.or_else_with(move || value.clone())
    }

    pub fn or_else_with(self, fallback: impl Fn() -> T::Value + Send + Sync + 'static) -> Self {
        Property {
            missing: Missing::Fallback(Arc::new(fallback)),
            ..self
        }
    }

    /// Leaves the property out of serialized objects whenever `predicate` holds for its value.
    pub fn omit_if(self, predicate: impl Fn(&T::Value) -> bool + Send + Sync + 'static) -> Self {
        Property {
            omit: Some(Arc::new(predicate)),
            ..self
        }
    }

    /// The object key this property is stored under.
    pub fn key(&self) -> &str {
        &self.name
    }

    pub fn access(&self, instance: &I) -> T::Value {
        (self.accessor)(instance)
    }

    pub(crate) fn parse_entry(
        &self,
        object: &Element,
        entries: &IndexMap<String, Element>,
    ) -> Outcome<T::Value> {
        match entries.get(&self.name) {
            Some(value) => self.template.parse_and_promote(value),
            None => match &self.missing {
                Missing::Required => Outcome::error(
                    format!("Expected the object to include '{}' as a property.", self.name),
                    object.span().cloned(),
                ),
                Missing::Fallback(fallback) => Outcome::Success(fallback()),
            },
        }
    }

    /// Writes the property of `instance` into `entries`, unless it is to be omitted.
    pub(crate) fn serialize_entry(
        &self,
        instance: &I,
        entries: &mut IndexMap<String, Element>,
    ) -> Outcome<()> {
        let value = self.access(instance);
        if self.omit.as_ref().is_some_and(|omit| omit(&value)) {
            return Outcome::Success(());
        }
        let element = crate::try_outcome!(self.template.serialize_and_promote(&value));
        entries.insert(self.name.clone(), element);
        Outcome::Success(())
    }
}

impl<I, P> Property<I, Optional<P>>
where
    P: Template,
    P::Value: 'static,
{
    pub(crate) fn optional<F>(name: String, template: Optional<P>, accessor: F) -> Self
    where
        F: Fn(&I) -> Option<P::Value> + Send + Sync + 'static,
    {
        Property::required(name, template, accessor)
            .or_else_with(|| None)
            .omit_if(Option::is_none)
    }
}

impl<I, T: Template> Template for Property<I, T> {
    type Value = T::Value;

    fn parse(&self, element: &Element) -> Outcome<T::Value> {
        match element.kind() {
            ElementKind::Object(entries) => self.parse_entry(element, entries),
            _ => Outcome::Mismatch,
        }
    }

    fn serialize(&self, value: &T::Value) -> Outcome<Element> {
        self.template.serialize_and_promote(value)
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        let marker = match self.missing {
            Missing::Required => "",
            Missing::Fallback(_) => "?",
        };
        format!(
            "{}{}: {}",
            self.name,
            marker,
            self.template.describe(encountered)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::template::{NUMBER, STRING};

    struct Pet {
        name: String,
        legs: f64,
        nickname: Option<String>,
    }

    fn pet() -> Pet {
        Pet {
            name: "Rex".to_owned(),
            legs: 4.0,
            nickname: None,
        }
    }

    #[test]
    fn required_property_reports_the_object() {
        let property = STRING.property("name", |p: &Pet| p.name.clone());
        let element = parse(r#" {"legs": 4}"#).unwrap();
        let outcome = property.parse(&element);
        assert_eq!(
            outcome.message(),
            "Expected the object to include 'name' as a property."
        );
        assert_eq!(outcome.span().map(|span| span.start()), Some(2));
        assert!(property.parse(&Element::null()).is_mismatch());
    }

    #[test]
    fn present_value_mismatch_is_located_at_the_value() {
        let property = NUMBER.property("legs", |p: &Pet| p.legs);
        let element = parse(r#"{"legs": "four"}"#).unwrap();
        let outcome = property.parse(&element);
        assert_eq!(outcome.span().map(|span| span.start()), Some(10));
    }

    #[test]
    fn defaulted_property_is_always_written() {
        let property = NUMBER.property("legs", |p: &Pet| p.legs).or_else(4.0);
        assert_eq!(property.parse(&Element::object::<&str>([])), Outcome::Success(4.0));
        assert_eq!(property.describe(&mut HashSet::new()), "legs?: number");

        let mut entries = IndexMap::new();
        property.serialize_entry(&pet(), &mut entries).unwrap();
        assert_eq!(entries.get("legs"), Some(&Element::number(4.0)));
    }

    #[test]
    fn optional_property_omits_none() {
        let property = STRING.optional_property("nickname", |p: &Pet| p.nickname.clone());
        assert_eq!(property.parse(&parse(r#"{"nickname": null}"#).unwrap()), Outcome::Success(None));
        assert_eq!(property.parse(&parse("{}").unwrap()), Outcome::Success(None));
        assert_eq!(property.key(), "nickname");
        assert_eq!(property.describe(&mut HashSet::new()), "nickname?: string");

        let mut entries = IndexMap::new();
        property.serialize_entry(&pet(), &mut entries).unwrap();
        assert!(entries.is_empty());

        let named = Pet {
            nickname: Some("R".to_owned()),
            ..pet()
        };
        property.serialize_entry(&named, &mut entries).unwrap();
        assert_eq!(entries.get("nickname"), Some(&Element::string("R")));
    }

    #[test]
    fn omission_predicate_can_be_replaced() {
        let property = NUMBER
            .property("legs", |p: &Pet| p.legs)
            .omit_if(|legs| *legs == 4.0);
        let mut entries = IndexMap::new();
        property.serialize_entry(&pet(), &mut entries).unwrap();
        assert!(entries.is_empty());
    }
}
