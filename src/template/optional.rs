use std::collections::HashSet;

use crate::element::Element;
use crate::outcome::Outcome;
use crate::template::Template;

/// Accepts `null` as `None` wherever the wrapped template fails.
#[derive(Debug, Clone)]
pub struct Optional<T> {
    template: T,
    marked: bool,
}

impl<T> Optional<T> {
    pub(crate) fn new(template: T) -> Self {
        Optional {
            template,
            marked: true,
        }
    }

    /// Used by optional properties, whose name already carries the `?`.
    pub(crate) fn unmarked(template: T) -> Self {
        Optional {
            template,
            marked: false,
        }
    }
}

impl<T: Template> Template for Optional<T> {
    type Value = Option<T::Value>;

    fn parse(&self, element: &Element) -> Outcome<Option<T::Value>> {
        match self.template.parse(element) {
            Outcome::Success(value) => Outcome::Success(Some(value)),
            _ if element.is_null() => Outcome::Success(None),
            Outcome::Mismatch => Outcome::Mismatch,
            Outcome::Error(error) => Outcome::Error(error),
        }
    }

    fn serialize(&self, value: &Option<T::Value>) -> Outcome<Element> {
        match value {
            Some(value) => self.template.serialize(value),
            None => Outcome::Success(Element::null()),
        }
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        let name = self.template.describe(encountered);
        if self.marked {
            format!("{name}?")
        } else {
            name
        }
    }
}

/// Substitutes a supplied value for `null`.
#[derive(Debug, Clone)]
pub struct OptionalOrElse<T, F> {
    template: T,
    fallback: F,
}

impl<T, F> OptionalOrElse<T, F> {
    pub(crate) fn new(template: T, fallback: F) -> Self {
        OptionalOrElse { template, fallback }
    }
}

impl<T, F> Template for OptionalOrElse<T, F>
where
    T: Template,
    F: Fn() -> T::Value + Send + Sync,
{
    type Value = T::Value;

    fn parse(&self, element: &Element) -> Outcome<T::Value> {
        match self.template.parse(element) {
            Outcome::Success(value) => Outcome::Success(value),
            _ if element.is_null() => Outcome::Success((self.fallback)()),
            other => other,
        }
    }

    fn serialize(&self, value: &T::Value) -> Outcome<Element> {
        self.template.serialize(value)
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        format!("{}?", self.template.describe(encountered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{NULL, NUMBER, STRING};

    #[test]
    fn null_becomes_none() {
        let template = STRING.optional();
        assert_eq!(template.parse(&Element::null()), Outcome::Success(None));
        assert_eq!(
            template.parse(&Element::string("a")),
            Outcome::Success(Some("a".to_owned()))
        );
        assert!(template.parse(&Element::number(1.0)).is_mismatch());
        assert_eq!(template.serialize(&None), Outcome::Success(Element::null()));
        assert_eq!(template.name(), "string?");
    }

    #[test]
    fn inner_template_gets_the_first_chance() {
        assert_eq!(NULL.optional().parse(&Element::null()), Outcome::Success(Some(())));
    }

    #[test]
    fn fallback_is_supplied_for_null() {
        let template = NUMBER.optional_or_else(|| 42.0);
        assert_eq!(template.parse(&Element::null()), Outcome::Success(42.0));
        assert_eq!(template.parse(&Element::number(1.0)), Outcome::Success(1.0));
        assert!(template.parse(&Element::boolean(true)).is_mismatch());
        assert_eq!(template.name(), "number?");
    }
}
