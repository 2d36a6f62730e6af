use std::collections::HashSet;

use crate::element::Element;
use crate::outcome::Outcome;
use crate::template::{Template, TemplateRef};

/// Tries each alternative in order; the first one that does not mismatch wins.
pub struct Union<T> {
    alternatives: Vec<TemplateRef<T>>,
}

pub fn union<T>(alternatives: impl IntoIterator<Item = TemplateRef<T>>) -> Union<T> {
    Union {
        alternatives: alternatives.into_iter().collect(),
    }
}

impl<T> Template for Union<T> {
    type Value = T;

    fn parse(&self, element: &Element) -> Outcome<T> {
        for alternative in &self.alternatives {
            match alternative.parse(element) {
                Outcome::Mismatch => continue,
                outcome => return outcome,
            }
        }
        Outcome::Mismatch
    }

    fn serialize(&self, value: &T) -> Outcome<Element> {
        for alternative in &self.alternatives {
            match alternative.serialize(value) {
                Outcome::Mismatch => continue,
                outcome => return outcome,
            }
        }
        Outcome::Mismatch
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        if self.alternatives.is_empty() {
            return "never".to_owned();
        }
        self.alternatives
            .iter()
            .map(|alternative| alternative.describe(encountered))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Two-way union built by [`Template::or`].
#[derive(Debug, Clone)]
pub struct Or<A, B> {
    first: A,
    second: B,
}

impl<A, B> Or<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Or { first, second }
    }
}

impl<A, B> Template for Or<A, B>
where
    A: Template,
    B: Template<Value = A::Value>,
{
    type Value = A::Value;

    fn parse(&self, element: &Element) -> Outcome<A::Value> {
        match self.first.parse(element) {
            Outcome::Mismatch => self.second.parse(element),
            outcome => outcome,
        }
    }

    fn serialize(&self, value: &A::Value) -> Outcome<Element> {
        match self.first.serialize(value) {
            Outcome::Mismatch => self.second.serialize(value),
            outcome => outcome,
        }
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        format!(
            "{} | {}",
            self.first.describe(encountered),
            self.second.describe(encountered)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{literal, pattern, NUMBER, STRING};

    #[test]
    fn earliest_alternative_wins() {
        let template = union([
            pattern("[A-Z]+").unwrap().map(|s| format!("upper {s}"), |s| s.clone()).boxed(),
            STRING.map(|s| format!("any {s}"), |s| s.clone()).boxed(),
        ]);
        assert_eq!(
            template.parse(&Element::string("GET")),
            Outcome::Success("upper GET".to_owned())
        );
        assert_eq!(
            template.parse(&Element::string("get")),
            Outcome::Success("any get".to_owned())
        );
    }

    #[test]
    fn errors_are_not_swallowed() {
        let template = NUMBER
            .refine(|n| *n > 0.0, "Expected a positive number.")
            .or(NUMBER);
        assert!(template.parse(&Element::number(-1.0)).is_error());
        assert!(template.parse(&Element::string("x")).is_mismatch());
    }

    #[test]
    fn or_chains_render_flat() {
        let template = literal("GET").or(literal("POST")).or(literal("PUT"));
        assert_eq!(template.name(), r#""GET" | "POST" | "PUT""#);
        assert!(template.serialize(&"PUT".to_owned()).is_success());
        assert!(template.serialize(&"HEAD".to_owned()).is_mismatch());
    }
}
