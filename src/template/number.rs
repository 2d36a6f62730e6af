use std::collections::HashSet;

use crate::element::{Element, ElementKind};
use crate::outcome::Outcome;
use crate::template::{Map, Template};

/// Numbers within inclusive bounds; either bound may be open.
#[derive(Debug, Clone, Copy)]
pub struct Bounded {
    min: Option<f64>,
    max: Option<f64>,
}

pub fn range(min: f64, max: f64) -> Bounded {
    Bounded {
        min: Some(min),
        max: Some(max),
    }
}

pub fn min(min: f64) -> Bounded {
    Bounded {
        min: Some(min),
        max: None,
    }
}

pub fn max(max: f64) -> Bounded {
    Bounded {
        min: None,
        max: Some(max),
    }
}

impl Bounded {
    fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

impl Template for Bounded {
    type Value = f64;

    fn parse(&self, element: &Element) -> Outcome<f64> {
        match element.kind() {
            ElementKind::Number(value) if self.contains(*value) => Outcome::Success(*value),
            _ => Outcome::Mismatch,
        }
    }

    fn serialize(&self, value: &f64) -> Outcome<Element> {
        if self.contains(*value) {
            Outcome::Success(Element::number(*value))
        } else {
            Outcome::Mismatch
        }
    }

    fn describe(&self, _: &mut HashSet<usize>) -> String {
        let bound = |bound: Option<f64>| bound.map(|b| b.to_string()).unwrap_or_default();
        format!("{}..{}", bound(self.min), bound(self.max))
    }
}

const FRACTIONAL: &str = "Expected the number to not include a fractional part.";

/// Rejects numbers with a fractional part, as an error rather than a mismatch.
#[derive(Debug, Clone, Copy)]
pub struct Whole<T> {
    template: T,
}

impl<T: Template<Value = f64>> Template for Whole<T> {
    type Value = f64;

    fn parse(&self, element: &Element) -> Outcome<f64> {
        let value = crate::try_outcome!(self.template.parse(element));
        if value.fract() == 0.0 {
            Outcome::Success(value)
        } else {
            Outcome::error(FRACTIONAL, element.span().cloned())
        }
    }

    fn serialize(&self, value: &f64) -> Outcome<Element> {
        if value.fract() == 0.0 {
            self.template.serialize(value)
        } else {
            Outcome::error(FRACTIONAL, None)
        }
    }

    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        self.template.describe(encountered)
    }
}

pub type Convert<T, V> = Map<T, fn(f64) -> V, fn(&V) -> f64>;

fn convert<T: Template<Value = f64>, V>(
    template: T,
    to: fn(f64) -> V,
    from: fn(&V) -> f64,
) -> Convert<T, V> {
    Map::new(template, to, from)
}

/// Conveniences for templates producing numbers.
pub trait NumericTemplate: Template<Value = f64> + Sized {
    fn require_whole(self) -> Whole<Self> {
        Whole { template: self }
    }

    fn as_i32(self) -> Convert<Self, i32> {
        convert::<Self, i32>(self, |n| n as i32, |v| f64::from(*v))
    }

    fn as_i64(self) -> Convert<Self, i64> {
        convert::<Self, i64>(self, |n| n as i64, |v| *v as f64)
    }

    fn as_u32(self) -> Convert<Self, u32> {
        convert::<Self, u32>(self, |n| n as u32, |v| f64::from(*v))
    }

    fn as_usize(self) -> Convert<Self, usize> {
        convert::<Self, usize>(self, |n| n as usize, |v| *v as f64)
    }

    fn as_f32(self) -> Convert<Self, f32> {
        convert::<Self, f32>(self, |n| n as f32, |v| f64::from(*v))
    }
}

impl<T: Template<Value = f64>> NumericTemplate for T {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::parser::parse;
    use crate::template::NUMBER;

    #[rstest]
    #[case(17.0, false)]
    #[case(18.0, true)]
    #[case(40.5, true)]
    #[case(65.0, true)]
    #[case(65.1, false)]
    fn range_is_inclusive(#[case] value: f64, #[case] matches: bool) {
        assert_eq!(range(18.0, 65.0).parse(&Element::number(value)).is_success(), matches);
        assert_eq!(range(18.0, 65.0).serialize(&value).is_success(), matches);
    }

    #[test]
    fn names_show_bounds() {
        assert_eq!(range(18.0, 65.0).name(), "18..65");
        assert_eq!(min(0.5).name(), "0.5..");
        assert_eq!(max(-1.0).name(), "..-1");
    }

    #[test]
    fn open_bounds() {
        assert!(min(0.0).parse(&Element::number(1e300)).is_success());
        assert!(min(0.0).parse(&Element::number(-1.0)).is_mismatch());
        assert!(max(0.0).parse(&Element::number(-1e300)).is_success());
    }

    #[test]
    fn fractions_are_errors_at_the_number() {
        let element = parse("[1.5]").unwrap();
        let number = element.subscript(0).unwrap();
        let outcome = NUMBER.require_whole().parse(number);
        assert_eq!(outcome.message(), FRACTIONAL);
        assert_eq!(outcome.span().map(|span| span.start()), Some(2));
        assert!(NUMBER.require_whole().serialize(&0.25).is_error());
    }

    #[test]
    fn conversions_round_trip() {
        let template = range(0.0, 10.0).require_whole().as_u32();
        assert_eq!(template.parse(&Element::number(7.0)), Outcome::Success(7));
        assert_eq!(template.serialize(&3), Outcome::Success(Element::number(3.0)));
        assert_eq!(template.name(), "0..10");
    }
}
