//! Bridges to the `serde` ecosystem.
//!
//! Conversions into [`serde_json::Value`] drop spans; conversions out of it produce span-less
//! elements. Non-finite numbers become `null`, since `serde_json` cannot represent them.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::element::{Element, ElementKind};

impl From<&Value> for Element {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Element::null(),
            Value::Bool(value) => Element::boolean(*value),
            Value::Number(number) => Element::number(number.as_f64().unwrap_or_default()),
            Value::String(value) => Element::string(value.as_str()),
            Value::Array(values) => Element::array(values.iter().map(Element::from)),
            Value::Object(entries) => Element::object(
                entries
                    .iter()
                    .map(|(key, value)| (key.as_str(), Element::from(value))),
            ),
        }
    }
}

impl From<Value> for Element {
    fn from(value: Value) -> Self {
        Element::from(&value)
    }
}

impl From<&Element> for Value {
    fn from(element: &Element) -> Self {
        match element.kind() {
            ElementKind::Null => Value::Null,
            ElementKind::Boolean(value) => Value::Bool(*value),
            ElementKind::Number(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
            ElementKind::String(value) => Value::String(value.clone()),
            ElementKind::Array(elements) => Value::Array(elements.iter().map(Value::from).collect()),
            ElementKind::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind() {
            ElementKind::Null => serializer.serialize_unit(),
            ElementKind::Boolean(value) => serializer.serialize_bool(*value),
            ElementKind::Number(value) if value.is_finite() => serializer.serialize_f64(*value),
            ElementKind::Number(_) => serializer.serialize_unit(),
            ElementKind::String(value) => serializer.serialize_str(value),
            ElementKind::Array(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            ElementKind::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Element::from)
    }
}
