//! Dynamic configuration values.
//!
//! [`ConfigValue`] is the tagged union stored at every node of the
//! configuration tree: scalars, ordered lists, and nested sections. Coercion
//! policy lives here in two flavors:
//!
//! * permissive `as_*` coercions used by the defaulted typed accessors —
//!   a failed coercion is not an error, the accessor falls back
//! * the strict [`FromValue`] conversion used by the checked generic get,
//!   where a tag mismatch surfaces as `ConfigError::TypeMismatch`
//!
//! Rich domain values (colors, coordinates, and similar) are not built-in
//! variants; they are stored as plain trees and translated through a
//! pluggable [`ValueCodec`].

use crate::section::ConfigSection;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A value stored in the configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Absent/removal sentinel. Setting a path to `Null` removes the key.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar. Backs both the `int` and `long` accessors.
    Integer(i64),
    /// Floating point scalar.
    Float(f64),
    /// String scalar.
    String(String),
    /// Ordered list of values.
    List(Vec<ConfigValue>),
    /// Nested section: an ordered mapping of keys to child values.
    Section(ConfigSection),
}

impl ConfigValue {
    /// The runtime tag of this value, as reported in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::List(_) => "list",
            ConfigValue::Section(_) => "section",
        }
    }

    /// Check if this is the null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Check if this is a boolean.
    pub fn is_bool(&self) -> bool {
        matches!(self, ConfigValue::Bool(_))
    }

    /// Check if this is an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, ConfigValue::Integer(_))
    }

    /// Check if this is a float.
    pub fn is_float(&self) -> bool {
        matches!(self, ConfigValue::Float(_))
    }

    /// Check if this is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, ConfigValue::String(_))
    }

    /// Check if this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, ConfigValue::List(_))
    }

    /// Check if this is a section.
    pub fn is_section(&self) -> bool {
        matches!(self, ConfigValue::Section(_))
    }

    /// Permissive boolean coercion.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Permissive integer coercion. Accepts floats with no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            ConfigValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Permissive 32-bit integer coercion. Out-of-range values fail.
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|i| i32::try_from(i).ok())
    }

    /// Permissive float coercion. Accepts integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the list payload, if this is a list.
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the section payload, if this is a section.
    pub fn as_section(&self) -> Option<&ConfigSection> {
        match self {
            ConfigValue::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Mutably borrow the section payload, if this is a section.
    pub fn as_section_mut(&mut self) -> Option<&mut ConfigSection> {
        match self {
            ConfigValue::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Render a scalar as a string. Used by the permissive string-list
    /// accessor, which stringifies any scalar element. `None` for null,
    /// lists, and sections.
    pub fn scalar_to_string(&self) -> Option<String> {
        match self {
            ConfigValue::Bool(b) => Some(b.to_string()),
            ConfigValue::Integer(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Convert a JSON value into a configuration value, preserving object
    /// key order.
    pub fn from_json(value: serde_json::Value) -> ConfigValue {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ConfigValue::Integer(i)
                } else {
                    ConfigValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::List(items.into_iter().map(ConfigValue::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let mut section = ConfigSection::new();
                for (key, value) in map {
                    section.insert_child(&key, ConfigValue::from_json(value));
                }
                ConfigValue::Section(section)
            }
        }
    }

    /// Convert this value into JSON. Non-finite floats become JSON null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ConfigValue::Null => serde_json::Value::Null,
            ConfigValue::Bool(b) => serde_json::Value::Bool(*b),
            ConfigValue::Integer(i) => serde_json::Value::Number((*i).into()),
            ConfigValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ConfigValue::String(s) => serde_json::Value::String(s.clone()),
            ConfigValue::List(items) => {
                serde_json::Value::Array(items.iter().map(ConfigValue::to_json).collect())
            }
            ConfigValue::Section(section) => {
                let mut map = serde_json::Map::new();
                for (key, value) in section.iter() {
                    map.insert(key.to_string(), value.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        ConfigValue::Integer(i64::from(i))
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<ConfigSection> for ConfigValue {
    fn from(section: ConfigSection) -> Self {
        ConfigValue::Section(section)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => ConfigValue::Null,
        }
    }
}

/// Strict conversion out of a stored value, used by the checked generic
/// accessor. Unlike the permissive `as_*` coercions, a tag mismatch here is
/// reported to the caller as a typed error instead of a silent fallback.
pub trait FromValue: Sized {
    /// Type name reported in `TypeMismatch` errors.
    const EXPECTED: &'static str;

    /// Convert from the stored value. `None` when the runtime tag does not
    /// match.
    fn from_value(value: &ConfigValue) -> Option<Self>;
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Integer(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for ConfigValue {
    const EXPECTED: &'static str = "value";

    fn from_value(value: &ConfigValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for Vec<ConfigValue> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_list().map(<[ConfigValue]>::to_vec)
    }
}

impl FromValue for ConfigSection {
    const EXPECTED: &'static str = "section";

    fn from_value(value: &ConfigValue) -> Option<Self> {
        value.as_section().cloned()
    }
}

/// Codec for opaque rich values stored as plain configuration trees.
///
/// Implementations translate a domain type to and from its tree
/// representation; the store never inspects the result beyond storing it.
/// Decoding is permissive: a shape mismatch yields `None` and the defaulted
/// accessors fall back, matching the rest of the coercion policy.
pub trait ValueCodec {
    /// The domain type this codec handles.
    type Value;

    /// Encode a domain value into its stored representation.
    fn encode(&self, value: &Self::Value) -> ConfigValue;

    /// Decode the stored representation. `None` when the shape does not
    /// match.
    fn decode(&self, raw: &ConfigValue) -> Option<Self::Value>;
}

// Serde support is hand-written rather than derived so that section key
// order survives both directions; a derived map implementation would go
// through an unordered HashMap.

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Integer(i) => serializer.serialize_i64(*i),
            ConfigValue::Float(f) => serializer.serialize_f64(*f),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ConfigValue::Section(section) => {
                let mut map = serializer.serialize_map(Some(section.len()))?;
                for (key, value) in section.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = ConfigValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a configuration value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ConfigValue, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Integer(i))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<ConfigValue, E> {
        match i64::try_from(u) {
            Ok(i) => Ok(ConfigValue::Integer(i)),
            Err(_) => Ok(ConfigValue::Float(u as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ConfigValue, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ConfigValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ConfigValue, A::Error> {
        let mut section = ConfigSection::new();
        while let Some((key, value)) = map.next_entry::<String, ConfigValue>()? {
            section.insert_child(&key, value);
        }
        Ok(ConfigValue::Section(section))
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// Shared coercion-with-default helpers backing the typed accessors at every
// delegation level (section, document, store).

pub(crate) fn coerce_string(value: Option<&ConfigValue>, default: &str) -> String {
    value
        .and_then(ConfigValue::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn coerce_i32(value: Option<&ConfigValue>, default: i32) -> i32 {
    value.and_then(ConfigValue::as_i32).unwrap_or(default)
}

pub(crate) fn coerce_i64(value: Option<&ConfigValue>, default: i64) -> i64 {
    value.and_then(ConfigValue::as_i64).unwrap_or(default)
}

pub(crate) fn coerce_f64(value: Option<&ConfigValue>, default: f64) -> f64 {
    value.and_then(ConfigValue::as_f64).unwrap_or(default)
}

pub(crate) fn coerce_bool(value: Option<&ConfigValue>, default: bool) -> bool {
    value.and_then(ConfigValue::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(ConfigValue::Null.type_name(), "null");
        assert_eq!(ConfigValue::Integer(1).type_name(), "integer");
        assert_eq!(ConfigValue::from("x").type_name(), "string");
        assert_eq!(ConfigValue::from(vec![1i64]).type_name(), "list");
    }

    #[test]
    fn test_numeric_coercions() {
        assert_eq!(ConfigValue::Integer(5).as_f64(), Some(5.0));
        assert_eq!(ConfigValue::Float(5.0).as_i64(), Some(5));
        assert_eq!(ConfigValue::Float(5.5).as_i64(), None);
        assert_eq!(ConfigValue::from("5").as_i64(), None);
        assert_eq!(ConfigValue::Integer(i64::MAX).as_i32(), None);
    }

    #[test]
    fn test_from_value_strictness() {
        // Strict conversions do not cross tags the way permissive ones do.
        assert_eq!(f64::from_value(&ConfigValue::Integer(3)), None);
        assert_eq!(i64::from_value(&ConfigValue::Float(3.0)), None);
        assert_eq!(
            String::from_value(&ConfigValue::from("ok")),
            Some("ok".to_string())
        );
    }

    #[test]
    fn test_null_from_option() {
        let v: ConfigValue = Option::<i64>::None.into();
        assert!(v.is_null());
        let v: ConfigValue = Some("set").into();
        assert_eq!(v.as_str(), Some("set"));
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(
            ConfigValue::Integer(7).scalar_to_string(),
            Some("7".to_string())
        );
        assert_eq!(
            ConfigValue::Bool(true).scalar_to_string(),
            Some("true".to_string())
        );
        assert_eq!(ConfigValue::List(vec![]).scalar_to_string(), None);
        assert_eq!(ConfigValue::Null.scalar_to_string(), None);
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": {"b": true, "a": [1, 2.5]}}"#).unwrap();
        let value = ConfigValue::from_json(json.clone());

        let section = value.as_section().unwrap();
        let keys: Vec<&str> = section.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);

        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut section = ConfigSection::new();
        section.insert_child("name", ConfigValue::from("demo"));
        section.insert_child("count", ConfigValue::Integer(3));
        let value = ConfigValue::Section(section);

        let text = serde_json::to_string(&value).unwrap();
        let back: ConfigValue = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }
}
