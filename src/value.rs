//! The canonical value model.
//!
//! Every decoder produces a [`Value`] and every encoder consumes one. The set of
//! variants is closed: null, boolean, number, string, list and mapping.
//!
//! ## Numbers
//!
//! [`Number`] keeps track of how a literal was written. `1` is an
//! [`Number::Integer`], `1.0` and `1e0` are [`Number::Float`], and integers that
//! do not fit in an `i64` are kept exactly as [`Number::BigInt`]. Encoders use
//! this to avoid turning integers into floats or the other way around.
//!
//! ```rust
//! use simple_serializer::{Number, Value};
//!
//! let int = Value::from(42);
//! let float = Value::from(42.0);
//!
//! assert_ne!(int, float);
//! assert_eq!(int.as_i64(), Some(42));
//! assert_eq!(float.to_string(), "42.0");
//! ```
//!
//! ## Type tags
//!
//! ```rust
//! use simple_serializer::{Value, ValueKind};
//!
//! let value = Value::from(vec![Value::from("a")]);
//! assert_eq!(value.kind(), ValueKind::List);
//! assert_eq!(value.kind().to_string(), "list");
//! ```

use crate::Mapping;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A format-neutral representation of structured data.
///
/// # Examples
///
/// ```rust
/// use simple_serializer::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Mapping(Mapping),
}

/// The type tag of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    List,
    Mapping,
}

impl ValueKind {
    /// Returns the lowercase name of this kind, as used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric value that remembers whether it was written as an integer.
///
/// # Examples
///
/// ```rust
/// use simple_serializer::Number;
///
/// let integer = Number::Integer(42);
/// let float = Number::Float(3.5);
/// let big = Number::parse_integer("123456789012345678901234567890").unwrap();
///
/// assert!(integer.is_integer());
/// assert!(float.is_float());
/// assert!(big.is_integer());
/// assert_eq!(big.as_i64(), None);
/// assert_eq!(big.to_string(), "123456789012345678901234567890");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    /// An integer outside the `i64` range. Never holds a value that fits in `i64`.
    BigInt(BigInt),
    Float(f64),
}

impl Number {
    /// Builds an integer number, choosing `Integer` whenever the value fits in `i64`.
    #[must_use]
    pub fn from_bigint(value: BigInt) -> Self {
        match i64::try_from(&value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(value),
        }
    }

    /// Parses an optionally signed run of decimal digits.
    ///
    /// Returns `None` if the text is not an integer literal.
    ///
    /// ```rust
    /// use simple_serializer::Number;
    ///
    /// assert_eq!(Number::parse_integer("-12"), Some(Number::Integer(-12)));
    /// assert_eq!(Number::parse_integer("1.5"), None);
    /// ```
    #[must_use]
    pub fn parse_integer(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('-').unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match text.parse::<i64>() {
            Ok(i) => Some(Number::Integer(i)),
            Err(_) => text.parse::<BigInt>().ok().map(Number::from_bigint),
        }
    }

    /// Returns `true` if this is an integer, of any size.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::BigInt(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns the value as an `i64` if it is an integer in range.
    ///
    /// Floats are not converted, even whole ones.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as an `f64`, rounding big integers.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::BigInt(b) => b.to_string().parse().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::BigInt(b) => write!(f, "{}", b),
            // Debug keeps a trailing ".0" on whole floats and switches to
            // exponent notation at extreme magnitudes.
            Number::Float(fl) => write!(f, "{:?}", fl),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::BigInt(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::from_bigint(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl Value {
    /// Returns the type tag of this value.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Mapping(_) => ValueKind::Mapping,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Returns `true` for null, booleans, numbers and strings.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Mapping(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// ```rust
    /// use simple_serializer::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer that fits in `i64`, returns it.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the scalar as plain text, the way it appears in a tabular cell.
    ///
    /// Null renders as the empty string. Lists and mappings have no scalar text
    /// and return `None`.
    ///
    /// ```rust
    /// use simple_serializer::Value;
    ///
    /// assert_eq!(Value::Null.scalar_text().as_deref(), Some(""));
    /// assert_eq!(Value::from(true).scalar_text().as_deref(), Some("true"));
    /// assert_eq!(Value::from(2.5).scalar_text().as_deref(), Some("2.5"));
    /// assert_eq!(Value::List(vec![]).scalar_text(), None);
    /// ```
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::List(_) | Value::Mapping(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(
                    f,
                    "[{}]",
                    items
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
            Value::Mapping(map) => {
                write!(
                    f,
                    "{{{}}}",
                    map.iter()
                        .map(|(k, v)| format!("{}:{}", k, v))
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::BigInt(b)) => {
                if let Ok(i) = i128::try_from(b) {
                    serializer.serialize_i128(i)
                } else if let Ok(u) = u128::try_from(b) {
                    serializer.serialize_u128(u)
                } else {
                    Err(serde::ser::Error::custom(format!(
                        "integer {} is outside the 128-bit range",
                        b
                    )))
                }
            }
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Mapping(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a null, boolean, number, string, sequence or mapping")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from(value)))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from_bigint(BigInt::from(value))))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from_bigint(BigInt::from(value))))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    items.push(elem);
                }
                Ok(Value::List(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Mapping::new();
                while let Some((MapKey(key), value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Mapping(values))
            }

            fn visit_enum<A>(self, data: A) -> Result<Self::Value, A::Error>
            where
                A: de::EnumAccess<'de>,
            {
                // Self-describing formats report tagged nodes as enums.
                let (tag, _variant): (String, _) = data.variant()?;
                Err(de::Error::custom(format!("unsupported tag `{}`", tag)))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// A mapping key read from a self-describing format.
///
/// Scalar keys of any type are kept as their text, so `1: x` becomes the key
/// `"1"`. Sequence and mapping keys are rejected.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = MapKey;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a scalar mapping key")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(MapKey(Number::Float(value).to_string()))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(MapKey(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(MapKey(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(MapKey("null".to_string()))
            }

            fn visit_seq<A>(self, _seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                Err(de::Error::custom("sequence used as a mapping key"))
            }

            fn visit_map<A>(self, _map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                Err(de::Error::custom("mapping used as a mapping key"))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

/// The error returned when a [`Value`] is converted to a Rust type it does
/// not hold.
///
/// ```rust
/// use simple_serializer::Value;
///
/// let err = i64::try_from(Value::from("7")).unwrap_err();
/// assert_eq!(err.to_string(), "expected integer, found string");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct KindError {
    pub expected: &'static str,
    pub found: ValueKind,
}

impl KindError {
    fn new(expected: &'static str, value: &Value) -> Self {
        KindError {
            expected,
            found: value.kind(),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = KindError;

    fn try_from(value: Value) -> Result<Self, KindError> {
        match value {
            Value::Number(Number::Integer(i)) => Ok(i),
            _ => Err(KindError::new("integer", &value)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = KindError;

    fn try_from(value: Value) -> Result<Self, KindError> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            _ => Err(KindError::new("number", &value)),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = KindError;

    fn try_from(value: Value) -> Result<Self, KindError> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(KindError::new("bool", &value)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = KindError;

    fn try_from(value: Value) -> Result<Self, KindError> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(KindError::new("string", &value)),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(value as i64))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}
