//! Typed field values produced by schema parsing.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::error::ConfigError;

/// A converted field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    String(String),
    StringList(Vec<String>),
    Time(DateTime<FixedOffset>),
    Duration(Duration),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "signed integer",
            Value::Uint(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::StringList(_) => "string list",
            Value::Time(_) => "time",
            Value::Duration(_) => "duration",
        }
    }
}

/// Extraction of a Rust type from a [`Value`].
pub trait FromValue: Sized {
    /// Name used in type mismatch errors.
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! int_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(*i).ok(),
                        Value::Uint(u) => <$ty>::try_from(*u).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

int_from_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    const EXPECTED: &'static str = "f32";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f as f32),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<String> {
    const EXPECTED: &'static str = "string list";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::StringList(list) => Some(list.clone()),
            _ => None,
        }
    }
}

impl FromValue for DateTime<FixedOffset> {
    const EXPECTED: &'static str = "time";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }
}

impl FromValue for Duration {
    const EXPECTED: &'static str = "duration";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

/// Field values keyed by field name, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedConfig {
    values: Vec<(String, Value)>,
}

impl ParsedConfig {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, field: String, value: Value) {
        match self.values.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((field, value)),
        }
    }

    /// The raw converted value of `field`.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// The value of `field` as `T`.
    ///
    /// # Errors
    ///
    /// `UnknownField` when the schema has no such field, `TypeMismatch` when
    /// the value cannot be represented as `T`.
    pub fn get<T: FromValue>(&self, field: &str) -> Result<T, ConfigError> {
        let value = self
            .value(field)
            .ok_or_else(|| ConfigError::UnknownField(field.to_string()))?;
        T::from_value(value).ok_or_else(|| ConfigError::TypeMismatch {
            field: field.to_string(),
            expected: T::EXPECTED,
            found: value.type_name(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
