//! Declarative population of configuration from environment variables.
//!
//! Responsibilities:
//! - Describe configuration fields (`FieldSpec`) and their options.
//! - Resolve, validate and convert every field of a `Schema` in declaration order.
//! - Provide the `FromEnv` trait and the `parse` / `load_and_parse` entry points.
//!
//! Does NOT handle:
//! - Variable resolution or override scopes (delegated to `lookup` and `scope`).
//! - Schema validation beyond the required and non-empty options.
//!
//! Invariants:
//! - `required` means "the variable is defined"; a declared default does not satisfy it.
//! - `not_empty` is checked against the resolved value, default included.
//! - An undefined field without a default takes its kind's zero value.
//! - The first failing field aborts parsing.

mod parsed;

#[cfg(test)]
mod tests;

pub use parsed::{FromValue, ParsedConfig, Value};

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::constants::DEFAULT_LIST_DELIMITER;
use crate::error::ConfigError;
use crate::lookup::resolve;
use crate::scope::EnvContext;
use crate::store::EnvSource;
use crate::value::RawValue;

/// The type a field is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    String,
    StringList,
    Time,
    Duration,
}

/// One configuration field and the variable it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    var: String,
    kind: FieldKind,
    default: Option<String>,
    required: bool,
    not_empty: bool,
    delimiter: String,
    time_layout: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, var: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            var: var.into(),
            kind,
            default: None,
            required: false,
            not_empty: false,
            delimiter: DEFAULT_LIST_DELIMITER.to_string(),
            time_layout: None,
        }
    }

    /// Value used when the variable is not defined.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Fail unless the variable is defined.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Fail when the resolved value is empty or whitespace-only.
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Separator for `StringList` fields. Defaults to `,`.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// `chrono` format string for `Time` fields. Required for them.
    pub fn time_layout(mut self, layout: impl Into<String>) -> Self {
        self.time_layout = Some(layout.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    fn parse<S: EnvSource + ?Sized>(&self, source: &S) -> Result<Value, ConfigError> {
        let (raw, defined) = resolve(source, &self.var, self.default.as_deref());

        if self.required && !defined {
            return Err(ConfigError::RequiredField {
                var: self.var.clone(),
            });
        }
        if self.not_empty && raw.is_zero() {
            return Err(ConfigError::EmptyField {
                var: self.var.clone(),
            });
        }

        if !defined && self.default.is_none() {
            return self.zero_value();
        }
        self.convert(&raw)
    }

    /// The value of an undefined optional field.
    fn zero_value(&self) -> Result<Value, ConfigError> {
        let value = match self.kind {
            FieldKind::I8 | FieldKind::I16 | FieldKind::I32 | FieldKind::I64 => Value::Int(0),
            FieldKind::U8 | FieldKind::U16 | FieldKind::U32 | FieldKind::U64 => Value::Uint(0),
            FieldKind::F32 | FieldKind::F64 => Value::Float(0.0),
            FieldKind::Bool => Value::Bool(false),
            FieldKind::String => Value::String(String::new()),
            FieldKind::StringList => Value::StringList(Vec::new()),
            FieldKind::Time => {
                self.layout()?;
                Value::Time(DateTime::<Utc>::default().fixed_offset())
            }
            FieldKind::Duration => Value::Duration(Duration::ZERO),
        };
        Ok(value)
    }

    fn layout(&self) -> Result<&str, ConfigError> {
        self.time_layout
            .as_deref()
            .ok_or_else(|| ConfigError::TimeLayoutRequired {
                var: self.var.clone(),
            })
    }

    fn convert(&self, raw: &RawValue) -> Result<Value, ConfigError> {
        let invalid = |e: crate::error::ValueError| ConfigError::InvalidValue {
            var: self.var.clone(),
            message: e.to_string(),
        };

        let value = match self.kind {
            FieldKind::I8 => Value::Int(raw.as_i8().map_err(invalid)?.into()),
            FieldKind::I16 => Value::Int(raw.as_i16().map_err(invalid)?.into()),
            FieldKind::I32 => Value::Int(raw.as_i32().map_err(invalid)?.into()),
            FieldKind::I64 => Value::Int(raw.as_i64().map_err(invalid)?),
            FieldKind::U8 => Value::Uint(raw.as_u8().map_err(invalid)?.into()),
            FieldKind::U16 => Value::Uint(raw.as_u16().map_err(invalid)?.into()),
            FieldKind::U32 => Value::Uint(raw.as_u32().map_err(invalid)?.into()),
            FieldKind::U64 => Value::Uint(raw.as_u64().map_err(invalid)?),
            FieldKind::F32 => Value::Float(raw.as_f32().map_err(invalid)?.into()),
            FieldKind::F64 => Value::Float(raw.as_f64().map_err(invalid)?),
            FieldKind::Bool => Value::Bool(raw.as_bool().map_err(invalid)?),
            FieldKind::String => Value::String(raw.as_string()),
            FieldKind::StringList => Value::StringList(raw.as_string_list(&self.delimiter)),
            FieldKind::Time => Value::Time(raw.as_time(self.layout()?).map_err(invalid)?),
            FieldKind::Duration => Value::Duration(raw.as_duration().map_err(invalid)?),
        };
        Ok(value)
    }
}

/// An ordered list of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Resolve and convert every field from `source`.
    pub fn parse<S: EnvSource + ?Sized>(&self, source: &S) -> Result<ParsedConfig, ConfigError> {
        let mut parsed = ParsedConfig::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = field.parse(source)?;
            parsed.insert(field.name.clone(), value);
        }
        Ok(parsed)
    }
}

/// A configuration type populated from environment variables.
///
/// ```
/// use envscope_config::{ConfigError, FieldKind, FieldSpec, FromEnv, ParsedConfig, Schema};
///
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// impl FromEnv for Server {
///     fn schema() -> Schema {
///         Schema::new()
///             .field(FieldSpec::new("host", "SERVER_HOST", FieldKind::String).default("localhost"))
///             .field(FieldSpec::new("port", "SERVER_PORT", FieldKind::U16).default("8080"))
///     }
///
///     fn from_parsed(parsed: &ParsedConfig) -> Result<Self, ConfigError> {
///         Ok(Self {
///             host: parsed.get("host")?,
///             port: parsed.get("port")?,
///         })
///     }
/// }
///
/// let server: Server = envscope_config::with_overrides([("SERVER_PORT", "9000")], |ctx| ctx.parse())?;
/// assert_eq!(server.port, 9000);
/// # Ok::<(), ConfigError>(())
/// ```
pub trait FromEnv: Sized {
    fn schema() -> Schema;

    fn from_parsed(parsed: &ParsedConfig) -> Result<Self, ConfigError>;
}

pub(crate) fn parse_from<T, S>(source: &S) -> Result<T, ConfigError>
where
    T: FromEnv,
    S: EnvSource + ?Sized,
{
    let parsed = T::schema().parse(source)?;
    T::from_parsed(&parsed)
}

/// Populate `T` for the current call path (override scope, then process environment).
///
/// No `.env` file is loaded; use [`load_and_parse`] for that.
pub fn parse<T: FromEnv>() -> Result<T, ConfigError> {
    EnvContext::current().parse()
}

/// Load the `.env` file found from the working directory, then populate `T`.
pub fn load_and_parse<T: FromEnv>() -> Result<T, ConfigError> {
    EnvContext::current().load_and_parse()
}
