//! Conversion of raw environment strings into typed values.
//!
//! Invariants:
//! - Conversions never panic; malformed input is a `ValueError`.
//! - Numeric and boolean conversions do not trim: ` 1` is not an integer.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::ValueError;

/// A resolved environment value before conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawValue(String);

macro_rules! int_conversions {
    ($($method:ident => $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Parse as `", stringify!($ty), "`.")]
            pub fn $method(&self) -> Result<$ty, ValueError> {
                self.parse_int::<$ty>(stringify!($ty))
            }
        )*
    };
}

impl RawValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// True when the value is empty or only whitespace.
    pub fn is_zero(&self) -> bool {
        self.0.trim().is_empty()
    }

    int_conversions! {
        as_i8 => i8,
        as_i16 => i16,
        as_i32 => i32,
        as_i64 => i64,
        as_isize => isize,
        as_u8 => u8,
        as_u16 => u16,
        as_u32 => u32,
        as_u64 => u64,
        as_usize => usize,
    }

    fn parse_int<T: FromStr>(&self, target: &'static str) -> Result<T, ValueError> {
        self.0.parse().map_err(|_| ValueError::Int {
            value: self.0.clone(),
            target,
        })
    }

    pub fn as_f32(&self) -> Result<f32, ValueError> {
        self.parse_float("f32")
    }

    pub fn as_f64(&self) -> Result<f64, ValueError> {
        self.parse_float("f64")
    }

    fn parse_float<T: FromStr>(&self, target: &'static str) -> Result<T, ValueError> {
        self.0.parse().map_err(|_| ValueError::Float {
            value: self.0.clone(),
            target,
        })
    }

    /// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self.0.as_str() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            other => Err(ValueError::Bool(other.to_owned())),
        }
    }

    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Split on `delimiter`. An empty or whitespace-only value is an empty list.
    pub fn as_string_list(&self, delimiter: &str) -> Vec<String> {
        if self.is_zero() {
            return Vec::new();
        }
        self.0.split(delimiter).map(str::to_owned).collect()
    }

    /// Parse a timestamp with a `chrono` format string.
    ///
    /// Layouts with an offset keep it; date-time layouts without one are read
    /// as UTC; date-only layouts yield midnight UTC.
    pub fn as_time(&self, layout: &str) -> Result<DateTime<FixedOffset>, ValueError> {
        if let Ok(t) = DateTime::parse_from_str(&self.0, layout) {
            return Ok(t);
        }
        if let Ok(t) = NaiveDateTime::parse_from_str(&self.0, layout) {
            return Ok(Utc.from_utc_datetime(&t).fixed_offset());
        }
        NaiveDate::parse_from_str(&self.0, layout)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|t| Utc.from_utc_datetime(&t).fixed_offset())
            .ok_or_else(|| ValueError::Time {
                value: self.0.clone(),
                layout: layout.to_owned(),
            })
    }

    /// Parse a human readable duration such as `30m`, `1h30m`, `2d` or `1w2d12h30m5s`.
    pub fn as_duration(&self) -> Result<Duration, ValueError> {
        humantime::parse_duration(self.0.trim()).map_err(|e| ValueError::Duration {
            value: self.0.clone(),
            reason: e.to_string(),
        })
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for RawValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
