//! Tests for schema parsing.
//!
//! Invariants:
//! - Tests read from `MemoryEnv` so they never depend on the host environment.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use super::*;
use crate::scope::with_overrides;
use crate::store::MemoryEnv;

#[derive(Debug, PartialEq)]
struct Dummy {
    string: String,
    list: Vec<String>,
    int8: i8,
    time: DateTime<FixedOffset>,
    duration: Duration,
}

impl FromEnv for Dummy {
    fn schema() -> Schema {
        Schema::new()
            .field(FieldSpec::new("string", "TEST_STRING", FieldKind::String))
            .field(FieldSpec::new("list", "TEST_STRING_LIST", FieldKind::StringList).delimiter(";"))
            .field(FieldSpec::new("int8", "TEST_INT8", FieldKind::I8))
            .field(
                FieldSpec::new("time", "TEST_TIME", FieldKind::Time)
                    .time_layout("%Y-%m-%dT%H:%M:%S"),
            )
            .field(FieldSpec::new("duration", "TEST_DURATION", FieldKind::Duration))
    }

    fn from_parsed(parsed: &ParsedConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            string: parsed.get("string")?,
            list: parsed.get("list")?,
            int8: parsed.get("int8")?,
            time: parsed.get("time")?,
            duration: parsed.get("duration")?,
        })
    }
}

fn dummy_env() -> MemoryEnv {
    MemoryEnv::new()
        .with("TEST_STRING", "lorem")
        .with("TEST_STRING_LIST", "a1;b2;c3")
        .with("TEST_INT8", "-12")
        .with("TEST_TIME", "2021-12-24T17:04:05")
        .with("TEST_DURATION", "1s")
}

#[test]
fn test_parse_fills_every_kind() {
    let parsed: Dummy = parse_from(&dummy_env()).unwrap();

    assert_eq!(
        parsed,
        Dummy {
            string: "lorem".to_string(),
            list: vec!["a1".to_string(), "b2".to_string(), "c3".to_string()],
            int8: -12,
            time: Utc
                .with_ymd_and_hms(2021, 12, 24, 17, 4, 5)
                .unwrap()
                .fixed_offset(),
            duration: Duration::from_secs(1),
        }
    );
}

#[test]
fn test_defaults_apply_when_undefined() {
    let schema = Schema::new()
        .field(FieldSpec::new("foo", "FOO", FieldKind::String).default("bar"))
        .field(FieldSpec::new("dummy", "DUMMY", FieldKind::I32).default("42"))
        .field(FieldSpec::new("list", "FAKE_LIST", FieldKind::StringList).default("foo,bar"));

    let parsed = schema.parse(&MemoryEnv::new()).unwrap();

    assert_eq!(parsed.get::<String>("foo").unwrap(), "bar");
    assert_eq!(parsed.get::<i32>("dummy").unwrap(), 42);
    assert_eq!(
        parsed.get::<Vec<String>>("list").unwrap(),
        vec!["foo".to_string(), "bar".to_string()]
    );
}

#[test]
fn test_undefined_optional_fields_take_zero_values() {
    let schema = Schema::new()
        .field(FieldSpec::new("port", "APP_PORT", FieldKind::U16))
        .field(FieldSpec::new("offset", "APP_OFFSET", FieldKind::I64))
        .field(FieldSpec::new("ratio", "APP_RATIO", FieldKind::F64))
        .field(FieldSpec::new("verbose", "APP_VERBOSE", FieldKind::Bool))
        .field(FieldSpec::new("timeout", "APP_TIMEOUT", FieldKind::Duration))
        .field(FieldSpec::new("tags", "APP_TAGS", FieldKind::StringList))
        .field(FieldSpec::new("since", "APP_SINCE", FieldKind::Time).time_layout("%Y-%m-%d"));

    let parsed = schema.parse(&MemoryEnv::new()).unwrap();

    assert_eq!(parsed.get::<u16>("port").unwrap(), 0);
    assert_eq!(parsed.get::<i64>("offset").unwrap(), 0);
    assert_eq!(parsed.get::<f64>("ratio").unwrap(), 0.0);
    assert!(!parsed.get::<bool>("verbose").unwrap());
    assert_eq!(parsed.get::<Duration>("timeout").unwrap(), Duration::ZERO);
    assert!(parsed.get::<Vec<String>>("tags").unwrap().is_empty());
    assert_eq!(
        parsed.get::<DateTime<FixedOffset>>("since").unwrap(),
        Utc.timestamp_opt(0, 0).unwrap().fixed_offset()
    );
}

#[test]
fn test_undefined_time_field_still_needs_a_layout() {
    let schema = Schema::new().field(FieldSpec::new("when", "ENV_WHEN", FieldKind::Time));

    let err = schema.parse(&MemoryEnv::new()).unwrap_err();

    assert!(matches!(err, ConfigError::TimeLayoutRequired { ref var } if var == "ENV_WHEN"));
}

#[test]
fn test_defined_empty_value_still_converts() {
    let schema = Schema::new().field(FieldSpec::new("port", "APP_PORT", FieldKind::U16));

    let err = schema.parse(&MemoryEnv::new().with("APP_PORT", "")).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "APP_PORT"));
}

#[test]
fn test_defined_empty_value_beats_default() {
    let schema = Schema::new().field(FieldSpec::new("foo", "FOO", FieldKind::String).default("bar"));

    let parsed = schema.parse(&MemoryEnv::new().with("FOO", "")).unwrap();

    assert_eq!(parsed.get::<String>("foo").unwrap(), "");
}

#[test]
fn test_required_field_must_be_defined() {
    let schema = Schema::new().field(
        FieldSpec::new("foo", "ENV_FOO", FieldKind::String)
            .required()
            .default("fooValue"),
    );

    let err = schema.parse(&MemoryEnv::new()).unwrap_err();
    assert!(matches!(err, ConfigError::RequiredField { ref var } if var == "ENV_FOO"));

    // Defined as empty satisfies `required`.
    let parsed = schema.parse(&MemoryEnv::new().with("ENV_FOO", "")).unwrap();
    assert_eq!(parsed.get::<String>("foo").unwrap(), "");
}

#[test]
fn test_not_empty_rejects_blank_values_and_blank_defaults() {
    let schema = Schema::new().field(FieldSpec::new("bar", "ENV_BAR", FieldKind::I32).not_empty());

    let err = schema.parse(&MemoryEnv::new().with("ENV_BAR", "  ")).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyField { ref var } if var == "ENV_BAR"));

    let err = schema.parse(&MemoryEnv::new()).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyField { .. }));

    let parsed = schema.parse(&MemoryEnv::new().with("ENV_BAR", "7")).unwrap();
    assert_eq!(parsed.get::<i32>("bar").unwrap(), 7);
}

#[test]
fn test_time_field_without_layout_is_an_error() {
    let schema = Schema::new().field(FieldSpec::new("when", "ENV_WHEN", FieldKind::Time));

    let err = schema
        .parse(&MemoryEnv::new().with("ENV_WHEN", "2021-12-24"))
        .unwrap_err();

    assert!(matches!(err, ConfigError::TimeLayoutRequired { ref var } if var == "ENV_WHEN"));
}

#[test]
fn test_invalid_value_names_the_variable() {
    let schema = Schema::new().field(FieldSpec::new("port", "APP_PORT", FieldKind::U16));

    let err = schema
        .parse(&MemoryEnv::new().with("APP_PORT", "70000"))
        .unwrap_err();

    match err {
        ConfigError::InvalidValue { var, message } => {
            assert_eq!(var, "APP_PORT");
            assert!(message.contains("70000"), "{message}");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn test_first_failing_field_aborts() {
    let schema = Schema::new()
        .field(FieldSpec::new("a", "A", FieldKind::String).required())
        .field(FieldSpec::new("b", "B", FieldKind::Bool));

    let err = schema.parse(&MemoryEnv::new().with("B", "maybe")).unwrap_err();

    assert!(matches!(err, ConfigError::RequiredField { .. }));
}

#[test]
fn test_get_reports_unknown_fields_and_mismatches() {
    let schema = Schema::new()
        .field(FieldSpec::new("flag", "FLAG", FieldKind::Bool).default("true"))
        .field(FieldSpec::new("small", "SMALL", FieldKind::U64).default("300"));
    let parsed = schema.parse(&MemoryEnv::new()).unwrap();

    assert!(parsed.get::<bool>("flag").unwrap());
    assert!(matches!(
        parsed.get::<bool>("missing"),
        Err(ConfigError::UnknownField(ref f)) if f == "missing"
    ));
    assert!(matches!(
        parsed.get::<String>("flag"),
        Err(ConfigError::TypeMismatch { expected: "string", found: "boolean", .. })
    ));
    assert_eq!(parsed.get::<u16>("small").unwrap(), 300);
    assert!(matches!(
        parsed.get::<u8>("small"),
        Err(ConfigError::TypeMismatch { expected: "u8", .. })
    ));
}

#[test]
fn test_parsed_config_keeps_schema_order() {
    let schema = Schema::new()
        .field(FieldSpec::new("z", "Z", FieldKind::String).default("1"))
        .field(FieldSpec::new("a", "A", FieldKind::String).default("2"));

    let parsed = schema.parse(&MemoryEnv::new()).unwrap();

    let names: Vec<&str> = parsed.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["z", "a"]);
    assert_eq!(parsed.len(), 2);
}

#[test]
fn test_context_parse_sees_overrides_over_store() {
    let store = dummy_env();

    let parsed: Dummy = with_overrides([("TEST_INT8", "99"), ("TEST_DURATION", "1h30m")], |ctx| {
        parse_from(&ctx.over(&store))
    })
    .unwrap();

    assert_eq!(parsed.int8, 99);
    assert_eq!(parsed.duration, Duration::from_secs(5400));
    assert_eq!(parsed.string, "lorem");
}
