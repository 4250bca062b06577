//! Reusable field filters
//!
//! These filters transform submitted field values before validation

use anyhow::Result;
use serde_json::{Number, Value};

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: treat an empty string as a missing value
pub fn empty_as_null() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| match value {
        Value::String(s) if s.is_empty() => Ok(Value::Null),
        other => Ok(other),
    }
}

/// Filter: coerce a numeric string into a number
///
/// An empty string coerces to `0`. Strings that do not hold a finite number
/// are left as they are, so the numeric validator reports them.
pub fn to_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        let Some(s) = value.as_str() else {
            return Ok(value);
        };
        if s.is_empty() {
            return Ok(Value::Number(Number::from(0)));
        }
        match s.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(num) => Ok(Value::Number(num)),
            None => Ok(value),
        }
    }
}
