//! Reusable field validators
//!
//! A validator inspects one filtered field value and returns the message to
//! show the user when it rejects it. Validators that only apply to one JSON
//! type let other types through so that a single bad value yields a single
//! message.

use crate::core::invoice::to_minor_units;
use serde_json::Value;

/// Validator: field is present (not null)
pub fn required(
    message: impl Into<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    let message = message.into();
    move |_: &str, value: &Value| {
        if value.is_null() {
            Err(message.clone())
        } else {
            Ok(())
        }
    }
}

/// Validator: present values must be strings
pub fn string(
    message: impl Into<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    let message = message.into();
    move |_: &str, value: &Value| {
        if value.is_null() || value.is_string() {
            Ok(())
        } else {
            Err(message.clone())
        }
    }
}

/// Validator: value must be a finite number, null included
pub fn numeric(
    message: impl Into<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    let message = message.into();
    move |_: &str, value: &Value| match value.as_f64() {
        Some(num) if num.is_finite() => Ok(()),
        _ => Err(message.clone()),
    }
}

/// Validator: amount must be at least one minor unit once converted
///
/// Judges the value the store will receive, so a fraction of a cent that
/// rounds to zero is rejected here rather than by the database.
pub fn positive_amount(
    message: impl Into<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    let message = message.into();
    move |_: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if to_minor_units(num) < 1 {
                Err(message.clone())
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: number must not exceed maximum
pub fn max_value(
    max: f64,
    message: impl Into<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    let message = message.into();
    move |_: &str, value: &Value| {
        if let Some(num) = value.as_f64() {
            if num > max {
                Err(message.clone())
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be one of the allowed strings
///
/// Null is left to [`required`].
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| {
        let received = match value {
            Value::Null => return Ok(()),
            Value::String(s) if allowed.contains(s) => return Ok(()),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let expected: Vec<String> = allowed.iter().map(|a| format!("'{}'", a)).collect();
        Err(format!(
            "Invalid enum value. Expected {}, received '{}'",
            expected.join(" | "),
            received
        ))
    }
}
