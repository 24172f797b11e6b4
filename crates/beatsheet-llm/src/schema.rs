//! Structural JSON-schema validation.
//!
//! Covers the subset of JSON Schema the pipeline emits: `type`, `required`,
//! `properties`, `items`, `minItems`/`maxItems`, `minimum`/`maximum`, and
//! `minLength`. Validation is deterministic and reports the path of the first
//! violation.

use serde_json::Value;

use crate::error::{LlmError, LlmResult};

/// Validate parsed JSON against a schema.
///
/// Returns `LlmError::SchemaViolation` with the offending path on failure.
pub fn validate_json_schema(data: &Value, schema: &Value) -> LlmResult<()> {
    validate_node(data, schema, "$").map_err(LlmError::SchemaViolation)
}

fn validate_node(data: &Value, schema: &Value, path: &str) -> Result<(), String> {
    if let Some(expected) = schema.get("type").and_then(Value::as_str) {
        if !type_matches(data, expected) {
            return Err(format!(
                "{}: expected type {}, got {}",
                path,
                expected,
                type_name(data)
            ));
        }
    }

    if let Some(obj) = data.as_object() {
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for field in required.iter().filter_map(Value::as_str) {
                if !obj.contains_key(field) {
                    return Err(format!("{}: missing required field '{}'", path, field));
                }
            }
        }
        if let Some(props) = schema.get("properties").and_then(Value::as_object) {
            for (key, sub_schema) in props {
                if let Some(value) = obj.get(key) {
                    validate_node(value, sub_schema, &format!("{}.{}", path, key))?;
                }
            }
        }
    }

    if let Some(arr) = data.as_array() {
        if let Some(min) = schema.get("minItems").and_then(Value::as_u64) {
            if (arr.len() as u64) < min {
                return Err(format!(
                    "{}: array has {} items, minimum is {}",
                    path,
                    arr.len(),
                    min
                ));
            }
        }
        if let Some(max) = schema.get("maxItems").and_then(Value::as_u64) {
            if (arr.len() as u64) > max {
                return Err(format!(
                    "{}: array has {} items, maximum is {}",
                    path,
                    arr.len(),
                    max
                ));
            }
        }
        if let Some(item_schema) = schema.get("items") {
            for (i, item) in arr.iter().enumerate() {
                validate_node(item, item_schema, &format!("{}[{}]", path, i))?;
            }
        }
    }

    if let Some(n) = data.as_f64() {
        if let Some(min) = schema.get("minimum").and_then(Value::as_f64) {
            if n < min {
                return Err(format!("{}: {} is below minimum {}", path, n, min));
            }
        }
        if let Some(max) = schema.get("maximum").and_then(Value::as_f64) {
            if n > max {
                return Err(format!("{}: {} is above maximum {}", path, n, max));
            }
        }
    }

    if let Some(s) = data.as_str() {
        if let Some(min) = schema.get("minLength").and_then(Value::as_u64) {
            if (s.chars().count() as u64) < min {
                return Err(format!(
                    "{}: string length {} is below minLength {}",
                    path,
                    s.chars().count(),
                    min
                ));
            }
        }
    }

    Ok(())
}

fn type_matches(data: &Value, expected: &str) -> bool {
    match expected {
        "object" => data.is_object(),
        "array" => data.is_array(),
        "string" => data.is_string(),
        "integer" => data.is_i64() || data.is_u64(),
        "number" => data.is_number(),
        "boolean" => data.is_boolean(),
        "null" => data.is_null(),
        _ => true,
    }
}

fn type_name(data: &Value) -> &'static str {
    match data {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
