use serde_json::{Map, Number, Value};

use super::registry::{ParamKind, ParameterSpec};
use crate::error::{FncallError, Result};

/// Parse the model's serialized argument payload.
///
/// An empty payload means "no arguments". Anything that is not valid JSON is a
/// malformed response; valid JSON that is not an object is an argument error.
pub fn parse_arguments(capability: &str, raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let value: Value = serde_json::from_str(raw).map_err(|e| {
        FncallError::malformed(format!(
            "arguments for '{}' are not valid JSON: {}",
            capability, e
        ))
    })?;

    if !value.is_object() {
        return Err(FncallError::invalid_arguments(
            capability,
            format!("expected a JSON object, got: {}", value),
        ));
    }

    Ok(value)
}

/// Build the argument object the executor will see: declared parameters only,
/// defaults filled in for missing optional ones, values coerced to their kind.
pub fn apply_parameters(
    capability: &str,
    params: &[ParameterSpec],
    raw: &Value,
) -> Result<Value> {
    let supplied = raw.as_object().ok_or_else(|| {
        FncallError::invalid_arguments(capability, "expected a JSON object")
    })?;

    let mut prepared = Map::new();
    for param in params {
        match supplied.get(&param.name).filter(|v| !v.is_null()) {
            Some(value) => {
                prepared.insert(param.name.clone(), coerce(param.kind, value));
            }
            None if param.required => {
                return Err(FncallError::invalid_arguments(
                    capability,
                    format!("missing required argument: {}", param.name),
                ));
            }
            None => {
                if let Some(default) = &param.default {
                    prepared.insert(param.name.clone(), default.clone());
                }
            }
        }
    }

    Ok(Value::Object(prepared))
}

// Values that can't be coerced are returned untouched; schema validation
// reports them.
fn coerce(kind: ParamKind, value: &Value) -> Value {
    match (kind, value) {
        (ParamKind::Integer, Value::Number(n)) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.is_finite() => Value::from(f as i64),
            _ => value.clone(),
        },
        (ParamKind::Integer, Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| value.clone()),
        (ParamKind::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| value.clone()),
        (ParamKind::Boolean, Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}
