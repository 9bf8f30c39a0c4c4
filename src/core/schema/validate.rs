use super::{ObjectSchema, Schema};
use crate::error::ValidationError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Input that passed validation, with declared defaults filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedInput(Map<String, Value>);

impl TypedInput {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Deserialize into the handler's typed input struct.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ValidationError> {
        serde_json::from_value(Value::Object(self.0)).map_err(|e| ValidationError::InvalidFormat {
            field: String::new(),
            message: e.to_string(),
        })
    }
}

/// Validate a raw invocation input against an ability's object schema.
///
/// An absent (`null`) input is treated as an empty object so abilities whose
/// fields are all optional can be invoked without a body.
pub fn validate_input(schema: &ObjectSchema, raw: Value) -> Result<TypedInput, ValidationError> {
    let raw = if raw.is_null() {
        Value::Object(Map::new())
    } else {
        raw
    };

    validate_object(schema, &raw, "").map(TypedInput)
}

/// Validate any value against a schema, returning it with defaults applied.
///
/// Pure: never touches anything but its arguments.
pub fn validate(schema: &Schema, value: &Value) -> Result<Value, ValidationError> {
    validate_at(schema, value, "")
}

/// Check a handler's output against its declared object schema.
pub fn validate_output(schema: &ObjectSchema, output: &Value) -> Result<(), ValidationError> {
    validate_object(schema, output, "").map(|_| ())
}

fn validate_at(schema: &Schema, value: &Value, path: &str) -> Result<Value, ValidationError> {
    match schema {
        Schema::String(s) => {
            let Value::String(text) = value else {
                return Err(mismatch(path, schema, value));
            };
            if let Some(allowed) = &s.allowed
                && !allowed.iter().any(|candidate| candidate == text)
            {
                return Err(ValidationError::InvalidEnumValue {
                    field: path.to_string(),
                    value: text.clone(),
                    allowed: allowed.clone(),
                });
            }
            Ok(value.clone())
        }
        Schema::Integer(s) => {
            let Some(number) = value.as_i64() else {
                // Whole numbers past i64::MAX still parse as integers.
                return Err(match value.as_u64() {
                    Some(huge) => ValidationError::OutOfRange {
                        field: path.to_string(),
                        value: huge.into(),
                        bounds: describe_bounds(s.minimum, Some(s.maximum.unwrap_or(i64::MAX))),
                    },
                    None => mismatch(path, schema, value),
                });
            };
            let below = s.minimum.is_some_and(|min| number < min);
            let above = s.maximum.is_some_and(|max| number > max);
            if below || above {
                return Err(ValidationError::OutOfRange {
                    field: path.to_string(),
                    value: number.into(),
                    bounds: describe_bounds(s.minimum, s.maximum),
                });
            }
            Ok(value.clone())
        }
        Schema::Boolean(_) => {
            if value.is_boolean() {
                Ok(value.clone())
            } else {
                Err(mismatch(path, schema, value))
            }
        }
        Schema::Array(s) => {
            let Value::Array(items) = value else {
                return Err(mismatch(path, schema, value));
            };
            let Some(item_schema) = &s.items else {
                return Ok(value.clone());
            };
            items
                .iter()
                .enumerate()
                .map(|(index, item)| validate_at(item_schema, item, &format!("{path}[{index}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        Schema::Object(s) => validate_object(s, value, path).map(Value::Object),
    }
}

fn validate_object(
    schema: &ObjectSchema,
    value: &Value,
    path: &str,
) -> Result<Map<String, Value>, ValidationError> {
    let Value::Object(map) = value else {
        return Err(ValidationError::TypeMismatch {
            field: path.to_string(),
            expected: "object",
            found: json_type(value),
        });
    };

    if !schema.additional_properties
        && let Some(unknown) = map.keys().find(|key| schema.get(key).is_none())
    {
        return Err(ValidationError::UnknownField {
            field: join(path, unknown),
        });
    }

    let mut out = Map::new();
    for (name, property) in &schema.properties {
        if let Some(present) = map.get(name) {
            let checked = validate_at(property, present, &join(path, name))?;
            out.insert(name.clone(), checked);
        }
    }

    for (name, property) in &schema.properties {
        if map.contains_key(name) {
            continue;
        }
        if schema.is_required(name) {
            return Err(ValidationError::MissingField {
                field: join(path, name),
            });
        }
        if let Some(default) = property.default_value() {
            out.insert(name.clone(), default);
        }
    }

    if schema.additional_properties {
        for (key, extra) in map {
            out.entry(key.clone()).or_insert_with(|| extra.clone());
        }
    }

    Ok(out)
}

fn mismatch(path: &str, schema: &Schema, value: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        field: path.to_string(),
        expected: schema.type_name(),
        found: json_type(value),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn describe_bounds(minimum: Option<i64>, maximum: Option<i64>) -> String {
    match (minimum, maximum) {
        (Some(min), Some(max)) => format!("{min}..={max}"),
        (Some(min), None) => format!(">= {min}"),
        (None, Some(max)) => format!("<= {max}"),
        (None, None) => "any".to_string(),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
