//! Declarative input/output schemas for abilities.
//!
//! A schema is a closed tagged type over the five field kinds an ability
//! contract may use. Each kind carries only the constraints that make sense
//! for it, so validation is a plain recursive match (see [`validate`]).

mod validate;

pub use validate::{TypedInput, validate, validate_input, validate_output};

use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String(StringSchema),
    Integer(IntegerSchema),
    Boolean(BooleanSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
}

impl Schema {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Value substituted when an optional property is omitted.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            Self::String(s) => s.default.clone().map(Value::String),
            Self::Integer(s) => s.default.map(Value::from),
            Self::Boolean(s) => s.default.map(Value::Bool),
            Self::Array(_) | Self::Object(_) => None,
        }
    }

    /// Render as a JSON Schema document for discovery.
    pub fn to_json(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("type".into(), json!(self.type_name()));

        let description = match self {
            Self::String(s) => {
                if let Some(allowed) = &s.allowed {
                    doc.insert("enum".into(), json!(allowed));
                }
                if let Some(default) = &s.default {
                    doc.insert("default".into(), json!(default));
                }
                s.description.as_deref()
            }
            Self::Integer(s) => {
                if let Some(default) = s.default {
                    doc.insert("default".into(), json!(default));
                }
                if let Some(minimum) = s.minimum {
                    doc.insert("minimum".into(), json!(minimum));
                }
                if let Some(maximum) = s.maximum {
                    doc.insert("maximum".into(), json!(maximum));
                }
                s.description.as_deref()
            }
            Self::Boolean(s) => {
                if let Some(default) = s.default {
                    doc.insert("default".into(), json!(default));
                }
                s.description.as_deref()
            }
            Self::Array(s) => {
                if let Some(items) = &s.items {
                    doc.insert("items".into(), items.to_json());
                }
                s.description.as_deref()
            }
            Self::Object(s) => {
                if !s.required.is_empty() {
                    doc.insert("required".into(), json!(s.required));
                }
                let properties: Map<String, Value> = s
                    .properties
                    .iter()
                    .map(|(name, schema)| (name.clone(), schema.to_json()))
                    .collect();
                doc.insert("properties".into(), Value::Object(properties));
                if !s.additional_properties {
                    doc.insert("additionalProperties".into(), json!(false));
                }
                s.description.as_deref()
            }
        };

        if let Some(description) = description {
            doc.insert("description".into(), json!(description));
        }
        Value::Object(doc)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringSchema {
    pub allowed: Option<Vec<String>>,
    pub default: Option<String>,
    pub description: Option<String>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(ToString::to_string).collect());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(value.to_string());
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegerSchema {
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub default: Option<i64>,
    pub description: Option<String>,
}

impl IntegerSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn max(mut self, maximum: i64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn default_value(mut self, value: i64) -> Self {
        self.default = Some(value);
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BooleanSchema {
    pub default: Option<bool>,
    pub description: Option<String>,
}

impl BooleanSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: bool) -> Self {
        self.default = Some(value);
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    pub items: Option<Box<Schema>>,
    pub description: Option<String>,
}

impl ArraySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(items: impl Into<Schema>) -> Self {
        Self {
            items: Some(Box::new(items.into())),
            description: None,
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Object schema; properties keep declaration order for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub properties: Vec<(String, Schema)>,
    pub required: Vec<String>,
    pub additional_properties: bool,
    pub description: Option<String>,
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self {
            properties: Vec::new(),
            required: Vec::new(),
            additional_properties: true,
            description: None,
        }
    }
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: &str, schema: impl Into<Schema>) -> Self {
        self.properties.push((name.to_string(), schema.into()));
        self
    }

    pub fn required(mut self, names: &[&str]) -> Self {
        self.required
            .extend(names.iter().map(ToString::to_string));
        self
    }

    /// Reject keys that are not declared properties.
    pub fn closed(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, schema)| schema)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    pub fn to_json(&self) -> Value {
        Schema::Object(self.clone()).to_json()
    }
}

impl From<StringSchema> for Schema {
    fn from(schema: StringSchema) -> Self {
        Self::String(schema)
    }
}

impl From<IntegerSchema> for Schema {
    fn from(schema: IntegerSchema) -> Self {
        Self::Integer(schema)
    }
}

impl From<BooleanSchema> for Schema {
    fn from(schema: BooleanSchema) -> Self {
        Self::Boolean(schema)
    }
}

impl From<ArraySchema> for Schema {
    fn from(schema: ArraySchema) -> Self {
        Self::Array(schema)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Self::Object(schema)
    }
}
