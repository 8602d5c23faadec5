//! Schema Generation
//!
//! Describes data shapes and derives strict JSON Schemas from them. The same
//! shape drives three things: tool parameter schemas, the structured-output
//! response format, and validation of payloads coming back from the model.
//!
//! Every object schema is closed (`additionalProperties: false`) and nested
//! shapes are expanded inline, which is what strict structured-output modes
//! expect.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{AgentError, Result};

/// A data shape: the semantic type of a value
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    String,
    Integer,
    Number,
    Boolean,
    /// String restricted to a fixed set of values
    Enum(Vec<String>),
    Array(Box<Shape>),
    Object(ObjectShape),
    /// The inner shape or `null`; nullable fields are not required
    Nullable(Box<Shape>),
}

/// A record: named fields plus type-level metadata
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectShape {
    /// Type name (used to name response formats)
    pub name: String,

    /// Type-level description
    pub description: Option<String>,

    /// Fields in declaration order
    pub fields: Vec<Field>,
}

/// A named field of an object shape
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
    pub description: Option<String>,
}

impl ObjectShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Attach a type-level description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a field without a description
    pub fn field(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.fields.push(Field {
            name: name.into(),
            shape,
            description: None,
        });
        self
    }

    /// Add a described field
    pub fn described_field(
        mut self,
        name: impl Into<String>,
        shape: Shape,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            shape,
            description: Some(description.into()),
        });
        self
    }

    /// Finish as a `Shape`
    pub fn build(self) -> Shape {
        Shape::Object(self)
    }
}

/// Types that can describe their own shape
pub trait Shaped {
    fn shape() -> Shape;
}

macro_rules! impl_shaped {
    ($shape:expr => $($ty:ty),+) => {
        $(impl Shaped for $ty {
            fn shape() -> Shape {
                $shape
            }
        })+
    };
}

impl_shaped!(Shape::String => String, char);
impl_shaped!(Shape::Boolean => bool);
impl_shaped!(Shape::Integer => i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);
impl_shaped!(Shape::Number => f32, f64);

impl<T: Shaped> Shaped for Vec<T> {
    fn shape() -> Shape {
        Shape::Array(Box::new(T::shape()))
    }
}

impl<T: Shaped> Shaped for Option<T> {
    fn shape() -> Shape {
        Shape::Nullable(Box::new(T::shape()))
    }
}

impl Shape {
    /// Shape of `T`
    pub fn of<T: Shaped>() -> Shape {
        T::shape()
    }

    pub fn array(items: Shape) -> Shape {
        Shape::Array(Box::new(items))
    }

    pub fn nullable(inner: Shape) -> Shape {
        Shape::Nullable(Box::new(inner))
    }

    /// Object name, if this is an object shape
    pub fn name(&self) -> Option<&str> {
        match self {
            Shape::Object(object) => Some(&object.name),
            Shape::Nullable(inner) => inner.name(),
            _ => None,
        }
    }

    /// Type-level description, if any
    pub fn description(&self) -> Option<&str> {
        match self {
            Shape::Object(object) => object.description.as_deref(),
            Shape::Nullable(inner) => inner.description(),
            _ => None,
        }
    }

    fn is_nullable(&self) -> bool {
        matches!(self, Shape::Nullable(_))
    }

    /// Check a JSON value against this shape.
    ///
    /// Returns the path and reason of the first mismatch.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), ShapeViolation> {
        self.validate_at("$", value)
    }

    fn validate_at(&self, path: &str, value: &Value) -> std::result::Result<(), ShapeViolation> {
        let mismatch = |expected: &str| ShapeViolation {
            path: path.to_string(),
            reason: format!("expected {}, found {}", expected, kind_of(value)),
        };

        match self {
            Shape::String => value.is_string().then_some(()).ok_or_else(|| mismatch("string")),
            Shape::Boolean => value.is_boolean().then_some(()).ok_or_else(|| mismatch("boolean")),
            Shape::Number => value.is_number().then_some(()).ok_or_else(|| mismatch("number")),
            Shape::Integer => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(()),
                _ => Err(mismatch("integer")),
            },
            Shape::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.iter().any(|a| a == s) => Ok(()),
                Some(s) => Err(ShapeViolation {
                    path: path.to_string(),
                    reason: format!("'{}' is not one of {:?}", s, allowed),
                }),
                None => Err(mismatch("string")),
            },
            Shape::Nullable(inner) => match value {
                Value::Null => Ok(()),
                other => inner.validate_at(path, other),
            },
            Shape::Array(items) => {
                let elements = value.as_array().ok_or_else(|| mismatch("array"))?;
                for (i, element) in elements.iter().enumerate() {
                    items.validate_at(&format!("{}[{}]", path, i), element)?;
                }
                Ok(())
            }
            Shape::Object(object) => {
                let map = value.as_object().ok_or_else(|| mismatch("object"))?;

                if let Some(unknown) = map
                    .keys()
                    .find(|key| !object.fields.iter().any(|f| &f.name == *key))
                {
                    return Err(ShapeViolation {
                        path: path.to_string(),
                        reason: format!("unknown field '{}'", unknown),
                    });
                }

                for field in &object.fields {
                    let field_path = format!("{}.{}", path, field.name);
                    match map.get(&field.name) {
                        Some(v) => field.shape.validate_at(&field_path, v)?,
                        None if field.shape.is_nullable() => {}
                        None => {
                            return Err(ShapeViolation {
                                path: field_path,
                                reason: "missing required field".into(),
                            })
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// A payload that does not fit its shape
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeViolation {
    /// JSON path of the offending value (`$.weather[0].suburb`)
    pub path: String,
    pub reason: String,
}

impl std::fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Generate the JSON Schema for a shape.
///
/// `serde_json::Map` keeps keys sorted, so equal shapes always serialize to
/// identical text.
pub fn json_schema(shape: &Shape) -> Value {
    match shape {
        Shape::String => json!({ "type": "string" }),
        Shape::Integer => json!({ "type": "integer" }),
        Shape::Number => json!({ "type": "number" }),
        Shape::Boolean => json!({ "type": "boolean" }),
        Shape::Enum(values) => json!({ "type": "string", "enum": values }),
        Shape::Array(items) => json!({ "type": "array", "items": json_schema(items) }),
        Shape::Nullable(inner) => {
            let mut schema = json_schema(inner);
            match schema.get("type").cloned() {
                Some(Value::String(ty)) => {
                    schema["type"] = json!([ty, "null"]);
                    schema
                }
                _ => json!({ "anyOf": [schema, { "type": "null" }] }),
            }
        }
        Shape::Object(object) => {
            let mut properties = Map::new();
            let mut required = Vec::new();

            for field in &object.fields {
                let mut property = json_schema(&field.shape);
                if let Some(description) = &field.description {
                    property["description"] = json!(description);
                }
                properties.insert(field.name.clone(), property);
                if !field.shape.is_nullable() {
                    required.push(json!(field.name));
                }
            }

            let mut schema = json!({
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            });
            if let Some(description) = &object.description {
                schema["description"] = json!(description);
            }
            schema
        }
    }
}

/// Schema as compact JSON text
pub fn schema_text(shape: &Shape) -> String {
    json_schema(shape).to_string()
}

/// Schema for a `Shaped` type
pub fn schema_for<T: Shaped>() -> Value {
    json_schema(&T::shape())
}

/// Decode a model payload as `T`, enforcing `T`'s shape first.
///
/// Any failure is a `SchemaViolation` carrying the raw payload.
pub fn decode_structured<T: Shaped + DeserializeOwned>(payload: &str) -> Result<T> {
    let violation = |message: String| AgentError::SchemaViolation {
        message,
        payload: payload.to_string(),
    };

    let value: Value = serde_json::from_str(payload).map_err(|e| violation(e.to_string()))?;
    T::shape()
        .validate(&value)
        .map_err(|v| violation(v.to_string()))?;
    serde_json::from_value(value).map_err(|e| violation(e.to_string()))
}

/// Check that a type's hand-written shape agrees with its serde form:
/// `sample` must serialize to a value the shape accepts and decode back.
pub fn check_shape<T: Shaped + Serialize + DeserializeOwned>(sample: &T) -> Result<()> {
    let value = serde_json::to_value(sample)?;
    T::shape()
        .validate(&value)
        .map_err(|v| AgentError::SchemaViolation {
            message: v.to_string(),
            payload: value.to_string(),
        })?;
    serde_json::from_value::<T>(value)?;
    Ok(())
}
