//! Declarative body shapes and the single generic decoder.
//!
//! A route declares its body as a list of [`FieldSpec`]s. [`BodyShape::decode`]
//! checks a raw body against that list, applies defaults, converts lax inputs
//! (numeric strings, `"true"`/`"false"`) and returns a [`DecodedBody`] with
//! typed accessors. Every field problem is collected, not just the first.

use serde_json::{Map, Number, Value};

use crate::error::{GravityError, Result};
use crate::protocol::request::RawBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Mapping,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::Text => "string",
            FieldType::Mapping => "object",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    /// Convert a JSON value to this type, or `None` if not convertible.
    /// `null` never converts.
    fn convert(self, v: &Value) -> Option<Value> {
        match (self, v) {
            (FieldType::Text, Value::String(_)) => Some(v.clone()),
            (FieldType::Mapping, Value::Object(_)) => Some(v.clone()),

            (FieldType::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => Some(v.clone()),
            (FieldType::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),

            (FieldType::Number, Value::Number(n)) => n.as_f64().and_then(Number::from_f64).map(Value::Number),
            (FieldType::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),

            (FieldType::Boolean, Value::Bool(_)) => Some(v.clone()),
            (FieldType::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One declared field. `default == None` means required.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn required(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, default: None }
    }

    pub fn optional(name: &'static str, ty: FieldType, default: impl Into<Value>) -> Self {
        Self {
            name,
            ty,
            default: Some(default.into()),
        }
    }
}

/// Declared schema for a route body. Empty shape = body ignored.
#[derive(Debug, Clone, Default)]
pub struct BodyShape {
    fields: Vec<FieldSpec>,
}

impl BodyShape {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate `body` against this shape.
    pub fn decode(&self, body: &RawBody) -> Result<DecodedBody> {
        if self.is_empty() {
            return Ok(DecodedBody::default());
        }

        let empty = Map::new();
        let input = match body {
            RawBody::Empty => &empty,
            RawBody::Json(Value::Object(m)) => m,
            RawBody::Json(other) => {
                return Err(GravityError::BadRequest(format!(
                    "request body must be a JSON object, got {}",
                    json_kind(other)
                )))
            }
            RawBody::Malformed(reason) => return Err(GravityError::BadRequest(reason.clone())),
        };

        let mut out = Map::with_capacity(self.fields.len());
        let mut problems = Vec::new();

        for spec in &self.fields {
            match (input.get(spec.name), &spec.default) {
                (Some(v), _) => match spec.ty.convert(v) {
                    Some(converted) => {
                        out.insert(spec.name.to_string(), converted);
                    }
                    None => problems.push(format!(
                        "{}: expected {}, got {}",
                        spec.name,
                        spec.ty.name(),
                        json_kind(v)
                    )),
                },
                (None, Some(default)) => {
                    out.insert(spec.name.to_string(), default.clone());
                }
                (None, None) => problems.push(format!("{}: field required", spec.name)),
            }
        }

        if problems.is_empty() {
            Ok(DecodedBody { fields: out })
        } else {
            tracing::debug!(count = problems.len(), "body shape rejected");
            Err(GravityError::BadRequest(format!(
                "invalid request body: {}",
                problems.join("; ")
            )))
        }
    }
}

/// Body after shape validation: every declared field present and typed.
///
/// Accessor errors are `Internal`: a handler asking for an undeclared field
/// or the wrong type is a wiring bug, not bad client input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedBody {
    fields: Map<String, Value>,
}

impl DecodedBody {
    fn require(&self, name: &str) -> Result<&Value> {
        self.fields
            .get(name)
            .ok_or_else(|| GravityError::Internal(format!("undeclared body field: {name}")))
    }

    fn mismatch(name: &str, want: FieldType) -> GravityError {
        GravityError::Internal(format!("body field {name} is not a {}", want.name()))
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| Self::mismatch(name, FieldType::Text))
    }

    pub fn mapping(&self, name: &str) -> Result<&Map<String, Value>> {
        self.require(name)?
            .as_object()
            .ok_or_else(|| Self::mismatch(name, FieldType::Mapping))
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.require(name)?
            .as_i64()
            .ok_or_else(|| Self::mismatch(name, FieldType::Integer))
    }

    pub fn number(&self, name: &str) -> Result<f64> {
        self.require(name)?
            .as_f64()
            .ok_or_else(|| Self::mismatch(name, FieldType::Number))
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| Self::mismatch(name, FieldType::Boolean))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ask_shape() -> BodyShape {
        BodyShape::empty()
            .field(FieldSpec::required("query", FieldType::Text))
            .field(FieldSpec::optional("context", FieldType::Text, ""))
            .field(FieldSpec::optional("model", FieldType::Text, "gemini-pro"))
    }

    #[test]
    fn defaults_fill_missing_optionals() {
        let body = RawBody::Json(json!({ "query": "What is X?" }));
        let d = ask_shape().decode(&body).unwrap();
        assert_eq!(d.text("query").unwrap(), "What is X?");
        assert_eq!(d.text("context").unwrap(), "");
        assert_eq!(d.text("model").unwrap(), "gemini-pro");
    }

    #[test]
    fn all_problems_reported() {
        let body = RawBody::Json(json!({ "model": 7 }));
        let err = ask_shape().decode(&body).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("query: field required"), "{msg}");
        assert!(msg.contains("model: expected string, got number"), "{msg}");
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    }

    #[test]
    fn null_is_not_a_default() {
        let body = RawBody::Json(json!({ "query": "q", "model": null }));
        assert!(ask_shape().decode(&body).is_err());
    }

    #[test]
    fn lax_scalar_conversion() {
        let shape = BodyShape::empty()
            .field(FieldSpec::required("n", FieldType::Integer))
            .field(FieldSpec::required("x", FieldType::Number))
            .field(FieldSpec::required("b", FieldType::Boolean));
        let d = shape
            .decode(&RawBody::Json(json!({ "n": " 12 ", "x": 3, "b": "false" })))
            .unwrap();
        assert_eq!(d.integer("n").unwrap(), 12);
        assert_eq!(d.number("x").unwrap(), 3.0);
        assert!(!d.boolean("b").unwrap());

        assert!(shape
            .decode(&RawBody::Json(json!({ "n": 1.5, "x": 1, "b": true })))
            .is_err());
    }

    #[test]
    fn empty_shape_ignores_body() {
        assert!(BodyShape::empty().is_empty());
        assert!(!ask_shape().is_empty());
        let d = BodyShape::empty()
            .decode(&RawBody::Malformed("garbage".into()))
            .unwrap();
        assert!(d.as_map().is_empty());
    }

    #[test]
    fn non_object_body_rejected() {
        let err = ask_shape().decode(&RawBody::Json(json!(["query"]))).unwrap_err();
        assert!(err.to_string().contains("got array"));
    }

    #[test]
    fn accessor_misuse_is_internal() {
        let d = ask_shape()
            .decode(&RawBody::Json(json!({ "query": "q" })))
            .unwrap();
        assert_eq!(d.mapping("query").unwrap_err().client_code().as_str(), "INTERNAL_ERROR");
        assert_eq!(d.text("nope").unwrap_err().client_code().as_str(), "INTERNAL_ERROR");
    }
}
