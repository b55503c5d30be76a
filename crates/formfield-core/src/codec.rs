//! Conversion between stored wire strings and typed answer values
//!
//! Storage keeps one string per answer. In the legacy encoding, lists are
//! JSON arrays inside that string and checkbox states are the literals
//! `"Yes"`/`"No"`. The tagged encoding stores a discriminated payload
//! instead, so nothing has to be sniffed on the way back.
//!
//! When the schema is known, always decode with [`ValueCodec::decode_as`].
//! [`decode`] is the schema-less heuristic kept for stored answers whose field
//! is gone.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{InterpreterConfig, WireFormat};
use crate::error::{FormError, Result};
use crate::schema::FieldSchema;
use crate::value::{FieldValue, ValueShape};

/// Default wire literal for a checked checkbox
pub const FLAG_TRUE: &str = "Yes";
/// Default wire literal for an unchecked checkbox
pub const FLAG_FALSE: &str = "No";

/// Schema-less decode of a legacy wire string
///
/// Only a JSON array becomes a list. Anything else, including text that
/// happens to parse as a JSON number or object, stays a scalar holding the
/// original string.
pub fn decode(wire: &str) -> FieldValue {
    match serde_json::from_str::<Value>(wire) {
        Ok(Value::Array(items)) => FieldValue::List(list_items(items)),
        _ => FieldValue::Scalar(wire.to_string()),
    }
}

/// Legacy encode with the default checkbox literals
pub fn encode(value: &FieldValue) -> String {
    ValueCodec::default().encode(value)
}

/// Decode a wire string that must become a list
///
/// An empty string is an empty list; a non-array string is a one-item list.
pub fn decode_list(wire: &str) -> FieldValue {
    match decode(wire) {
        list @ FieldValue::List(_) => list,
        _ if wire.is_empty() => FieldValue::List(Vec::new()),
        _ => FieldValue::List(vec![wire.to_string()]),
    }
}

fn list_items(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Legacy string codec with configurable checkbox literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCodec {
    flag_true: String,
    flag_false: String,
}

impl Default for ValueCodec {
    fn default() -> Self {
        Self::new(FLAG_TRUE, FLAG_FALSE)
    }
}

impl ValueCodec {
    pub fn new(flag_true: impl Into<String>, flag_false: impl Into<String>) -> Self {
        Self {
            flag_true: flag_true.into(),
            flag_false: flag_false.into(),
        }
    }

    pub fn from_config(config: &InterpreterConfig) -> Self {
        Self::new(config.flag_true.clone(), config.flag_false.clone())
    }

    /// Encode a value into its legacy wire string
    pub fn encode(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Scalar(s) => s.clone(),
            FieldValue::Flag(true) => self.flag_true.clone(),
            FieldValue::Flag(false) => self.flag_false.clone(),
            FieldValue::List(items) => serde_json::to_string(items).unwrap_or_default(),
        }
    }

    /// Decode a legacy wire string into the given shape
    pub fn decode_as(&self, shape: ValueShape, wire: &str) -> FieldValue {
        match shape {
            ValueShape::Scalar => FieldValue::Scalar(wire.to_string()),
            ValueShape::Flag => FieldValue::Flag(self.is_true_literal(wire)),
            ValueShape::List => decode_list(wire),
        }
    }

    fn is_true_literal(&self, text: &str) -> bool {
        let text = text.trim();
        text == self.flag_true || text.eq_ignore_ascii_case("true")
    }

    /// Coerce one raw client value into the field's declared shape
    ///
    /// A missing or null value becomes the empty value of the shape, so the
    /// validator never sees "missing".
    pub fn normalize_client(&self, schema: &FieldSchema, raw: Option<&Value>) -> Result<FieldValue> {
        let shape = schema.shape();
        let raw = match raw {
            None | Some(Value::Null) => return Ok(FieldValue::empty(shape)),
            Some(raw) => raw,
        };

        let mismatch = || FormError::ShapeMismatch {
            field: schema.id.to_string(),
            expected: shape,
            found: json_kind(raw).to_string(),
        };

        match (shape, raw) {
            (ValueShape::Flag, Value::Bool(b)) => Ok(FieldValue::Flag(*b)),
            (ValueShape::Flag, Value::String(s)) => Ok(FieldValue::Flag(self.is_true_literal(s))),
            (ValueShape::Flag, Value::Number(n)) => Ok(FieldValue::Flag(n.as_f64() != Some(0.0))),
            (ValueShape::List, Value::Array(items)) => Ok(FieldValue::List(list_items(items.clone()))),
            (ValueShape::List, Value::String(s)) => Ok(decode_list(s)),
            (ValueShape::List, Value::Number(n)) => Ok(FieldValue::List(vec![n.to_string()])),
            (ValueShape::Scalar, Value::String(s)) => Ok(FieldValue::Scalar(s.clone())),
            (ValueShape::Scalar, Value::Number(n)) => Ok(FieldValue::Scalar(n.to_string())),
            (ValueShape::Scalar, Value::Bool(b)) => Ok(FieldValue::Scalar(b.to_string())),
            _ => Err(mismatch()),
        }
    }
}

/// Discriminated storage payload for one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TaggedValue {
    Scalar(String),
    List(Vec<String>),
    Flag(bool),
}

impl From<&FieldValue> for TaggedValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Scalar(s) => TaggedValue::Scalar(s.clone()),
            FieldValue::Flag(b) => TaggedValue::Flag(*b),
            FieldValue::List(items) => TaggedValue::List(items.clone()),
        }
    }
}

impl From<TaggedValue> for FieldValue {
    fn from(value: TaggedValue) -> Self {
        match value {
            TaggedValue::Scalar(s) => FieldValue::Scalar(s),
            TaggedValue::Flag(b) => FieldValue::Flag(b),
            TaggedValue::List(items) => FieldValue::List(items),
        }
    }
}

/// Storage encoding for answers
pub trait WireCodec: Send + Sync {
    /// Encoding name
    fn format(&self) -> WireFormat;

    /// Encode one answer
    fn encode(&self, value: &FieldValue) -> String;

    /// Decode one stored answer into the given shape
    fn decode(&self, shape: ValueShape, wire: &str) -> FieldValue;
}

/// Legacy plain-string storage
#[derive(Debug, Clone, Default)]
pub struct LegacyCodec {
    codec: ValueCodec,
}

impl LegacyCodec {
    pub fn new(codec: ValueCodec) -> Self {
        Self { codec }
    }
}

impl WireCodec for LegacyCodec {
    fn format(&self) -> WireFormat {
        WireFormat::Legacy
    }

    fn encode(&self, value: &FieldValue) -> String {
        self.codec.encode(value)
    }

    fn decode(&self, shape: ValueShape, wire: &str) -> FieldValue {
        self.codec.decode_as(shape, wire)
    }
}

/// Discriminated JSON storage
///
/// Rows written before the switch are still legacy strings; those decode
/// through the legacy path.
#[derive(Debug, Clone, Default)]
pub struct TaggedCodec {
    legacy: ValueCodec,
}

impl TaggedCodec {
    pub fn new(legacy: ValueCodec) -> Self {
        Self { legacy }
    }
}

impl WireCodec for TaggedCodec {
    fn format(&self) -> WireFormat {
        WireFormat::Tagged
    }

    fn encode(&self, value: &FieldValue) -> String {
        serde_json::to_string(&TaggedValue::from(value)).unwrap_or_default()
    }

    fn decode(&self, shape: ValueShape, wire: &str) -> FieldValue {
        match serde_json::from_str::<TaggedValue>(wire) {
            Ok(tagged) => {
                let value = FieldValue::from(tagged);
                if value.shape() == shape {
                    value
                } else {
                    self.legacy.decode_as(shape, &self.legacy.encode(&value))
                }
            }
            Err(_) => self.legacy.decode_as(shape, wire),
        }
    }
}

/// Build the storage codec selected by the configuration
pub fn wire_codec(config: &InterpreterConfig) -> Box<dyn WireCodec> {
    let codec = ValueCodec::from_config(config);
    match config.wire_format {
        WireFormat::Legacy => Box::new(LegacyCodec::new(codec)),
        WireFormat::Tagged => Box::new(TaggedCodec::new(codec)),
    }
}
