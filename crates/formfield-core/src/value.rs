//! In-memory answer values
//!
//! Every answer is one of three shapes. Which shape a field holds is decided
//! by its schema (see [`FieldSchema::shape`](crate::schema::FieldSchema::shape)),
//! never by inspecting the value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The value shape a field declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueShape {
    /// Single string
    Scalar,
    /// Boolean checkbox state
    Flag,
    /// Ordered list of option labels
    List,
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Scalar => write!(f, "scalar"),
            ValueShape::Flag => write!(f, "flag"),
            ValueShape::List => write!(f, "list"),
        }
    }
}

/// A typed answer for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    Flag(bool),
    List(Vec<String>),
}

impl FieldValue {
    /// The normalized "nothing entered" value for a shape
    pub fn empty(shape: ValueShape) -> Self {
        match shape {
            ValueShape::Scalar => FieldValue::Scalar(String::new()),
            ValueShape::Flag => FieldValue::Flag(false),
            ValueShape::List => FieldValue::List(Vec::new()),
        }
    }

    /// Shape of this value
    pub fn shape(&self) -> ValueShape {
        match self {
            FieldValue::Scalar(_) => ValueShape::Scalar,
            FieldValue::Flag(_) => ValueShape::Flag,
            FieldValue::List(_) => ValueShape::List,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Scalar(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Scalar(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}
