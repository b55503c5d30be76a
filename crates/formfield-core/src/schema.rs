//! Field and form schema definitions
//!
//! A [`FieldSchema`] is the data-only description of one form input. It is
//! built from the JSON payload the persistence layer stores for a form
//! version. Parsing is lenient: malformed option lists, unknown field types
//! and oddly typed constraint values degrade to sensible defaults instead of
//! failing the whole form.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{FormError, Result};
use crate::render::ControlKind;
use crate::value::{FieldValue, ValueShape};

/// Opaque field identifier, unique within one form version
///
/// Accepts JSON strings and numbers on the wire; always held as a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for FieldId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(FieldId(s)),
            Value::Number(n) => Ok(FieldId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "field id must be a string or number, got {}",
                other
            ))),
        }
    }
}

/// Closed set of field types
///
/// Unknown wire tags are kept verbatim in [`FieldType::Other`] and behave
/// like a single-line text field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Email,
    Number,
    Range,
    Date,
    Time,
    DateTime,
    Select,
    Radio,
    Checkbox,
    CheckboxGroup,
    Other(String),
}

/// Per-type behavior, looked up through [`FieldType::behavior`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBehavior {
    /// Control presented for a single-valued instance of the type
    pub control: ControlKind,
    /// `minValue`/`maxValue` apply and the value is parsed as a number
    pub numeric: bool,
    /// The value is always a list, regardless of `allowMultiple`
    pub always_multi: bool,
    /// The value is a boolean flag
    pub flag: bool,
}

impl FieldBehavior {
    const fn scalar(control: ControlKind) -> Self {
        Self {
            control,
            numeric: false,
            always_multi: false,
            flag: false,
        }
    }

    const fn numeric(control: ControlKind) -> Self {
        Self {
            numeric: true,
            ..Self::scalar(control)
        }
    }
}

impl FieldType {
    /// The single dispatch table from type tag to behavior
    pub fn behavior(&self) -> FieldBehavior {
        match self {
            FieldType::Text | FieldType::Other(_) => FieldBehavior::scalar(ControlKind::TextInput),
            FieldType::Textarea => FieldBehavior::scalar(ControlKind::TextArea),
            FieldType::Email => FieldBehavior::scalar(ControlKind::EmailInput),
            FieldType::Number => FieldBehavior::numeric(ControlKind::NumberInput),
            FieldType::Range => FieldBehavior::numeric(ControlKind::Slider),
            FieldType::Date => FieldBehavior::scalar(ControlKind::DateInput),
            FieldType::Time => FieldBehavior::scalar(ControlKind::TimeInput),
            FieldType::DateTime => FieldBehavior::scalar(ControlKind::DateTimeInput),
            FieldType::Select => FieldBehavior::scalar(ControlKind::Dropdown),
            FieldType::Radio => FieldBehavior::scalar(ControlKind::RadioGroup),
            FieldType::Checkbox => FieldBehavior {
                flag: true,
                ..FieldBehavior::scalar(ControlKind::Checkbox)
            },
            FieldType::CheckboxGroup => FieldBehavior {
                always_multi: true,
                ..FieldBehavior::scalar(ControlKind::CheckboxGroup)
            },
        }
    }

    /// Wire tag for this type
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Range => "range",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::CheckboxGroup => "checkbox-group",
            FieldType::Other(tag) => tag,
        }
    }

    /// Whether the tag was recognized
    pub fn is_known(&self) -> bool {
        !matches!(self, FieldType::Other(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parsed = match s.trim().to_lowercase().as_str() {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "email" => FieldType::Email,
            "number" => FieldType::Number,
            "range" => FieldType::Range,
            "date" => FieldType::Date,
            "time" => FieldType::Time,
            "datetime" | "datetime-local" => FieldType::DateTime,
            "select" => FieldType::Select,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            "checkbox-group" | "checkbox_group" | "checkboxgroup" => FieldType::CheckboxGroup,
            _ => FieldType::Other(s.to_string()),
        };
        Ok(parsed)
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        let parsed: FieldType = match s.parse() {
            Ok(t) => t,
            Err(never) => match never {},
        };
        if !parsed.is_known() {
            tracing::debug!(field_type = %s, "Unrecognized field type, using text behavior");
        }
        parsed
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.as_str().to_string()
    }
}

/// One selectable option; the label doubles as the stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub label: String,
    #[serde(default)]
    pub is_default: bool,
}

impl FieldOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_default: false,
        }
    }

    pub fn default_selected(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            is_default: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Full(FieldOption),
    Bare(String),
}

impl From<RawOption> for FieldOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Full(option) => option,
            RawOption::Bare(label) => FieldOption::new(label),
        }
    }
}

/// Parse an option list from its stored form
///
/// Accepts an array or a string holding a JSON array. Anything malformed
/// yields an empty list.
pub fn parse_options(raw: Value) -> Vec<FieldOption> {
    let value = match raw {
        Value::Null => return Vec::new(),
        Value::String(text) if text.trim().is_empty() => return Vec::new(),
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Malformed options JSON, using empty option list");
                return Vec::new();
            }
        },
        other => other,
    };

    match serde_json::from_value::<Vec<RawOption>>(value) {
        Ok(options) => options.into_iter().map(FieldOption::from).collect(),
        Err(e) => {
            tracing::debug!(error = %e, "Malformed option list, using empty option list");
            Vec::new()
        }
    }
}

fn lenient_options<'de, D>(deserializer: D) -> std::result::Result<Vec<FieldOption>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.map(parse_options).unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    };
    Ok(parsed)
}

fn lenient_limit<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let limit = lenient_number(deserializer)?.and_then(|n| {
        if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
            Some(n as u32)
        } else {
            tracing::debug!(selection_limit = n, "Ignoring invalid selection limit");
            None
        }
    });
    Ok(limit)
}

fn lenient_type<'de, D>(deserializer: D) -> std::result::Result<FieldType, D::Error>
where
    D: Deserializer<'de>,
{
    let field_type = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => FieldType::Text,
        Some(Value::String(s)) => FieldType::from(s),
        Some(other) => {
            tracing::debug!(field_type = %other, "Non-string field type, using text behavior");
            FieldType::Other(other.to_string())
        }
    };
    Ok(field_type)
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    };
    Ok(text)
}

/// Immutable description of one form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub id: FieldId,

    #[serde(default)]
    pub label: String,

    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,

    #[serde(default)]
    pub allow_multiple: bool,

    #[serde(default, deserialize_with = "lenient_limit", skip_serializing_if = "Option::is_none")]
    pub selection_limit: Option<u32>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default, deserialize_with = "lenient_options")]
    pub options: Vec<FieldOption>,
}

impl FieldSchema {
    /// Create a field with no constraints
    pub fn new(id: impl Into<FieldId>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            required: false,
            placeholder: None,
            help_text: None,
            regex_pattern: None,
            validation_message: None,
            allow_multiple: false,
            selection_limit: None,
            min_value: None,
            max_value: None,
            default_value: None,
            options: Vec::new(),
        }
    }

    /// Parse a field from its JSON payload
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FormError::schema_error(format!("Invalid field definition: {}", e)))
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Attach a pattern and optional custom failure message
    pub fn with_pattern(mut self, pattern: impl Into<String>, message: Option<&str>) -> Self {
        self.regex_pattern = Some(pattern.into());
        self.validation_message = message.map(str::to_string);
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn with_selection_limit(mut self, limit: u32) -> Self {
        self.selection_limit = Some(limit);
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = FieldOption>,
    {
        self.options = options.into_iter().collect();
        self
    }

    /// Behavior of this field's type
    pub fn behavior(&self) -> FieldBehavior {
        self.field_type.behavior()
    }

    /// Whether answers to this field are lists
    ///
    /// `allowMultiple` turns any non-checkbox field into a list field.
    pub fn is_multi_valued(&self) -> bool {
        let behavior = self.behavior();
        !behavior.flag && (behavior.always_multi || self.allow_multiple)
    }

    /// The value shape this field declares
    pub fn shape(&self) -> ValueShape {
        if self.behavior().flag {
            ValueShape::Flag
        } else if self.is_multi_valued() {
            ValueShape::List
        } else {
            ValueShape::Scalar
        }
    }

    /// Whether `value` has the shape this field declares
    pub fn accepts(&self, value: &FieldValue) -> bool {
        value.shape() == self.shape()
    }

    /// Position of an option label in schema order
    pub fn option_index(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|o| o.label == label)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawForm {
    Bare(Vec<FieldSchema>),
    Versioned {
        #[serde(default)]
        version: u32,
        fields: Vec<FieldSchema>,
    },
}

/// Ordered field list for one form version
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawForm")]
pub struct FormSchema {
    pub version: u32,
    pub fields: Vec<FieldSchema>,
}

impl From<RawForm> for FormSchema {
    fn from(raw: RawForm) -> Self {
        match raw {
            RawForm::Bare(fields) => FormSchema { version: 0, fields },
            RawForm::Versioned { version, fields } => FormSchema { version, fields },
        }
    }
}

impl FormSchema {
    pub fn new(version: u32, fields: Vec<FieldSchema>) -> Self {
        Self { version, fields }
    }

    /// Parse a form from a JSON array of fields or a `{version, fields}` object
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a form from an already parsed document
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| FormError::schema_error(format!("Invalid form definition: {}", e)))
    }

    /// Look up a field by id
    pub fn field(&self, id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id.as_str() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSchema> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FormSchema {
    type Item = &'a FieldSchema;
    type IntoIter = std::slice::Iter<'a, FieldSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
