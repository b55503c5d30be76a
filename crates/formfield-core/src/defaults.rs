//! Initial value resolution
//!
//! Seeds the value map once, when a form is loaded. The result is only a
//! starting point: it must not be recomputed after the respondent starts
//! editing, or in-progress answers would be overwritten.

use std::collections::BTreeMap;

use crate::codec;
use crate::schema::{FieldId, FieldSchema, FieldType, FormSchema};
use crate::value::{FieldValue, ValueShape};

/// Range bounds assumed when a range field leaves them unset
pub const RANGE_DEFAULT_MIN: f64 = 0.0;
pub const RANGE_DEFAULT_MAX: f64 = 10.0;

/// Computes the starting value of a field from its schema
#[derive(Debug, Clone, Default)]
pub struct DefaultResolver;

impl DefaultResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the default for one field
    ///
    /// `None` means the field starts out empty.
    pub fn resolve(&self, schema: &FieldSchema) -> Option<FieldValue> {
        if let Some(literal) = schema.default_value.as_deref().filter(|d| !d.is_empty()) {
            return Some(Self::from_literal(schema, literal));
        }

        if schema.is_multi_valued() {
            let selected = schema
                .options
                .iter()
                .filter(|o| o.is_default)
                .map(|o| o.label.clone())
                .collect();
            return Some(FieldValue::List(selected));
        }

        if schema.field_type == FieldType::Checkbox {
            return Some(FieldValue::Flag(false));
        }

        if schema.field_type == FieldType::Range {
            return Some(FieldValue::Scalar(range_midpoint(
                schema.min_value,
                schema.max_value,
            )));
        }

        schema
            .options
            .iter()
            .find(|o| o.is_default)
            .map(|o| FieldValue::Scalar(o.label.clone()))
    }

    /// Seed the value map for a whole form
    ///
    /// Fields without a default are left out of the map.
    pub fn seed(&self, form: &FormSchema) -> BTreeMap<FieldId, FieldValue> {
        form.iter()
            .filter_map(|field| self.resolve(field).map(|v| (field.id.clone(), v)))
            .collect()
    }

    /// Seed a value for every field, using the empty value where no default applies
    pub fn initial_values(&self, form: &FormSchema) -> BTreeMap<FieldId, FieldValue> {
        form.iter()
            .map(|field| {
                let value = self
                    .resolve(field)
                    .unwrap_or_else(|| FieldValue::empty(field.shape()));
                (field.id.clone(), value)
            })
            .collect()
    }

    fn from_literal(schema: &FieldSchema, literal: &str) -> FieldValue {
        match schema.shape() {
            ValueShape::Flag => FieldValue::Flag(literal == "true"),
            ValueShape::List => codec::decode_list(literal),
            ValueShape::Scalar => FieldValue::Scalar(literal.to_string()),
        }
    }
}

/// Integer midpoint of a range, as a decimal string
///
/// Uses floor division: 0..9 gives "4", 0..10 gives "5".
pub fn range_midpoint(min: Option<f64>, max: Option<f64>) -> String {
    let lo = min.unwrap_or(RANGE_DEFAULT_MIN);
    let hi = max.unwrap_or(RANGE_DEFAULT_MAX);
    // + 0.0 folds a negative zero into zero
    let mid = ((lo + hi) / 2.0).floor() + 0.0;
    format!("{}", mid)
}
