//! Required answer rule

use super::{FieldRule, RuleCategory, RuleContext, RuleOutcome};
use crate::schema::{FieldSchema, FieldType};
use crate::value::FieldValue;

/// Fails when a required field holds the empty value of its shape
///
/// An unchecked box only counts as missing for `checkbox` fields. Scalars
/// made of whitespace count as missing.
pub struct RequiredRule;

impl RequiredRule {
    pub fn is_missing(schema: &FieldSchema, value: &FieldValue) -> bool {
        match value {
            FieldValue::Scalar(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Flag(checked) => !checked && schema.field_type == FieldType::Checkbox,
        }
    }
}

impl FieldRule for RequiredRule {
    fn id(&self) -> &str {
        "required"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Required
    }

    fn applies_to(&self, schema: &FieldSchema) -> bool {
        schema.required
    }

    fn check(&self, schema: &FieldSchema, value: &FieldValue, _context: &RuleContext) -> RuleOutcome {
        if Self::is_missing(schema, value) {
            RuleOutcome::Fail(format!("{} is required", schema.label))
        } else {
            RuleOutcome::Pass
        }
    }
}
