//! Answer validation
//!
//! The [`Validator`] runs an ordered rule list over one field at a time. The
//! first failing rule decides the field's error; nothing after it runs.
//! Validating a form checks every field before anything is submitted.

pub mod rules;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::InterpreterConfig;
use crate::schema::{FieldId, FieldSchema, FormSchema};
use crate::value::FieldValue;
use rules::{BoxedRule, RuleCategory, RuleContext, RuleOutcome};

/// A rejected answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field_id: FieldId,
    pub message: String,
    /// Rule that rejected the answer
    pub rule: RuleCategory,
}

/// Outcome of validating a whole form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Errors in schema field order, at most one per field
    pub errors: Vec<FieldError>,
    /// Number of fields checked
    pub fields_checked: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error messages keyed by field id
    pub fn messages(&self) -> BTreeMap<FieldId, String> {
        self.errors
            .iter()
            .map(|e| (e.field_id.clone(), e.message.clone()))
            .collect()
    }

    pub fn error_for(&self, id: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field_id.as_str() == id)
    }
}

/// Runs validation rules over answers
pub struct Validator {
    rules: Vec<BoxedRule>,
    context: RuleContext,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a validator with the built-in rules and default settings
    pub fn new() -> Self {
        Self {
            rules: rules::default_rules(),
            context: RuleContext::default(),
        }
    }

    /// Create a validator with the built-in rules and the given settings
    pub fn from_config(config: &InterpreterConfig) -> Self {
        Self {
            rules: rules::default_rules(),
            context: RuleContext::from_config(config),
        }
    }

    /// Create a validator with no rules
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            context: RuleContext::default(),
        }
    }

    /// Append a rule after the existing ones
    pub fn register(&mut self, rule: BoxedRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[BoxedRule] {
        &self.rules
    }

    /// Validate one answer
    ///
    /// Values of any shape are accepted; each rule decides what it checks.
    pub fn validate(&self, schema: &FieldSchema, value: &FieldValue) -> Option<FieldError> {
        if !schema.accepts(value) {
            tracing::debug!(
                field = %schema.id,
                expected = %schema.shape(),
                actual = %value.shape(),
                "Validating a value of another shape"
            );
        }

        for rule in self.rules.iter().filter(|r| r.applies_to(schema)) {
            match rule.check(schema, value, &self.context) {
                RuleOutcome::Pass => continue,
                RuleOutcome::Stop => return None,
                RuleOutcome::Fail(message) => {
                    tracing::debug!(field = %schema.id, rule = rule.id(), "Answer rejected");
                    return Some(FieldError {
                        field_id: schema.id.clone(),
                        message,
                        rule: rule.category(),
                    });
                }
            }
        }

        None
    }

    /// Validate every field of a form
    ///
    /// Fields absent from `values` are checked as their empty value.
    pub fn validate_form(
        &self,
        form: &FormSchema,
        values: &BTreeMap<FieldId, FieldValue>,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        for field in form {
            let empty;
            let value = match values.get(&field.id) {
                Some(value) => value,
                None => {
                    empty = FieldValue::empty(field.shape());
                    &empty
                }
            };

            report.fields_checked += 1;
            if let Some(error) = self.validate(field, value) {
                report.errors.push(error);
            }
        }

        report
    }
}
