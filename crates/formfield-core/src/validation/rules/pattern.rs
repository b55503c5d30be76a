//! Pattern rule for scalar answers

use regex::RegexBuilder;

use super::{FieldRule, RuleCategory, RuleContext, RuleOutcome};
use crate::schema::FieldSchema;
use crate::value::FieldValue;

/// Fails when a scalar answer does not match the field's pattern
///
/// A pattern that does not compile, or compiles beyond the configured size
/// limit, is treated as absent.
pub struct PatternRule;

impl PatternRule {
    fn failure_message(schema: &FieldSchema) -> String {
        match schema.validation_message.as_deref().filter(|m| !m.is_empty()) {
            Some(message) => message.to_string(),
            None => format!("Invalid {}", schema.label),
        }
    }
}

impl FieldRule for PatternRule {
    fn id(&self) -> &str {
        "pattern"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Pattern
    }

    fn applies_to(&self, schema: &FieldSchema) -> bool {
        schema
            .regex_pattern
            .as_deref()
            .map_or(false, |p| !p.is_empty())
    }

    fn check(&self, schema: &FieldSchema, value: &FieldValue, context: &RuleContext) -> RuleOutcome {
        let (Some(pattern), FieldValue::Scalar(text)) = (schema.regex_pattern.as_deref(), value) else {
            return RuleOutcome::Pass;
        };

        if text.is_empty() && context.pattern_skips_empty {
            return RuleOutcome::Pass;
        }

        let regex = match RegexBuilder::new(pattern)
            .size_limit(context.regex_size_limit)
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                tracing::debug!(field = %schema.id, error = %e, "Ignoring unusable field pattern");
                return RuleOutcome::Pass;
            }
        };

        if regex.is_match(text) {
            RuleOutcome::Pass
        } else {
            RuleOutcome::Fail(Self::failure_message(schema))
        }
    }
}
