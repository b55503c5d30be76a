//! Numeric bounds rule
//!
//! Applies to `number` and `range` fields. An answer that does not parse as a
//! finite number skips the bound checks entirely; it is not flagged here.

use super::{FieldRule, RuleCategory, RuleContext, RuleOutcome};
use crate::schema::FieldSchema;
use crate::value::FieldValue;

/// Result of a bounds check
#[derive(Debug, Clone, PartialEq)]
pub enum BoundsCheckResult {
    WithinBounds,
    BelowMinimum { value: f64, min: f64 },
    AboveMaximum { value: f64, max: f64 },
    NotANumber,
}

/// Fails when a numeric answer lies outside `minValue..=maxValue`
pub struct NumericBoundsRule;

impl NumericBoundsRule {
    /// Compare a raw answer against the field's bounds
    pub fn check_bounds(schema: &FieldSchema, text: &str) -> BoundsCheckResult {
        let value = match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => return BoundsCheckResult::NotANumber,
        };

        if let Some(min) = schema.min_value {
            if value < min {
                return BoundsCheckResult::BelowMinimum { value, min };
            }
        }

        if let Some(max) = schema.max_value {
            if value > max {
                return BoundsCheckResult::AboveMaximum { value, max };
            }
        }

        BoundsCheckResult::WithinBounds
    }
}

impl FieldRule for NumericBoundsRule {
    fn id(&self) -> &str {
        "numeric_bounds"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Bounds
    }

    fn applies_to(&self, schema: &FieldSchema) -> bool {
        schema.behavior().numeric && (schema.min_value.is_some() || schema.max_value.is_some())
    }

    fn check(&self, schema: &FieldSchema, value: &FieldValue, _context: &RuleContext) -> RuleOutcome {
        let FieldValue::Scalar(text) = value else {
            return RuleOutcome::Pass;
        };

        match Self::check_bounds(schema, text) {
            BoundsCheckResult::BelowMinimum { min, .. } => {
                RuleOutcome::Fail(format!("{} must be at least {}", schema.label, min))
            }
            BoundsCheckResult::AboveMaximum { max, .. } => {
                RuleOutcome::Fail(format!("{} must be at most {}", schema.label, max))
            }
            BoundsCheckResult::WithinBounds | BoundsCheckResult::NotANumber => RuleOutcome::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn age() -> FieldSchema {
        FieldSchema::new("a", "Age", FieldType::Number).with_bounds(Some(5.0), Some(10.0))
    }

    fn check(schema: &FieldSchema, text: &str) -> RuleOutcome {
        NumericBoundsRule.check(schema, &text.into(), &RuleContext::default())
    }

    #[test]
    fn test_bounds_messages() {
        let schema = age();
        assert_eq!(check(&schema, "3"), RuleOutcome::Fail("Age must be at least 5".to_string()));
        assert_eq!(check(&schema, "10.5"), RuleOutcome::Fail("Age must be at most 10".to_string()));
        assert_eq!(check(&schema, "5"), RuleOutcome::Pass);
        assert_eq!(check(&schema, "10"), RuleOutcome::Pass);
        assert_eq!(check(&schema, " 7 "), RuleOutcome::Pass);
    }

    #[test]
    fn test_fractional_bound_in_message() {
        let schema = FieldSchema::new("w", "Weight", FieldType::Range).with_bounds(Some(0.5), None);
        assert_eq!(check(&schema, "0.25"), RuleOutcome::Fail("Weight must be at least 0.5".to_string()));
    }

    #[test]
    fn test_unparseable_skips_bounds() {
        let schema = age();
        for text in ["notanumber", "", "12abc", "NaN", "inf"] {
            assert_eq!(check(&schema, text), RuleOutcome::Pass, "{text}");
        }
    }

    #[test]
    fn test_only_numeric_types() {
        let text = FieldSchema::new("t", "T", FieldType::Text).with_bounds(Some(5.0), None);
        assert!(!NumericBoundsRule.applies_to(&text));
        assert!(NumericBoundsRule.applies_to(&age()));

        let unbounded = FieldSchema::new("n", "N", FieldType::Number);
        assert!(!NumericBoundsRule.applies_to(&unbounded));
    }
}
