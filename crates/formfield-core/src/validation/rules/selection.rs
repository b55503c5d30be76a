//! Selection rules for list answers

use super::{FieldRule, RuleCategory, RuleContext, RuleOutcome};
use crate::schema::FieldSchema;
use crate::value::FieldValue;

/// Fails when a list answer has more items than the selection limit
pub struct SelectionLimitRule;

impl FieldRule for SelectionLimitRule {
    fn id(&self) -> &str {
        "selection_limit"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::SelectionLimit
    }

    fn applies_to(&self, schema: &FieldSchema) -> bool {
        schema.selection_limit.is_some()
    }

    fn check(&self, schema: &FieldSchema, value: &FieldValue, _context: &RuleContext) -> RuleOutcome {
        match (value, schema.selection_limit) {
            (FieldValue::List(items), Some(limit)) if items.len() > limit as usize => {
                RuleOutcome::Fail(format!("You can select at most {} option(s)", limit))
            }
            _ => RuleOutcome::Pass,
        }
    }
}

/// Accepts flags and lists outright; later rules only understand scalars
pub struct ScalarOnlyRule;

impl FieldRule for ScalarOnlyRule {
    fn id(&self) -> &str {
        "scalar_only"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Shape
    }

    fn check(&self, _schema: &FieldSchema, value: &FieldValue, _context: &RuleContext) -> RuleOutcome {
        match value {
            FieldValue::Scalar(_) => RuleOutcome::Pass,
            FieldValue::Flag(_) | FieldValue::List(_) => RuleOutcome::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn list(items: &[&str]) -> FieldValue {
        FieldValue::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_selection_limit() {
        let schema = FieldSchema::new("g", "Pick", FieldType::CheckboxGroup).with_selection_limit(2);
        let ctx = RuleContext::default();

        assert_eq!(
            SelectionLimitRule.check(&schema, &list(&["a", "b", "c"]), &ctx),
            RuleOutcome::Fail("You can select at most 2 option(s)".to_string())
        );
        assert_eq!(SelectionLimitRule.check(&schema, &list(&["a", "b"]), &ctx), RuleOutcome::Pass);
    }

    #[test]
    fn test_zero_limit_rejects_any_selection() {
        let schema = FieldSchema::new("g", "Pick", FieldType::CheckboxGroup).with_selection_limit(0);
        let ctx = RuleContext::default();
        assert!(matches!(SelectionLimitRule.check(&schema, &list(&["a"]), &ctx), RuleOutcome::Fail(_)));
        assert_eq!(SelectionLimitRule.check(&schema, &list(&[]), &ctx), RuleOutcome::Pass);
    }

    #[test]
    fn test_scalar_only_short_circuit() {
        let schema = FieldSchema::new("x", "X", FieldType::Text);
        let ctx = RuleContext::default();
        assert_eq!(ScalarOnlyRule.check(&schema, &FieldValue::Flag(true), &ctx), RuleOutcome::Stop);
        assert_eq!(ScalarOnlyRule.check(&schema, &list(&["a"]), &ctx), RuleOutcome::Stop);
        assert_eq!(ScalarOnlyRule.check(&schema, &"a".into(), &ctx), RuleOutcome::Pass);
    }
}
