//! Rule framework for answer validation
//!
//! Each rule looks at one (field, value) pair and either passes, fails with
//! a message, or stops evaluation of the remaining rules for that field.

pub mod bounds;
pub mod pattern;
pub mod required;
pub mod selection;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::InterpreterConfig;
use crate::schema::FieldSchema;
use crate::value::FieldValue;

pub use bounds::NumericBoundsRule;
pub use pattern::PatternRule;
pub use required::RequiredRule;
pub use selection::{ScalarOnlyRule, SelectionLimitRule};

/// Categories of validation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Required answer is missing
    Required,
    /// Too many options selected
    SelectionLimit,
    /// Scalar-only rules are skipped for flags and lists
    Shape,
    /// Answer does not match the field pattern
    Pattern,
    /// Numeric answer outside the field bounds
    Bounds,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Required => write!(f, "required"),
            RuleCategory::SelectionLimit => write!(f, "selection_limit"),
            RuleCategory::Shape => write!(f, "shape"),
            RuleCategory::Pattern => write!(f, "pattern"),
            RuleCategory::Bounds => write!(f, "bounds"),
        }
    }
}

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Continue with the next rule
    Pass,
    /// The answer is rejected with this message
    Fail(String),
    /// Accept the answer without running the remaining rules
    Stop,
}

/// Settings rules may consult during evaluation
#[derive(Debug, Clone)]
pub struct RuleContext {
    /// Upper bound on compiled pattern size
    pub regex_size_limit: usize,
    /// Skip pattern checks for empty answers
    pub pattern_skips_empty: bool,
}

impl Default for RuleContext {
    fn default() -> Self {
        Self::from_config(&InterpreterConfig::default())
    }
}

impl RuleContext {
    pub fn from_config(config: &InterpreterConfig) -> Self {
        Self {
            regex_size_limit: config.regex_size_limit,
            pattern_skips_empty: config.pattern_skips_empty,
        }
    }
}

/// Trait for implementing validation rules
///
/// Rules are pure: the same schema and value always give the same outcome.
pub trait FieldRule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &str;

    /// Category reported on failures
    fn category(&self) -> RuleCategory;

    /// Check if this rule is relevant for the field at all
    fn applies_to(&self, _schema: &FieldSchema) -> bool {
        true
    }

    /// Evaluate the rule
    fn check(&self, schema: &FieldSchema, value: &FieldValue, context: &RuleContext) -> RuleOutcome;
}

/// A boxed rule for dynamic dispatch
pub type BoxedRule = Box<dyn FieldRule>;

/// Built-in rules in evaluation order
pub fn default_rules() -> Vec<BoxedRule> {
    vec![
        Box::new(RequiredRule),
        Box::new(SelectionLimitRule),
        Box::new(ScalarOnlyRule),
        Box::new(PatternRule),
        Box::new(NumericBoundsRule),
    ]
}
