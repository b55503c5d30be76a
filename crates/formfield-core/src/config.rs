//! Interpreter configuration
//!
//! Settings are read from code (builder), from the environment
//! (`FORMFIELD_*` variables) or from a serialized document loaded by the
//! caller. Unparseable values fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Persistence encoding used when answers are handed to storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// One plain string per answer; lists are JSON arrays inside the string
    #[default]
    Legacy,
    /// Discriminated `{"kind": ..., "value": ...}` payload per answer
    Tagged,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireFormat::Legacy => write!(f, "legacy"),
            WireFormat::Tagged => write!(f, "tagged"),
        }
    }
}

impl FromStr for WireFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(WireFormat::Legacy),
            "tagged" => Ok(WireFormat::Tagged),
            _ => Err(format!("Unknown wire format: {}", s)),
        }
    }
}

/// Interpreter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Wire literal for a checked checkbox
    pub flag_true: String,

    /// Wire literal for an unchecked checkbox
    pub flag_false: String,

    /// Encoding used for stored answers
    pub wire_format: WireFormat,

    /// Upper bound on the compiled size of a field pattern, in bytes
    pub regex_size_limit: usize,

    /// Skip the pattern rule for empty scalars
    pub pattern_skips_empty: bool,

    /// Lowest accepted submission rating
    pub rating_min: u8,

    /// Highest accepted submission rating
    pub rating_max: u8,

    /// Maximum length of the submission comment, in characters
    pub max_comment_len: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            flag_true: "Yes".to_string(),
            flag_false: "No".to_string(),
            wire_format: WireFormat::Legacy,
            regex_size_limit: 256 * 1024,
            pattern_skips_empty: false,
            rating_min: 1,
            rating_max: 5,
            max_comment_len: 5000,
        }
    }
}

impl InterpreterConfig {
    /// Create a new config builder
    pub fn builder() -> InterpreterConfigBuilder {
        InterpreterConfigBuilder::new()
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            flag_true: lookup("FORMFIELD_FLAG_TRUE").unwrap_or(defaults.flag_true),
            flag_false: lookup("FORMFIELD_FLAG_FALSE").unwrap_or(defaults.flag_false),
            wire_format: parsed(&lookup, "FORMFIELD_WIRE_FORMAT").unwrap_or(defaults.wire_format),
            regex_size_limit: parsed(&lookup, "FORMFIELD_REGEX_SIZE_LIMIT")
                .unwrap_or(defaults.regex_size_limit),
            pattern_skips_empty: parsed(&lookup, "FORMFIELD_PATTERN_SKIPS_EMPTY")
                .unwrap_or(defaults.pattern_skips_empty),
            rating_min: parsed(&lookup, "FORMFIELD_RATING_MIN").unwrap_or(defaults.rating_min),
            rating_max: parsed(&lookup, "FORMFIELD_RATING_MAX").unwrap_or(defaults.rating_max),
            max_comment_len: parsed(&lookup, "FORMFIELD_MAX_COMMENT_LEN")
                .unwrap_or(defaults.max_comment_len),
        }
    }
}

/// Look up `key` and parse it; missing or unparseable values are `None`
fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

/// Builder for InterpreterConfig
pub struct InterpreterConfigBuilder {
    config: InterpreterConfig,
}

impl InterpreterConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            config: InterpreterConfig::default(),
        }
    }

    /// Set the wire literals used for checkbox answers
    pub fn flag_literals(mut self, yes: impl Into<String>, no: impl Into<String>) -> Self {
        self.config.flag_true = yes.into();
        self.config.flag_false = no.into();
        self
    }

    /// Set the storage encoding
    pub fn wire_format(mut self, format: WireFormat) -> Self {
        self.config.wire_format = format;
        self
    }

    /// Set the compiled pattern size limit
    pub fn regex_size_limit(mut self, bytes: usize) -> Self {
        self.config.regex_size_limit = bytes;
        self
    }

    /// Skip pattern checks on empty answers
    pub fn pattern_skips_empty(mut self, skip: bool) -> Self {
        self.config.pattern_skips_empty = skip;
        self
    }

    /// Set the accepted rating range
    pub fn rating_range(mut self, min: u8, max: u8) -> Self {
        self.config.rating_min = min;
        self.config.rating_max = max;
        self
    }

    /// Set the comment length limit
    pub fn max_comment_len(mut self, len: usize) -> Self {
        self.config.max_comment_len = len;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InterpreterConfig {
        self.config
    }
}

impl Default for InterpreterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
