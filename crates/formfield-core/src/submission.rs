//! Submission boundary
//!
//! Turns a raw client payload into the full set of encoded answers for one
//! response, or into a [`Rejection`] listing everything that is wrong with
//! it. Nothing is encoded until every field, the rating and the comment have
//! passed. Stored responses are decoded back against the schema snapshot they
//! were written under.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::codec::{self, wire_codec, TaggedValue, ValueCodec, WireCodec};
use crate::config::InterpreterConfig;
use crate::error::FormError;
use crate::schema::{FieldId, FormSchema};
use crate::validation::Validator;
use crate::value::FieldValue;

/// Raw payload posted by a client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Field id to a string, string array, boolean or number
    #[serde(default)]
    pub values: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Answers ready to persist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedResponse {
    pub response_id: Uuid,
    pub form_version: u32,
    pub submitted_at: DateTime<Utc>,
    /// Wire string per field, for every field of the form
    pub answers: BTreeMap<FieldId, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Why a submission was not accepted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejection {
    /// Message per rejected field
    pub field_errors: BTreeMap<FieldId, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_error: Option<String>,
}

impl Rejection {
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty() && self.rating_error.is_none() && self.comment_error.is_none()
    }

    pub fn problem_count(&self) -> usize {
        self.field_errors.len()
            + usize::from(self.rating_error.is_some())
            + usize::from(self.comment_error.is_some())
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Submission rejected: {} problem(s)", self.problem_count())
    }
}

impl std::error::Error for Rejection {}

/// A stored response decoded against a schema snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedResponse {
    /// Answers to fields the snapshot knows, decoded into their shape
    pub values: BTreeMap<FieldId, FieldValue>,
    /// Answers whose field is not in the snapshot, decoded heuristically
    pub orphaned: BTreeMap<FieldId, FieldValue>,
}

/// Validates and encodes client submissions
pub struct SubmissionProcessor {
    config: InterpreterConfig,
    codec: ValueCodec,
    validator: Validator,
    wire: Box<dyn WireCodec>,
}

impl Default for SubmissionProcessor {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

impl SubmissionProcessor {
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            codec: ValueCodec::from_config(&config),
            validator: Validator::from_config(&config),
            wire: wire_codec(&config),
            config,
        }
    }

    /// Replace the validator, e.g. one with extra registered rules
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn wire(&self) -> &dyn WireCodec {
        self.wire.as_ref()
    }

    /// Coerce every field's raw value into its declared shape
    ///
    /// Values whose shape cannot be coerced are reported per field; ids the
    /// form does not know are ignored.
    pub fn normalize(
        &self,
        form: &FormSchema,
        payload: &SubmissionPayload,
    ) -> (BTreeMap<FieldId, FieldValue>, BTreeMap<FieldId, String>) {
        let mut values = BTreeMap::new();
        let mut errors = BTreeMap::new();

        for field in form {
            match self.codec.normalize_client(field, payload.values.get(field.id.as_str())) {
                Ok(value) => {
                    values.insert(field.id.clone(), value);
                }
                Err(e @ FormError::ShapeMismatch { .. }) => {
                    debug!(error = %e, "Rejecting client value");
                    errors.insert(field.id.clone(), format!("Invalid {}", field.label));
                }
                Err(e) => {
                    errors.insert(field.id.clone(), e.to_string());
                }
            }
        }

        for id in payload.values.keys().filter(|id| form.field(id).is_none()) {
            debug!(field = %id, "Ignoring value for unknown field");
        }

        (values, errors)
    }

    /// Validate a submission and encode it when everything passes
    pub fn process(
        &self,
        form: &FormSchema,
        payload: &SubmissionPayload,
    ) -> std::result::Result<EncodedResponse, Rejection> {
        let (values, mut field_errors) = self.normalize(form, payload);

        let report = self.validator.validate_form(form, &values);
        for error in report.errors {
            field_errors.entry(error.field_id).or_insert(error.message);
        }

        let rejection = Rejection {
            field_errors,
            rating_error: self.check_rating(payload.rating),
            comment_error: self.check_comment(payload.comment.as_deref()),
        };

        if !rejection.is_empty() {
            debug!(problems = rejection.problem_count(), "Submission rejected");
            return Err(rejection);
        }

        let answers = values
            .iter()
            .map(|(id, value)| (id.clone(), self.wire.encode(value)))
            .collect();

        let response = EncodedResponse {
            response_id: Uuid::new_v4(),
            form_version: form.version,
            submitted_at: Utc::now(),
            answers,
            rating: payload.rating,
            comment: payload.comment.clone().filter(|c| !c.is_empty()),
        };

        info!(
            response_id = %response.response_id,
            form_version = response.form_version,
            fields = response.answers.len(),
            "Submission accepted"
        );

        Ok(response)
    }

    fn check_rating(&self, rating: Option<i64>) -> Option<String> {
        let rating = rating?;
        let (min, max) = (i64::from(self.config.rating_min), i64::from(self.config.rating_max));
        if (min..=max).contains(&rating) {
            None
        } else {
            Some(format!("Rating must be between {} and {}", min, max))
        }
    }

    fn check_comment(&self, comment: Option<&str>) -> Option<String> {
        let len = comment?.chars().count();
        if len > self.config.max_comment_len {
            Some(format!(
                "Comment must be at most {} characters",
                self.config.max_comment_len
            ))
        } else {
            None
        }
    }

    /// Decode stored wire strings against the schema they were written under
    pub fn decode_response(
        &self,
        form: &FormSchema,
        stored: &BTreeMap<FieldId, String>,
    ) -> DecodedResponse {
        let mut decoded = DecodedResponse::default();

        for (id, wire) in stored {
            match form.field(id.as_str()) {
                Some(field) => {
                    decoded
                        .values
                        .insert(id.clone(), self.wire.decode(field.shape(), wire));
                }
                None => {
                    debug!(field = %id, form_version = form.version, "Stored answer has no field in schema");
                    decoded.orphaned.insert(id.clone(), decode_orphan(wire));
                }
            }
        }

        decoded
    }
}

/// Best-effort decode without a schema
fn decode_orphan(wire: &str) -> FieldValue {
    match serde_json::from_str::<TaggedValue>(wire) {
        Ok(tagged) => tagged.into(),
        Err(_) => codec::decode(wire),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WireFormat;
    use crate::schema::{FieldOption, FieldSchema, FieldType};
    use serde_json::json;

    fn payload(values: Value) -> SubmissionPayload {
        serde_json::from_value(json!({ "values": values })).unwrap()
    }

    fn survey() -> FormSchema {
        FormSchema::new(
            3,
            vec![
                FieldSchema::new("1", "Name", FieldType::Text).required(true),
                FieldSchema::new("2", "Pick", FieldType::CheckboxGroup)
                    .with_options(vec![FieldOption::new("A"), FieldOption::new("B")])
                    .with_selection_limit(1),
                FieldSchema::new("3", "Agree", FieldType::Checkbox),
            ],
        )
    }

    #[test]
    fn test_rejects_every_invalid_field() {
        let processor = SubmissionProcessor::default();
        let rejection = processor
            .process(&survey(), &payload(json!({"1": "", "2": ["A", "B"]})))
            .unwrap_err();

        assert_eq!(rejection.field_errors.len(), 2);
        assert_eq!(rejection.field_errors[&FieldId::from("1")], "Name is required");
        assert_eq!(
            rejection.field_errors[&FieldId::from("2")],
            "You can select at most 1 option(s)"
        );
        assert_eq!(rejection.to_string(), "Submission rejected: 2 problem(s)");
    }

    #[test]
    fn test_accepts_and_encodes_full_set() {
        let processor = SubmissionProcessor::default();
        let response = processor
            .process(&survey(), &payload(json!({"1": "Ada", "2": ["B"]})))
            .unwrap();

        assert_eq!(response.form_version, 3);
        assert_eq!(response.answers[&FieldId::from("1")], "Ada");
        assert_eq!(response.answers[&FieldId::from("2")], r#"["B"]"#);
        assert_eq!(response.answers[&FieldId::from("3")], "No");
        assert_eq!(response.answers.len(), 3);
    }

    #[test]
    fn test_shape_mismatch_is_field_error() {
        let processor = SubmissionProcessor::default();
        let rejection = processor
            .process(&survey(), &payload(json!({"1": ["Ada", "Bob"]})))
            .unwrap_err();
        assert_eq!(rejection.field_errors[&FieldId::from("1")], "Invalid Name");
    }

    #[test]
    fn test_numeric_field_ids_in_payload() {
        let form: FormSchema = serde_json::from_value(json!([
            {"id": 7, "type": "number", "label": "Age", "minValue": 18}
        ]))
        .unwrap();
        let processor = SubmissionProcessor::default();
        let rejection = processor.process(&form, &payload(json!({"7": 12}))).unwrap_err();
        assert_eq!(rejection.field_errors[&FieldId::from(7u64)], "Age must be at least 18");
    }

    #[test]
    fn test_rating_and_comment_limits() {
        let config = InterpreterConfig::builder().max_comment_len(5).build();
        let processor = SubmissionProcessor::new(config);
        let mut submission = payload(json!({"1": "Ada"}));
        submission.rating = Some(6);
        submission.comment = Some("too long".to_string());

        let rejection = processor.process(&survey(), &submission).unwrap_err();
        assert!(rejection.field_errors.is_empty());
        assert_eq!(rejection.rating_error.as_deref(), Some("Rating must be between 1 and 5"));
        assert_eq!(
            rejection.comment_error.as_deref(),
            Some("Comment must be at most 5 characters")
        );

        submission.rating = Some(5);
        submission.comment = Some("ok".to_string());
        let response = processor.process(&survey(), &submission).unwrap();
        assert_eq!(response.rating, Some(5));
        assert_eq!(response.comment.as_deref(), Some("ok"));
    }

    #[test]
    fn test_decode_response_with_orphans() {
        let processor = SubmissionProcessor::default();
        let mut stored = BTreeMap::new();
        stored.insert(FieldId::from("1"), r#"["not","a","list"]"#.to_string());
        stored.insert(FieldId::from("2"), r#"["A"]"#.to_string());
        stored.insert(FieldId::from("3"), "Yes".to_string());
        stored.insert(FieldId::from("9"), r#"["X","Y"]"#.to_string());

        let decoded = processor.decode_response(&survey(), &stored);
        assert_eq!(
            decoded.values[&FieldId::from("1")],
            FieldValue::Scalar(r#"["not","a","list"]"#.to_string())
        );
        assert_eq!(decoded.values[&FieldId::from("2")], FieldValue::List(vec!["A".to_string()]));
        assert_eq!(decoded.values[&FieldId::from("3")], FieldValue::Flag(true));
        assert_eq!(
            decoded.orphaned[&FieldId::from("9")],
            FieldValue::List(vec!["X".to_string(), "Y".to_string()])
        );
    }

    #[test]
    fn test_tagged_round_trip() {
        let config = InterpreterConfig::builder().wire_format(WireFormat::Tagged).build();
        let processor = SubmissionProcessor::new(config);
        let form = survey();
        let response = processor
            .process(&form, &payload(json!({"1": "[\"A\"]", "3": true})))
            .unwrap();
        assert_eq!(
            response.answers[&FieldId::from("1")],
            r#"{"kind":"scalar","value":"[\"A\"]"}"#
        );

        let decoded = processor.decode_response(&form, &response.answers);
        assert_eq!(decoded.values[&FieldId::from("1")], FieldValue::Scalar(r#"["A"]"#.to_string()));
        assert_eq!(decoded.values[&FieldId::from("3")], FieldValue::Flag(true));
        assert!(decoded.orphaned.is_empty());
    }
}
