//! Output formatting for the formfield CLI
//!
//! Provides structured output in JSON, YAML and human-readable table formats.

use clap::ValueEnum;
use colored::Colorize;
use formfield_core::render::{Control, ControlKind};
use formfield_core::{
    DecodedResponse, EncodedResponse, FieldError, FieldId, FieldValue, FormSchema, Rejection,
    ValidationReport,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::error::CliError;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// A command result that can be printed as a table
pub trait TableReport: Serialize {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Print a command result to stdout in the requested format
pub fn emit<T: TableReport>(report: &T, format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .map_err(|e| CliError::SerializationError(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(report)
                .map_err(|e| CliError::SerializationError(e.to_string()))?;
            println!("{}", yaml);
        }
        OutputFormat::Table => {
            let mut stdout = io::stdout();
            report.write_table(&mut stdout)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Short human-readable form of an answer
pub fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Scalar(s) if s.is_empty() => "(empty)".to_string(),
        FieldValue::Scalar(s) => s.clone(),
        FieldValue::Flag(true) => "checked".to_string(),
        FieldValue::Flag(false) => "unchecked".to_string(),
        FieldValue::List(items) => format!("[{}]", items.join(", ")),
    }
}

fn header(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title.cyan().bold())?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out)
}

/// One field error with its label
#[derive(Debug, Clone, Serialize)]
pub struct FieldErrorOutput {
    pub field_id: FieldId,
    pub label: String,
    pub message: String,
}

impl FieldErrorOutput {
    fn new(form: &FormSchema, field_id: FieldId, message: String) -> Self {
        let label = form
            .field(field_id.as_str())
            .map(|f| f.label.clone())
            .unwrap_or_default();
        Self {
            field_id,
            label,
            message,
        }
    }

    fn write_row(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "  {} [{}] {} {}",
            "x".red(),
            self.field_id.as_str().dimmed(),
            self.label.bold(),
            self.message
        )
    }
}

/// Result of the validate command
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutput {
    pub accepted: bool,
    pub form_version: u32,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<EncodedResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldErrorOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_error: Option<String>,
}

impl SubmissionOutput {
    /// Create output from a processed submission
    pub fn from_result(form: &FormSchema, result: Result<EncodedResponse, Rejection>) -> Self {
        match result {
            Ok(response) => Self {
                accepted: true,
                form_version: form.version,
                summary: format!("Submission accepted ({} answers)", response.answers.len()),
                response: Some(response),
                field_errors: Vec::new(),
                rating_error: None,
                comment_error: None,
            },
            Err(rejection) => {
                let summary = rejection.to_string();
                // Report field errors in form order
                let mut by_field = rejection.field_errors;
                let field_errors = form
                    .iter()
                    .filter_map(|f| {
                        by_field
                            .remove(&f.id)
                            .map(|message| FieldErrorOutput::new(form, f.id.clone(), message))
                    })
                    .collect();
                Self {
                    accepted: false,
                    form_version: form.version,
                    summary,
                    response: None,
                    field_errors,
                    rating_error: rejection.rating_error,
                    comment_error: rejection.comment_error,
                }
            }
        }
    }
}

impl TableReport for SubmissionOutput {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, "Submission Results")?;

        let status = if self.accepted { "+".green() } else { "x".red() };
        writeln!(out, "{} {}", status, self.summary)?;
        writeln!(out, "  {} {}", "Form version:".dimmed(), self.form_version)?;

        if let Some(response) = &self.response {
            writeln!(out, "  {} {}", "Response id:".dimmed(), response.response_id)?;
            writeln!(out)?;
            writeln!(out, "{}", "Encoded answers:".cyan().bold())?;
            for (id, wire) in &response.answers {
                writeln!(out, "  {:<16} {}", id.as_str(), wire.yellow())?;
            }
        }

        if !self.field_errors.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "Field errors:".red().bold())?;
            for error in &self.field_errors {
                error.write_row(out)?;
            }
        }

        if let Some(message) = &self.rating_error {
            writeln!(out, "  {} {} {}", "x".red(), "Rating:".bold(), message)?;
        }
        if let Some(message) = &self.comment_error {
            writeln!(out, "  {} {} {}", "x".red(), "Comment:".bold(), message)?;
        }

        Ok(())
    }
}

/// One field and its value
#[derive(Debug, Clone, Serialize)]
pub struct FieldValueOutput {
    pub field_id: FieldId,
    pub label: String,
    pub field_type: String,
    pub value: FieldValue,
}

impl FieldValueOutput {
    fn write_row(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "  {:<16} {:<24} {:<16} {}",
            self.field_id.as_str(),
            self.label,
            self.field_type.dimmed(),
            display_value(&self.value).yellow()
        )
    }
}

fn field_values(form: &FormSchema, mut values: BTreeMap<FieldId, FieldValue>) -> Vec<FieldValueOutput> {
    form.iter()
        .filter_map(|field| {
            values.remove(&field.id).map(|value| FieldValueOutput {
                field_id: field.id.clone(),
                label: field.label.clone(),
                field_type: field.field_type.to_string(),
                value,
            })
        })
        .collect()
}

/// Result of the defaults command
#[derive(Debug, Clone, Serialize)]
pub struct DefaultsOutput {
    pub form_version: u32,
    pub fields: Vec<FieldValueOutput>,
}

impl DefaultsOutput {
    pub fn new(form: &FormSchema, values: BTreeMap<FieldId, FieldValue>) -> Self {
        Self {
            form_version: form.version,
            fields: field_values(form, values),
        }
    }
}

impl TableReport for DefaultsOutput {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, &format!("Initial Values (form version {})", self.form_version))?;
        if self.fields.is_empty() {
            writeln!(out, "  {}", "No field has a default".dimmed())?;
        }
        for field in &self.fields {
            field.write_row(out)?;
        }
        Ok(())
    }
}

/// Result of the render command
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    pub form_version: u32,
    pub controls: Vec<Control>,
}

impl RenderOutput {
    pub fn new(form: &FormSchema, controls: Vec<Control>) -> Self {
        Self {
            form_version: form.version,
            controls,
        }
    }
}

fn kind_name(kind: ControlKind) -> String {
    serde_json::to_value(kind)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

impl TableReport for RenderOutput {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, &format!("Controls (form version {})", self.form_version))?;

        for control in &self.controls {
            let required = if control.required {
                "*".red().to_string()
            } else {
                String::new()
            };
            writeln!(
                out,
                "{}{} {} {}",
                control.label.bold(),
                required,
                kind_name(control.kind).cyan(),
                display_value(&control.value).yellow()
            )?;

            if let Some(placeholder) = &control.placeholder {
                writeln!(out, "  {} {}", "Placeholder:".dimmed(), placeholder)?;
            }
            if let Some(help) = &control.help_text {
                writeln!(out, "  {} {}", "Help:".dimmed(), help)?;
            }
            if let Some(slider) = &control.slider {
                writeln!(out, "  {} {} .. {}", "Range:".dimmed(), slider.min, slider.max)?;
            }
            if let Some(limit) = control.selection_limit {
                writeln!(out, "  {} {}", "Limit:".dimmed(), limit)?;
            }
            for option in &control.options {
                let marker = if option.selected { "[x]".green() } else { "[ ]".normal() };
                let label = if option.disabled {
                    option.label.dimmed()
                } else {
                    option.label.normal()
                };
                writeln!(out, "  {} {}", marker, label)?;
            }
        }

        Ok(())
    }
}

/// Result of the decode command
#[derive(Debug, Clone, Serialize)]
pub struct DecodeOutput {
    pub form_version: u32,
    pub values: Vec<FieldValueOutput>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub orphaned: BTreeMap<FieldId, FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl DecodeOutput {
    pub fn new(form: &FormSchema, decoded: DecodedResponse, report: Option<ValidationReport>) -> Self {
        Self {
            form_version: form.version,
            values: field_values(form, decoded.values),
            orphaned: decoded.orphaned,
            errors: report.map(|r| r.errors),
        }
    }
}

impl TableReport for DecodeOutput {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        header(out, &format!("Stored Response (form version {})", self.form_version))?;

        for field in &self.values {
            field.write_row(out)?;
        }

        if !self.orphaned.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "Not in this form version:".yellow().bold())?;
            for (id, value) in &self.orphaned {
                writeln!(out, "  {} {:<16} {}", "!".yellow(), id.as_str(), display_value(value))?;
            }
        }

        if let Some(errors) = &self.errors {
            writeln!(out)?;
            if errors.is_empty() {
                writeln!(out, "{} {}", "+".green(), "All answers pass validation")?;
            } else {
                writeln!(out, "{}", "Field errors:".red().bold())?;
                for error in errors {
                    writeln!(
                        out,
                        "  {} [{}] {} {}",
                        "x".red(),
                        error.field_id.as_str().dimmed(),
                        error.rule.to_string().dimmed(),
                        error.message
                    )?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formfield_core::{DefaultResolver, SubmissionPayload, SubmissionProcessor};
    use serde_json::json;

    fn form() -> FormSchema {
        FormSchema::from_value(json!([
            {"id": 1, "type": "text", "required": true, "label": "Name"},
            {"id": 2, "type": "checkbox-group", "label": "Topics",
             "options": [{"label": "A"}, {"label": "B"}], "selectionLimit": 1}
        ]))
        .unwrap()
    }

    fn table(report: &impl TableReport) -> String {
        let mut buf = Vec::new();
        report.write_table(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&FieldValue::Scalar(String::new())), "(empty)");
        assert_eq!(display_value(&FieldValue::Flag(true)), "checked");
        assert_eq!(
            display_value(&FieldValue::List(vec!["A".to_string(), "B".to_string()])),
            "[A, B]"
        );
    }

    #[test]
    fn test_rejected_submission_output() {
        let form = form();
        let payload: SubmissionPayload =
            serde_json::from_value(json!({"values": {"2": ["A", "B"]}})).unwrap();
        let result = SubmissionProcessor::default().process(&form, &payload);
        let output = SubmissionOutput::from_result(&form, result);

        assert!(!output.accepted);
        let ids: Vec<&str> = output.field_errors.iter().map(|e| e.field_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(output.field_errors[0].label, "Name");

        let text = table(&output);
        assert!(text.contains("Name is required"));
        assert!(text.contains("You can select at most 1 option(s)"));
    }

    #[test]
    fn test_accepted_submission_serializes_response() {
        let form = form();
        let payload: SubmissionPayload =
            serde_json::from_value(json!({"values": {"1": "Ada", "2": ["B"]}})).unwrap();
        let result = SubmissionProcessor::default().process(&form, &payload);
        let output = SubmissionOutput::from_result(&form, result);

        assert!(output.accepted);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["response"]["answers"]["2"], r#"["B"]"#);
        assert!(json.get("field_errors").is_none());
    }

    #[test]
    fn test_defaults_output_keeps_form_order() {
        let form = form();
        let output = DefaultsOutput::new(&form, DefaultResolver::new().initial_values(&form));
        assert_eq!(output.fields.len(), 2);
        assert_eq!(output.fields[1].field_type, "checkbox-group");
        assert_eq!(output.fields[1].value, FieldValue::List(Vec::new()));
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(kind_name(ControlKind::MultiSelect), "multi_select");
    }
}
