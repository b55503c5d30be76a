//! Control selection and value binding
//!
//! The renderer does not draw anything. It picks which control a UI layer
//! should present for a field, describes that control, and turns raw control
//! events back into typed values.

use serde::{Deserialize, Serialize};

use crate::codec::ValueCodec;
use crate::defaults::{RANGE_DEFAULT_MAX, RANGE_DEFAULT_MIN};
use crate::schema::{FieldId, FieldSchema};
use crate::value::{FieldValue, ValueShape};

/// Control abstractions a UI layer is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    TextInput,
    TextArea,
    EmailInput,
    NumberInput,
    Slider,
    DateInput,
    TimeInput,
    DateTimeInput,
    Dropdown,
    MultiSelect,
    RadioGroup,
    Checkbox,
    CheckboxGroup,
}

/// One option as presented to the respondent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedOption {
    pub label: String,
    pub selected: bool,
    /// Unselected options are disabled once the selection limit is reached
    pub disabled: bool,
}

/// Numeric bounds for slider controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
}

/// A control description bound to a field and its current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub field_id: FieldId,
    pub kind: ControlKind,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<RenderedOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slider: Option<SliderBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_limit: Option<u32>,
    pub value: FieldValue,
    #[serde(skip)]
    schema: Option<FieldSchema>,
}

/// Raw output of a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// New text content of a text-like control
    Input(String),
    /// New checkbox state
    Toggled(bool),
    /// One option of a checkbox group or multi-select changed
    OptionToggled { label: String, checked: bool },
    /// Whole selection replaced (dropdowns, radio groups, multi-selects)
    Selected(Vec<String>),
    /// A stored wire string for the field
    Raw(String),
}

/// Selects and describes controls for fields
#[derive(Debug, Clone, Default)]
pub struct FieldRenderer {
    codec: ValueCodec,
}

impl FieldRenderer {
    pub fn new(codec: ValueCodec) -> Self {
        Self { codec }
    }

    /// Control kind for a field
    pub fn control_kind(schema: &FieldSchema) -> ControlKind {
        match schema.behavior().control {
            ControlKind::Dropdown if schema.is_multi_valued() => ControlKind::MultiSelect,
            ControlKind::RadioGroup if schema.is_multi_valued() => ControlKind::CheckboxGroup,
            kind => kind,
        }
    }

    /// Describe the control for `schema` showing `value`
    ///
    /// A value of the wrong shape is replaced by the empty value of the
    /// field's shape.
    pub fn render(&self, schema: &FieldSchema, value: &FieldValue) -> Control {
        let value = if schema.accepts(value) {
            value.clone()
        } else {
            tracing::debug!(field = %schema.id, "Value shape does not match field, rendering empty");
            FieldValue::empty(schema.shape())
        };

        let kind = Self::control_kind(schema);
        let slider = (kind == ControlKind::Slider).then(|| SliderBounds {
            min: schema.min_value.unwrap_or(RANGE_DEFAULT_MIN),
            max: schema.max_value.unwrap_or(RANGE_DEFAULT_MAX),
        });

        Control {
            field_id: schema.id.clone(),
            kind,
            label: schema.label.clone(),
            required: schema.required,
            placeholder: schema.placeholder.clone(),
            help_text: schema.help_text.clone(),
            options: Self::render_options(schema, &value),
            slider,
            selection_limit: schema
                .selection_limit
                .filter(|_| schema.is_multi_valued()),
            value,
            schema: Some(schema.clone()),
        }
    }

    fn render_options(schema: &FieldSchema, value: &FieldValue) -> Vec<RenderedOption> {
        let chosen: Vec<&str> = match value {
            FieldValue::Scalar(s) if s.is_empty() => Vec::new(),
            FieldValue::Scalar(s) => vec![s.as_str()],
            FieldValue::List(items) => items.iter().map(String::as_str).collect(),
            FieldValue::Flag(_) => Vec::new(),
        };
        let limit_reached = schema.is_multi_valued()
            && schema
                .selection_limit
                .map_or(false, |limit| chosen.len() >= limit as usize);

        schema
            .options
            .iter()
            .map(|option| {
                let selected = chosen.contains(&option.label.as_str());
                RenderedOption {
                    label: option.label.clone(),
                    selected,
                    disabled: limit_reached && !selected,
                }
            })
            .collect()
    }

    /// Compute the next value of a control after an event
    pub fn apply(&self, schema: &FieldSchema, current: &FieldValue, event: ControlEvent) -> FieldValue {
        let shape = schema.shape();
        let next = match event {
            ControlEvent::Raw(wire) => self.codec.decode_as(shape, &wire),
            ControlEvent::Input(text) => self.codec.decode_as(shape, &text),
            ControlEvent::Toggled(checked) => FieldValue::Flag(checked),
            ControlEvent::Selected(labels) => match shape {
                ValueShape::List => FieldValue::List(labels),
                _ => self
                    .codec
                    .decode_as(shape, labels.first().map(String::as_str).unwrap_or("")),
            },
            ControlEvent::OptionToggled { label, checked } => {
                toggle_option(schema, current, label, checked)
            }
        };

        if schema.accepts(&next) {
            next
        } else {
            FieldValue::empty(shape)
        }
    }
}

/// Add or remove one label, keeping the schema's option order
fn toggle_option(schema: &FieldSchema, current: &FieldValue, label: String, checked: bool) -> FieldValue {
    let mut items: Vec<String> = current.as_list().map(<[String]>::to_vec).unwrap_or_default();
    items.retain(|item| item != &label);
    if checked {
        items.push(label);
    }
    // Unknown labels keep their relative order after all schema options
    items.sort_by_key(|item| schema.option_index(item).unwrap_or(usize::MAX));
    FieldValue::List(items)
}

impl Control {
    /// Next value of this control after an event, using the default codec
    pub fn apply(&self, event: ControlEvent) -> FieldValue {
        match &self.schema {
            Some(schema) => FieldRenderer::default().apply(schema, &self.value, event),
            None => self.value.clone(),
        }
    }
}

/// A rendered control wired to a change callback
pub struct FieldBinding<'a, F>
where
    F: FnMut(&FieldId, FieldValue),
{
    renderer: &'a FieldRenderer,
    schema: &'a FieldSchema,
    value: FieldValue,
    on_change: F,
}

impl<'a, F> FieldBinding<'a, F>
where
    F: FnMut(&FieldId, FieldValue),
{
    pub fn new(renderer: &'a FieldRenderer, schema: &'a FieldSchema, value: FieldValue, on_change: F) -> Self {
        Self {
            renderer,
            schema,
            value,
            on_change,
        }
    }

    /// Current control description
    pub fn control(&self) -> Control {
        self.renderer.render(self.schema, &self.value)
    }

    /// Feed a control event; the callback sees the normalized value
    pub fn emit(&mut self, event: ControlEvent) {
        let next = self.renderer.apply(self.schema, &self.value, event);
        self.value = next.clone();
        (self.on_change)(&self.schema.id, next);
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldOption, FieldType};

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn group() -> FieldSchema {
        FieldSchema::new("g", "Pick", FieldType::CheckboxGroup)
            .with_options(["A", "B", "C"].into_iter().map(FieldOption::new))
    }

    #[test]
    fn test_control_kind_table() {
        let cases = [
            (FieldType::Text, ControlKind::TextInput),
            (FieldType::Textarea, ControlKind::TextArea),
            (FieldType::Email, ControlKind::EmailInput),
            (FieldType::Number, ControlKind::NumberInput),
            (FieldType::Range, ControlKind::Slider),
            (FieldType::Date, ControlKind::DateInput),
            (FieldType::Time, ControlKind::TimeInput),
            (FieldType::DateTime, ControlKind::DateTimeInput),
            (FieldType::Select, ControlKind::Dropdown),
            (FieldType::Radio, ControlKind::RadioGroup),
            (FieldType::Checkbox, ControlKind::Checkbox),
            (FieldType::CheckboxGroup, ControlKind::CheckboxGroup),
            (FieldType::Other("rating-stars".to_string()), ControlKind::TextInput),
        ];
        for (field_type, expected) in cases {
            let schema = FieldSchema::new("f", "F", field_type);
            assert_eq!(FieldRenderer::control_kind(&schema), expected);
        }

        let multi = FieldSchema::new("f", "F", FieldType::Select).allow_multiple(true);
        assert_eq!(FieldRenderer::control_kind(&multi), ControlKind::MultiSelect);

        let multi_radio = FieldSchema::new("f", "F", FieldType::Radio).allow_multiple(true);
        assert_eq!(FieldRenderer::control_kind(&multi_radio), ControlKind::CheckboxGroup);
    }

    #[test]
    fn test_empty_scalar_selects_nothing() {
        let schema = FieldSchema::new("s", "Pick", FieldType::Select)
            .with_options(["", "A"].into_iter().map(FieldOption::new));
        let renderer = FieldRenderer::default();

        let control = renderer.render(&schema, &FieldValue::Scalar(String::new()));
        assert!(control.options.iter().all(|o| !o.selected));

        let control = renderer.render(&schema, &FieldValue::Scalar("A".to_string()));
        assert!(control.options[1].selected);
    }

    #[test]
    fn test_render_marks_selection_and_limit() {
        let schema = group().with_selection_limit(1);
        let control = FieldRenderer::default().render(&schema, &FieldValue::List(labels(&["B"])));

        assert_eq!(control.selection_limit, Some(1));
        let flags: Vec<(bool, bool)> = control.options.iter().map(|o| (o.selected, o.disabled)).collect();
        assert_eq!(flags, vec![(false, true), (true, false), (false, true)]);
    }

    #[test]
    fn test_zero_limit_disables_every_option() {
        let schema = group().with_selection_limit(0);
        let control = FieldRenderer::default().render(&schema, &FieldValue::List(vec![]));
        assert!(control.options.iter().all(|o| o.disabled));
    }

    #[test]
    fn test_render_empty_options() {
        let schema = FieldSchema::new("s", "Pick", FieldType::Select);
        let control = FieldRenderer::default().render(&schema, &FieldValue::Scalar(String::new()));
        assert_eq!(control.kind, ControlKind::Dropdown);
        assert!(control.options.is_empty());
    }

    #[test]
    fn test_render_replaces_wrong_shape() {
        let schema = FieldSchema::new("c", "Agree", FieldType::Checkbox);
        let control = FieldRenderer::default().render(&schema, &FieldValue::Scalar("Yes".to_string()));
        assert_eq!(control.value, FieldValue::Flag(false));
    }

    #[test]
    fn test_slider_bounds() {
        let schema = FieldSchema::new("r", "Score", FieldType::Range).with_bounds(Some(1.0), None);
        let control = FieldRenderer::default().render(&schema, &FieldValue::Scalar("5".to_string()));
        assert_eq!(control.slider, Some(SliderBounds { min: 1.0, max: 10.0 }));
    }

    #[test]
    fn test_option_toggle_keeps_schema_order() {
        let schema = group();
        let renderer = FieldRenderer::default();
        let start = FieldValue::List(labels(&["C"]));

        let next = renderer.apply(
            &schema,
            &start,
            ControlEvent::OptionToggled { label: "A".to_string(), checked: true },
        );
        assert_eq!(next, FieldValue::List(labels(&["A", "C"])));

        let next = renderer.apply(
            &schema,
            &next,
            ControlEvent::OptionToggled { label: "C".to_string(), checked: false },
        );
        assert_eq!(next, FieldValue::List(labels(&["A"])));
    }

    #[test]
    fn test_raw_events_go_through_codec() {
        let renderer = FieldRenderer::default();
        let schema = group();
        let next = renderer.apply(&schema, &FieldValue::List(vec![]), ControlEvent::Raw(r#"["B"]"#.to_string()));
        assert_eq!(next, FieldValue::List(labels(&["B"])));

        let checkbox = FieldSchema::new("c", "Agree", FieldType::Checkbox);
        let next = renderer.apply(&checkbox, &FieldValue::Flag(false), ControlEvent::Raw("Yes".to_string()));
        assert_eq!(next, FieldValue::Flag(true));
    }

    #[test]
    fn test_single_select_event() {
        let schema = FieldSchema::new("s", "Size", FieldType::Radio)
            .with_options(["S", "M"].into_iter().map(FieldOption::new));
        let next = FieldRenderer::default().apply(
            &schema,
            &FieldValue::Scalar(String::new()),
            ControlEvent::Selected(labels(&["M"])),
        );
        assert_eq!(next, FieldValue::Scalar("M".to_string()));
    }

    #[test]
    fn test_control_apply_uses_bound_schema() {
        let schema = FieldSchema::new("c", "Agree", FieldType::Checkbox);
        let control = FieldRenderer::default().render(&schema, &FieldValue::Flag(false));
        assert_eq!(control.apply(ControlEvent::Toggled(true)), FieldValue::Flag(true));
    }

    #[test]
    fn test_binding_invokes_callback() {
        let renderer = FieldRenderer::default();
        let schema = group();
        let mut seen = Vec::new();
        {
            let mut binding = FieldBinding::new(&renderer, &schema, FieldValue::List(vec![]), |id, value| {
                seen.push((id.to_string(), value));
            });
            binding.emit(ControlEvent::OptionToggled { label: "B".to_string(), checked: true });
            assert!(binding.control().options[1].selected);
        }
        assert_eq!(seen, vec![("g".to_string(), FieldValue::List(labels(&["B"])))]);
    }
}
