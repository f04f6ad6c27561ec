use serde_json::{Map, Value, json};

use crate::controller::{FormController, FormState};
use crate::error::FormError;
use crate::spec::{FieldDescriptor, FieldType, SelectOption};
use crate::theme::{ControlStyle, Theme};
use crate::value::FieldValue;

/// Visible line hint for multi-line inputs.
pub const LONG_TEXT_LINES: u8 = 4;

/// Input method requested from the host for single-line inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    Default,
    Numeric,
}

impl Keyboard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyboard::Default => "default",
            Keyboard::Numeric => "numeric",
        }
    }
}

/// The interactive control chosen for a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    TextInput { masked: bool, keyboard: Keyboard },
    MultiLineInput { lines: u8 },
    Picker {
        options: Vec<SelectOption>,
        /// Index of the option matching the current value.
        selected: Option<usize>,
    },
}

/// Produced by a control when the user changes it. The owner of the form
/// applies it; controls never touch the value store.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub name: String,
    pub value: FieldValue,
}

/// One rendered field.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub field_type: FieldType,
    pub value: FieldValue,
    pub kind: ControlKind,
    pub style: ControlStyle,
}

impl Control {
    /// Text typed into an input. The value stays text, numeric keyboards
    /// included.
    pub fn edit(&self, text: impl Into<String>) -> Result<FieldChange, FormError> {
        match self.kind {
            ControlKind::Picker { .. } => Err(FormError::NotEditable(self.name.clone())),
            ControlKind::TextInput { .. } | ControlKind::MultiLineInput { .. } => {
                Ok(FieldChange {
                    name: self.name.clone(),
                    value: FieldValue::Text(text.into()),
                })
            }
        }
    }

    /// Option picked by position; emits the option's own value.
    pub fn choose(&self, index: usize) -> Result<FieldChange, FormError> {
        let ControlKind::Picker { options, .. } = &self.kind else {
            return Err(FormError::NotSelectable(self.name.clone()));
        };
        let option = options.get(index).ok_or_else(|| FormError::NoSuchOption {
            field: self.name.clone(),
            index,
        })?;
        Ok(FieldChange {
            name: self.name.clone(),
            value: option.value.clone(),
        })
    }

    pub fn is_masked(&self) -> bool {
        matches!(self.kind, ControlKind::TextInput { masked: true, .. })
    }

    /// Value as the user would see it; masked inputs show one `*` per char.
    pub fn display_value(&self) -> String {
        let text = self.value.to_string();
        if self.is_masked() {
            "*".repeat(text.chars().count())
        } else {
            text
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            ControlKind::Picker { options, .. } => options,
            _ => &[],
        }
    }
}

/// Pick the control for `descriptor` and fill it with `current_value`.
pub fn render_field(
    theme: &dyn Theme,
    descriptor: &FieldDescriptor,
    current_value: &FieldValue,
) -> Control {
    let kind = match descriptor.kind {
        FieldType::Text | FieldType::Number | FieldType::Password => ControlKind::TextInput {
            masked: descriptor.kind == FieldType::Password,
            keyboard: if descriptor.kind == FieldType::Number {
                Keyboard::Numeric
            } else {
                Keyboard::Default
            },
        },
        FieldType::LongText => ControlKind::MultiLineInput {
            lines: LONG_TEXT_LINES,
        },
        FieldType::Select => ControlKind::Picker {
            options: descriptor.options.clone(),
            selected: selected_option(&descriptor.options, current_value),
        },
    };

    Control {
        name: descriptor.name.clone(),
        label: descriptor.label.clone(),
        placeholder: descriptor.placeholder_text().to_string(),
        field_type: descriptor.kind,
        value: current_value.clone(),
        kind,
        style: ControlStyle::resolve(theme),
    }
}

/// Option equal to `current`, falling back to a display match only when no
/// option has the same type and value.
fn selected_option(options: &[SelectOption], current: &FieldValue) -> Option<usize> {
    options
        .iter()
        .position(|option| option.value == *current)
        .or_else(|| options.iter().position(|option| option.value.matches(current)))
}

/// The submit button under the fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAction {
    pub label: String,
}

/// Whole-form render output: every control in schema order plus submit.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPayload {
    pub state: FormState,
    pub controls: Vec<Control>,
    pub submit: SubmitAction,
}

impl FormPayload {
    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.name == name)
    }
}

pub fn render_form(form: &FormController, theme: &dyn Theme) -> FormPayload {
    let controls = form
        .fields()
        .iter()
        .map(|field| render_field(theme, field, &form.current_value_of(field)))
        .collect();

    FormPayload {
        state: form.state(),
        controls,
        submit: SubmitAction {
            label: form.submit_label().to_string(),
        },
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &FormPayload) -> Value {
    let fields = payload
        .controls
        .iter()
        .map(|control| {
            let mut map = Map::new();
            map.insert("name".into(), Value::String(control.name.clone()));
            map.insert("label".into(), Value::String(control.label.clone()));
            map.insert(
                "placeholder".into(),
                Value::String(control.placeholder.clone()),
            );
            map.insert(
                "type".into(),
                Value::String(control.field_type.as_str().to_string()),
            );
            map.insert(
                "control".into(),
                Value::String(control_label(&control.kind).to_string()),
            );
            if control.is_masked() {
                map.insert("value".into(), Value::String(control.display_value()));
            } else {
                map.insert("value".into(), control.value.to_json());
            }
            match &control.kind {
                ControlKind::TextInput { masked, keyboard } => {
                    map.insert("masked".into(), Value::Bool(*masked));
                    map.insert("keyboard".into(), Value::String(keyboard.as_str().into()));
                }
                ControlKind::MultiLineInput { lines } => {
                    map.insert("lines".into(), json!(lines));
                }
                ControlKind::Picker { options, selected } => {
                    map.insert(
                        "options".into(),
                        Value::Array(
                            options
                                .iter()
                                .map(|option| {
                                    json!({
                                        "value": option.value.to_json(),
                                        "label": option.label,
                                    })
                                })
                                .collect(),
                        ),
                    );
                    map.insert("selected".into(), json!(selected));
                }
            }
            map.insert(
                "style".into(),
                json!({
                    "border_color": control.style.border_color,
                    "placeholder_color": control.style.placeholder_color,
                }),
            );
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "state": payload.state.as_str(),
        "fields": fields,
        "submit": { "label": payload.submit.label },
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &FormPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form ({})", payload.state.as_str()));

    for control in &payload.controls {
        let mut entry = format!(" - {} ({})", control.label, control.name);
        match &control.kind {
            ControlKind::TextInput { masked: true, .. } => entry.push_str(" [password]"),
            ControlKind::TextInput {
                keyboard: Keyboard::Numeric,
                ..
            } => entry.push_str(" [number]"),
            ControlKind::MultiLineInput { lines: visible } => {
                entry.push_str(&format!(" [{} lines]", visible))
            }
            _ => {}
        }
        if control.value.is_empty() {
            entry.push_str(&format!(" <{}>", control.placeholder));
        } else {
            entry.push_str(&format!(" = {}", control.display_value()));
        }
        lines.push(entry);

        if let ControlKind::Picker { options, selected } = &control.kind {
            for (index, option) in options.iter().enumerate() {
                let marker = if *selected == Some(index) { "*" } else { " " };
                lines.push(format!(
                    "   {} {}. {} ({})",
                    marker,
                    index + 1,
                    option.label,
                    option.value
                ));
            }
        }
    }

    lines.push(format!("[ {} ]", payload.submit.label));
    lines.join("\n")
}

fn control_label(kind: &ControlKind) -> &'static str {
    match kind {
        ControlKind::TextInput { .. } => "text_input",
        ControlKind::MultiLineInput { .. } => "multi_line_input",
        ControlKind::Picker { .. } => "picker",
    }
}
