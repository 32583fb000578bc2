//! Settings step: renders a template's declarative form as prompts

use crate::provision::form::{FieldKind, FormField, FormSchema, FormValues, value_text};
use crate::wizard::render::{PromptExit, display_step_header, prompt_exit, wizard_render_config};
use colored::Colorize;
use inquire::validator::Validation;
use inquire::{Confirm, InquireError, Select, Text};
use serde_json::Value;

/// Result of settings step
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsFormResult {
    /// User filled in the form
    Completed(FormValues),
    /// User wants to go back to the credentials step
    Back,
    /// User cancelled the wizard
    Cancelled,
}

/// Starting values for the prompts: the draft wins over form defaults
pub fn initial_values(form: &FormSchema, draft: Option<&FormValues>) -> FormValues {
    let mut values = form.default_values();
    if let Some(draft) = draft {
        for (key, value) in draft {
            values.insert(key.clone(), value.clone());
        }
    }
    values
}

/// Prompt for every input field of `form`
///
/// Esc on any prompt goes back when `can_go_back` is set, otherwise it
/// cancels. `last_error` is shown above the form after a failed submission.
pub fn collect_settings(
    form: &FormSchema,
    draft: Option<&FormValues>,
    can_go_back: bool,
    last_error: Option<&str>,
    step_number: u8,
) -> SettingsFormResult {
    let title = if form.name.is_empty() {
        "Settings".to_string()
    } else {
        format!("{} Settings", form.name)
    };
    let hint = if can_go_back {
        "Fill in the template settings. Press esc to return to credentials."
    } else {
        "Fill in the template settings."
    };
    display_step_header(step_number, &title, hint);

    if let Some(error) = last_error {
        println!("  {} {}", "Previous submission failed:".red().bold(), error);
        println!();
    }

    let fields = form.fields();
    if fields.is_empty() {
        println!("  {}", "This template has no settings.".dimmed());
    }

    let mut values = initial_values(form, draft);
    for field in &fields {
        let current = values.get(&field.variable).cloned();
        match prompt_field(field, current.as_ref()) {
            Ok(Some(value)) => {
                values.insert(field.variable.clone(), value);
            }
            Ok(None) => {
                values.remove(&field.variable);
            }
            Err(e) => {
                return match prompt_exit(&e) {
                    PromptExit::Escaped if can_go_back => SettingsFormResult::Back,
                    _ => SettingsFormResult::Cancelled,
                };
            }
        }
    }

    SettingsFormResult::Completed(values)
}

/// Prompt for a single field; `Ok(None)` means the field was left empty
fn prompt_field(field: &FormField, current: Option<&Value>) -> Result<Option<Value>, InquireError> {
    let message = match &field.unit {
        Some(unit) => format!("{} ({}):", field.label, unit),
        None => format!("{}:", field.label),
    };
    let current_text = current.map(value_text).unwrap_or_default();

    match field.kind {
        FieldKind::Checkbox => {
            let default = current.and_then(Value::as_bool).unwrap_or(false);
            Confirm::new(&message)
                .with_render_config(wizard_render_config())
                .with_default(default)
                .prompt()
                .map(|b| Some(Value::Bool(b)))
        }
        FieldKind::Select if !field.options.is_empty() => {
            let labels: Vec<String> = field.options.iter().map(|o| o.label.clone()).collect();
            let starting = current
                .and_then(|v| field.options.iter().position(|o| &o.value == v))
                .unwrap_or(0);
            Select::new(&message, labels)
                .with_render_config(wizard_render_config())
                .with_starting_cursor(starting)
                .raw_prompt()
                .map(|choice| Some(field.options[choice.index].value.clone()))
        }
        _ => {
            let validator_field = field.clone();
            let mut prompt = Text::new(&message)
                .with_render_config(wizard_render_config())
                .with_initial_value(&current_text)
                .with_validator(move |input: &str| {
                    if validator_field.required && input.trim().is_empty() {
                        return Ok(Validation::Invalid("This field is required".into()));
                    }
                    match validator_field.parse_input(input) {
                        Ok(_) => Ok(Validation::Valid),
                        Err(e) => Ok(Validation::Invalid(e.to_string().into())),
                    }
                });
            if let Some(placeholder) = &field.placeholder {
                prompt = prompt.with_placeholder(placeholder);
            }
            if field.kind == FieldKind::Array {
                prompt = prompt.with_help_message("Comma-separated list");
            }

            let raw = prompt.prompt()?;
            if raw.trim().is_empty() && !field.required {
                return Ok(None);
            }
            // The validator already accepted this input.
            Ok(field.parse_input(&raw).ok())
        }
    }
}

/// One-line summary of the collected values
pub fn summarize_values(form: &FormSchema, values: &FormValues) -> Vec<(String, String)> {
    form.fields()
        .into_iter()
        .filter_map(|field| {
            values
                .get(&field.variable)
                .map(|v| (field.label, value_text(v)))
        })
        .collect()
}
