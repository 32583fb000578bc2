//! Declarative template forms
//!
//! Templates describe their settings as tabs of sections of content items.
//! Items with a `variable` are inputs; everything else (headings, subtitles,
//! unknown types) is display only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Values collected for a form, keyed by variable name
pub type FormValues = Map<String, Value>;

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("invalid value for `{variable}`: {reason}")]
    InvalidValue { variable: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tabs: Vec<FormTab>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormTab {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub sections: Vec<FormSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contents: Vec<FormContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormContent {
    #[serde(rename = "type", default)]
    pub content_type: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub settings: ContentSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSettings {
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

/// Input kinds the CLI knows how to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Checkbox,
    Select,
    Array,
}

impl FieldKind {
    fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "string-input" => Some(FieldKind::String),
            "number-input" => Some(FieldKind::Number),
            "checkbox" => Some(FieldKind::Checkbox),
            "select" => Some(FieldKind::Select),
            "array-input" => Some(FieldKind::Array),
            _ => None,
        }
    }
}

/// An input extracted from a form
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub variable: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<Value>,
    pub options: Vec<SelectOption>,
    pub placeholder: Option<String>,
    pub unit: Option<String>,
}

impl FormSchema {
    /// All input fields, in tab/section/content order
    pub fn fields(&self) -> Vec<FormField> {
        self.tabs
            .iter()
            .flat_map(|tab| &tab.sections)
            .flat_map(|section| &section.contents)
            .filter_map(|content| {
                let variable = content.variable.clone()?;
                let kind = FieldKind::from_content_type(&content.content_type)?;
                Some(FormField {
                    label: if content.label.is_empty() {
                        variable.clone()
                    } else {
                        content.label.clone()
                    },
                    variable,
                    kind,
                    required: content.required,
                    default: content.settings.default.clone(),
                    options: content.settings.options.clone(),
                    placeholder: content.placeholder.clone(),
                    unit: content.settings.unit.clone(),
                })
            })
            .collect()
    }

    /// Values pre-filled from field defaults
    pub fn default_values(&self) -> FormValues {
        self.fields()
            .into_iter()
            .filter_map(|f| f.default.map(|d| (f.variable, d)))
            .collect()
    }

    /// Check that every required field has a non-empty value and that select
    /// values are among the offered options
    pub fn validate(&self, values: &FormValues) -> Result<(), FormError> {
        let fields = self.fields();

        let missing: Vec<String> = fields
            .iter()
            .filter(|f| f.required && values.get(&f.variable).is_none_or(is_blank))
            .map(|f| f.variable.clone())
            .collect();
        if !missing.is_empty() {
            return Err(FormError::MissingRequired(missing));
        }

        for field in fields.iter().filter(|f| f.kind == FieldKind::Select) {
            if let Some(value) = values.get(&field.variable) {
                if !field.options.is_empty() && !field.options.iter().any(|o| &o.value == value)
                {
                    return Err(FormError::InvalidValue {
                        variable: field.variable.clone(),
                        reason: format!("{} is not one of the offered options", value),
                    });
                }
            }
        }

        Ok(())
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

impl FormField {
    /// Convert raw text input into a JSON value of this field's type
    pub fn parse_input(&self, raw: &str) -> Result<Value, FormError> {
        let raw = raw.trim();
        let invalid = |reason: String| FormError::InvalidValue {
            variable: self.variable.clone(),
            reason,
        };

        match self.kind {
            FieldKind::String => Ok(Value::String(raw.to_string())),
            FieldKind::Number => {
                if raw.is_empty() {
                    return Ok(Value::Null);
                }
                if let Ok(i) = raw.parse::<i64>() {
                    return Ok(Value::Number(i.into()));
                }
                raw.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| invalid(format!("`{}` is not a number", raw)))
            }
            FieldKind::Checkbox => match raw.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "n" | "0" | "" => Ok(Value::Bool(false)),
                other => Err(invalid(format!("`{}` is not yes/no", other))),
            },
            // Without options a select is free text, as `validate` treats it
            FieldKind::Select if self.options.is_empty() => Ok(Value::String(raw.to_string())),
            FieldKind::Select => self
                .options
                .iter()
                .find(|o| o.label == raw || value_text(&o.value) == raw)
                .map(|o| o.value.clone())
                .ok_or_else(|| invalid(format!("`{}` is not one of the offered options", raw))),
            FieldKind::Array => Ok(Value::Array(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()))
                    .collect(),
            )),
        }
    }

    /// Default rendered as prompt text
    pub fn default_text(&self) -> Option<String> {
        self.default.as_ref().map(value_text)
    }
}

/// Plain-text rendering of a JSON value (strings without quotes)
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eks_form() -> FormSchema {
        serde_json::from_value(json!({
            "name": "EKS",
            "tabs": [{
                "name": "main",
                "label": "Configuration",
                "sections": [{
                    "name": "section_one",
                    "contents": [
                        { "type": "heading", "label": "EKS Configuration" },
                        {
                            "type": "string-input",
                            "label": "Cluster Name",
                            "variable": "cluster_name",
                            "required": true
                        },
                        {
                            "type": "select",
                            "label": "Machine Type",
                            "variable": "machine_type",
                            "settings": {
                                "default": "t2.medium",
                                "options": [
                                    { "label": "t2.medium", "value": "t2.medium" },
                                    { "label": "t2.xlarge", "value": "t2.xlarge" }
                                ]
                            }
                        },
                        {
                            "type": "number-input",
                            "label": "Max Instances",
                            "variable": "max_instances",
                            "settings": { "default": 10, "unit": "nodes" }
                        },
                        { "type": "checkbox", "variable": "issuer_enabled" }
                    ]
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_fields_skip_display_content() {
        let fields = eks_form().fields();
        let names: Vec<&str> = fields.iter().map(|f| f.variable.as_str()).collect();
        assert_eq!(
            names,
            vec!["cluster_name", "machine_type", "max_instances", "issuer_enabled"]
        );
        assert_eq!(fields[3].label, "issuer_enabled");
        assert_eq!(fields[2].unit.as_deref(), Some("nodes"));
    }

    #[test]
    fn test_default_values() {
        let defaults = eks_form().default_values();
        assert_eq!(defaults.get("machine_type"), Some(&json!("t2.medium")));
        assert_eq!(defaults.get("max_instances"), Some(&json!(10)));
        assert!(!defaults.contains_key("cluster_name"));
    }

    #[test]
    fn test_validate_reports_missing_required() {
        let form = eks_form();
        let mut values = form.default_values();
        assert_eq!(
            form.validate(&values),
            Err(FormError::MissingRequired(vec!["cluster_name".to_string()]))
        );

        values.insert("cluster_name".to_string(), json!("   "));
        assert!(form.validate(&values).is_err());

        values.insert("cluster_name".to_string(), json!("prod"));
        assert!(form.validate(&values).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_option() {
        let form = eks_form();
        let mut values = form.default_values();
        values.insert("cluster_name".to_string(), json!("prod"));
        values.insert("machine_type".to_string(), json!("m5.huge"));
        assert!(matches!(
            form.validate(&values),
            Err(FormError::InvalidValue { variable, .. }) if variable == "machine_type"
        ));
    }

    #[test]
    fn test_parse_input_by_kind() {
        let fields = eks_form().fields();
        assert_eq!(fields[0].parse_input(" prod ").unwrap(), json!("prod"));
        assert_eq!(fields[1].parse_input("t2.xlarge").unwrap(), json!("t2.xlarge"));
        assert!(fields[1].parse_input("m5.large").is_err());
        assert_eq!(fields[2].parse_input("12").unwrap(), json!(12));
        assert_eq!(fields[2].parse_input("1.5").unwrap(), json!(1.5));
        assert!(fields[2].parse_input("lots").is_err());
        assert_eq!(fields[3].parse_input("yes").unwrap(), json!(true));
        assert!(fields[3].parse_input("maybe").is_err());
    }

    #[test]
    fn test_select_without_options_takes_free_text() {
        let form: FormSchema = serde_json::from_value(json!({
            "tabs": [{
                "name": "main",
                "sections": [{
                    "name": "region",
                    "contents": [
                        { "type": "select", "label": "Region", "variable": "region", "required": true }
                    ]
                }]
            }]
        }))
        .unwrap();
        let field = &form.fields()[0];
        assert!(field.options.is_empty());

        let value = field.parse_input("us-east-1").unwrap();
        assert_eq!(value, json!("us-east-1"));

        let mut values = FormValues::new();
        values.insert("region".to_string(), value);
        assert!(form.validate(&values).is_ok());
    }

    #[test]
    fn test_array_input() {
        let field = FormField {
            variable: "zones".to_string(),
            label: "Zones".to_string(),
            kind: FieldKind::Array,
            required: false,
            default: Some(json!(["us-east-1a", "us-east-1b"])),
            options: Vec::new(),
            placeholder: None,
            unit: None,
        };
        assert_eq!(field.default_text().as_deref(), Some("us-east-1a, us-east-1b"));
        assert_eq!(
            field.parse_input("a, b,,c").unwrap(),
            json!(["a", "b", "c"])
        );
    }

    #[test]
    fn test_empty_schema_has_no_fields() {
        let form = FormSchema::default();
        assert!(form.fields().is_empty());
        assert!(form.validate(&FormValues::new()).is_ok());
    }
}
