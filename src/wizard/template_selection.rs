//! Template selection step for the provisioning wizard

use crate::platform::api::types::InfraTemplate;
use crate::provision::form::FormSchema;
use crate::wizard::render::{PromptExit, display_step_header, prompt_exit, wizard_render_config};
use colored::Colorize;
use inquire::Select;

/// Result of template selection step
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSelectionResult {
    /// User picked the template with this name
    Selected(String),
    /// User cancelled the wizard
    Cancelled,
}

/// Label shown for a template in the picker
pub fn template_option_label(template: &InfraTemplate) -> String {
    let mut label = template.name.clone();
    if let Some(version) = &template.version {
        label.push_str(&format!(" {}", format!("v{}", version).dimmed()));
    }
    if let Some(provider) = template.required_credential.provider() {
        label.push_str(&format!("  {}", provider.display_name().cyan()));
    }
    if !template.description.is_empty() {
        label.push_str(&format!("  {}", template.description.dimmed()));
    }
    label
}

/// Number of input fields a template's form will ask for
pub fn field_count(form: &FormSchema) -> usize {
    form.fields().len()
}

/// Prompt the user to choose one of the project's templates
pub fn select_template(templates: &[InfraTemplate]) -> TemplateSelectionResult {
    display_step_header(
        1,
        "Select Template",
        "Choose the infrastructure to provision. Templates for a cloud provider ask for credentials next.",
    );

    let options: Vec<String> = templates.iter().map(template_option_label).collect();

    match Select::new("Template:", options)
        .with_render_config(wizard_render_config())
        .with_help_message("↑↓ to move, enter to select, esc to quit")
        .with_page_size(10)
        .raw_prompt()
    {
        Ok(choice) => {
            let template = &templates[choice.index];
            println!(
                "\n{} {} ({} settings)",
                "✓".green(),
                template.name.bold(),
                field_count(&template.form)
            );
            TemplateSelectionResult::Selected(template.name.clone())
        }
        Err(e) => {
            if prompt_exit(&e) == PromptExit::Interrupted {
                log::debug!("Template selection interrupted");
            }
            TemplateSelectionResult::Cancelled
        }
    }
}
