//! Wizard orchestration - drives a [`ProvisionFlow`] with terminal prompts

use crate::platform::api::{PlatformApiClient, ProvisionerApi};
use crate::provision::{FlowPhase, ModuleState, ProvisionFlow, Transition, WizardError};
use crate::wizard::credentials_form::{CredentialsFormResult, collect_credentials};
use crate::wizard::render::display_banner;
use crate::wizard::settings_form::{SettingsFormResult, collect_settings, summarize_values};
use crate::wizard::status_view::{print_status, watch_status};
use crate::wizard::template_selection::{TemplateSelectionResult, select_template};
use colored::Colorize;
use inquire::Confirm;
use std::time::Duration;

/// Result of running the wizard
#[derive(Debug, Clone, PartialEq)]
pub enum WizardResult {
    /// A run was started; `state` is where it stood when the watch ended
    Provisioned { infra_id: u64, state: ModuleState },
    /// User cancelled the wizard
    Cancelled,
    /// An error occurred
    Error(String),
}

/// Run the provisioning wizard for a project
///
/// `template` skips the picker when it names a known template.
pub async fn run_provision_wizard(
    client: &PlatformApiClient,
    project_id: u64,
    template: Option<&str>,
    poll_interval: Duration,
) -> WizardResult {
    display_banner("Provision Infrastructure");

    let templates = match client.list_infra_templates(project_id).await {
        Ok(templates) => templates,
        Err(e) => return WizardResult::Error(format!("Failed to load templates: {}", e)),
    };
    log::debug!("Loaded {} templates for project {}", templates.len(), project_id);
    if templates.is_empty() {
        return WizardResult::Error(WizardError::NoTemplates.to_string());
    }

    let mut flow = ProvisionFlow::new(templates);
    let mut requested = template.map(str::to_string);

    loop {
        let name = match requested.take() {
            Some(name) => name,
            None => match select_template(flow.selector().templates()) {
                TemplateSelectionResult::Selected(name) => name,
                TemplateSelectionResult::Cancelled => return WizardResult::Cancelled,
            },
        };

        if let Err(e) = flow.select_template(&name) {
            println!("{} {}", "✗".red(), e);
            continue;
        }

        match drive_template(&mut flow, client, project_id, poll_interval).await {
            Some(result) => return result,
            None => flow.cancel(),
        }
    }
}

/// Drive the flow for the selected template
///
/// Returns `None` when the user backs out to the template list.
async fn drive_template(
    flow: &mut ProvisionFlow,
    client: &PlatformApiClient,
    project_id: u64,
    poll_interval: Duration,
) -> Option<WizardResult> {
    loop {
        let wizard = flow.wizard()?.clone();
        let has_credentials_step = wizard.provider().is_some();
        let settings_step = if has_credentials_step { 3 } else { 2 };

        match flow.phase() {
            FlowPhase::SelectingTemplate => return None,

            FlowPhase::EnteringCredentials => {
                let provider = wizard.provider()?;
                let existing = client
                    .list_integrations(provider, project_id)
                    .await
                    .unwrap_or_else(|e| {
                        log::debug!("Could not list {} integrations: {}", provider, e);
                        Vec::new()
                    });

                match collect_credentials(provider, &existing, wizard.credentials(), 2) {
                    CredentialsFormResult::Completed(input) => {
                        if let Transition::Rejected(reason) = flow.submit_credentials(input) {
                            println!("{} {}", "✗".red(), reason);
                        }
                    }
                    CredentialsFormResult::Back => return None,
                    CredentialsFormResult::Cancelled => return Some(WizardResult::Cancelled),
                }
            }

            FlowPhase::EnteringSettings | FlowPhase::SubmissionFailed { .. } => {
                let values = match collect_settings(
                    wizard.form(),
                    wizard.settings(),
                    has_credentials_step,
                    wizard.last_error(),
                    settings_step,
                ) {
                    SettingsFormResult::Completed(values) => values,
                    SettingsFormResult::Back => {
                        flow.back();
                        continue;
                    }
                    SettingsFormResult::Cancelled => return Some(WizardResult::Cancelled),
                };

                println!();
                for (label, value) in summarize_values(wizard.form(), &values) {
                    println!("  {} {}: {}", "│".dimmed(), label, value.cyan());
                }
                let confirmed = Confirm::new(&format!("Provision {} now?", wizard.kind()))
                    .with_default(true)
                    .prompt();
                match confirmed {
                    Ok(true) => {}
                    Ok(false) => {
                        flow.save_draft(values);
                        continue;
                    }
                    Err(_) => return Some(WizardResult::Cancelled),
                }

                println!("\n{} Submitting {}...", "→".cyan(), wizard.kind());
                if let Transition::Rejected(reason) =
                    flow.submit_and_resolve(client, project_id, values).await
                {
                    println!("{} {}", "✗".red(), reason);
                }
            }

            FlowPhase::Submitting => {
                return Some(WizardResult::Error(
                    "submission did not complete".to_string(),
                ));
            }

            FlowPhase::PollingStatus { infra_id } => {
                println!(
                    "{} Provisioning started: infra {}",
                    "✓".green(),
                    infra_id.to_string().cyan()
                );
                println!("  {}", "Press Ctrl-C to stop watching; provisioning continues.".dimmed());

                return Some(
                    match watch_status(client, project_id, infra_id, poll_interval, true).await {
                        Ok(board) => {
                            print_status(&board);
                            WizardResult::Provisioned {
                                infra_id,
                                state: board.status().state,
                            }
                        }
                        Err(e) => WizardResult::Error(format!(
                            "Provisioning started (infra {}) but status polling failed: {}",
                            infra_id, e
                        )),
                    },
                );
            }
        }
    }
}
