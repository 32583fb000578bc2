use super::CommandContext;
use crate::error::{InfraCtlError, Result};
use crate::provision::ModuleState;
use crate::wizard::{WizardResult, run_provision_wizard};
use colored::Colorize;
use std::time::Duration;

pub async fn handle_provision(ctx: &CommandContext, template: Option<String>) -> Result<()> {
    let project_id = ctx.require_project()?;
    let interval = Duration::from_secs(ctx.config.status.poll_interval_secs.max(1));

    match run_provision_wizard(&ctx.client, project_id, template.as_deref(), interval).await {
        WizardResult::Provisioned {
            infra_id,
            state: ModuleState::Error,
        } => Err(InfraCtlError::ProvisioningFailed(infra_id)),
        WizardResult::Provisioned { infra_id, state } => {
            if state == ModuleState::Loading {
                println!(
                    "\n{} Still provisioning. Follow it with `infractl status {} --watch`.",
                    "→".cyan(),
                    infra_id
                );
            } else {
                println!("\n{} Infrastructure {} is ready.", "✓".green(), infra_id);
            }
            Ok(())
        }
        WizardResult::Cancelled => {
            println!("\n{}", "Wizard cancelled.".dimmed());
            Ok(())
        }
        WizardResult::Error(message) => Err(InfraCtlError::Provision(message)),
    }
}
