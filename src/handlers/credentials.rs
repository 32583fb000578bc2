use super::{CommandContext, print_json};
use crate::error::Result;
use crate::platform::api::ProvisionerApi;
use crate::platform::api::types::CloudProvider;
use crate::provision::WizardError;
use crate::provision::form::FormError;
use crate::wizard::{
    ProviderSelectionResult, display_banner, get_provider_integrations, integration_label,
    prompt_new_credentials, select_provider,
};
use colored::Colorize;

pub async fn handle_credentials(ctx: &CommandContext, provider: Option<CloudProvider>) -> Result<()> {
    let project_id = ctx.require_project()?;

    display_banner("Connect Cloud Provider");

    let provider = match provider {
        Some(provider) => provider,
        None => {
            let statuses = get_provider_integrations(&ctx.client, project_id).await;
            match select_provider(&statuses) {
                ProviderSelectionResult::Selected(provider) => provider,
                ProviderSelectionResult::Cancelled => return Err(WizardError::Cancelled.into()),
            }
        }
    };

    let payload =
        prompt_new_credentials(provider, None).map_err(|_| WizardError::Cancelled)?;
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        return Err(FormError::MissingRequired(missing.into_iter().map(String::from).collect()).into());
    }

    let integration = ctx
        .client
        .create_credential_integration(provider, &payload, project_id)
        .await?;
    log::info!("Created {} integration {}", provider, integration.id);

    if ctx.json {
        return print_json(&integration);
    }

    println!(
        "\n{} Stored {} credentials as integration {}",
        "✓".green(),
        provider.display_name(),
        integration_label(&integration).cyan()
    );
    Ok(())
}
