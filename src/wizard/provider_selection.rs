//! Provider selection step for the credentials wizard

use crate::platform::api::types::{CloudProvider, Integration};
use crate::platform::api::PlatformApiClient;
use crate::wizard::render::{count_badge, display_step_header, status_indicator, wizard_render_config};
use colored::Colorize;
use inquire::Select;

/// Stored integrations of one provider
#[derive(Debug, Clone)]
pub struct ProviderIntegrations {
    pub provider: CloudProvider,
    pub integrations: Vec<Integration>,
}

impl ProviderIntegrations {
    pub fn is_connected(&self) -> bool {
        !self.integrations.is_empty()
    }
}

/// Look up the stored integrations of every provider
///
/// A provider whose listing fails is shown as not connected.
pub async fn get_provider_integrations(
    client: &PlatformApiClient,
    project_id: u64,
) -> Vec<ProviderIntegrations> {
    let mut result = Vec::new();
    for provider in CloudProvider::all() {
        let integrations = client
            .list_integrations(*provider, project_id)
            .await
            .unwrap_or_else(|e| {
                log::debug!("Could not list {} integrations: {}", provider, e);
                Vec::new()
            });
        result.push(ProviderIntegrations {
            provider: *provider,
            integrations,
        });
    }
    result
}

/// Result of provider selection step
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSelectionResult {
    /// User selected a provider
    Selected(CloudProvider),
    /// User cancelled the wizard
    Cancelled,
}

fn provider_option(status: &ProviderIntegrations) -> String {
    format!(
        "{} {}  {}",
        status_indicator(status.is_connected()),
        status.provider.display_name(),
        count_badge(status.integrations.len(), "integrations")
    )
}

/// Display provider selection and prompt user to choose
pub fn select_provider(statuses: &[ProviderIntegrations]) -> ProviderSelectionResult {
    display_step_header(
        1,
        "Select Provider",
        "Choose the cloud provider to connect. Providers that already have integrations are marked.",
    );

    let options: Vec<String> = statuses.iter().map(provider_option).collect();

    match Select::new("Provider:", options)
        .with_render_config(wizard_render_config())
        .raw_prompt()
    {
        Ok(choice) => {
            let provider = statuses[choice.index].provider;
            println!("\n{} {}", "✓".green(), provider.display_name());
            ProviderSelectionResult::Selected(provider)
        }
        Err(_) => ProviderSelectionResult::Cancelled,
    }
}
