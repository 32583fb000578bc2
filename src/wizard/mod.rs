//! Interactive provisioning wizard
//!
//! Terminal front-end for the provisioning flow: template picker, credential
//! and settings prompts, and live status.

mod credentials_form;
mod orchestrator;
mod provider_selection;
mod render;
mod settings_form;
mod status_view;
mod template_selection;

pub use credentials_form::{
    CredentialsFormResult, collect_credentials, integration_label, prompt_new_credentials,
    read_gcp_key,
};
pub use orchestrator::{WizardResult, run_provision_wizard};
pub use provider_selection::{
    ProviderIntegrations, ProviderSelectionResult, get_provider_integrations, select_provider,
};
pub use render::{
    count_badge, display_banner, display_step_header, progress_bar, state_icon, state_label,
    status_indicator, wizard_render_config,
};
pub use settings_form::{SettingsFormResult, collect_settings};
pub use status_view::{StatusProgress, print_status, status_json, watch_status};
pub use template_selection::{TemplateSelectionResult, select_template};
