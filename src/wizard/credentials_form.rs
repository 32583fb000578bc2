//! Credentials step for the provisioning wizard
//!
//! Either picks one of the project's stored integrations for the provider or
//! collects a fresh set of keys. Fresh keys are only sent to the control plane
//! when the settings are submitted.

use crate::platform::api::types::{
    AwsCredentialPayload, CloudProvider, CredentialPayload, DoCredentialPayload,
    GcpCredentialPayload, Integration,
};
use crate::provision::CredentialInput;
use crate::wizard::render::{PromptExit, display_step_header, prompt_exit, wizard_render_config};
use colored::Colorize;
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use std::path::Path;

const DEFAULT_AWS_REGION: &str = "us-east-1";
const DEFAULT_GCP_REGION: &str = "us-central1";

/// Result of credentials step
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialsFormResult {
    /// User supplied credentials
    Completed(CredentialInput),
    /// User wants to go back to template selection
    Back,
    /// User cancelled the wizard
    Cancelled,
}

/// Label for a stored integration in the picker
pub fn integration_label(integration: &Integration) -> String {
    match &integration.name {
        Some(name) if !name.is_empty() => format!("#{} {}", integration.id, name),
        _ => format!("#{}", integration.id),
    }
}

/// Collect credentials for `provider`
///
/// `draft` pre-fills the non-secret fields when the user comes back to this
/// step from the settings form.
pub fn collect_credentials(
    provider: CloudProvider,
    existing: &[Integration],
    draft: Option<&CredentialInput>,
    step_number: u8,
) -> CredentialsFormResult {
    display_step_header(
        step_number,
        "Credentials",
        &format!(
            "Connect {} to this project. Pick a stored integration or enter new keys. Press esc to choose another template.",
            provider.display_name()
        ),
    );

    if !existing.is_empty() {
        const NEW_KEYS: &str = "Enter new credentials";
        let mut options: Vec<String> = existing.iter().map(integration_label).collect();
        options.push(NEW_KEYS.to_string());

        let starting = match draft {
            Some(CredentialInput::Existing { integration_id, .. }) => existing
                .iter()
                .position(|i| i.id == *integration_id)
                .unwrap_or(0),
            Some(CredentialInput::New(_)) => existing.len(),
            None => 0,
        };

        match Select::new("Integration:", options)
            .with_render_config(wizard_render_config())
            .with_starting_cursor(starting)
            .raw_prompt()
        {
            Ok(choice) if choice.index < existing.len() => {
                let integration = &existing[choice.index];
                println!(
                    "{} Using {} integration {}",
                    "✓".green(),
                    provider,
                    integration_label(integration).cyan()
                );
                return CredentialsFormResult::Completed(CredentialInput::Existing {
                    provider,
                    integration_id: integration.id,
                });
            }
            Ok(_) => {}
            Err(e) => return exit_result(&e),
        }
    }

    let draft_payload = match draft {
        Some(CredentialInput::New(payload)) => Some(payload),
        _ => None,
    };

    match prompt_new_credentials(provider, draft_payload) {
        Ok(payload) => CredentialsFormResult::Completed(CredentialInput::New(payload)),
        Err(e) => exit_result(&e),
    }
}

fn exit_result(error: &InquireError) -> CredentialsFormResult {
    match prompt_exit(error) {
        PromptExit::Escaped => CredentialsFormResult::Back,
        PromptExit::Interrupted => CredentialsFormResult::Cancelled,
    }
}

/// Prompt for a new set of provider keys
pub fn prompt_new_credentials(
    provider: CloudProvider,
    draft: Option<&CredentialPayload>,
) -> Result<CredentialPayload, InquireError> {
    match provider {
        CloudProvider::Aws => {
            let draft = match draft {
                Some(CredentialPayload::Aws(aws)) => Some(aws),
                _ => None,
            };
            prompt_aws(draft).map(CredentialPayload::Aws)
        }
        CloudProvider::Gcp => {
            let draft = match draft {
                Some(CredentialPayload::Gcp(gcp)) => Some(gcp),
                _ => None,
            };
            prompt_gcp(draft).map(CredentialPayload::Gcp)
        }
        CloudProvider::Do => prompt_do().map(CredentialPayload::Do),
    }
}

fn prompt_aws(draft: Option<&AwsCredentialPayload>) -> Result<AwsCredentialPayload, InquireError> {
    let access_key_id = Text::new("AWS access key ID:")
        .with_render_config(wizard_render_config())
        .with_initial_value(draft.map(|d| d.aws_access_key_id.as_str()).unwrap_or(""))
        .with_validator(inquire::required!("Access key ID is required"))
        .prompt()?;

    let secret_access_key = secret_prompt("AWS secret access key:")?;

    let region = Text::new("AWS region:")
        .with_render_config(wizard_render_config())
        .with_default(draft.map(|d| d.aws_region.as_str()).unwrap_or(DEFAULT_AWS_REGION))
        .prompt()?;

    let cluster_id = Text::new("Existing cluster ID (optional):")
        .with_render_config(wizard_render_config())
        .with_initial_value(
            draft
                .and_then(|d| d.aws_cluster_id.as_deref())
                .unwrap_or(""),
        )
        .with_help_message("Leave empty to let the template create one")
        .prompt()?;

    Ok(AwsCredentialPayload {
        aws_access_key_id: access_key_id.trim().to_string(),
        aws_secret_access_key: secret_access_key,
        aws_region: region.trim().to_string(),
        aws_cluster_id: Some(cluster_id.trim().to_string()).filter(|c| !c.is_empty()),
    })
}

fn prompt_gcp(draft: Option<&GcpCredentialPayload>) -> Result<GcpCredentialPayload, InquireError> {
    let (key_data, key_project) = loop {
        let path = Text::new("Service account key file:")
            .with_render_config(wizard_render_config())
            .with_help_message("Path to the JSON key downloaded from the GCP console")
            .prompt()?;
        match read_gcp_key(Path::new(path.trim())) {
            Ok(key) => break key,
            Err(e) => println!("{} {}", "✗".red(), e),
        }
    };

    let default_project = key_project
        .or_else(|| draft.map(|d| d.gcp_project_id.clone()))
        .unwrap_or_default();
    let project_id = Text::new("GCP project ID:")
        .with_render_config(wizard_render_config())
        .with_default(&default_project)
        .with_validator(inquire::required!("Project ID is required"))
        .prompt()?;

    let region = Text::new("GCP region:")
        .with_render_config(wizard_render_config())
        .with_default(draft.map(|d| d.gcp_region.as_str()).unwrap_or(DEFAULT_GCP_REGION))
        .prompt()?;

    Ok(GcpCredentialPayload {
        gcp_key_data: key_data,
        gcp_project_id: project_id.trim().to_string(),
        gcp_region: region.trim().to_string(),
    })
}

fn prompt_do() -> Result<DoCredentialPayload, InquireError> {
    let token = secret_prompt("DigitalOcean API token:")?;
    Ok(DoCredentialPayload { do_token: token })
}

fn secret_prompt(message: &str) -> Result<String, InquireError> {
    Password::new(message)
        .with_render_config(wizard_render_config())
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(inquire::required!("This field is required"))
        .prompt()
        .map(|s| s.trim().to_string())
}

/// Read a service account key file
///
/// Returns the raw JSON and the `project_id` it names, if any.
pub fn read_gcp_key(path: &Path) -> Result<(String, Option<String>), String> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let key: serde_json::Value = serde_json::from_str(&data)
        .map_err(|e| format!("{} is not a JSON key file: {}", path.display(), e))?;
    if key.get("private_key").is_none() {
        return Err(format!(
            "{} does not look like a service account key (no private_key)",
            path.display()
        ));
    }
    let project_id = key
        .get("project_id")
        .and_then(|p| p.as_str())
        .map(String::from);
    Ok((data, project_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_gcp_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.json");
        fs::write(
            &path,
            r#"{"type":"service_account","project_id":"acme-prod","private_key":"-----BEGIN"}"#,
        )
        .unwrap();

        let (data, project) = read_gcp_key(&path).unwrap();
        assert!(data.contains("service_account"));
        assert_eq!(project.as_deref(), Some("acme-prod"));
    }

    #[test]
    fn test_read_gcp_key_rejects_other_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.json");
        fs::write(&path, r#"{"hello":"world"}"#).unwrap();
        assert!(read_gcp_key(&path).unwrap_err().contains("private_key"));

        fs::write(&path, "not json").unwrap();
        assert!(read_gcp_key(&path).unwrap_err().contains("not a JSON key file"));

        assert!(read_gcp_key(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_integration_label() {
        let named = Integration {
            id: 4,
            project_id: Some(1),
            name: Some("prod account".to_string()),
            created_at: None,
        };
        assert_eq!(integration_label(&named), "#4 prod account");

        let unnamed = Integration {
            id: 9,
            project_id: None,
            name: None,
            created_at: None,
        };
        assert_eq!(integration_label(&unnamed), "#9");
    }
}
