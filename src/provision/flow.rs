//! Template-to-status provisioning flow
//!
//! Composes the template selector and the per-provider wizard into one state
//! machine:
//!
//! ```text
//! SelectingTemplate -> EnteringCredentials -> EnteringSettings -> Submitting -> PollingStatus
//!                                                  ^                  |
//!                                                  +-- SubmissionFailed
//! ```
//!
//! `cancel` returns to `SelectingTemplate` from anywhere and bumps the flow
//! epoch so responses to earlier submissions are discarded.

use super::WizardError;
use super::form::FormValues;
use super::templates::{CredentialSelection, TemplateSelector, TemplateView};
use super::wizard::{
    CredentialInput, PendingSubmission, ProvisionWizard, SubmissionOutcome, Transition,
    WizardStep,
};
use crate::platform::api::ProvisionerApi;
use crate::platform::api::types::{CloudProvider, InfraTemplate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowPhase {
    SelectingTemplate,
    EnteringCredentials,
    EnteringSettings,
    Submitting,
    PollingStatus { infra_id: u64 },
    SubmissionFailed { error: String },
}

#[derive(Debug, Clone, Default)]
pub struct ProvisionFlow {
    selector: TemplateSelector,
    wizard: Option<ProvisionWizard>,
    epoch: u64,
}

impl ProvisionFlow {
    pub fn new(templates: Vec<InfraTemplate>) -> Self {
        Self {
            selector: TemplateSelector::new(templates),
            wizard: None,
            epoch: 0,
        }
    }

    pub fn selector(&self) -> &TemplateSelector {
        &self.selector
    }

    pub fn wizard(&self) -> Option<&ProvisionWizard> {
        self.wizard.as_ref()
    }

    pub fn phase(&self) -> FlowPhase {
        let Some(wizard) = &self.wizard else {
            return FlowPhase::SelectingTemplate;
        };
        match wizard.step() {
            WizardStep::Credentials => FlowPhase::EnteringCredentials,
            WizardStep::Settings => match wizard.last_error() {
                Some(error) => FlowPhase::SubmissionFailed {
                    error: error.to_string(),
                },
                None => FlowPhase::EnteringSettings,
            },
            WizardStep::Status => match wizard.infra_id() {
                Some(infra_id) => FlowPhase::PollingStatus { infra_id },
                None => FlowPhase::Submitting,
            },
        }
    }

    /// Choose a template and start its wizard
    ///
    /// Re-selecting while a flow is underway replaces it, exactly like
    /// `cancel` followed by `select_template`.
    pub fn select_template(&mut self, name: &str) -> Result<FlowPhase, WizardError> {
        if self.wizard.is_some() {
            self.cancel();
        }

        let needs_credentials = matches!(
            self.selector.select_template(name)?,
            TemplateView::Credentials(_)
        );
        let template = self
            .selector
            .selected()
            .cloned()
            .ok_or(WizardError::NoTemplateSelected)?;

        let required = template.required_credential;
        let reuse = match required.provider() {
            Some(provider) if !needs_credentials => self
                .selector
                .credentials()
                .get(required)
                .map(|integration_id| CredentialInput::Existing {
                    provider,
                    integration_id,
                }),
            _ => None,
        };

        let mut wizard = ProvisionWizard::new(template.kind, template.form, required.provider());
        if let Some(existing) = reuse {
            log::debug!("Reusing selected integration for {}", template.name);
            wizard.submit_credentials(existing);
        }
        self.wizard = Some(wizard);
        Ok(self.phase())
    }

    /// Restart the current wizard's provider step, discarding its input
    ///
    /// The provider must be the one whose credential the selected template
    /// requires.
    pub fn select_provider(&mut self, provider: CloudProvider) -> Result<FlowPhase, WizardError> {
        let wizard = self.wizard.as_mut().ok_or(WizardError::NoTemplateSelected)?;
        let template = self
            .selector
            .selected()
            .ok_or(WizardError::NoTemplateSelected)?;
        if template.required_credential != provider.credential_key() {
            return Err(WizardError::ProviderMismatch {
                template: template.name.clone(),
                provider,
            });
        }
        wizard.select_provider(provider);
        Ok(self.phase())
    }

    pub fn submit_credentials(&mut self, input: CredentialInput) -> Transition {
        match self.wizard.as_mut() {
            Some(wizard) => wizard.submit_credentials(input),
            None => Transition::Ignored,
        }
    }

    pub fn back(&mut self) -> Transition {
        match self.wizard.as_mut() {
            Some(wizard) => wizard.back(),
            None => Transition::Ignored,
        }
    }

    pub fn save_draft(&mut self, values: FormValues) -> Transition {
        match self.wizard.as_mut() {
            Some(wizard) => wizard.save_draft(values),
            None => Transition::Ignored,
        }
    }

    pub fn submit_settings(&mut self, values: FormValues) -> Transition {
        let Some(wizard) = self.wizard.as_mut() else {
            return Transition::Ignored;
        };
        match wizard.submit_settings(values) {
            Transition::Submitted(mut pending) => {
                pending.epoch = self.epoch;
                Transition::Submitted(pending)
            }
            other => other,
        }
    }

    /// Apply a submission outcome if it still belongs to this flow
    pub fn resolve(&mut self, pending: &PendingSubmission, outcome: SubmissionOutcome) -> Transition {
        if pending.epoch != self.epoch {
            log::debug!(
                "Ignoring submission result from epoch {} (current {})",
                pending.epoch,
                self.epoch
            );
            return Transition::Ignored;
        }
        let Some(wizard) = self.wizard.as_mut() else {
            return Transition::Ignored;
        };

        let integration_id = outcome.integration_id.or(match &pending.credentials {
            Some(CredentialInput::Existing { integration_id, .. }) => Some(*integration_id),
            _ => None,
        });
        let transition = wizard.resolve_submission(pending, outcome);
        if transition != Transition::Ignored {
            if let (Some(id), Some(provider)) = (integration_id, pending.provider) {
                self.selector.set_credential(provider.credential_key(), id);
            }
        }
        transition
    }

    /// Abandon the current template and return to the list
    pub fn cancel(&mut self) {
        self.wizard = None;
        self.selector.clear_selection();
        self.epoch += 1;
    }

    /// Submit settings and perform the resulting API calls
    pub async fn submit_and_resolve<A: ProvisionerApi + ?Sized>(
        &mut self,
        api: &A,
        project_id: u64,
        values: FormValues,
    ) -> Transition {
        let pending = match self.submit_settings(values) {
            Transition::Submitted(pending) => pending,
            other => return other,
        };
        let outcome = execute_submission(api, project_id, &pending).await;
        self.resolve(&pending, outcome)
    }
}

/// Perform a submission: create the integration if the credentials are new,
/// then start the provisioning run
pub async fn execute_submission<A: ProvisionerApi + ?Sized>(
    api: &A,
    project_id: u64,
    pending: &PendingSubmission,
) -> SubmissionOutcome {
    let mut selection = CredentialSelection::default();
    let mut integration_id = None;

    match &pending.credentials {
        Some(CredentialInput::Existing {
            provider,
            integration_id: id,
        }) => selection.set(provider.credential_key(), *id),
        Some(CredentialInput::New(payload)) => {
            let provider = payload.provider();
            match api
                .create_credential_integration(provider, payload, project_id)
                .await
            {
                Ok(integration) => {
                    log::info!("Created {} integration {}", provider, integration.id);
                    selection.set(provider.credential_key(), integration.id);
                    integration_id = Some(integration.id);
                }
                Err(e) => {
                    return SubmissionOutcome {
                        integration_id: None,
                        result: Err(format!("failed to store {} credentials: {}", provider, e)),
                    };
                }
            }
        }
        None => {}
    }

    let request = selection.build_request(&pending.kind, pending.values.clone());
    let result = api
        .provision_infra(project_id, &request)
        .await
        .map(|response| response.infra_id)
        .map_err(|e| e.to_string());

    SubmissionOutcome {
        integration_id,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::types::{
        AwsCredentialPayload, CredentialPayload, RequiredCredential,
    };
    use crate::provision::form::FormSchema;

    fn template(name: &str, kind: &str, required: RequiredCredential) -> InfraTemplate {
        InfraTemplate {
            name: name.to_string(),
            kind: kind.to_string(),
            description: String::new(),
            icon: None,
            version: None,
            form: FormSchema::default(),
            required_credential: required,
        }
    }

    fn flow() -> ProvisionFlow {
        ProvisionFlow::new(vec![
            template("EKS", "eks", RequiredCredential::AwsIntegrationId),
            template("ECR", "ecr", RequiredCredential::AwsIntegrationId),
            template("Test", "test", RequiredCredential::None),
        ])
    }

    fn aws_keys() -> CredentialInput {
        CredentialInput::New(CredentialPayload::Aws(AwsCredentialPayload {
            aws_access_key_id: "AKIA".to_string(),
            aws_secret_access_key: "secret".to_string(),
            aws_region: "us-west-1".to_string(),
            aws_cluster_id: None,
        }))
    }

    #[test]
    fn test_phases_through_success() {
        let mut flow = flow();
        assert_eq!(flow.phase(), FlowPhase::SelectingTemplate);

        assert_eq!(
            flow.select_template("EKS").unwrap(),
            FlowPhase::EnteringCredentials
        );
        assert_eq!(flow.submit_credentials(aws_keys()), Transition::Advanced);
        assert_eq!(flow.phase(), FlowPhase::EnteringSettings);

        let pending = flow.submit_settings(FormValues::new()).into_submission().unwrap();
        assert_eq!(flow.phase(), FlowPhase::Submitting);

        let outcome = SubmissionOutcome {
            integration_id: Some(5),
            result: Ok(31),
        };
        assert_eq!(flow.resolve(&pending, outcome), Transition::Advanced);
        assert_eq!(flow.phase(), FlowPhase::PollingStatus { infra_id: 31 });
        assert_eq!(
            flow.selector().credentials().get(RequiredCredential::AwsIntegrationId),
            Some(5)
        );
    }

    #[test]
    fn test_failure_phase_and_recovery() {
        let mut flow = flow();
        flow.select_template("Test").unwrap();
        assert_eq!(flow.phase(), FlowPhase::EnteringSettings);

        let pending = flow.submit_settings(FormValues::new()).into_submission().unwrap();
        flow.resolve(
            &pending,
            SubmissionOutcome {
                integration_id: None,
                result: Err("invalid kind".to_string()),
            },
        );
        assert_eq!(
            flow.phase(),
            FlowPhase::SubmissionFailed {
                error: "invalid kind".to_string()
            }
        );

        assert!(flow.submit_settings(FormValues::new()).into_submission().is_some());
        assert_eq!(flow.phase(), FlowPhase::Submitting);
    }

    #[test]
    fn test_cancel_discards_late_response() {
        let mut flow = flow();
        flow.select_template("Test").unwrap();
        let pending = flow.submit_settings(FormValues::new()).into_submission().unwrap();

        flow.cancel();
        assert_eq!(flow.phase(), FlowPhase::SelectingTemplate);

        flow.select_template("Test").unwrap();
        let outcome = SubmissionOutcome {
            integration_id: None,
            result: Ok(8),
        };
        assert_eq!(flow.resolve(&pending, outcome), Transition::Ignored);
        assert_eq!(flow.phase(), FlowPhase::EnteringSettings);
    }

    #[test]
    fn test_reselecting_template_reuses_credential() {
        let mut flow = flow();
        flow.select_template("EKS").unwrap();
        flow.submit_credentials(aws_keys());
        let pending = flow.submit_settings(FormValues::new()).into_submission().unwrap();
        flow.resolve(
            &pending,
            SubmissionOutcome {
                integration_id: Some(12),
                result: Ok(1),
            },
        );

        assert_eq!(
            flow.select_template("ECR").unwrap(),
            FlowPhase::EnteringSettings
        );
        assert_eq!(
            flow.wizard().unwrap().credentials(),
            Some(&CredentialInput::Existing {
                provider: CloudProvider::Aws,
                integration_id: 12
            })
        );
    }

    #[test]
    fn test_select_provider_without_template() {
        let mut flow = flow();
        assert!(matches!(
            flow.select_provider(CloudProvider::Gcp),
            Err(WizardError::NoTemplateSelected)
        ));
        assert_eq!(flow.submit_settings(FormValues::new()), Transition::Ignored);
        assert_eq!(flow.back(), Transition::Ignored);
    }

    #[test]
    fn test_select_provider_resets_flow() {
        let mut flow = flow();
        flow.select_template("EKS").unwrap();
        flow.submit_credentials(aws_keys());
        assert_eq!(
            flow.select_provider(CloudProvider::Aws).unwrap(),
            FlowPhase::EnteringCredentials
        );
        assert!(flow.wizard().unwrap().credentials().is_none());
    }

    #[test]
    fn test_select_provider_must_match_template() {
        let mut flow = flow();
        flow.select_template("EKS").unwrap();
        flow.submit_credentials(aws_keys());

        assert_eq!(
            flow.select_provider(CloudProvider::Do),
            Err(WizardError::ProviderMismatch {
                template: "EKS".to_string(),
                provider: CloudProvider::Do,
            })
        );
        let wizard = flow.wizard().unwrap();
        assert_eq!(wizard.provider(), Some(CloudProvider::Aws));
        assert!(wizard.credentials().is_some());
        assert_eq!(flow.phase(), FlowPhase::EnteringSettings);
    }
}
