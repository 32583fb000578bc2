//! Credentials → settings → status state machine for one provider
//!
//! The wizard only records what the user entered and which step comes next.
//! Submitting settings hands back a [`PendingSubmission`] ticket; the caller
//! performs the API calls and reports the outcome with
//! [`ProvisionWizard::resolve_submission`]. Every ticket carries the
//! wizard's generation, and anything that discards input (switching
//! provider) bumps it, so a late response cannot resurrect a superseded flow.

use super::form::{FormSchema, FormValues};
use crate::platform::api::types::{CloudProvider, CredentialPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Credentials,
    Settings,
    Status,
}

/// Credentials captured in the first step
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialInput {
    /// Reuse a stored integration
    Existing {
        provider: CloudProvider,
        integration_id: u64,
    },
    /// Create a new integration on submission
    New(CredentialPayload),
}

impl CredentialInput {
    pub fn provider(&self) -> CloudProvider {
        match self {
            CredentialInput::Existing { provider, .. } => *provider,
            CredentialInput::New(payload) => payload.provider(),
        }
    }
}

/// Result of driving the wizard with an event
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The step advanced (or the submission was accepted)
    Advanced,
    /// Settings were accepted and a submission must be performed
    Submitted(PendingSubmission),
    /// The event does not apply in the current state; nothing changed
    Ignored,
    /// The input was invalid or the submission failed; the step did not advance
    Rejected(String),
}

impl Transition {
    pub fn into_submission(self) -> Option<PendingSubmission> {
        match self {
            Transition::Submitted(pending) => Some(pending),
            _ => None,
        }
    }
}

/// A submission the caller must send to the control plane
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub kind: String,
    pub provider: Option<CloudProvider>,
    pub credentials: Option<CredentialInput>,
    pub values: FormValues,
    pub(crate) generation: u64,
    pub(crate) epoch: u64,
}

/// What came back from performing a [`PendingSubmission`]
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    /// Integration created on the way, if the credentials were new
    pub integration_id: Option<u64>,
    /// Infra id on success, error message on failure
    pub result: Result<u64, String>,
}

#[derive(Debug, Clone)]
pub struct ProvisionWizard {
    kind: String,
    form: FormSchema,
    provider: Option<CloudProvider>,
    step: WizardStep,
    credentials: Option<CredentialInput>,
    settings: Option<FormValues>,
    in_flight: bool,
    infra_id: Option<u64>,
    last_error: Option<String>,
    generation: u64,
}

impl ProvisionWizard {
    /// Start a wizard for a template kind
    ///
    /// With a provider the wizard starts at the credentials step; without one
    /// there is nothing to capture and it starts at settings.
    pub fn new(kind: impl Into<String>, form: FormSchema, provider: Option<CloudProvider>) -> Self {
        Self {
            kind: kind.into(),
            form,
            provider,
            step: if provider.is_some() {
                WizardStep::Credentials
            } else {
                WizardStep::Settings
            },
            credentials: None,
            settings: None,
            in_flight: false,
            infra_id: None,
            last_error: None,
            generation: 0,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn form(&self) -> &FormSchema {
        &self.form
    }

    pub fn provider(&self) -> Option<CloudProvider> {
        self.provider
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn credentials(&self) -> Option<&CredentialInput> {
        self.credentials.as_ref()
    }

    pub fn settings(&self) -> Option<&FormValues> {
        self.settings.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn infra_id(&self) -> Option<u64> {
        self.infra_id
    }

    /// Error annotation from the last rejected submission
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switch provider, discarding everything entered so far
    ///
    /// Always resets, even when `provider` is the current one.
    pub fn select_provider(&mut self, provider: CloudProvider) {
        if self.credentials.is_some() || self.settings.is_some() {
            log::info!(
                "Switching to {} discards entered credentials and settings",
                provider
            );
        }
        self.provider = Some(provider);
        self.step = WizardStep::Credentials;
        self.credentials = None;
        self.settings = None;
        self.in_flight = false;
        self.infra_id = None;
        self.last_error = None;
        self.generation += 1;
    }

    /// Store credentials and advance to settings
    pub fn submit_credentials(&mut self, input: CredentialInput) -> Transition {
        if self.step != WizardStep::Credentials {
            return Transition::Ignored;
        }
        let Some(provider) = self.provider else {
            return Transition::Ignored;
        };

        if input.provider() != provider {
            return Transition::Rejected(format!(
                "expected {} credentials, got {}",
                provider,
                input.provider()
            ));
        }
        if let CredentialInput::New(payload) = &input {
            let missing = payload.missing_fields();
            if !missing.is_empty() {
                return Transition::Rejected(format!(
                    "missing credential fields: {}",
                    missing.join(", ")
                ));
            }
        }

        self.credentials = Some(input);
        self.step = WizardStep::Settings;
        Transition::Advanced
    }

    /// Return from settings to credentials, keeping both as drafts
    pub fn back(&mut self) -> Transition {
        match self.step {
            WizardStep::Settings if self.provider.is_some() => {
                self.step = WizardStep::Credentials;
                self.last_error = None;
                Transition::Advanced
            }
            _ => Transition::Ignored,
        }
    }

    /// Keep settings as a draft without submitting them
    pub fn save_draft(&mut self, values: FormValues) -> Transition {
        if self.step != WizardStep::Settings || self.in_flight {
            return Transition::Ignored;
        }
        self.settings = Some(values);
        Transition::Advanced
    }

    /// Store settings, advance to status and hand out the submission ticket
    ///
    /// Only one submission can be in flight; while it is, this returns
    /// `Ignored`. Invalid values are kept as a draft and `Rejected`.
    pub fn submit_settings(&mut self, values: FormValues) -> Transition {
        if self.step != WizardStep::Settings || self.in_flight {
            return Transition::Ignored;
        }

        if let Err(e) = self.form.validate(&values) {
            self.settings = Some(values);
            return Transition::Rejected(e.to_string());
        }

        self.settings = Some(values.clone());
        self.step = WizardStep::Status;
        self.in_flight = true;
        self.last_error = None;

        Transition::Submitted(PendingSubmission {
            kind: self.kind.clone(),
            provider: self.provider,
            credentials: self.credentials.clone(),
            values,
            generation: self.generation,
            epoch: 0,
        })
    }

    /// Apply the outcome of a submission
    ///
    /// Tickets from an earlier generation are ignored. A failure returns to
    /// the settings step with the error recorded; credentials and settings
    /// are kept for resubmission.
    pub fn resolve_submission(
        &mut self,
        pending: &PendingSubmission,
        outcome: SubmissionOutcome,
    ) -> Transition {
        if pending.generation != self.generation || !self.in_flight {
            log::debug!(
                "Ignoring submission result from generation {} (current {})",
                pending.generation,
                self.generation
            );
            return Transition::Ignored;
        }
        self.in_flight = false;

        // A created integration is reused by any resubmission.
        if let (Some(id), Some(CredentialInput::New(payload))) =
            (outcome.integration_id, &self.credentials)
        {
            self.credentials = Some(CredentialInput::Existing {
                provider: payload.provider(),
                integration_id: id,
            });
        }

        match outcome.result {
            Ok(infra_id) => {
                self.infra_id = Some(infra_id);
                Transition::Advanced
            }
            Err(message) => {
                log::warn!("Provisioning {} failed: {}", self.kind, message);
                self.step = WizardStep::Settings;
                self.last_error = Some(message.clone());
                Transition::Rejected(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::types::{AwsCredentialPayload, DoCredentialPayload};
    use serde_json::json;

    fn aws_keys() -> CredentialInput {
        CredentialInput::New(CredentialPayload::Aws(AwsCredentialPayload {
            aws_access_key_id: "AKIA123".to_string(),
            aws_secret_access_key: "secret".to_string(),
            aws_region: "us-east-2".to_string(),
            aws_cluster_id: None,
        }))
    }

    fn values(name: &str) -> FormValues {
        let mut values = FormValues::new();
        values.insert("cluster_name".to_string(), json!(name));
        values
    }

    fn aws_wizard() -> ProvisionWizard {
        ProvisionWizard::new("eks", FormSchema::default(), Some(CloudProvider::Aws))
    }

    #[test]
    fn test_credentials_advance_then_ignore() {
        let mut wizard = aws_wizard();
        assert_eq!(wizard.step(), WizardStep::Credentials);

        assert_eq!(wizard.submit_credentials(aws_keys()), Transition::Advanced);
        assert_eq!(wizard.step(), WizardStep::Settings);

        let existing = CredentialInput::Existing {
            provider: CloudProvider::Aws,
            integration_id: 9,
        };
        assert_eq!(wizard.submit_credentials(existing), Transition::Ignored);
        assert_eq!(wizard.step(), WizardStep::Settings);
        assert_eq!(wizard.credentials(), Some(&aws_keys()));
    }

    #[test]
    fn test_credentials_for_wrong_provider_rejected() {
        let mut wizard = aws_wizard();
        let input = CredentialInput::New(CredentialPayload::Do(DoCredentialPayload {
            do_token: "dop_v1".to_string(),
        }));
        assert!(matches!(
            wizard.submit_credentials(input),
            Transition::Rejected(_)
        ));
        assert_eq!(wizard.step(), WizardStep::Credentials);
        assert!(wizard.credentials().is_none());
    }

    #[test]
    fn test_incomplete_credentials_rejected() {
        let mut wizard = aws_wizard();
        let input = CredentialInput::New(CredentialPayload::Aws(AwsCredentialPayload::default()));
        match wizard.submit_credentials(input) {
            Transition::Rejected(reason) => assert!(reason.contains("aws_access_key_id")),
            other => panic!("unexpected transition {:?}", other),
        }
    }

    #[test]
    fn test_settings_submit_once() {
        let mut wizard = aws_wizard();
        wizard.submit_credentials(aws_keys());

        let first = wizard.submit_settings(values("prod"));
        let pending = first.into_submission().expect("first submission accepted");
        assert_eq!(pending.kind, "eks");
        assert_eq!(pending.provider, Some(CloudProvider::Aws));
        assert_eq!(wizard.step(), WizardStep::Status);
        assert!(wizard.is_submitting());

        assert_eq!(wizard.submit_settings(values("prod")), Transition::Ignored);
    }

    #[test]
    fn test_draft_kept_without_submitting() {
        let mut wizard = aws_wizard();
        assert_eq!(wizard.save_draft(values("early")), Transition::Ignored);
        assert!(wizard.settings().is_none());

        wizard.submit_credentials(aws_keys());
        assert_eq!(wizard.save_draft(values("staging")), Transition::Advanced);
        assert_eq!(wizard.step(), WizardStep::Settings);
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.settings(), Some(&values("staging")));

        assert_eq!(wizard.back(), Transition::Advanced);
        assert_eq!(wizard.submit_credentials(aws_keys()), Transition::Advanced);
        assert_eq!(wizard.settings(), Some(&values("staging")));

        wizard.submit_settings(values("prod"));
        assert_eq!(wizard.save_draft(values("late")), Transition::Ignored);
        assert_eq!(wizard.settings(), Some(&values("prod")));
    }

    #[test]
    fn test_settings_ignored_in_credentials_step() {
        let mut wizard = aws_wizard();
        assert_eq!(wizard.submit_settings(values("x")), Transition::Ignored);
        assert!(wizard.settings().is_none());
    }

    #[test]
    fn test_select_provider_always_resets() {
        let mut wizard = aws_wizard();
        wizard.submit_credentials(aws_keys());
        wizard.submit_settings(values("prod"));
        let generation = wizard.generation();

        wizard.select_provider(CloudProvider::Aws);
        assert_eq!(wizard.step(), WizardStep::Credentials);
        assert!(wizard.credentials().is_none());
        assert!(wizard.settings().is_none());
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.generation(), generation + 1);

        wizard.select_provider(CloudProvider::Gcp);
        assert_eq!(wizard.provider(), Some(CloudProvider::Gcp));
        assert!(wizard.credentials().is_none());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut wizard = aws_wizard();
        wizard.submit_credentials(aws_keys());
        let pending = wizard.submit_settings(values("prod")).into_submission().unwrap();

        wizard.select_provider(CloudProvider::Do);
        let outcome = SubmissionOutcome {
            integration_id: Some(4),
            result: Ok(77),
        };
        assert_eq!(wizard.resolve_submission(&pending, outcome), Transition::Ignored);
        assert_eq!(wizard.infra_id(), None);
        assert_eq!(wizard.step(), WizardStep::Credentials);
    }

    #[test]
    fn test_success_records_infra_and_integration() {
        let mut wizard = aws_wizard();
        wizard.submit_credentials(aws_keys());
        let pending = wizard.submit_settings(values("prod")).into_submission().unwrap();

        let outcome = SubmissionOutcome {
            integration_id: Some(4),
            result: Ok(77),
        };
        assert_eq!(wizard.resolve_submission(&pending, outcome.clone()), Transition::Advanced);
        assert_eq!(wizard.infra_id(), Some(77));
        assert_eq!(
            wizard.credentials(),
            Some(&CredentialInput::Existing {
                provider: CloudProvider::Aws,
                integration_id: 4
            })
        );

        // A duplicate response for the same ticket changes nothing.
        assert_eq!(wizard.resolve_submission(&pending, outcome), Transition::Ignored);
    }

    #[test]
    fn test_failure_returns_to_settings_with_values_kept() {
        let mut wizard = aws_wizard();
        wizard.submit_credentials(aws_keys());
        let pending = wizard.submit_settings(values("prod")).into_submission().unwrap();

        let outcome = SubmissionOutcome {
            integration_id: None,
            result: Err("quota exceeded".to_string()),
        };
        assert_eq!(
            wizard.resolve_submission(&pending, outcome),
            Transition::Rejected("quota exceeded".to_string())
        );
        assert_eq!(wizard.step(), WizardStep::Settings);
        assert_eq!(wizard.last_error(), Some("quota exceeded"));
        assert_eq!(wizard.settings(), Some(&values("prod")));
        assert_eq!(wizard.credentials(), Some(&aws_keys()));

        // Resubmission is allowed again.
        assert!(wizard.submit_settings(values("prod-2")).into_submission().is_some());
        assert_eq!(wizard.last_error(), None);
    }

    #[test]
    fn test_back_keeps_drafts() {
        let mut wizard = aws_wizard();
        assert_eq!(wizard.back(), Transition::Ignored);

        wizard.submit_credentials(aws_keys());
        assert_eq!(wizard.back(), Transition::Advanced);
        assert_eq!(wizard.step(), WizardStep::Credentials);
        assert_eq!(wizard.credentials(), Some(&aws_keys()));

        wizard.submit_credentials(aws_keys());
        wizard.submit_settings(values("prod"));
        assert_eq!(wizard.back(), Transition::Ignored);
        assert_eq!(wizard.step(), WizardStep::Status);
    }

    #[test]
    fn test_wizard_without_provider_starts_at_settings() {
        let mut wizard = ProvisionWizard::new("test", FormSchema::default(), None);
        assert_eq!(wizard.step(), WizardStep::Settings);
        assert_eq!(wizard.back(), Transition::Ignored);
        assert_eq!(wizard.submit_credentials(aws_keys()), Transition::Ignored);

        let pending = wizard.submit_settings(FormValues::new()).into_submission().unwrap();
        assert_eq!(pending.provider, None);
        assert_eq!(pending.credentials, None);
    }

    #[test]
    fn test_invalid_settings_kept_as_draft() {
        let form: FormSchema = serde_json::from_value(json!({
            "tabs": [{ "sections": [{ "contents": [
                { "type": "string-input", "variable": "cluster_name", "required": true }
            ]}]}]
        }))
        .unwrap();
        let mut wizard = ProvisionWizard::new("eks", form, None);

        let mut draft = FormValues::new();
        draft.insert("cluster_name".to_string(), json!(""));
        assert!(matches!(
            wizard.submit_settings(draft.clone()),
            Transition::Rejected(reason) if reason.contains("cluster_name")
        ));
        assert_eq!(wizard.step(), WizardStep::Settings);
        assert_eq!(wizard.settings(), Some(&draft));
        assert!(!wizard.is_submitting());
    }
}
