//! Template selection and the credential short-circuit
//!
//! Selecting a template that needs a cloud integration first asks for
//! credentials, unless a matching integration was already chosen earlier in
//! the same flow.

use super::WizardError;
use super::form::FormValues;
use crate::platform::api::types::{InfraTemplate, ProvisionInfraRequest, RequiredCredential};

/// The integration chosen for this flow; at most one key is ever set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CredentialSelection {
    selected: Option<(RequiredCredential, u64)>,
}

impl CredentialSelection {
    /// Select an integration, replacing any previous selection
    pub fn set(&mut self, key: RequiredCredential, integration_id: u64) {
        if key.is_required() {
            self.selected = Some((key, integration_id));
        }
    }

    pub fn get(&self, key: RequiredCredential) -> Option<u64> {
        self.selected
            .filter(|(selected, _)| *selected == key)
            .map(|(_, id)| id)
    }

    /// Whether a template needing `required` can skip the credential step
    pub fn satisfies(&self, required: RequiredCredential) -> bool {
        !required.is_required() || self.get(required).is_some()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// Build the provisioning request body for `kind` with this selection
    pub fn build_request(&self, kind: &str, values: FormValues) -> ProvisionInfraRequest {
        ProvisionInfraRequest {
            kind: kind.to_string(),
            values,
            aws_integration_id: self.get(RequiredCredential::AwsIntegrationId),
            gcp_integration_id: self.get(RequiredCredential::GcpIntegrationId),
            do_integration_id: self.get(RequiredCredential::DoIntegrationId),
        }
    }
}

/// What the consumer should render next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateView<'a> {
    /// No template chosen yet
    List,
    /// Capture this credential before showing the form
    Credentials(RequiredCredential),
    /// Render the template's settings form
    Form(&'a InfraTemplate),
}

#[derive(Debug, Clone, Default)]
pub struct TemplateSelector {
    templates: Vec<InfraTemplate>,
    selected: Option<usize>,
    credentials: CredentialSelection,
}

impl TemplateSelector {
    pub fn new(templates: Vec<InfraTemplate>) -> Self {
        Self {
            templates,
            selected: None,
            credentials: CredentialSelection::default(),
        }
    }

    pub fn templates(&self) -> &[InfraTemplate] {
        &self.templates
    }

    pub fn selected(&self) -> Option<&InfraTemplate> {
        self.selected.and_then(|i| self.templates.get(i))
    }

    pub fn credentials(&self) -> &CredentialSelection {
        &self.credentials
    }

    /// Choose a template by name
    pub fn select_template(&mut self, name: &str) -> Result<TemplateView<'_>, WizardError> {
        if self.templates.is_empty() {
            return Err(WizardError::NoTemplates);
        }
        let index = self
            .templates
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| WizardError::UnknownTemplate(name.to_string()))?;
        self.selected = Some(index);
        log::debug!("Selected template {}", name);
        Ok(self.current_view())
    }

    pub fn current_view(&self) -> TemplateView<'_> {
        match self.selected() {
            None => TemplateView::List,
            Some(template) if !self.credentials.satisfies(template.required_credential) => {
                TemplateView::Credentials(template.required_credential)
            }
            Some(template) => TemplateView::Form(template),
        }
    }

    /// Record the integration captured for the current flow
    pub fn set_credential(&mut self, key: RequiredCredential, integration_id: u64) {
        self.credentials.set(key, integration_id);
    }

    /// Return to the template list; the credential selection is kept so a
    /// later template can reuse it
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
