//! Provisioning core
//!
//! - [`status`]: reduces Terraform module state to per-module progress
//! - [`board`]: holds the latest polled snapshot, dropping stale responses
//! - [`templates`]: template selection and credential reuse
//! - [`wizard`]: the credentials → settings → status state machine
//! - [`flow`]: the whole template-to-status flow and its API driver
//! - [`form`]: declarative template forms

pub mod board;
pub mod flow;
pub mod form;
pub mod status;
pub mod templates;
pub mod wizard;

use crate::platform::api::types::CloudProvider;
use thiserror::Error;

pub use board::{ApplyOutcome, StatusBoard};
pub use flow::{FlowPhase, ProvisionFlow, execute_submission};
pub use status::{InfraStatus, ModuleState, ModuleStatus, aggregate_infra, aggregate_module};
pub use templates::{CredentialSelection, TemplateSelector, TemplateView};
pub use wizard::{
    CredentialInput, PendingSubmission, ProvisionWizard, SubmissionOutcome, Transition,
    WizardStep,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("unknown template `{0}`")]
    UnknownTemplate(String),

    #[error("no template selected")]
    NoTemplateSelected,

    #[error("no templates are available for this project")]
    NoTemplates,

    #[error("template `{template}` does not take {provider} credentials")]
    ProviderMismatch {
        template: String,
        provider: CloudProvider,
    },

    #[error("wizard cancelled")]
    Cancelled,
}
