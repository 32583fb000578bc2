//! The control plane operations the provisioning core depends on
//!
//! The wizard and status views only ever talk to the backend through this
//! trait, so tests and alternative front-ends can supply their own
//! implementation.

use super::error::Result;
use super::types::{
    CloudProvider, CredentialPayload, InfraTemplate, Integration, ProvisionInfraRequest,
    ProvisionInfraResponse, TfModule,
};
use async_trait::async_trait;

#[async_trait]
pub trait ProvisionerApi: Send + Sync {
    /// List the infrastructure templates available to a project
    async fn list_infra_templates(&self, project_id: u64) -> Result<Vec<InfraTemplate>>;

    /// Start a provisioning run and return its infra id
    async fn provision_infra(
        &self,
        project_id: u64,
        request: &ProvisionInfraRequest,
    ) -> Result<ProvisionInfraResponse>;

    /// Fetch the current Terraform module state of an infra run
    async fn get_infra_status(&self, project_id: u64, infra_id: u64) -> Result<Vec<TfModule>>;

    /// Store provider credentials and return the new integration
    async fn create_credential_integration(
        &self,
        provider: CloudProvider,
        payload: &CredentialPayload,
        project_id: u64,
    ) -> Result<Integration>;
}
