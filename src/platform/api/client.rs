//! HTTP client for the provisioning control plane
//!
//! Provides authenticated access to templates, infrastructure runs, Terraform
//! state and cloud integrations.

use super::error::{PlatformApiError, Result};
use super::provisioner::ProvisionerApi;
use super::types::{
    ApiErrorResponse, CloudProvider, CredentialPayload, Infra, InfraTemplate, Integration,
    Project, ProvisionInfraRequest, ProvisionInfraResponse, TfModule, UserProfile,
};
use crate::config::types::ApiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// User agent for API requests
const USER_AGENT: &str = concat!("infractl/", env!("CARGO_PKG_VERSION"));

/// Client for the control plane REST API
pub struct PlatformApiClient {
    /// HTTP client with configured timeout and headers
    http_client: Client,
    /// Base API URL, without a trailing slash
    api_url: String,
    /// Bearer token sent with every request
    token: Option<String>,
}

impl PlatformApiClient {
    /// Create a client from the `[api]` config section
    pub fn new(config: &ApiConfig, token: Option<String>) -> Result<Self> {
        Self::with_url(&config.url, token, Duration::from_secs(config.timeout_secs))
    }

    /// Create a client with an explicit API URL
    pub fn with_url(api_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(PlatformApiError::HttpError)?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the configured API URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn auth_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(PlatformApiError::Unauthorized)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Make an authenticated GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.auth_token()?;
        log::debug!("GET {}", path);

        let response = self
            .http_client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST request with a JSON body
    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.auth_token()?;
        log::debug!("POST {}", path);

        let response = self
            .http_client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle the HTTP response, converting errors appropriately
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| PlatformApiError::ParseError(e.to_string()))
        } else {
            let status_code = status.as_u16();
            let error_body = response.text().await.unwrap_or_default();
            let error_message = serde_json::from_str::<ApiErrorResponse>(&error_body)
                .map(|e| e.get_message())
                .unwrap_or(error_body);
            log::debug!("API request failed with {}: {}", status_code, error_message);

            Err(PlatformApiError::from_status(status_code, error_message))
        }
    }

    // =========================================================================
    // User and project API methods
    // =========================================================================

    /// Get the current authenticated user's profile
    ///
    /// Endpoint: GET /api/users/current
    pub async fn get_current_user(&self) -> Result<UserProfile> {
        self.get("/api/users/current").await
    }

    /// List the projects the authenticated user belongs to
    ///
    /// Endpoint: GET /api/projects
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get("/api/projects").await
    }

    // =========================================================================
    // Infrastructure API methods
    // =========================================================================

    /// List infrastructure runs for a project
    ///
    /// Endpoint: GET /api/projects/:projectId/infras
    pub async fn list_infras(&self, project_id: u64) -> Result<Vec<Infra>> {
        self.get(&infras_path(project_id)).await
    }

    /// List stored integrations of one provider
    ///
    /// Endpoint: GET /api/projects/:projectId/integrations/:provider
    pub async fn list_integrations(
        &self,
        provider: CloudProvider,
        project_id: u64,
    ) -> Result<Vec<Integration>> {
        self.get(&integrations_path(project_id, provider)).await
    }
}

#[async_trait]
impl ProvisionerApi for PlatformApiClient {
    /// Endpoint: GET /api/projects/:projectId/infras/templates
    async fn list_infra_templates(&self, project_id: u64) -> Result<Vec<InfraTemplate>> {
        self.get(&format!("{}/templates", infras_path(project_id)))
            .await
    }

    /// Endpoint: POST /api/projects/:projectId/infras
    async fn provision_infra(
        &self,
        project_id: u64,
        request: &ProvisionInfraRequest,
    ) -> Result<ProvisionInfraResponse> {
        self.post(&infras_path(project_id), request).await
    }

    /// Endpoint: GET /api/projects/:projectId/infras/:infraId/state
    async fn get_infra_status(&self, project_id: u64, infra_id: u64) -> Result<Vec<TfModule>> {
        self.get(&infra_state_path(project_id, infra_id)).await
    }

    /// Endpoint: POST /api/projects/:projectId/integrations/:provider
    async fn create_credential_integration(
        &self,
        provider: CloudProvider,
        payload: &CredentialPayload,
        project_id: u64,
    ) -> Result<Integration> {
        self.post(&integrations_path(project_id, provider), payload)
            .await
    }
}

fn infras_path(project_id: u64) -> String {
    format!("/api/projects/{}/infras", project_id)
}

fn infra_state_path(project_id: u64, infra_id: u64) -> String {
    format!("/api/projects/{}/infras/{}/state", project_id, infra_id)
}

fn integrations_path(project_id: u64, provider: CloudProvider) -> String {
    format!(
        "/api/projects/{}/integrations/{}",
        project_id,
        provider.as_str()
    )
}
