//! API request/response types for the provisioning control plane
//!
//! These types mirror the backend DTOs for templates, infrastructure runs,
//! Terraform module state and cloud integrations.

use crate::provision::form::FormSchema;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// API error response format
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: Option<String>,
    /// Detailed error message
    pub message: Option<String>,
}

impl ApiErrorResponse {
    /// Get the error message, preferring `message` over `error`
    pub fn get_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// Deserialize `null` as the type's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Projects and users
// =============================================================================

/// Project information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier
    pub id: u64,
    /// Project display name
    pub name: String,
}

/// User profile information (from /api/users/current)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub email: String,
}

// =============================================================================
// Cloud providers and integrations
// =============================================================================

/// Cloud providers that can back a provisioning run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Gcp,
    Do,
}

impl CloudProvider {
    /// Returns the lowercase string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Gcp => "gcp",
            CloudProvider::Do => "do",
        }
    }

    /// Returns the human-readable display name for this provider
    pub fn display_name(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "Amazon Web Services (AWS)",
            CloudProvider::Gcp => "Google Cloud Platform (GCP)",
            CloudProvider::Do => "DigitalOcean (DO)",
        }
    }

    /// The template credential key that integrations of this provider satisfy
    pub fn credential_key(&self) -> RequiredCredential {
        match self {
            CloudProvider::Aws => RequiredCredential::AwsIntegrationId,
            CloudProvider::Gcp => RequiredCredential::GcpIntegrationId,
            CloudProvider::Do => RequiredCredential::DoIntegrationId,
        }
    }

    /// Returns all supported cloud providers
    pub fn all() -> &'static [CloudProvider] {
        &[CloudProvider::Aws, CloudProvider::Gcp, CloudProvider::Do]
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" | "amazon" => Ok(CloudProvider::Aws),
            "gcp" | "google" | "google-cloud" => Ok(CloudProvider::Gcp),
            "do" | "digitalocean" | "digital-ocean" => Ok(CloudProvider::Do),
            _ => Err(format!(
                "Unknown cloud provider: '{}'. Valid options: aws, gcp, do",
                s
            )),
        }
    }
}

/// Which stored integration a template needs before it can be provisioned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredCredential {
    #[serde(rename = "aws_integration_id")]
    AwsIntegrationId,
    #[serde(rename = "gcp_integration_id")]
    GcpIntegrationId,
    #[serde(rename = "do_integration_id")]
    DoIntegrationId,
    #[default]
    #[serde(rename = "")]
    None,
}

impl RequiredCredential {
    /// Wire name of the credential key
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredCredential::AwsIntegrationId => "aws_integration_id",
            RequiredCredential::GcpIntegrationId => "gcp_integration_id",
            RequiredCredential::DoIntegrationId => "do_integration_id",
            RequiredCredential::None => "",
        }
    }

    /// The provider whose integration satisfies this key, if any
    pub fn provider(&self) -> Option<CloudProvider> {
        match self {
            RequiredCredential::AwsIntegrationId => Some(CloudProvider::Aws),
            RequiredCredential::GcpIntegrationId => Some(CloudProvider::Gcp),
            RequiredCredential::DoIntegrationId => Some(CloudProvider::Do),
            RequiredCredential::None => None,
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, RequiredCredential::None)
    }
}

/// AWS access key credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwsCredentialPayload {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_cluster_id: Option<String>,
}

/// GCP service account credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GcpCredentialPayload {
    /// Service account key file contents (JSON)
    pub gcp_key_data: String,
    pub gcp_project_id: String,
    pub gcp_region: String,
}

/// DigitalOcean API token credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoCredentialPayload {
    pub do_token: String,
}

/// Credential payload for creating an integration, one variant per provider
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CredentialPayload {
    Aws(AwsCredentialPayload),
    Gcp(GcpCredentialPayload),
    Do(DoCredentialPayload),
}

impl CredentialPayload {
    pub fn provider(&self) -> CloudProvider {
        match self {
            CredentialPayload::Aws(_) => CloudProvider::Aws,
            CredentialPayload::Gcp(_) => CloudProvider::Gcp,
            CredentialPayload::Do(_) => CloudProvider::Do,
        }
    }

    /// Names of required fields that were left empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match self {
            CredentialPayload::Aws(aws) => {
                if aws.aws_access_key_id.trim().is_empty() {
                    missing.push("aws_access_key_id");
                }
                if aws.aws_secret_access_key.trim().is_empty() {
                    missing.push("aws_secret_access_key");
                }
                if aws.aws_region.trim().is_empty() {
                    missing.push("aws_region");
                }
            }
            CredentialPayload::Gcp(gcp) => {
                if gcp.gcp_key_data.trim().is_empty() {
                    missing.push("gcp_key_data");
                }
                if gcp.gcp_project_id.trim().is_empty() {
                    missing.push("gcp_project_id");
                }
                if gcp.gcp_region.trim().is_empty() {
                    missing.push("gcp_region");
                }
            }
            CredentialPayload::Do(d) => {
                if d.do_token.trim().is_empty() {
                    missing.push("do_token");
                }
            }
        }
        missing
    }
}

/// A stored credential reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub id: u64,
    #[serde(default)]
    pub project_id: Option<u64>,
    /// Provider-specific label (access key id, GCP project, ...)
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Templates and provisioning
// =============================================================================

/// An infrastructure template offered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfraTemplate {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub form: FormSchema,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_credential: RequiredCredential,
}

/// Request body for starting a provisioning run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionInfraRequest {
    pub kind: String,
    pub values: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_integration_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcp_integration_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_integration_id: Option<u64>,
}

/// Response from starting a provisioning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionInfraResponse {
    pub infra_id: u64,
}

/// Lifecycle status of an infrastructure run as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfraRunStatus {
    Creating,
    Created,
    Updating,
    Deleting,
    Deleted,
    Errored,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for InfraRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InfraRunStatus::Creating => "creating",
            InfraRunStatus::Created => "created",
            InfraRunStatus::Updating => "updating",
            InfraRunStatus::Deleting => "deleting",
            InfraRunStatus::Deleted => "deleted",
            InfraRunStatus::Errored => "errored",
            InfraRunStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// A provisioned (or provisioning) infrastructure run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Infra {
    pub id: u64,
    pub project_id: u64,
    pub kind: String,
    pub status: InfraRunStatus,
    #[serde(default)]
    pub aws_integration_id: Option<u64>,
    #[serde(default)]
    pub gcp_integration_id: Option<u64>,
    #[serde(default)]
    pub do_integration_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Terraform state
// =============================================================================

/// One underlying cloud object tracked by Terraform
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TfResource {
    pub addr: String,
    #[serde(default)]
    pub provisioned: bool,
    /// Empty string means no error
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
}

impl TfResource {
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// One infrastructure component being provisioned
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TfModule {
    pub id: u64,
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<TfResource>,
}
