//! Control plane API client module
//!
//! Provides authenticated access to the provisioning endpoints: templates,
//! infrastructure runs, Terraform state and cloud integrations.
//!
//! # Example
//!
//! ```rust,ignore
//! use infractl::platform::api::{PlatformApiClient, ProvisionerApi};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlatformApiClient::with_url(
//!         "http://localhost:8080",
//!         Some("token".to_string()),
//!         Duration::from_secs(30),
//!     )?;
//!
//!     for template in client.list_infra_templates(1).await? {
//!         println!("Template: {}", template.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod provisioner;
pub mod types;

// Re-export commonly used items
pub use client::PlatformApiClient;
pub use error::{PlatformApiError, Result};
pub use provisioner::ProvisionerApi;
pub use types::{
    CloudProvider, CredentialPayload, Infra, InfraTemplate, Integration, ProvisionInfraRequest,
    ProvisionInfraResponse, RequiredCredential, TfModule, TfResource,
};
