//! Control plane integration
//!
//! This module provides:
//! - Project selection state and the explicit per-command project context
//! - API client for the provisioning endpoints

pub mod api;
pub mod session;

pub use session::{ProjectContext, ProjectSession};
