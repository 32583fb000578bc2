//! Authentication for the control plane
//!
//! Stores and resolves the bearer token used by the API client.

pub mod credentials;
