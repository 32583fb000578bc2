//! Per-module provisioning status
//!
//! Reduces the Terraform resources of a module to a single visual state and a
//! completion percentage.

use crate::platform::api::types::TfModule;
use serde::Serialize;
use std::fmt;

/// Visual state of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleState {
    Successful,
    Loading,
    Error,
}

impl ModuleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleState::Successful => "successful",
            ModuleState::Loading => "loading",
            ModuleState::Error => "error",
        }
    }
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived status of one module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleStatus {
    pub state: ModuleState,
    /// 0.0..=100.0, never NaN
    pub percent: f64,
    pub provisioned: usize,
    pub total: usize,
    /// Non-empty resource errors, in resource order
    pub errors: Vec<String>,
}

/// Derived status of a whole provisioning run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfraStatus {
    pub state: ModuleState,
    pub percent: f64,
    pub modules: Vec<(u64, ModuleStatus)>,
}

impl InfraStatus {
    /// True once no module is still loading
    ///
    /// A failed module does not settle the run while others are in progress.
    pub fn is_settled(&self) -> bool {
        !self.modules.is_empty()
            && self
                .modules
                .iter()
                .all(|(_, m)| m.state != ModuleState::Loading)
    }
}

/// Percentage of `provisioned` over `total`; a run with no resources is 0%
fn completion(provisioned: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * provisioned as f64 / total as f64
    }
}

/// Compute the status of a single module
///
/// Any resource error makes the module `Error`, even when every resource is
/// provisioned. A module with no resources is `Loading` at 0%.
pub fn aggregate_module(module: &TfModule) -> ModuleStatus {
    let total = module.resources.len();
    let provisioned = module.resources.iter().filter(|r| r.provisioned).count();
    let errors: Vec<String> = module
        .resources
        .iter()
        .filter(|r| r.has_error())
        .map(|r| r.error.clone())
        .collect();

    let state = if !errors.is_empty() {
        ModuleState::Error
    } else if total > 0 && provisioned == total {
        ModuleState::Successful
    } else {
        ModuleState::Loading
    };

    ModuleStatus {
        state,
        percent: completion(provisioned, total),
        provisioned,
        total,
        errors,
    }
}

/// Compute the status of every module and of the run as a whole
pub fn aggregate_infra(modules: &[TfModule]) -> InfraStatus {
    let statuses: Vec<(u64, ModuleStatus)> = modules
        .iter()
        .map(|m| (m.id, aggregate_module(m)))
        .collect();

    let provisioned: usize = statuses.iter().map(|(_, s)| s.provisioned).sum();
    let total: usize = statuses.iter().map(|(_, s)| s.total).sum();

    let state = if statuses.iter().any(|(_, s)| s.state == ModuleState::Error) {
        ModuleState::Error
    } else if !statuses.is_empty()
        && statuses
            .iter()
            .all(|(_, s)| s.state == ModuleState::Successful)
    {
        ModuleState::Successful
    } else {
        ModuleState::Loading
    };

    InfraStatus {
        state,
        percent: completion(provisioned, total),
        modules: statuses,
    }
}

/// Long display name for a module kind, falling back to the kind itself
pub fn module_display_name(kind: &str) -> &str {
    match kind {
        "eks" => "Elastic Kubernetes Service (EKS)",
        "ecr" => "Elastic Container Registry (ECR)",
        "doks" => "DigitalOcean Kubernetes Service (DOKS)",
        "docr" => "DigitalOcean Container Registry (DOCR)",
        "gke" => "Google Kubernetes Engine (GKE)",
        "gcr" => "Google Container Registry (GCR)",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::types::TfResource;

    fn resource(addr: &str, provisioned: bool, error: &str) -> TfResource {
        TfResource {
            addr: addr.to_string(),
            provisioned,
            error: error.to_string(),
        }
    }

    fn module(id: u64, kind: &str, resources: Vec<TfResource>) -> TfModule {
        TfModule {
            id,
            kind: kind.to_string(),
            resources,
        }
    }

    #[test]
    fn test_half_provisioned_module_is_loading() {
        let m = module(
            1,
            "eks",
            vec![resource("a", true, ""), resource("b", false, "")],
        );
        let status = aggregate_module(&m);
        assert_eq!(status.state, ModuleState::Loading);
        assert_eq!(status.percent, 50.0);
        assert!(status.errors.is_empty());
    }

    #[test]
    fn test_error_wins_over_completion() {
        let m = module(2, "ecr", vec![resource("a", true, "quota exceeded")]);
        let status = aggregate_module(&m);
        assert_eq!(status.state, ModuleState::Error);
        assert_eq!(status.percent, 100.0);
        assert_eq!(status.errors, vec!["quota exceeded".to_string()]);
    }

    #[test]
    fn test_all_provisioned_is_successful() {
        let m = module(
            3,
            "doks",
            vec![resource("a", true, ""), resource("b", true, "")],
        );
        let status = aggregate_module(&m);
        assert_eq!(status.state, ModuleState::Successful);
        assert_eq!(status.percent, 100.0);
    }

    #[test]
    fn test_empty_module_is_loading_at_zero() {
        let status = aggregate_module(&module(4, "docr", vec![]));
        assert_eq!(status.state, ModuleState::Loading);
        assert_eq!(status.percent, 0.0);
        assert!(!status.percent.is_nan());
        assert_eq!(status.total, 0);
    }

    #[test]
    fn test_errors_keep_resource_order() {
        let m = module(
            5,
            "eks",
            vec![
                resource("a", false, "first"),
                resource("b", true, ""),
                resource("c", false, "second"),
            ],
        );
        assert_eq!(
            aggregate_module(&m).errors,
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn test_infra_rollup() {
        let done = module(1, "ecr", vec![resource("a", true, "")]);
        let pending = module(2, "eks", vec![resource("b", false, "")]);
        let failed = module(3, "eks", vec![resource("c", false, "boom")]);

        let status = aggregate_infra(&[done.clone(), pending.clone()]);
        assert_eq!(status.state, ModuleState::Loading);
        assert_eq!(status.percent, 50.0);
        assert!(!status.is_settled());

        let status = aggregate_infra(&[done.clone(), failed.clone()]);
        assert_eq!(status.state, ModuleState::Error);
        assert!(status.is_settled());

        let status = aggregate_infra(&[failed, pending]);
        assert_eq!(status.state, ModuleState::Error);
        assert!(!status.is_settled());

        let status = aggregate_infra(&[done]);
        assert_eq!(status.state, ModuleState::Successful);
        assert_eq!(status.modules.len(), 1);
    }

    #[test]
    fn test_infra_without_modules_is_loading() {
        let status = aggregate_infra(&[]);
        assert_eq!(status.state, ModuleState::Loading);
        assert_eq!(status.percent, 0.0);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(module_display_name("eks"), "Elastic Kubernetes Service (EKS)");
        assert_eq!(module_display_name("gcr"), "Google Container Registry (GCR)");
        assert_eq!(module_display_name("rds"), "rds");
    }

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ModuleState::Successful).unwrap(),
            "\"successful\""
        );
        assert_eq!(ModuleState::Error.to_string(), "error");
    }
}
