//! Latest-snapshot holder for a polled provisioning run
//!
//! Every status request is stamped with a sequence number before it is sent.
//! Responses may come back out of order; a response older than the snapshot
//! already applied is dropped so the view never moves backwards.

use super::status::{InfraStatus, aggregate_infra};
use crate::platform::api::types::TfModule;
use crate::platform::api::{PlatformApiError, ProvisionerApi};

/// Sequence number of a status request
pub type RequestSeq = u64;

/// Outcome of applying a poll response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// An equal or newer response has already been applied
    Stale,
}

#[derive(Debug, Clone)]
pub struct StatusBoard {
    infra_id: u64,
    next_seq: RequestSeq,
    applied_seq: Option<RequestSeq>,
    modules: Vec<TfModule>,
    status: InfraStatus,
    last_error: Option<String>,
}

impl StatusBoard {
    pub fn new(infra_id: u64) -> Self {
        Self {
            infra_id,
            next_seq: 0,
            applied_seq: None,
            modules: Vec::new(),
            status: aggregate_infra(&[]),
            last_error: None,
        }
    }

    pub fn infra_id(&self) -> u64 {
        self.infra_id
    }

    /// Stamp a new status request
    pub fn next_request(&mut self) -> RequestSeq {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Replace the snapshot with a poll response unless it is stale
    pub fn apply(&mut self, seq: RequestSeq, modules: Vec<TfModule>) -> ApplyOutcome {
        if self.is_stale(seq) {
            log::debug!(
                "Dropping stale status response #{} for infra {}",
                seq,
                self.infra_id
            );
            return ApplyOutcome::Stale;
        }

        self.status = aggregate_infra(&modules);
        self.modules = modules;
        self.applied_seq = Some(seq);
        self.last_error = None;
        ApplyOutcome::Applied
    }

    /// Record a failed poll; the previous snapshot stays visible
    pub fn record_failure(&mut self, seq: RequestSeq, error: impl Into<String>) -> ApplyOutcome {
        if self.is_stale(seq) {
            return ApplyOutcome::Stale;
        }
        self.last_error = Some(error.into());
        ApplyOutcome::Applied
    }

    /// Fetch one snapshot from the control plane and apply it
    ///
    /// A failed fetch is recorded on the board and also returned, so the
    /// caller can decide whether to keep polling.
    pub async fn refresh<A: ProvisionerApi + ?Sized>(
        &mut self,
        api: &A,
        project_id: u64,
    ) -> Result<ApplyOutcome, PlatformApiError> {
        let seq = self.next_request();
        match api.get_infra_status(project_id, self.infra_id).await {
            Ok(modules) => Ok(self.apply(seq, modules)),
            Err(e) => {
                log::warn!("Status poll for infra {} failed: {}", self.infra_id, e);
                self.record_failure(seq, e.to_string());
                Err(e)
            }
        }
    }

    fn is_stale(&self, seq: RequestSeq) -> bool {
        self.applied_seq.is_some_and(|applied| seq <= applied)
    }

    pub fn modules(&self) -> &[TfModule] {
        &self.modules
    }

    pub fn status(&self) -> &InfraStatus {
        &self.status
    }

    /// Error from the most recent failed poll, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True once a snapshot has been applied and every module is settled
    pub fn is_finished(&self) -> bool {
        self.applied_seq.is_some() && self.status.is_settled()
    }
}
