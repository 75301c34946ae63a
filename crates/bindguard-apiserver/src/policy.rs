use std::collections::HashSet;

/// Outcome of checking one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Hand the request to the next handler
    Forward,
    /// The pod names a scheduler reserved for the host cluster
    RejectConflict { scheduler: String },
    /// The request could not be checked
    ErrorInternal { message: String },
}

impl Decision {
    pub fn is_forward(&self) -> bool {
        matches!(self, Decision::Forward)
    }
}

/// Check a pod's scheduler against the host-reserved scheduler names
///
/// Exact, case-sensitive membership.
pub fn evaluate(pod_scheduler_name: &str, host_schedulers: &HashSet<String>) -> Decision {
    if host_schedulers.contains(pod_scheduler_name) {
        Decision::RejectConflict {
            scheduler: pod_scheduler_name.to_string(),
        }
    } else {
        Decision::Forward
    }
}

/// Message returned to clients when a binding is refused
pub fn conflict_message(scheduler: &str) -> String {
    format!(
        "scheduler {} is configured as a host scheduler, so a scheduler with the same name is not allowed to schedule the pods in the virtual cluster",
        scheduler
    )
}
