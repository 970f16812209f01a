//! Kubernetes events about the observed network configuration.
//!
//! Recording is fire and forget. Observers call [`EventRecorder`] synchronously
//! and never learn whether the event reached the API server.

#[cfg(test)]
pub mod memory;
pub mod publisher;

use kube::runtime::events::EventType;

pub trait EventRecorder: Send + Sync {
    fn record(&self, event: RecordedEvent);

    fn event(&self, reason: &str, message: &str) {
        self.record(RecordedEvent::new(EventType::Normal, reason, message));
    }

    fn warning(&self, reason: &str, message: &str) {
        self.record(RecordedEvent::new(EventType::Warning, reason, message));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub type_: EventType,
    pub reason: String,
    pub message: String,
}

impl RecordedEvent {
    pub fn new(type_: EventType, reason: &str, message: &str) -> Self {
        Self {
            type_,
            reason: reason.to_string(),
            message: message.to_string(),
        }
    }
}

/// Values of the REASON column of `kubectl get events`.
pub mod reasons {
    pub const OBSERVE_CLUSTER_CIDR_FAILED: &str = "ObserveClusterCIDRFailed";
    pub const OBSERVE_SERVICE_CLUSTER_IP_RANGES_FAILED: &str = "ObserveServiceClusterIPRangesFailed";
    pub const OBSERVE_SERVICE_NODE_PORT_RANGE_FAILED: &str = "ObserveServiceNodePortRangeFailed";
    pub const OBSERVE_EXTERNAL_IP_POLICY_FAILED: &str = "ObserveExternalIPPolicyFailed";
    pub const OBSERVED_CONFIG_CHANGED: &str = "ObservedConfigChanged";
    pub const OBSERVED_CONFIG_WRITE_ERROR: &str = "ObservedConfigWriteError";
}

/// Values of the ACTION column of `kubectl get events`.
pub mod actions {
    pub const OBSERVE: &str = "Observe";
}
