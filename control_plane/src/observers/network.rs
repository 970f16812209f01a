//! Observers extracting the networking parameters of the cluster `Network` configuration.
//!
//! Every observer takes a fresh look at the lister snapshot, never mutates it,
//! and records a warning event before returning an error. Only
//! [`observe_network_config`] falls back to previously observed values.

use crate::events::EventRecorder;
use crate::events::reasons::{
    OBSERVE_CLUSTER_CIDR_FAILED, OBSERVE_EXTERNAL_IP_POLICY_FAILED,
    OBSERVE_SERVICE_CLUSTER_IP_RANGES_FAILED, OBSERVE_SERVICE_NODE_PORT_RANGE_FAILED,
};
use crate::kubernetes::listers::NetworkLister;
use ipnet::IpNet;
use netobserve_api::config::v1::{ExternalIPPolicy, Network};
use netobserve_api::constants::{CLUSTER_CONFIG_NAME, CONFIG_GROUP};
use netobserve_core::net::{PortRange, PortRangeError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserveNetworkError {
    #[error("required networks.{}/{name} not found", CONFIG_GROUP)]
    NetworkNotFound { name: String },

    #[error("required {field} field is not set in networks.{}/{name}", CONFIG_GROUP)]
    FieldNotSet { name: String, field: String },

    #[error("required spec.serviceNodePortRange field {range:?} is not a valid port range: {source}")]
    InvalidRange {
        range: String,
        #[source]
        source: PortRangeError,
    },

    #[error("{field} {cidr:?} is not a valid CIDR: {source}")]
    InvalidCidr {
        field: String,
        cidr: String,
        #[source]
        source: ipnet::AddrParseError,
    },
}

impl ObserveNetworkError {
    /// The configuration is missing rather than wrong.
    pub fn is_not_configured(&self) -> bool {
        matches!(
            self,
            ObserveNetworkError::NetworkNotFound { .. } | ObserveNetworkError::FieldNotSet { .. }
        )
    }

    fn field_not_set(field: impl Into<String>) -> Self {
        ObserveNetworkError::FieldNotSet {
            name: CLUSTER_CONFIG_NAME.to_string(),
            field: field.into(),
        }
    }
}

fn get_network<L: NetworkLister + ?Sized>(lister: &L) -> Result<Arc<Network>, ObserveNetworkError> {
    lister
        .get(CLUSTER_CONFIG_NAME)
        .ok_or_else(|| ObserveNetworkError::NetworkNotFound {
            name: CLUSTER_CONFIG_NAME.to_string(),
        })
}

fn warn_on_error<T>(
    recorder: &(impl EventRecorder + ?Sized),
    reason: &str,
    result: Result<T, ObserveNetworkError>,
) -> Result<T, ObserveNetworkError> {
    result.inspect_err(|err| {
        debug!("Failed to observe network configuration: reason={} error={}", reason, err);
        recorder.warning(reason, &err.to_string());
    })
}

/// Returns the pod network CIDRs from `status.clusterNetwork`, in source order.
pub fn get_cluster_cidrs<L, R>(lister: &L, recorder: &R) -> Result<Vec<String>, ObserveNetworkError>
where
    L: NetworkLister + ?Sized,
    R: EventRecorder + ?Sized,
{
    let result = get_network(lister).and_then(|network| {
        let entries = network
            .status
            .as_ref()
            .map(|status| status.cluster_network.as_slice())
            .unwrap_or_default();

        if entries.is_empty() {
            return Err(ObserveNetworkError::field_not_set("status.clusterNetwork"));
        }

        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if entry.cidr.is_empty() {
                    Err(ObserveNetworkError::field_not_set(format!(
                        "status.clusterNetwork[{i}].cidr"
                    )))
                } else {
                    Ok(entry.cidr.clone())
                }
            })
            .collect()
    });

    warn_on_error(recorder, OBSERVE_CLUSTER_CIDR_FAILED, result)
}

/// Returns `status.serviceNetwork` verbatim.
pub fn get_service_cidrs<L, R>(lister: &L, recorder: &R) -> Result<Vec<String>, ObserveNetworkError>
where
    L: NetworkLister + ?Sized,
    R: EventRecorder + ?Sized,
{
    let result = get_network(lister).and_then(|network| {
        let service_network = network
            .status
            .as_ref()
            .map(|status| status.service_network.clone())
            .unwrap_or_default();

        match service_network.first() {
            Some(first) if !first.is_empty() => Ok(service_network),
            _ => Err(ObserveNetworkError::field_not_set("status.serviceNetwork")),
        }
    });

    warn_on_error(recorder, OBSERVE_SERVICE_CLUSTER_IP_RANGES_FAILED, result)
}

/// Returns `spec.serviceNodePortRange` unchanged once it parses as a valid `LOW-HIGH` range.
pub fn get_service_node_port_range<L, R>(lister: &L, recorder: &R) -> Result<String, ObserveNetworkError>
where
    L: NetworkLister + ?Sized,
    R: EventRecorder + ?Sized,
{
    let result = get_network(lister).and_then(|network| {
        let range = &network.spec.service_node_port_range;
        if range.is_empty() {
            return Err(ObserveNetworkError::field_not_set("spec.serviceNodePortRange"));
        }

        range
            .parse::<PortRange>()
            .map(|_| range.clone())
            .map_err(|source| ObserveNetworkError::InvalidRange {
                range: range.clone(),
                source,
            })
    });

    warn_on_error(recorder, OBSERVE_SERVICE_NODE_PORT_RANGE_FAILED, result)
}

/// Returns the external IP policy, or `None` when the cluster does not restrict external IPs.
pub fn get_external_ip_policy<L, R>(
    lister: &L,
    recorder: &R,
) -> Result<Option<ExternalIPPolicy>, ObserveNetworkError>
where
    L: NetworkLister + ?Sized,
    R: EventRecorder + ?Sized,
{
    let result = get_network(lister).and_then(|network| {
        let Some(policy) = network
            .spec
            .external_ip
            .as_ref()
            .and_then(|external_ip| external_ip.policy.clone())
        else {
            return Ok(None);
        };

        let allowed = policy
            .allowed_cidrs
            .iter()
            .map(|cidr| ("spec.externalIP.policy.allowedCIDRs", cidr));
        let rejected = policy
            .rejected_cidrs
            .iter()
            .map(|cidr| ("spec.externalIP.policy.rejectedCIDRs", cidr));

        for (field, cidr) in allowed.chain(rejected) {
            cidr.parse::<IpNet>()
                .map_err(|source| ObserveNetworkError::InvalidCidr {
                    field: field.to_string(),
                    cidr: cidr.clone(),
                    source,
                })?;
        }

        Ok(Some(policy))
    });

    warn_on_error(recorder, OBSERVE_EXTERNAL_IP_POLICY_FAILED, result)
}

/// Command line arguments of kube-controller-manager derived from the network configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedArguments {
    #[serde(rename = "cluster-cidr", default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_cidr: Vec<String>,

    #[serde(
        rename = "service-cluster-ip-range",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub service_cluster_ip_range: Vec<String>,
}

impl ExtendedArguments {
    pub fn is_empty(&self) -> bool {
        self.cluster_cidr.is_empty() && self.service_cluster_ip_range.is_empty()
    }
}

/// The fragment of `KubeControllerManager.spec.observedConfig` owned by the network observer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedNetworkConfig {
    #[serde(default, skip_serializing_if = "ExtendedArguments::is_empty")]
    pub extended_arguments: ExtendedArguments,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services_node_port_range: Option<String>,
}

impl ObservedNetworkConfig {
    /// Fills every field left empty by a failed observer from `applied`.
    pub fn or_applied(self, applied: ObservedNetworkConfig) -> Self {
        let or = |observed: Vec<String>, applied: Vec<String>| {
            if observed.is_empty() { applied } else { observed }
        };

        ObservedNetworkConfig {
            extended_arguments: ExtendedArguments {
                cluster_cidr: or(
                    self.extended_arguments.cluster_cidr,
                    applied.extended_arguments.cluster_cidr,
                ),
                service_cluster_ip_range: or(
                    self.extended_arguments.service_cluster_ip_range,
                    applied.extended_arguments.service_cluster_ip_range,
                ),
            },
            services_node_port_range: self
                .services_node_port_range
                .or(applied.services_node_port_range),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkObservation {
    pub config: ObservedNetworkConfig,
    pub errors: Vec<ObserveNetworkError>,
}

impl NetworkObservation {
    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Runs every network observer against the current snapshot.
///
/// Each field whose observer fails keeps its value from `previous`, and the
/// error is reported in the returned observation. CIDR lists are joined into
/// a single comma separated argument.
pub fn observe_network_config<L, R>(
    lister: &L,
    recorder: &R,
    previous: Option<&ObservedNetworkConfig>,
) -> NetworkObservation
where
    L: NetworkLister + ?Sized,
    R: EventRecorder + ?Sized,
{
    let previous = previous.cloned().unwrap_or_default();
    let mut errors = Vec::new();

    let mut keep_or_previous = |result: Result<Vec<String>, ObserveNetworkError>, previous: Vec<String>| {
        match result {
            Ok(cidrs) => vec![cidrs.join(",")],
            Err(err) => {
                errors.push(err);
                previous
            }
        }
    };

    let cluster_cidr = keep_or_previous(
        get_cluster_cidrs(lister, recorder),
        previous.extended_arguments.cluster_cidr,
    );
    let service_cluster_ip_range = keep_or_previous(
        get_service_cidrs(lister, recorder),
        previous.extended_arguments.service_cluster_ip_range,
    );

    let services_node_port_range = match get_service_node_port_range(lister, recorder) {
        Ok(range) => Some(range),
        Err(err) => {
            errors.push(err);
            previous.services_node_port_range
        }
    };

    // the policy itself is consumed by the API server, only its validity matters here
    if let Err(err) = get_external_ip_policy(lister, recorder) {
        errors.push(err);
    }

    NetworkObservation {
        config: ObservedNetworkConfig {
            extended_arguments: ExtendedArguments {
                cluster_cidr,
                service_cluster_ip_range,
            },
            services_node_port_range,
        },
        errors,
    }
}
