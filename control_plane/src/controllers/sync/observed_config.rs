use crate::events::EventRecorder;
use crate::events::reasons::{OBSERVED_CONFIG_CHANGED, OBSERVED_CONFIG_WRITE_ERROR};
use crate::kubernetes::KubeClientCell;
use crate::observers::network::{NetworkObservation, ObservedNetworkConfig};
use crate::options::Options;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::chrono::Utc;
use kube::Api;
use kube::api::{Patch, PatchParams};
use netobserve_api::applyconfigurations::ApplyConfigurationError;
use netobserve_api::applyconfigurations::extract::{
    ExtractError, extract_kube_controller_manager, extract_kube_controller_manager_status,
};
use netobserve_api::applyconfigurations::operator::v1::{
    KubeControllerManagerApplyConfiguration, OperatorConditionApplyConfiguration,
    kube_controller_manager, kube_controller_manager_spec, kube_controller_manager_status,
    operator_condition,
};
use netobserve_api::constants::NETWORK_OBSERVER_DEGRADED_CONDITION;
use netobserve_api::operator::v1::{ConditionStatus, KubeControllerManager};
use netobserve_core::continue_after;
use netobserve_core::sync::signal::Receiver;
use netobserve_core::task::Builder as TaskBuilder;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

const DEGRADED_REASON: &str = "Error";
const AS_EXPECTED_REASON: &str = "AsExpected";

#[derive(Debug, Error)]
pub enum SyncObservedConfigError {
    #[error("Kubernetes API request failed: {0}")]
    Kube(#[from] kube::Error),
    #[error("failed to convert observed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to extract owned fields: {0}")]
    Extract(#[from] ExtractError),
    #[error("invalid apply configuration: {0}")]
    ApplyConfiguration(#[from] ApplyConfigurationError),
}

#[derive(TypedBuilder)]
pub struct SyncObservedConfigParams {
    options: Arc<Options>,
    kube_client_rx: Receiver<KubeClientCell>,
    observation_rx: Receiver<NetworkObservation>,
    recorder: Arc<dyn EventRecorder>,
    #[builder(setter(into))]
    field_manager: String,
    #[builder(setter(into))]
    operator_name: String,
}

/// Writes every observation to the operator resource with server-side apply.
pub fn sync_observed_config(task_builder: &TaskBuilder, params: SyncObservedConfigParams) {
    let SyncObservedConfigParams {
        options,
        kube_client_rx,
        observation_rx,
        recorder,
        field_manager,
        operator_name,
    } = params;

    task_builder
        .new_task(stringify!(sync_observed_config))
        .spawn(async move {
            loop {
                if let (Some(kube_client), Some(observation)) =
                    (kube_client_rx.cloned().await, observation_rx.cloned().await)
                {
                    let api = Api::<KubeControllerManager>::all(kube_client.into());
                    match sync(&api, &field_manager, &operator_name, &observation).await {
                        Ok(true) => {
                            info!(
                                "Applied observed network configuration: operator.name={}",
                                operator_name
                            );
                            recorder.event(
                                OBSERVED_CONFIG_CHANGED,
                                "Writing updated observed network configuration",
                            );
                        }
                        Ok(false) => debug!("Observed network configuration is up to date"),
                        Err(err) => {
                            warn!("Failed to sync observed network configuration: {}", err);
                            recorder.warning(OBSERVED_CONFIG_WRITE_ERROR, &err.to_string());
                        }
                    }
                }
                continue_after!(
                    options.sync_retry_duration(),
                    kube_client_rx.changed(),
                    observation_rx.changed()
                );
            }
        });
}

/// Returns whether the observed configuration changed.
async fn sync(
    api: &Api<KubeControllerManager>,
    field_manager: &str,
    name: &str,
    observation: &NetworkObservation,
) -> Result<bool, SyncObservedConfigError> {
    let current = api.get(name).await?;
    let params = PatchParams::apply(field_manager).force();

    let config_patch = observed_config_patch(&current, field_manager, &observation.config)?;
    let changed = config_patch.is_some();
    if let Some(patch) = config_patch {
        api.patch(name, &params, &Patch::Apply(&patch)).await?;
    }

    let now = Time(Utc::now());
    if let Some(patch) = degraded_condition_patch(&current, field_manager, observation, now)? {
        debug!("Applying {} condition", NETWORK_OBSERVER_DEGRADED_CONDITION);
        api.patch_status(name, &params, &Patch::Apply(&patch)).await?;
    }

    Ok(changed)
}

/// The patch writing `config` into `spec.observedConfig`, unless `field_manager` already applied it.
///
/// Fields left empty by a failed observer keep the value `field_manager` applied
/// before, which is the only fallback available right after a restart.
fn observed_config_patch(
    current: &KubeControllerManager,
    field_manager: &str,
    config: &ObservedNetworkConfig,
) -> Result<Option<KubeControllerManagerApplyConfiguration>, SyncObservedConfigError> {
    let owned = extract_kube_controller_manager(current, field_manager)?;
    let name = owned.name().unwrap_or_default().to_string();
    let applied = owned.spec.and_then(|spec| spec.observed_config);

    let config = match &applied {
        Some(applied) => config
            .clone()
            .or_applied(serde_json::from_value(applied.clone())?),
        None => config.clone(),
    };
    let desired = serde_json::to_value(&config)?;

    if applied.as_ref() == Some(&desired) {
        return Ok(None);
    }

    Ok(Some(kube_controller_manager(name).with_spec(
        kube_controller_manager_spec().with_observed_config(desired),
    )))
}

fn degraded_condition(
    observation: &NetworkObservation,
    owned: Option<&OperatorConditionApplyConfiguration>,
    now: Time,
) -> OperatorConditionApplyConfiguration {
    let status = ConditionStatus::from(observation.is_degraded());
    let (reason, message) = if observation.is_degraded() {
        let message = observation
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        (DEGRADED_REASON, message)
    } else {
        (AS_EXPECTED_REASON, String::new())
    };

    // the transition time only moves when the status flips
    let last_transition_time = owned
        .filter(|owned| owned.status.as_ref() == Some(&status))
        .and_then(|owned| owned.last_transition_time.clone())
        .unwrap_or(now);

    let condition = operator_condition()
        .with_type(NETWORK_OBSERVER_DEGRADED_CONDITION)
        .with_status(status)
        .with_reason(reason)
        .with_last_transition_time(last_transition_time);

    if message.is_empty() {
        condition
    } else {
        condition.with_message(message)
    }
}

/// The status patch for the degraded condition, unless `field_manager` already applied it.
fn degraded_condition_patch(
    current: &KubeControllerManager,
    field_manager: &str,
    observation: &NetworkObservation,
    now: Time,
) -> Result<Option<KubeControllerManagerApplyConfiguration>, SyncObservedConfigError> {
    let owned = extract_kube_controller_manager_status(current, field_manager)?;
    let name = owned.name().unwrap_or_default().to_string();
    let owned_condition = owned.status.as_ref().and_then(|status| {
        status
            .conditions
            .iter()
            .find(|c| c.type_.as_deref() == Some(NETWORK_OBSERVER_DEGRADED_CONDITION))
    });

    let condition = degraded_condition(observation, owned_condition, now);
    if owned_condition == Some(&condition) {
        return Ok(None);
    }

    let status = kube_controller_manager_status().with_conditions([condition])?;
    Ok(Some(kube_controller_manager(name).with_status(status)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::memory::InMemoryRecorder;
    use crate::kubernetes::objects::Objects;
    use crate::observers::network::{
        ExtendedArguments, ObserveNetworkError, observe_network_config,
    };
    use netobserve_api::config::v1::{Network, NetworkSpec};
    use assertables::{assert_none, assert_ok, assert_some};
    use k8s_openapi::chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    const FIELD_MANAGER: &str = "netobserve-control-plane";

    fn observation(errors: Vec<ObserveNetworkError>) -> NetworkObservation {
        NetworkObservation {
            config: ObservedNetworkConfig {
                extended_arguments: ExtendedArguments {
                    cluster_cidr: vec!["10.128.0.0/14".to_string()],
                    service_cluster_ip_range: vec!["172.30.0.0/16".to_string()],
                },
                services_node_port_range: Some("30000-32767".to_string()),
            },
            errors,
        }
    }

    fn not_found() -> ObserveNetworkError {
        ObserveNetworkError::NetworkNotFound {
            name: "cluster".to_string(),
        }
    }

    fn at(seconds: i64) -> Time {
        Time(Utc.timestamp_opt(seconds, 0).single().unwrap_or_default())
    }

    fn kube_controller_manager_object(
        observed_config: &Value,
        degraded: &str,
    ) -> KubeControllerManager {
        assert_ok!(serde_json::from_value(json!({
            "apiVersion": "operator.openshift.io/v1",
            "kind": "KubeControllerManager",
            "metadata": {
                "name": "cluster",
                "managedFields": [
                    {
                        "manager": FIELD_MANAGER,
                        "operation": "Apply",
                        "fieldsType": "FieldsV1",
                        "fieldsV1": { "f:spec": { "f:observedConfig": {} } }
                    },
                    {
                        "manager": FIELD_MANAGER,
                        "operation": "Apply",
                        "subresource": "status",
                        "fieldsType": "FieldsV1",
                        "fieldsV1": {
                            "f:status": {
                                "f:conditions": {
                                    "k:{\"type\":\"NetworkObserverDegraded\"}": {
                                        ".": {},
                                        "f:type": {},
                                        "f:status": {},
                                        "f:reason": {},
                                        "f:lastTransitionTime": {}
                                    }
                                }
                            }
                        }
                    }
                ]
            },
            "spec": {
                "managementState": "Managed",
                "observedConfig": observed_config
            },
            "status": {
                "conditions": [{
                    "type": "NetworkObserverDegraded",
                    "status": degraded,
                    "reason": "AsExpected",
                    "lastTransitionTime": "2024-01-01T00:00:00Z"
                }]
            }
        })))
    }

    #[test]
    fn test_observed_config_is_applied_when_changed() {
        let current = kube_controller_manager_object(&json!({}), "False");

        let patch = assert_ok!(observed_config_patch(
            &current,
            FIELD_MANAGER,
            &observation(vec![]).config
        ));
        let patch = assert_some!(patch);

        assert_eq!(
            assert_ok!(serde_json::to_value(&patch)),
            json!({
                "apiVersion": "operator.openshift.io/v1",
                "kind": "KubeControllerManager",
                "metadata": { "name": "cluster" },
                "spec": {
                    "observedConfig": {
                        "extendedArguments": {
                            "cluster-cidr": ["10.128.0.0/14"],
                            "service-cluster-ip-range": ["172.30.0.0/16"]
                        },
                        "servicesNodePortRange": "30000-32767"
                    }
                }
            })
        );
    }

    #[test]
    fn test_observed_config_is_skipped_when_already_applied() {
        let config = observation(vec![]).config;
        let current =
            kube_controller_manager_object(&assert_ok!(serde_json::to_value(&config)), "False");

        assert_none!(assert_ok!(observed_config_patch(
            &current,
            FIELD_MANAGER,
            &config
        )));
    }

    #[test]
    fn test_invalid_network_after_restart_keeps_applied_config() {
        let applied = observation(vec![]).config;
        let current =
            kube_controller_manager_object(&assert_ok!(serde_json::to_value(&applied)), "False");
        let networks: Objects<Network> = [Arc::new(Network::new(
            "cluster",
            NetworkSpec {
                service_node_port_range: "40000-38930".to_string(),
                ..NetworkSpec::default()
            },
        ))]
        .into_iter()
        .collect();
        let recorder = InMemoryRecorder::default();

        let observation = observe_network_config(&networks, &recorder, None);
        assert!(observation.is_degraded());
        assert_eq!(observation.config, ObservedNetworkConfig::default());

        assert_none!(assert_ok!(observed_config_patch(
            &current,
            FIELD_MANAGER,
            &observation.config
        )));
    }

    #[test]
    fn test_failed_fields_keep_applied_values() {
        let applied = observation(vec![]).config;
        let current =
            kube_controller_manager_object(&assert_ok!(serde_json::to_value(&applied)), "False");
        let observed = ObservedNetworkConfig {
            extended_arguments: ExtendedArguments {
                cluster_cidr: vec!["10.132.0.0/14".to_string()],
                service_cluster_ip_range: vec![],
            },
            services_node_port_range: None,
        };

        let patch = assert_ok!(observed_config_patch(&current, FIELD_MANAGER, &observed));
        let patch = assert_some!(patch);

        assert_eq!(
            assert_ok!(serde_json::to_value(&patch))["spec"]["observedConfig"],
            json!({
                "extendedArguments": {
                    "cluster-cidr": ["10.132.0.0/14"],
                    "service-cluster-ip-range": ["172.30.0.0/16"]
                },
                "servicesNodePortRange": "30000-32767"
            })
        );
    }

    #[test]
    fn test_degraded_condition_keeps_transition_time_while_status_holds() {
        let current = kube_controller_manager_object(&json!({}), "False");

        let patch = assert_ok!(degraded_condition_patch(
            &current,
            FIELD_MANAGER,
            &observation(vec![]),
            at(1_800_000_000)
        ));
        assert_none!(patch);
    }

    #[test]
    fn test_degraded_condition_transition() {
        let current = kube_controller_manager_object(&json!({}), "False");
        let now = at(1_800_000_000);

        let patch = assert_ok!(degraded_condition_patch(
            &current,
            FIELD_MANAGER,
            &observation(vec![not_found()]),
            now.clone()
        ));
        let patch = assert_some!(patch);

        let status = assert_some!(patch.status);
        assert_eq!(status.conditions.len(), 1);
        let condition = &status.conditions[0];
        assert_eq!(condition.status, Some(ConditionStatus::True));
        assert_eq!(condition.reason.as_deref(), Some("Error"));
        assert_eq!(
            condition.message.as_deref(),
            Some("required networks.config.openshift.io/cluster not found")
        );
        assert_eq!(condition.last_transition_time, Some(now));
    }

    #[test]
    fn test_degraded_condition_without_previous_condition() {
        let condition = degraded_condition(&observation(vec![]), None, at(0));

        assert_eq!(condition.type_.as_deref(), Some("NetworkObserverDegraded"));
        assert_eq!(condition.status, Some(ConditionStatus::False));
        assert_eq!(condition.reason.as_deref(), Some("AsExpected"));
        assert_eq!(condition.message, None);
        assert_eq!(condition.last_transition_time, Some(at(0)));
    }
}
