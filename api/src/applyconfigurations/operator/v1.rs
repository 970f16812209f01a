use crate::applyconfigurations::meta::{
    ObjectMetaApplyConfiguration, TypeMetaApplyConfiguration, object_meta_setters,
};
use crate::applyconfigurations::{ApplyConfigurationError, KeyedEntry, append_keyed, is_unset};
use crate::constants::{KUBE_CONTROLLER_MANAGER_API_VERSION, KUBE_CONTROLLER_MANAGER_KIND};
use crate::operator::v1::{ConditionStatus, LogLevel, ManagementState};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorConditionApplyConfiguration {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConditionStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn operator_condition() -> OperatorConditionApplyConfiguration {
    OperatorConditionApplyConfiguration::default()
}

impl OperatorConditionApplyConfiguration {
    pub fn with_type(mut self, value: impl Into<String>) -> Self {
        self.type_ = Some(value.into());
        self
    }

    pub fn with_status(mut self, value: ConditionStatus) -> Self {
        self.status = Some(value);
        self
    }

    pub fn with_last_transition_time(mut self, value: Time) -> Self {
        self.last_transition_time = Some(value);
        self
    }

    pub fn with_reason(mut self, value: impl Into<String>) -> Self {
        self.reason = Some(value.into());
        self
    }

    pub fn with_message(mut self, value: impl Into<String>) -> Self {
        self.message = Some(value.into());
        self
    }
}

impl KeyedEntry for OperatorConditionApplyConfiguration {
    fn missing_key(&self) -> Option<&'static str> {
        is_unset(self.type_.as_ref()).then_some("type")
    }
}

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatusApplyConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_generation: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

pub fn generation_status() -> GenerationStatusApplyConfiguration {
    GenerationStatusApplyConfiguration::default()
}

impl GenerationStatusApplyConfiguration {
    pub fn with_group(mut self, value: impl Into<String>) -> Self {
        self.group = Some(value.into());
        self
    }

    pub fn with_resource(mut self, value: impl Into<String>) -> Self {
        self.resource = Some(value.into());
        self
    }

    pub fn with_namespace(mut self, value: impl Into<String>) -> Self {
        self.namespace = Some(value.into());
        self
    }

    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn with_last_generation(mut self, value: i64) -> Self {
        self.last_generation = Some(value);
        self
    }

    pub fn with_hash(mut self, value: impl Into<String>) -> Self {
        self.hash = Some(value.into());
        self
    }
}

impl KeyedEntry for GenerationStatusApplyConfiguration {
    // group and namespace are keys too, but empty is legal for core and cluster scoped resources
    fn missing_key(&self) -> Option<&'static str> {
        if is_unset(self.resource.as_ref()) {
            Some("resource")
        } else if is_unset(self.name.as_ref()) {
            Some("name")
        } else {
            None
        }
    }
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatusApplyConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_revision: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_revision: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failed_revision: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failed_time: Option<Time>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failed_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failed_count: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fallback_count: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last_failed_revision_errors: Vec<String>,
}

pub fn node_status() -> NodeStatusApplyConfiguration {
    NodeStatusApplyConfiguration::default()
}

impl NodeStatusApplyConfiguration {
    pub fn with_node_name(mut self, value: impl Into<String>) -> Self {
        self.node_name = Some(value.into());
        self
    }

    pub fn with_current_revision(mut self, value: i32) -> Self {
        self.current_revision = Some(value);
        self
    }

    pub fn with_target_revision(mut self, value: i32) -> Self {
        self.target_revision = Some(value);
        self
    }

    pub fn with_last_failed_revision(mut self, value: i32) -> Self {
        self.last_failed_revision = Some(value);
        self
    }

    pub fn with_last_failed_time(mut self, value: Time) -> Self {
        self.last_failed_time = Some(value);
        self
    }

    pub fn with_last_failed_reason(mut self, value: impl Into<String>) -> Self {
        self.last_failed_reason = Some(value.into());
        self
    }

    pub fn with_last_failed_count(mut self, value: i32) -> Self {
        self.last_failed_count = Some(value);
        self
    }

    pub fn with_last_fallback_count(mut self, value: i32) -> Self {
        self.last_fallback_count = Some(value);
        self
    }

    pub fn with_last_failed_revision_errors(
        mut self,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.last_failed_revision_errors
            .extend(values.into_iter().map(Into::into));
        self
    }
}

impl KeyedEntry for NodeStatusApplyConfiguration {
    fn missing_key(&self) -> Option<&'static str> {
        is_unset(self.node_name.as_ref()).then_some("nodeName")
    }
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeControllerManagerStatusApplyConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<OperatorConditionApplyConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_available_revision: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generations: Vec<GenerationStatusApplyConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_available_revision_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_statuses: Vec<NodeStatusApplyConfiguration>,
}

pub fn kube_controller_manager_status() -> KubeControllerManagerStatusApplyConfiguration {
    KubeControllerManagerStatusApplyConfiguration::default()
}

impl KubeControllerManagerStatusApplyConfiguration {
    pub fn with_observed_generation(mut self, value: i64) -> Self {
        self.observed_generation = Some(value);
        self
    }

    pub fn with_conditions(
        mut self,
        values: impl IntoIterator<Item = OperatorConditionApplyConfiguration>,
    ) -> Result<Self, ApplyConfigurationError> {
        append_keyed(&mut self.conditions, "conditions", values)?;
        Ok(self)
    }

    pub fn with_version(mut self, value: impl Into<String>) -> Self {
        self.version = Some(value.into());
        self
    }

    pub fn with_ready_replicas(mut self, value: i32) -> Self {
        self.ready_replicas = Some(value);
        self
    }

    pub fn with_latest_available_revision(mut self, value: i32) -> Self {
        self.latest_available_revision = Some(value);
        self
    }

    pub fn with_generations(
        mut self,
        values: impl IntoIterator<Item = GenerationStatusApplyConfiguration>,
    ) -> Result<Self, ApplyConfigurationError> {
        append_keyed(&mut self.generations, "generations", values)?;
        Ok(self)
    }

    pub fn with_latest_available_revision_reason(mut self, value: impl Into<String>) -> Self {
        self.latest_available_revision_reason = Some(value.into());
        self
    }

    pub fn with_node_statuses(
        mut self,
        values: impl IntoIterator<Item = NodeStatusApplyConfiguration>,
    ) -> Result<Self, ApplyConfigurationError> {
        append_keyed(&mut self.node_statuses, "nodeStatuses", values)?;
        Ok(self)
    }
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeControllerManagerSpecApplyConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_state: Option<ManagementState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_log_level: Option<LogLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_config: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsupported_config_overrides: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_redeployment_reason: Option<String>,

    #[serde(
        default,
        rename = "useMoreSecureServiceCA",
        skip_serializing_if = "Option::is_none"
    )]
    pub use_more_secure_service_ca: Option<bool>,
}

pub fn kube_controller_manager_spec() -> KubeControllerManagerSpecApplyConfiguration {
    KubeControllerManagerSpecApplyConfiguration::default()
}

impl KubeControllerManagerSpecApplyConfiguration {
    pub fn with_management_state(mut self, value: ManagementState) -> Self {
        self.management_state = Some(value);
        self
    }

    pub fn with_log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn with_operator_log_level(mut self, value: LogLevel) -> Self {
        self.operator_log_level = Some(value);
        self
    }

    pub fn with_observed_config(mut self, value: serde_json::Value) -> Self {
        self.observed_config = Some(value);
        self
    }

    pub fn with_unsupported_config_overrides(mut self, value: serde_json::Value) -> Self {
        self.unsupported_config_overrides = Some(value);
        self
    }

    pub fn with_force_redeployment_reason(mut self, value: impl Into<String>) -> Self {
        self.force_redeployment_reason = Some(value.into());
        self
    }

    pub fn with_use_more_secure_service_ca(mut self, value: bool) -> Self {
        self.use_more_secure_service_ca = Some(value);
        self
    }
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KubeControllerManagerApplyConfiguration {
    #[serde(flatten)]
    pub type_meta: TypeMetaApplyConfiguration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMetaApplyConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<KubeControllerManagerSpecApplyConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<KubeControllerManagerStatusApplyConfiguration>,
}

/// Starts an apply configuration for the `KubeControllerManager` named `name`.
pub fn kube_controller_manager(name: impl Into<String>) -> KubeControllerManagerApplyConfiguration {
    KubeControllerManagerApplyConfiguration::default()
        .with_name(name)
        .with_kind(KUBE_CONTROLLER_MANAGER_KIND)
        .with_api_version(KUBE_CONTROLLER_MANAGER_API_VERSION)
}

impl KubeControllerManagerApplyConfiguration {
    object_meta_setters!();

    pub fn with_spec(mut self, value: KubeControllerManagerSpecApplyConfiguration) -> Self {
        self.spec = Some(value);
        self
    }

    pub fn with_status(mut self, value: KubeControllerManagerStatusApplyConfiguration) -> Self {
        self.status = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::{assert_err, assert_ok};
    use serde_json::json;

    #[test]
    fn test_constructor_sets_identity() {
        let kcm = kube_controller_manager("cluster");

        assert_eq!(kcm.name(), Some("cluster"));
        assert_eq!(
            assert_ok!(serde_json::to_value(&kcm)),
            json!({
                "kind": "KubeControllerManager",
                "apiVersion": "operator.openshift.io/v1",
                "metadata": { "name": "cluster" }
            })
        );
    }

    #[test]
    fn test_scalar_setters_keep_last_value() {
        let status = kube_controller_manager_status()
            .with_version("4.15.0")
            .with_version("4.16.0")
            .with_ready_replicas(3)
            .with_observed_generation(7)
            .with_latest_available_revision_reason("installed");

        assert_eq!(status.version.as_deref(), Some("4.16.0"));
        assert_eq!(
            assert_ok!(serde_json::to_value(&status)),
            json!({
                "observedGeneration": 7,
                "version": "4.16.0",
                "readyReplicas": 3,
                "latestAvailableRevisionReason": "installed"
            })
        );
    }

    #[test]
    fn test_list_setters_append_in_call_order() {
        let status = assert_ok!(
            assert_ok!(kube_controller_manager_status().with_conditions([
                operator_condition()
                    .with_type("NetworkObserverDegraded")
                    .with_status(ConditionStatus::False),
            ]))
            .with_conditions([
                operator_condition()
                    .with_type("Available")
                    .with_status(ConditionStatus::True),
                operator_condition()
                    .with_type("Progressing")
                    .with_status(ConditionStatus::False),
            ])
        );

        let types = status
            .conditions
            .iter()
            .filter_map(|c| c.type_.as_deref())
            .collect::<Vec<_>>();
        assert_eq!(types, ["NetworkObserverDegraded", "Available", "Progressing"]);
    }

    #[test]
    fn test_entries_without_list_key_are_rejected() {
        let err = assert_err!(kube_controller_manager_status().with_conditions([
            operator_condition().with_type("Available"),
            operator_condition().with_reason("NoType"),
        ]));
        assert_eq!(
            err,
            ApplyConfigurationError::MissingListKey {
                list: "conditions",
                index: 1,
                key: "type",
            }
        );

        let err = assert_err!(
            kube_controller_manager_status().with_node_statuses([node_status().with_current_revision(3)])
        );
        assert_eq!(
            err,
            ApplyConfigurationError::MissingListKey {
                list: "nodeStatuses",
                index: 0,
                key: "nodeName",
            }
        );

        let err = assert_err!(kube_controller_manager_status().with_generations([
            generation_status().with_resource("deployments").with_name(""),
        ]));
        assert_eq!(
            err,
            ApplyConfigurationError::MissingListKey {
                list: "generations",
                index: 0,
                key: "name",
            }
        );
    }

    #[test]
    fn test_metadata_maps_merge_and_lists_append() {
        let kcm = assert_ok!(
            kube_controller_manager("cluster")
                .with_labels([("a", "1"), ("b", "2")])
                .with_labels([("b", "3")])
                .with_annotations(Vec::<(String, String)>::new())
                .with_finalizers(["first"])
                .with_finalizers(["second"])
                .with_owner_references([crate::applyconfigurations::meta::owner_reference()
                    .with_kind("ClusterVersion")
                    .with_name("version")
                    .with_uid("1234")])
        );

        let metadata = kcm.metadata.unwrap_or_default();
        let labels = metadata.labels.unwrap_or_default();
        assert_eq!(labels.get("a").map(String::as_str), Some("1"));
        assert_eq!(labels.get("b").map(String::as_str), Some("3"));
        assert_eq!(metadata.annotations, None);
        assert_eq!(metadata.finalizers, ["first", "second"]);
        assert_eq!(metadata.owner_references.len(), 1);
    }

    #[test]
    fn test_owner_reference_requires_uid() {
        let err = assert_err!(kube_controller_manager("cluster").with_owner_references([
            crate::applyconfigurations::meta::owner_reference().with_name("version"),
        ]));
        assert_eq!(
            err,
            ApplyConfigurationError::MissingListKey {
                list: "ownerReferences",
                index: 0,
                key: "uid",
            }
        );
    }

    #[test]
    fn test_spec_with_observed_config() {
        let kcm = kube_controller_manager("cluster").with_spec(
            kube_controller_manager_spec()
                .with_observed_config(json!({ "servicesNodePortRange": "30000-32767" })),
        );

        assert_eq!(
            assert_ok!(serde_json::to_value(&kcm))["spec"],
            json!({ "observedConfig": { "servicesNodePortRange": "30000-32767" } })
        );
    }
}
