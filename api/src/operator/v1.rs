use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

#[derive(
    Default,
    Deserialize,
    Serialize,
    Copy,
    Clone,
    Debug,
    JsonSchema,
    PartialEq,
    Eq,
    IntoStaticStr,
    EnumString,
)]
pub enum ManagementState {
    #[default]
    Managed,
    Unmanaged,
    Force,
    Removed,
}

#[derive(
    Default,
    Deserialize,
    Serialize,
    Copy,
    Clone,
    Debug,
    JsonSchema,
    PartialEq,
    Eq,
    IntoStaticStr,
    EnumString,
)]
pub enum LogLevel {
    #[default]
    Normal,
    Debug,
    Trace,
    TraceAll,
}

#[derive(
    Default,
    Deserialize,
    Serialize,
    Copy,
    Clone,
    Debug,
    JsonSchema,
    PartialEq,
    Eq,
    IntoStaticStr,
    EnumString,
)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl From<bool> for ConditionStatus {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

/// Operator resource for the kube-controller-manager static pods.
#[derive(Default, CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
#[kube(
    kind = "KubeControllerManager",
    group = "operator.openshift.io",
    version = "v1",
    plural = "kubecontrollermanagers",
    status = "KubeControllerManagerStatus"
)]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct KubeControllerManagerSpec {
    #[serde(default)]
    pub management_state: ManagementState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_log_level: Option<LogLevel>,

    /// Sparse configuration computed by the config observers of the operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_config: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsupported_config_overrides: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_redeployment_reason: Option<String>,

    #[serde(default, rename = "useMoreSecureServiceCA")]
    pub use_more_secure_service_ca: bool,
}

#[derive(Default, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubeControllerManagerStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<OperatorCondition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub ready_replicas: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_available_revision: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generations: Vec<GenerationStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_available_revision_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_statuses: Vec<NodeStatus>,
}

impl KubeControllerManagerStatus {
    pub fn condition(&self, type_: &str) -> Option<&OperatorCondition> {
        self.conditions.iter().find(|c| c.type_ == type_)
    }
}

#[derive(Default, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperatorCondition {
    #[serde(rename = "type")]
    pub type_: String,

    pub status: ConditionStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub last_transition_time: Option<Time>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Default, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatus {
    #[serde(default)]
    pub group: String,

    pub resource: String,

    #[serde(default)]
    pub namespace: String,

    pub name: String,

    #[serde(default)]
    pub last_generation: i64,

    #[serde(default)]
    pub hash: String,
}

#[derive(Default, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    pub node_name: String,

    #[serde(default)]
    pub current_revision: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_revision: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failed_revision: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub last_failed_time: Option<Time>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failed_reason: Option<String>,

    #[serde(default)]
    pub last_failed_count: i32,

    #[serde(default)]
    pub last_fallback_count: i32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last_failed_revision_errors: Vec<String>,
}
