pub const CONFIG_GROUP: &str = "config.openshift.io";

/// Name of the singleton cluster configuration objects.
pub const CLUSTER_CONFIG_NAME: &str = "cluster";

pub const KUBE_CONTROLLER_MANAGER_KIND: &str = "KubeControllerManager";
pub const KUBE_CONTROLLER_MANAGER_API_VERSION: &str = "operator.openshift.io/v1";
pub const IMAGE_CONTENT_SOURCE_POLICY_KIND: &str = "ImageContentSourcePolicy";
pub const IMAGE_CONTENT_SOURCE_POLICY_API_VERSION: &str = "operator.openshift.io/v1alpha1";

pub const STATUS_SUBRESOURCE: &str = "status";

pub const DEFAULT_FIELD_MANAGER: &str = "netobserve-control-plane";

/// Operator condition reporting that the network configuration could not be fully observed.
pub const NETWORK_OBSERVER_DEGRADED_CONDITION: &str = "NetworkObserverDegraded";
