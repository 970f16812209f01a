use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Cluster wide network configuration. Only the singleton named `cluster` is honoured.
#[derive(Default, CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
#[kube(
    kind = "Network",
    group = "config.openshift.io",
    version = "v1",
    plural = "networks",
    status = "NetworkStatus"
)]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    /// IP address pools for pods.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_network: Vec<ClusterNetworkEntry>,

    /// IP address pools for services. Only one entry is supported per address family.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_network: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_type: String,

    #[serde(default, rename = "externalIP", skip_serializing_if = "Option::is_none")]
    pub external_ip: Option<ExternalIPConfig>,

    /// Port range allowed for services of type NodePort, written as `LOW-HIGH`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_node_port_range: String,
}

#[derive(Default, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkEntry {
    pub cidr: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_prefix: Option<u32>,
}

#[derive(Default, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq)]
pub struct ExternalIPConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ExternalIPPolicy>,

    #[serde(default, rename = "autoAssignCIDRs", skip_serializing_if = "Vec::is_empty")]
    pub auto_assign_cidrs: Vec<String>,
}

#[derive(Default, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq, Eq)]
pub struct ExternalIPPolicy {
    #[serde(default, rename = "allowedCIDRs", skip_serializing_if = "Vec::is_empty")]
    pub allowed_cidrs: Vec<String>,

    #[serde(default, rename = "rejectedCIDRs", skip_serializing_if = "Vec::is_empty")]
    pub rejected_cidrs: Vec<String>,
}

/// Network configuration as observed and reported by the network operator.
#[derive(Default, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_network: Vec<ClusterNetworkEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_network: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network_type: String,

    #[serde(default, rename = "clusterNetworkMTU", skip_serializing_if = "Option::is_none")]
    pub cluster_network_mtu: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::assert_ok;
    use kube::Resource;

    #[test]
    fn test_network_resource_identity() {
        assert_eq!(Network::kind(&()), "Network");
        assert_eq!(Network::group(&()), "config.openshift.io");
        assert_eq!(Network::api_version(&()), "config.openshift.io/v1");
        assert_eq!(Network::plural(&()), "networks");
    }

    #[test]
    fn test_network_deserializes_openshift_field_names() {
        let network: Network = assert_ok!(serde_yaml::from_str(
            r"
apiVersion: config.openshift.io/v1
kind: Network
metadata:
  name: cluster
spec:
  clusterNetwork:
    - cidr: 10.128.0.0/14
      hostPrefix: 23
  serviceNetwork:
    - 172.30.0.0/16
  networkType: OVNKubernetes
  serviceNodePortRange: 30000-32767
  externalIP:
    policy:
      allowedCIDRs:
        - 192.168.0.0/16
status:
  clusterNetwork:
    - cidr: 10.128.0.0/14
      hostPrefix: 23
  serviceNetwork:
    - 172.30.0.0/16
  clusterNetworkMTU: 1400
"
        ));

        assert_eq!(network.spec.cluster_network[0].host_prefix, Some(23));
        assert_eq!(network.spec.service_node_port_range, "30000-32767");
        assert_eq!(
            network
                .spec
                .external_ip
                .and_then(|external_ip| external_ip.policy)
                .map(|policy| policy.allowed_cidrs),
            Some(vec!["192.168.0.0/16".to_string()])
        );

        let status = network.status.unwrap_or_default();
        assert_eq!(status.service_network, vec!["172.30.0.0/16".to_string()]);
        assert_eq!(status.cluster_network_mtu, Some(1400));
    }
}
