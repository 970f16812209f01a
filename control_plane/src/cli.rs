use clap::Parser;
use getset::{CopyGetters, Getters};
use netobserve_api::constants::{CLUSTER_CONFIG_NAME, DEFAULT_FIELD_MANAGER};

#[derive(Debug, Parser, Getters, CopyGetters)]
#[command(
    about = "Observes the cluster network configuration for the kube-controller-manager operator",
    long_about = None
)]
pub struct Cli {
    #[getset(get_copy = "pub")]
    #[arg(default_value = "8080", env = "PORT", long = "port")]
    port: u16,

    #[getset(get = "pub")]
    #[arg(env = "POD_NAMESPACE", long = "namespace")]
    pod_namespace: String,

    #[getset(get = "pub")]
    #[arg(env = "POD_NAME", long = "pod-name")]
    pod_name: String,

    #[getset(get = "pub")]
    #[arg(default_value = DEFAULT_FIELD_MANAGER, env = "FIELD_MANAGER", long = "field-manager")]
    field_manager: String,

    /// Name of the `KubeControllerManager` resource receiving the observed configuration.
    #[getset(get = "pub")]
    #[arg(default_value = CLUSTER_CONFIG_NAME, long = "operator-name")]
    operator_name: String,
}
