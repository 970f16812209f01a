mod macros;
mod observe;
mod sync;

use self::observe::observe_network;
use self::sync::{SyncObservedConfigParams, sync_observed_config};
use crate::events::EventRecorder;
use crate::kubernetes::KubeClientCell;
use crate::observers::network::NetworkObservation;
use crate::options::Options;
use crate::watch_objects;
use derive_builder::Builder;
use netobserve_api::config::v1::Network;
use netobserve_core::sync::signal::Receiver;
use netobserve_core::task::Builder as TaskBuilder;
use std::sync::Arc;

#[derive(Builder)]
#[builder(setter(into))]
pub struct SpawnControllersParams {
    options: Arc<Options>,
    kube_client_rx: Receiver<KubeClientCell>,
    recorder: Arc<dyn EventRecorder>,
    field_manager: String,
    operator_name: String,
}

impl SpawnControllersParams {
    pub fn new_builder() -> SpawnControllersParamsBuilder {
        SpawnControllersParamsBuilder::default()
    }
}

/// Wires watch, observe and sync together. Returns the latest observation for the HTTP endpoints.
pub fn spawn_controllers(
    task_builder: &TaskBuilder,
    params: SpawnControllersParams,
) -> Receiver<NetworkObservation> {
    let options = params.options;
    let kube_client_rx = params.kube_client_rx;

    let networks_rx = watch_objects!(options, task_builder, Network, kube_client_rx);
    let observation_rx = observe_network(task_builder, &options, &networks_rx, &params.recorder);

    sync_observed_config(
        task_builder,
        SyncObservedConfigParams::builder()
            .options(options.clone())
            .kube_client_rx(kube_client_rx.clone())
            .observation_rx(observation_rx.clone())
            .recorder(params.recorder.clone())
            .field_manager(params.field_manager)
            .operator_name(params.operator_name)
            .build(),
    );

    observation_rx
}
