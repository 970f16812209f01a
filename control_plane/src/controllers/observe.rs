use crate::events::EventRecorder;
use crate::instrumentation::record_observation;
use crate::kubernetes::objects::Objects;
use crate::observers::network::{NetworkObservation, observe_network_config};
use crate::options::Options;
use netobserve_api::config::v1::Network;
use netobserve_core::continue_after;
use netobserve_core::sync::signal::{Receiver, signal};
use netobserve_core::task::Builder as TaskBuilder;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub fn observe_network(
    task_builder: &TaskBuilder,
    options: &Arc<Options>,
    networks_rx: &Receiver<Objects<Network>>,
    recorder: &Arc<dyn EventRecorder>,
) -> Receiver<NetworkObservation> {
    let (tx, rx) = signal(stringify!(observe_network));
    let options = options.clone();
    let networks_rx = networks_rx.clone();
    let recorder = recorder.clone();

    task_builder
        .new_task(stringify!(observe_network))
        .spawn(async move {
            let mut previous = None;
            loop {
                if let Some(networks) = networks_rx.cloned().await {
                    let observation =
                        observe_network_config(&networks, recorder.as_ref(), previous.as_ref());
                    record_observation(observation.is_degraded());

                    if observation.is_degraded() {
                        for err in &observation.errors {
                            warn!("Network configuration observed with error: {}", err);
                        }
                    } else {
                        debug!("Network configuration observed: {:?}", observation.config);
                    }

                    if previous.as_ref() != Some(&observation.config) {
                        info!("Observed network configuration changed");
                    }
                    previous = Some(observation.config.clone());
                    tx.set(observation).await;
                }
                continue_after!(options.auto_cycle_duration(), networks_rx.changed());
            }
        });

    rx
}
