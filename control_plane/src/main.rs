#![warn(
    clippy::pedantic,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::needless_pass_by_value,
    clippy::needless_continue,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::struct_field_names
)]

mod cli;
mod controllers;
mod events;
mod health;
mod http;
mod instrumentation;
pub mod kubernetes;
mod observers;
mod options;

use crate::controllers::{SpawnControllersParams, SpawnControllersParamsBuilderError, spawn_controllers};
use crate::events::EventRecorder;
use crate::events::publisher::{KubeEventRecorder, KubeEventRecorderParams};
use crate::http::{SpawnHttpEndpointError, SpawnHttpEndpointParams, spawn_http_endpoint};
use crate::kubernetes::start_kubernetes_client;
use crate::options::Options;
use clap::Parser;
use cli::Cli;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::Reporter;
use netobserve_core::crypto::init_crypto;
use netobserve_core::instrumentation::init_instrumentation;
use netobserve_core::task::Builder as TaskBuilder;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum MainError {
    #[error("Failed to build controllers parameters: {0}")]
    SpawnControllersParams(#[from] SpawnControllersParamsBuilderError),
    #[error("Failed to spawn HTTP endpoint: {0}")]
    SpawnHttpEndpoint(#[from] SpawnHttpEndpointError),
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), MainError> {
    let args = Cli::parse();
    let options = Arc::new(Options::default());

    init_crypto();
    init_instrumentation();

    info!(
        "Starting network observer: operator.name={} field_manager={}",
        args.operator_name(),
        args.field_manager()
    );

    let task_builder = TaskBuilder::default();

    let kube_client_rx = start_kubernetes_client(&task_builder);

    // Events are attached to this pod, the operator resource is cluster scoped
    let recorder: Arc<dyn EventRecorder> = Arc::new(KubeEventRecorder::spawn(
        &task_builder,
        KubeEventRecorderParams::builder()
            .options(&options)
            .kube_client_rx(&kube_client_rx)
            .reporter(Reporter {
                controller: args.field_manager().clone(),
                instance: Some(args.pod_name().clone()),
            })
            .involved_object(ObjectReference {
                api_version: Some("v1".to_string()),
                kind: Some("Pod".to_string()),
                namespace: Some(args.pod_namespace().clone()),
                name: Some(args.pod_name().clone()),
                ..ObjectReference::default()
            })
            .build(),
    ));

    let observation_rx = {
        let params = SpawnControllersParams::new_builder()
            .options(options)
            .kube_client_rx(kube_client_rx.clone())
            .recorder(recorder)
            .field_manager(args.field_manager().clone())
            .operator_name(args.operator_name().clone())
            .build()
            .inspect_err(|err| error!("Failed to build controllers parameters: {}", err))?;

        spawn_controllers(&task_builder, params)
    };

    {
        let params = SpawnHttpEndpointParams::builder()
            .port(args.port())
            .kube_client_rx(kube_client_rx)
            .observation_rx(observation_rx)
            .build();

        spawn_http_endpoint(&task_builder, params)
            .await
            .inspect_err(|err| error!("Failed to spawn HTTP endpoint: {}", err))?;
    }

    task_builder.join_all().await;

    Ok(())
}
