use crate::events::actions::OBSERVE;
use crate::events::{EventRecorder, RecordedEvent};
use crate::instrumentation::record_event_dropped;
use crate::kubernetes::KubeClientCell;
use crate::options::Options;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::{Event, Recorder, Reporter};
use netobserve_core::continue_on;
use netobserve_core::sync::signal::Receiver;
use netobserve_core::task::Builder as TaskBuilder;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{Sender, channel};
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct KubeEventRecorderParams<'a> {
    options: &'a Options,
    kube_client_rx: &'a Receiver<KubeClientCell>,
    reporter: Reporter,
    involved_object: ObjectReference,
}

/// Publishes recorded events through `kube::runtime::events::Recorder` from a background task.
///
/// Events recorded before the Kubernetes client is ready are queued, and
/// events that do not fit in the queue are dropped.
pub struct KubeEventRecorder {
    tx: Sender<RecordedEvent>,
}

impl KubeEventRecorder {
    pub fn spawn(task_builder: &TaskBuilder, params: KubeEventRecorderParams<'_>) -> Self {
        let (tx, mut rx) = channel::<RecordedEvent>(params.options.event_queue_capacity());
        let kube_client_rx = params.kube_client_rx.clone();
        let reporter = params.reporter;
        let involved_object = params.involved_object;

        task_builder
            .new_task(stringify!(publish_events))
            .spawn(async move {
                loop {
                    if let Some(kube_client) = kube_client_rx.cloned().await {
                        let recorder = Recorder::new(kube_client.into(), reporter.clone());
                        while let Some(event) = rx.recv().await {
                            publish(&recorder, &involved_object, event).await;
                        }
                        debug!("Event queue closed, stopping publisher");
                        break;
                    }
                    continue_on!(kube_client_rx.changed());
                }
            });

        Self { tx }
    }
}

async fn publish(recorder: &Recorder, involved_object: &ObjectReference, event: RecordedEvent) {
    let reason = event.reason;
    let kube_event = Event {
        type_: event.type_,
        reason: reason.clone(),
        note: Some(event.message),
        action: OBSERVE.to_string(),
        secondary: None,
    };

    if let Err(e) = recorder.publish(&kube_event, involved_object).await {
        warn!(reason = %reason, error = %e, "Failed to publish Kubernetes event");
    }
}

impl EventRecorder for KubeEventRecorder {
    fn record(&self, event: RecordedEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("Event queue is full, dropping event: reason={}", event.reason);
                record_event_dropped(&event.reason);
            }
            Err(TrySendError::Closed(event)) => {
                debug!("Event publisher stopped, dropping event: reason={}", event.reason);
                record_event_dropped(&event.reason);
            }
        }
    }
}
