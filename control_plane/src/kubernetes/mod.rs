pub mod listers;
pub mod objects;

use kube::Client;
use netobserve_core::sync::signal::{Receiver, signal};
use netobserve_core::task::Builder as TaskBuilder;
use std::ops::Deref;
use tracing::{error, info};

#[derive(Clone)]
pub struct KubeClientCell(Client);

// Clients are interchangeable, a new one must not wake every task
impl PartialEq for KubeClientCell {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Deref for KubeClientCell {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<KubeClientCell> for Client {
    fn from(client_cell: KubeClientCell) -> Self {
        client_cell.0
    }
}

pub fn start_kubernetes_client(task_builder: &TaskBuilder) -> Receiver<KubeClientCell> {
    let (tx, rx) = signal("kube_client");

    task_builder
        .new_task(stringify!(start_kubernetes_client))
        .spawn(async move {
            match Client::try_default().await {
                Ok(client) => {
                    info!(
                        "Created Kubernetes client: default_namespace={}",
                        client.default_namespace()
                    );
                    tx.set(KubeClientCell(client)).await;
                    // receivers observe a closed signal once the sender drops
                    let _ = tokio::signal::ctrl_c().await;
                }
                Err(e) => error!("Failed to create Kubernetes client: {}", e),
            }
        });

    rx
}
