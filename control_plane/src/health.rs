use crate::kubernetes::KubeClientCell;
use async_trait::async_trait;
use axum_health::{HealthDetail, HealthIndicator};
use kube::Api;
use kube::api::ListParams;
use netobserve_api::config::v1::Network;
use netobserve_core::sync::signal::Receiver;

/// Up while the `Network` resources can be listed.
pub struct KubernetesApiHealthIndicator(Receiver<KubeClientCell>);

impl KubernetesApiHealthIndicator {
    pub fn new(kube_client_rx: &Receiver<KubeClientCell>) -> Self {
        Self(kube_client_rx.clone())
    }
}

#[async_trait]
impl HealthIndicator for KubernetesApiHealthIndicator {
    fn name(&self) -> String {
        "KubernetesAPI".to_string()
    }

    async fn details(&self) -> HealthDetail {
        match self.0.cloned().await {
            Some(kube_client) => {
                let api = Api::<Network>::all(kube_client.into());
                match api.list_metadata(&ListParams::default().limit(1)).await {
                    Ok(_) => HealthDetail::up(),
                    Err(e) => {
                        let mut health = HealthDetail::down();
                        health.with_detail("error".to_string(), e.to_string());
                        health
                    }
                }
            }
            None => {
                let mut health = HealthDetail::down();
                health.with_detail("error".to_string(), "Kube client not available".to_string());
                health
            }
        }
    }
}
