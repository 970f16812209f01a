mod livez;
mod observed_config;

use self::livez::livez;
use self::observed_config::get_observed_config;
use crate::health::KubernetesApiHealthIndicator;
use crate::kubernetes::KubeClientCell;
use crate::observers::network::NetworkObservation;
use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum_health::Health;
use getset::CloneGetters;
use netobserve_core::sync::signal::Receiver;
use netobserve_core::task::Builder as TaskBuilder;
use problemdetails::Problem;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::select;
use tracing::info;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder, CloneGetters, Clone)]
pub struct HttpEndpointState {
    #[getset(get_clone = "pub")]
    observation_rx: Receiver<NetworkObservation>,
}

#[derive(TypedBuilder)]
pub struct SpawnHttpEndpointParams {
    port: u16,
    kube_client_rx: Receiver<KubeClientCell>,
    observation_rx: Receiver<NetworkObservation>,
}

impl SpawnHttpEndpointParams {
    fn endpoint(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[derive(Debug, Error)]
pub enum SpawnHttpEndpointError {
    #[error("Failed to bind HTTP endpoint: {0}")]
    NetworkBind(#[from] std::io::Error),
}

pub async fn spawn_http_endpoint(
    task_builder: &TaskBuilder,
    params: SpawnHttpEndpointParams,
) -> Result<(), SpawnHttpEndpointError> {
    let state = HttpEndpointState::builder()
        .observation_rx(params.observation_rx.clone())
        .build();

    let kube_health = KubernetesApiHealthIndicator::new(&params.kube_client_rx);
    let health = Health::builder().with_indicator(kube_health).build();

    let endpoint = params.endpoint();
    let tcp_listener = TcpListener::bind(endpoint).await?;
    info!("Serving HTTP endpoint: endpoint={}", endpoint);

    task_builder
        .new_task(stringify!(http_endpoint))
        .spawn(async move {
            select! {
                _ = axum::serve(tcp_listener, router(state, health)) => info!("HTTP endpoint stopped"),
                _ = tokio::signal::ctrl_c() => info!("Received shutdown signal, stopping HTTP endpoint")
            }
        });

    Ok(())
}

fn router(state: HttpEndpointState, health: Health) -> Router {
    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(axum_health::health))
        .route("/observed-config", get(get_observed_config))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(health)
}

async fn not_found() -> impl IntoResponse {
    Problem::from(StatusCode::NOT_FOUND)
        .with_value("status", StatusCode::NOT_FOUND.as_u16())
        .with_title("Not Found")
        .with_detail("The requested resource could not be found")
}

async fn method_not_allowed() -> impl IntoResponse {
    Problem::from(StatusCode::METHOD_NOT_ALLOWED)
        .with_value("status", StatusCode::METHOD_NOT_ALLOWED.as_u16())
        .with_title("Method Not Allowed")
        .with_detail("The requested method is not allowed for this resource")
}
