use crate::http::HttpEndpointState;
use crate::observers::network::{NetworkObservation, ObservedNetworkConfig};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use problemdetails::Problem;
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservedConfigResponse {
    observed_config: ObservedNetworkConfig,
    degraded: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl From<NetworkObservation> for ObservedConfigResponse {
    fn from(observation: NetworkObservation) -> Self {
        Self {
            degraded: observation.is_degraded(),
            errors: observation.errors.iter().map(ToString::to_string).collect(),
            observed_config: observation.config,
        }
    }
}

#[instrument(name = "http::get_observed_config", skip(state))]
pub async fn get_observed_config(State(state): State<HttpEndpointState>) -> Response {
    match state.observation_rx().cloned().await {
        Some(observation) => Json(ObservedConfigResponse::from(observation)).into_response(),
        None => Problem::from(StatusCode::SERVICE_UNAVAILABLE)
            .with_value("status", StatusCode::SERVICE_UNAVAILABLE.as_u16())
            .with_title("Not Observed")
            .with_detail("The network configuration has not been observed yet")
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::network::{ExtendedArguments, ObserveNetworkError};
    use assertables::assert_ok;
    use netobserve_core::sync::signal::signal;
    use serde_json::json;

    fn state() -> (
        netobserve_core::sync::signal::Sender<NetworkObservation>,
        HttpEndpointState,
    ) {
        let (tx, rx) = signal("test_observation");
        (tx, HttpEndpointState::builder().observation_rx(rx).build())
    }

    #[tokio::test]
    async fn test_unavailable_until_observed() {
        let (_tx, state) = state();
        let response = get_observed_config(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_returns_latest_observation() {
        let (tx, state) = state();
        tx.set(NetworkObservation {
            config: ObservedNetworkConfig {
                extended_arguments: ExtendedArguments {
                    cluster_cidr: vec!["10.128.0.0/14".to_string()],
                    service_cluster_ip_range: vec![],
                },
                services_node_port_range: None,
            },
            errors: vec![ObserveNetworkError::FieldNotSet {
                name: "cluster".to_string(),
                field: "status.serviceNetwork".to_string(),
            }],
        })
        .await;

        let response = get_observed_config(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_response_body() {
        let response = ObservedConfigResponse::from(NetworkObservation::default());
        assert_eq!(
            assert_ok!(serde_json::to_value(&response)),
            json!({ "observedConfig": {}, "degraded": false })
        );
    }
}
