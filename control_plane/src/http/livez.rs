use axum::http::StatusCode;
use axum::response::IntoResponse;
use problemdetails::Problem;
use tracing::instrument;

#[instrument(name = "http::livez")]
pub async fn livez() -> impl IntoResponse {
    Problem::from(StatusCode::OK)
        .with_value("status", StatusCode::OK.as_u16())
        .with_title("Liveness Check")
        .with_detail("UP")
        .into_response()
}
