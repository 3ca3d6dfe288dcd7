use axum::http::StatusCode;

/// Handler for `GET /healthz` — process liveness.
///
/// Readiness is service-specific (it depends on that service's backing
/// stores), so each service mounts its own `/readyz` handler.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
