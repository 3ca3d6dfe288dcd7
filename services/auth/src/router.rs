use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use shieldher_core::health::healthz;
use shieldher_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    health::readyz,
    recovery::{complete_reset, request_reset, verify_reset},
    session::{check_session, google_login, login, logout},
};
use crate::middleware::session_layer;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Login / session
        .route("/auth/login", post(login))
        .route("/auth/login/google", post(google_login))
        .route("/auth/session", get(check_session))
        .route("/auth/session", delete(logout))
        // Password recovery
        .route("/auth/password/reset-request", post(request_reset))
        .route("/auth/password/reset-verify", post(verify_reset))
        .route("/auth/password/reset", post(complete_reset))
        // Session middleware covers the whole router; public routes are an
        // explicit allowlist inside it.
        .layer(from_fn_with_state(state.clone(), session_layer))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
