use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{StatusCode, request::Parts},
};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::recovery::{
    CompleteResetInput, CompleteResetUseCase, RequestResetInput, RequestResetUseCase,
    VerifyResetInput, VerifyResetUseCase,
};

/// Quota key for the requesting client, so one caller cannot burn another
/// account's recovery budget. First hop of `x-forwarded-for` when present
/// (the service sits behind the gateway), else the peer address.
fn client_key(parts: &Parts) -> String {
    parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_owned())
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_owned())
}

// ── POST /auth/password/reset-request ────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

pub async fn request_reset(
    State(state): State<AppState>,
    parts: Parts,
    Json(body): Json<RequestResetRequest>,
) -> Result<StatusCode, AuthServiceError> {
    if !state.reset_quota.check(&client_key(&parts)) {
        return Err(AuthServiceError::TooManyRequests);
    }
    let usecase = RequestResetUseCase {
        users: state.user_repo(),
        mailer: state.mailer(),
    };
    usecase
        .execute(RequestResetInput { email: body.email })
        .await?;
    // 202 for known and unknown emails alike — the response shape must not
    // reveal whether an account exists.
    Ok(StatusCode::ACCEPTED)
}

// ── POST /auth/password/reset-verify ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyResetRequest {
    pub email: String,
    pub otp: String,
}

pub async fn verify_reset(
    State(state): State<AppState>,
    Json(body): Json<VerifyResetRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = VerifyResetUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(VerifyResetInput {
            email: body.email,
            otp: body.otp,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /auth/password/reset ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CompleteResetRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

pub async fn complete_reset(
    State(state): State<AppState>,
    parts: Parts,
    Json(body): Json<CompleteResetRequest>,
) -> Result<StatusCode, AuthServiceError> {
    if !state.reset_quota.check(&client_key(&parts)) {
        return Err(AuthServiceError::TooManyRequests);
    }
    let usecase = CompleteResetUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(CompleteResetInput {
            email: body.email,
            otp: body.otp,
            new_password: body.new_password,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
