use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
///
/// Closed taxonomy — callers match exhaustively instead of inspecting
/// messages. `TokenExpired` is recoverable (re-login); `TokenInvalid` means
/// the client must fully clear its local session state.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("authentication required")]
    AuthRequired,
    #[error("session expired")]
    TokenExpired,
    #[error("invalid token")]
    TokenInvalid,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid otp")]
    OtpInvalid,
    #[error("otp has expired")]
    OtpExpired,
    #[error("account uses identity-provider login")]
    IdentityProviderAccount,
    #[error("password must be at least 8 characters")]
    WeakPassword,
    #[error("too many requests")]
    TooManyRequests,
    #[error("failed to deliver otp email")]
    MailDelivery(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::OtpInvalid => "OTP_INVALID",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::IdentityProviderAccount => "IDENTITY_PROVIDER_ACCOUNT",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::MailDelivery(_) => "MAIL_DELIVERY",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::AuthRequired
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::OtpInvalid | Self::OtpExpired | Self::WeakPassword => StatusCode::BAD_REQUEST,
            Self::IdentityProviderAccount => StatusCode::CONFLICT,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::MailDelivery(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 5xx only — tower-http TraceLayer already records method/uri/status
        // for every request, and 4xx are expected client errors. Server-side
        // failures need their source chain logged to be traceable.
        match &self {
            Self::Internal(e) | Self::MailDelivery(e) => {
                tracing::error!(error = %e, kind = self.kind(), "server-side failure");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
