//! Session-token validation and renewal-window logic.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "issuer", test))]
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Session lifetime in seconds (1 hour).
pub const SESSION_TTL_SECS: u64 = 3600;

/// Remaining lifetime below which a token is silently reissued (10 minutes).
pub const RENEWAL_WINDOW_SECS: u64 = 600;

/// Identity extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub email: String,
    pub role: u8,
    pub issued_at: u64,
    pub expires_at: u64,
}

/// Errors returned by [`validate_session_token`].
///
/// `Expired` is recoverable (the client re-authenticates); the other two mean
/// the token cannot be trusted and the client must clear its session state.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("session expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims carried by a session token.
///
/// `Deserialize` is always available — every consumer validates tokens.
/// `Serialize` requires the **`issuer`** cargo feature; only the auth service
/// enables it because it is the sole token issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "issuer", test), derive(Serialize))]
pub struct SessionClaims {
    /// User ID (UUID string).
    pub sub: String,
    /// Case-normalized account email.
    pub email: String,
    /// User role as `u8` wire value (0 = user, 1 = admin).
    pub role: u8,
    /// Issued-at timestamp (seconds since UNIX epoch).
    pub iat: u64,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

/// Seconds since the UNIX epoch.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Decode and validate a session token, returning the parsed identity.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`. Signature
/// verification happens inside `decode` before any claim is interpreted.
/// Zero leeway: a token is dead the second `exp` passes.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionInfo, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    let claims = data.claims;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(SessionInfo {
        user_id,
        email: claims.email,
        role: claims.role,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })
}

/// True when a token expiring at `expires_at` should be silently reissued,
/// judged at `now`. The boundary is one-sided: remaining lifetime exactly
/// equal to the window does not renew.
pub fn renew_due(expires_at: u64, now: u64) -> bool {
    expires_at.saturating_sub(now) < RENEWAL_WINDOW_SECS
}

/// [`renew_due`] against the current clock.
pub fn should_renew(expires_at: u64) -> bool {
    renew_due(expires_at, now_secs())
}
