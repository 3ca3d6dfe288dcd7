//! Session-token issuance. Validation lives in `shieldher_session::token`;
//! this service is the sole issuer (the `issuer` feature unlocks claim
//! serialization).

use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use shieldher_session::identity::CurrentSession;
use shieldher_session::token::{SESSION_TTL_SECS, SessionClaims, now_secs};

use crate::error::AuthServiceError;

/// Mint a signed session token for the given identity.
/// `iat = now`, `exp = now + SESSION_TTL_SECS`. Returns the token and its
/// expiry timestamp.
pub fn issue_session_token(
    user_id: Uuid,
    email: &str,
    role: u8,
    secret: &str,
) -> Result<(String, u64), AuthServiceError> {
    let iat = now_secs();
    let exp = iat + SESSION_TTL_SECS;
    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        role,
        iat,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

/// Mint a replacement token preserving the identity and role of a validated
/// session, with fresh `iat`/`exp`.
pub fn reissue_session_token(
    session: &CurrentSession,
    secret: &str,
) -> Result<(String, u64), AuthServiceError> {
    issue_session_token(session.user_id, &session.email, session.role, secret)
}
