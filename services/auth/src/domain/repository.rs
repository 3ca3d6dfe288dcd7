#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::Identity;
use crate::error::AuthServiceError;

/// Port for the credential store (user rows).
///
/// All OTP writes are single-statement per-row updates so that concurrent
/// reset requests cannot leave a half-written `otp_code`/`otp_expires_at`
/// pair.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthServiceError>;

    /// Insert a new identity (first identity-provider sign-in).
    async fn create(&self, user: &Identity) -> Result<(), AuthServiceError>;

    /// Set `otp_code` and `otp_expires_at` in one write, overwriting any
    /// prior unconsumed code.
    async fn store_otp(
        &self,
        user_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Clear both OTP fields in one write.
    async fn clear_otp(&self, user_id: Uuid) -> Result<(), AuthServiceError>;

    /// Set the password hash and clear both OTP fields in a single
    /// conditional update, applied only while the stored code still equals
    /// `otp_code`. Returns `false` when no row matched (code already
    /// consumed or overwritten).
    async fn update_password_consume_otp(
        &self,
        user_id: Uuid,
        password_hash: &str,
        otp_code: &str,
    ) -> Result<bool, AuthServiceError>;
}

/// Port for outbound OTP email delivery.
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), AuthServiceError>;
}

/// Identity asserted by the external OAuth provider after verifying an
/// ID token.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Provider subject identifier (`sub`).
    pub subject: String,
    pub email: String,
}

/// Port for the OAuth provider's token-verification service.
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, AuthServiceError>;
}
