//! The three-step password-recovery state machine:
//! request OTP → verify OTP → set new password.
//!
//! Verification never consumes the code; only a completed reset does, via a
//! single conditional update, so a user can check the code before committing
//! a new password.

use chrono::{Duration, Utc};

use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::{MIN_PASSWORD_LEN, OTP_TTL_SECS, OtpCheck, normalize_email};
use crate::error::AuthServiceError;
use crate::usecase::otp::{check_otp, generate_otp_code};
use crate::usecase::password::hash_password;

// ── RequestReset ─────────────────────────────────────────────────────────────

pub struct RequestResetInput {
    pub email: String,
}

pub struct RequestResetUseCase<R: UserRepository, M: Mailer> {
    pub users: R,
    pub mailer: M,
}

impl<R: UserRepository, M: Mailer> RequestResetUseCase<R, M> {
    /// Unknown emails get the same success-shaped outcome as known ones so
    /// the endpoint cannot be used to enumerate accounts; nothing is stored
    /// and no mail goes out for them. Identity-provider accounts are
    /// rejected outright — they have no password to recover.
    ///
    /// The OTP is stored before delivery and is not rolled back on a mail
    /// failure: the user retries by requesting again, which overwrites the
    /// code (at most one live challenge per user).
    pub async fn execute(&self, input: RequestResetInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Ok(());
        };
        if user.external_id.is_some() {
            return Err(AuthServiceError::IdentityProviderAccount);
        }

        let code = generate_otp_code();
        let expires_at = Utc::now() + Duration::seconds(OTP_TTL_SECS);
        self.users.store_otp(user.id, &code, expires_at).await?;

        self.mailer.send_otp(&user.email, &code).await
    }
}

// ── VerifyReset ──────────────────────────────────────────────────────────────

pub struct VerifyResetInput {
    pub email: String,
    pub otp: String,
}

pub struct VerifyResetUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> VerifyResetUseCase<R> {
    /// Unknown email and wrong code are indistinguishable (`OtpInvalid`).
    /// A matching but stale code reports `OtpExpired`. The code survives
    /// the check either way.
    pub async fn execute(&self, input: VerifyResetInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AuthServiceError::OtpInvalid);
        };
        match check_otp(&user, &input.otp) {
            OtpCheck::Valid => Ok(()),
            OtpCheck::Invalid => Err(AuthServiceError::OtpInvalid),
            OtpCheck::Expired => Err(AuthServiceError::OtpExpired),
        }
    }
}

// ── CompleteReset ────────────────────────────────────────────────────────────

pub struct CompleteResetInput {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

pub struct CompleteResetUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> CompleteResetUseCase<R> {
    /// Re-verifies the OTP (a stale client may have skipped the verify
    /// step), enforces the password policy, then persists the new hash and
    /// consumes the code in one conditional write. Zero rows matched means
    /// the code was consumed or overwritten concurrently → `OtpInvalid`.
    /// If the write fails the OTP is left intact so the user can retry.
    pub async fn execute(&self, input: CompleteResetInput) -> Result<(), AuthServiceError> {
        let email = normalize_email(&input.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AuthServiceError::OtpInvalid);
        };
        match check_otp(&user, &input.otp) {
            OtpCheck::Valid => {}
            OtpCheck::Invalid => return Err(AuthServiceError::OtpInvalid),
            OtpCheck::Expired => return Err(AuthServiceError::OtpExpired),
        }
        if input.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthServiceError::WeakPassword);
        }

        let hash = hash_password(&input.new_password)?;
        let updated = self
            .users
            .update_password_consume_otp(user.id, &hash, &input.otp)
            .await?;
        if !updated {
            return Err(AuthServiceError::OtpInvalid);
        }
        Ok(())
    }
}
