use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User identity as the auth service sees it.
///
/// `otp_code` and `otp_expires_at` form an atomic pair: both set or both
/// null, never one without the other. A non-null code with a past expiry is
/// treated as absent for verification but stays in the row until the next
/// OTP write.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    /// Case-normalized, unique. Primary lookup key.
    pub email: String,
    /// Role as `u8` wire value (0 = user, 1 = admin).
    pub role: u8,
    /// Argon2id PHC string. None for identity-provider-only accounts.
    pub password_hash: Option<String>,
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    /// OAuth subject identifier. When set, password recovery is rejected.
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of checking a supplied OTP against an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    Valid,
    Invalid,
    Expired,
}

/// Normalize an email for lookup: trim surrounding whitespace, lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// OTP length in digits.
pub const OTP_LEN: usize = 6;

/// OTP time-to-live in seconds (15 minutes).
pub const OTP_TTL_SECS: i64 = 900;

/// Minimum accepted password length for resets.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Reset-endpoint quota: max requests per window per email.
pub const RESET_QUOTA_MAX: u32 = 3;

/// Reset-endpoint quota window in seconds (15 minutes).
pub const RESET_QUOTA_WINDOW_SECS: u64 = 900;
