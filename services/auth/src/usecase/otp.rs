//! One-time passcode generation and checking.

use chrono::Utc;
use rand::Rng;
use subtle::ConstantTimeEq;

use crate::domain::types::{Identity, OTP_LEN, OtpCheck};

/// Charset for OTP codes (decimal digits).
const CHARSET: &[u8] = b"0123456789";

/// Draw a 6-digit code from the process CSPRNG (`rand::rng()` is
/// ChaCha-based, not a plain PRNG).
pub fn generate_otp_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Check a supplied code against the identity's stored challenge.
///
/// `Invalid` when no code is stored or the code mismatches; `Expired` only
/// when the code matches but the clock has passed `otp_expires_at`; `Valid`
/// otherwise. The comparison is constant-time so mismatches do not leak how
/// many leading digits were right. Checking never consumes the code.
pub fn check_otp(user: &Identity, supplied: &str) -> OtpCheck {
    let (Some(code), Some(expires_at)) = (&user.otp_code, user.otp_expires_at) else {
        return OtpCheck::Invalid;
    };
    // `ct_eq` on slices short-circuits only on length, which is public.
    if !bool::from(code.as_bytes().ct_eq(supplied.as_bytes())) {
        return OtpCheck::Invalid;
    }
    if Utc::now() > expires_at {
        return OtpCheck::Expired;
    }
    OtpCheck::Valid
}
