use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{IdentityProvider, UserRepository};
use crate::domain::types::{Identity, normalize_email};
use crate::error::AuthServiceError;
use crate::usecase::password::verify_password;
use crate::usecase::token::issue_session_token;

#[derive(Debug)]
pub struct LoginOutput {
    pub user: Identity,
    pub token: String,
    pub expires_at: u64,
}

// ── Password login ───────────────────────────────────────────────────────────

pub struct PasswordLoginInput {
    pub email: String,
    pub password: String,
}

pub struct PasswordLoginUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> PasswordLoginUseCase<R> {
    /// Unknown email, identity-provider-only account (no local hash), and a
    /// wrong password all produce the same `InvalidCredentials` so the
    /// response does not reveal which one happened.
    pub async fn execute(&self, input: PasswordLoginInput) -> Result<LoginOutput, AuthServiceError> {
        let email = normalize_email(&input.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthServiceError::InvalidCredentials)?;
        if !verify_password(&input.password, hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let (token, expires_at) =
            issue_session_token(user.id, &user.email, user.role, &self.jwt_secret)?;
        Ok(LoginOutput {
            user,
            token,
            expires_at,
        })
    }
}

// ── Identity-provider login ──────────────────────────────────────────────────

pub struct GoogleLoginInput {
    /// Raw ID token posted by the client.
    pub credential: String,
}

pub struct GoogleLoginUseCase<R: UserRepository, P: IdentityProvider> {
    pub users: R,
    pub provider: P,
    pub jwt_secret: String,
}

impl<R: UserRepository, P: IdentityProvider> GoogleLoginUseCase<R, P> {
    pub async fn execute(&self, input: GoogleLoginInput) -> Result<LoginOutput, AuthServiceError> {
        let verified = self.provider.verify(&input.credential).await?;
        let email = normalize_email(&verified.email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                // First sign-in: create an identity-provider-bound account.
                // No password hash; password recovery stays rejected for it.
                let user = Identity {
                    id: Uuid::now_v7(),
                    email,
                    role: 0,
                    password_hash: None,
                    otp_code: None,
                    otp_expires_at: None,
                    external_id: Some(verified.subject),
                    created_at: Utc::now(),
                };
                self.users.create(&user).await?;
                user
            }
        };

        let (token, expires_at) =
            issue_session_token(user.id, &user.email, user.role, &self.jwt_secret)?;
        Ok(LoginOutput {
            user,
            token,
            expires_at,
        })
    }
}
