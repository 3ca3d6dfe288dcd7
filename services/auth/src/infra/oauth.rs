use serde::Deserialize;

use crate::domain::repository::{IdentityProvider, VerifiedIdentity};
use crate::error::AuthServiceError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Verifies Google ID tokens against the tokeninfo endpoint.
#[derive(Clone)]
pub struct GoogleVerifier {
    http: reqwest::Client,
    client_id: String,
}

impl GoogleVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
        }
    }
}

#[derive(Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: String,
}

impl IdentityProvider for GoogleVerifier {
    /// A token Google refuses is an `InvalidCredentials`; only transport
    /// failures reach `Internal`.
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, AuthServiceError> {
        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", credential)])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("tokeninfo request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(AuthServiceError::InvalidCredentials);
        }
        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("tokeninfo response parse failed: {e}"))?;

        // Audience check: a valid Google token minted for another app is
        // still not ours.
        if info.aud != self.client_id {
            return Err(AuthServiceError::InvalidCredentials);
        }
        Ok(VerifiedIdentity {
            subject: info.sub,
            email: info.email,
        })
    }
}
