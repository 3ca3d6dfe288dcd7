//! Request extension carrying the authenticated session identity.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

/// Identity of the authenticated caller, inserted into request extensions by
/// the session middleware after token validation.
///
/// Extraction rejects with 401 when the middleware did not run (unprotected
/// route or middleware bypass) — handlers never see an unauthenticated
/// `CurrentSession`.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub user_id: Uuid,
    pub email: String,
    pub role: u8,
    /// Expiration of the presented token (seconds since UNIX epoch).
    pub expires_at: u64,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let session = parts.extensions.get::<CurrentSession>().cloned();
        async move { session.ok_or(StatusCode::UNAUTHORIZED) }
    }
}
