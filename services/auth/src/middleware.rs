//! Session middleware: the request-time state machine over one request.
//!
//! `NoToken -> 401 AUTH_REQUIRED`; `TokenPresent -> Validate`; on success the
//! identity is attached to the request and, when the token is inside the
//! renewal window, a replacement token rides out on the response as both a
//! header and a refreshed cookie. Expired and tampered tokens are rejected
//! with distinct kinds and the session cookie is cleared either way.

use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use shieldher_session::cookie::{SESSION_COOKIE, clear_session_cookie, set_session_cookie};
use shieldher_session::identity::CurrentSession;
use shieldher_session::token::{TokenError, should_renew, validate_session_token};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::token::reissue_session_token;

/// Header carrying a silently reissued token back to header-bearer clients.
pub const X_REFRESHED_TOKEN: &str = "x-refreshed-token";

/// Explicit allowlist of unauthenticated routes. Everything not listed here
/// requires a valid session — the bypass is opt-in, never default-open.
/// `POST /reports` is the public report-submission route served by the
/// report service behind the same gateway.
const PUBLIC_ROUTES: &[(&Method, &str)] = &[
    (&Method::GET, "/healthz"),
    (&Method::GET, "/readyz"),
    (&Method::POST, "/auth/login"),
    (&Method::POST, "/auth/login/google"),
    (&Method::DELETE, "/auth/session"),
    (&Method::POST, "/auth/password/reset-request"),
    (&Method::POST, "/auth/password/reset-verify"),
    (&Method::POST, "/auth/password/reset"),
    (&Method::POST, "/reports"),
];

fn is_public(method: &Method, path: &str) -> bool {
    PUBLIC_ROUTES
        .iter()
        .any(|(m, p)| *m == method && *p == path)
}

/// Token from the `Authorization: Bearer` header, if present. Checked before
/// the cookie so API clients can override a stale browser cookie.
fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

pub async fn session_layer(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    let token = bearer_token(&request)
        .or_else(|| jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()));
    let Some(token) = token else {
        return AuthServiceError::AuthRequired.into_response();
    };

    let info = match validate_session_token(&token, &state.jwt_secret) {
        Ok(info) => info,
        Err(e) => {
            // Never retried: surface immediately, clearing any session
            // cookie so the client does not re-present a dead token.
            let error = match e {
                TokenError::Expired => AuthServiceError::TokenExpired,
                TokenError::InvalidSignature | TokenError::Malformed => {
                    AuthServiceError::TokenInvalid
                }
            };
            let jar = clear_session_cookie(CookieJar::new(), state.cookie_domain.clone());
            return (jar, error).into_response();
        }
    };

    let session = CurrentSession {
        user_id: info.user_id,
        email: info.email,
        role: info.role,
        expires_at: info.expires_at,
    };
    let renew = should_renew(session.expires_at);
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if renew {
        // Silent reissue: fresh token on the response, body untouched.
        match reissue_session_token(&session, &state.jwt_secret) {
            Ok((token, _exp)) => {
                if let Ok(value) = HeaderValue::from_str(&token) {
                    response.headers_mut().insert(X_REFRESHED_TOKEN, value);
                }
                let jar = set_session_cookie(CookieJar::new(), token, state.cookie_domain.clone());
                return (jar, response).into_response();
            }
            Err(e) => {
                // Reissue is best-effort; the presented token is still valid.
                tracing::warn!(error = %e, "session reissue failed");
            }
        }
    }
    response
}
