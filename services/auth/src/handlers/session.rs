use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use shieldher_session::cookie::{clear_session_cookie, set_session_cookie};
use shieldher_session::identity::CurrentSession;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::login::{
    GoogleLoginInput, GoogleLoginUseCase, LoginOutput, PasswordLoginInput, PasswordLoginUseCase,
};

const X_SESSION_EXPIRES: &str = "x-shieldher-session-expires";

fn session_expires_header(exp: u64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(X_SESSION_EXPIRES),
        HeaderValue::from_str(&exp.to_string()).unwrap(),
    )
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserBody,
}

#[derive(Serialize)]
pub struct UserBody {
    pub id: uuid::Uuid,
    pub email: String,
    pub role: u8,
}

fn login_response(out: LoginOutput, jar: CookieJar, cookie_domain: String) -> impl IntoResponse {
    let jar = set_session_cookie(jar, out.token.clone(), cookie_domain);
    let mut headers = HeaderMap::new();
    let (name, value) = session_expires_header(out.expires_at);
    headers.insert(name, value);
    let body = LoginResponse {
        token: out.token,
        user: UserBody {
            id: out.user.id,
            email: out.user.email,
            role: out.user.role,
        },
    };
    (StatusCode::OK, jar, headers, Json(body))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = PasswordLoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(PasswordLoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(login_response(out, jar, state.cookie_domain.clone()))
}

// ── POST /auth/login/google ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GoogleLoginRequest {
    pub credential: String,
}

pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<GoogleLoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = GoogleLoginUseCase {
        users: state.user_repo(),
        provider: state.google.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(GoogleLoginInput {
            credential: body.credential,
        })
        .await?;
    Ok(login_response(out, jar, state.cookie_domain.clone()))
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub user_id: uuid::Uuid,
    pub email: String,
    pub role: u8,
    pub expires_at: u64,
}

pub async fn check_session(
    session: CurrentSession,
) -> Result<impl IntoResponse, AuthServiceError> {
    let mut headers = HeaderMap::new();
    let (name, value) = session_expires_header(session.expires_at);
    headers.insert(name, value);
    let body = SessionResponse {
        user_id: session.user_id,
        email: session.email,
        role: session.role,
        expires_at: session.expires_at,
    };
    Ok((StatusCode::OK, headers, Json(body)))
}

// ── DELETE /auth/session ──────────────────────────────────────────────────────

/// Logout is purely client-side in this design (stateless tokens, no
/// revocation list): clear the cookie and let the client drop its copy.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
