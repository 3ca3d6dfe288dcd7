//! Token issuance and login flows against the repository mock.

use uuid::Uuid;

use shieldher_auth::error::AuthServiceError;
use shieldher_auth::usecase::login::{
    GoogleLoginInput, GoogleLoginUseCase, PasswordLoginInput, PasswordLoginUseCase,
};
use shieldher_auth::usecase::token::{issue_session_token, reissue_session_token};
use shieldher_session::identity::CurrentSession;
use shieldher_session::token::{
    SESSION_TTL_SECS, TokenError, now_secs, validate_session_token,
};

use crate::helpers::{
    MockIdentityProvider, MockUserRepo, TEST_JWT_SECRET, idp_user, password_user,
};

// ── Issue / validate ─────────────────────────────────────────────────────────

#[test]
fn issued_token_round_trips() {
    let user_id = Uuid::now_v7();
    let (token, expires_at) =
        issue_session_token(user_id, "user@example.com", 1, TEST_JWT_SECRET).unwrap();

    let info = validate_session_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user_id);
    assert_eq!(info.email, "user@example.com");
    assert_eq!(info.role, 1);
    assert_eq!(info.expires_at, expires_at);
    assert_eq!(info.expires_at, info.issued_at + SESSION_TTL_SECS);
    assert!(info.issued_at >= now_secs() - 5);
}

#[test]
fn issued_token_rejects_wrong_secret() {
    let (token, _) =
        issue_session_token(Uuid::now_v7(), "user@example.com", 0, TEST_JWT_SECRET).unwrap();

    let err = validate_session_token(&token, "some-other-secret").unwrap_err();
    assert!(matches!(err, TokenError::InvalidSignature));
}

#[test]
fn reissued_token_preserves_identity() {
    let session = CurrentSession {
        user_id: Uuid::now_v7(),
        email: "user@example.com".to_owned(),
        role: 1,
        expires_at: now_secs() + 30,
    };

    let (token, expires_at) = reissue_session_token(&session, TEST_JWT_SECRET).unwrap();
    let info = validate_session_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, session.user_id);
    assert_eq!(info.email, session.email);
    assert_eq!(info.role, session.role);
    // Fresh full lifetime, not the dying one.
    assert!(expires_at > session.expires_at);
}

// ── Password login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn password_login_issues_valid_session() {
    let users = MockUserRepo::with_users(vec![password_user("user@example.com", "hunter2hunter2")]);
    let usecase = PasswordLoginUseCase {
        users: users.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = usecase
        .execute(PasswordLoginInput {
            email: "user@example.com".to_owned(),
            password: "hunter2hunter2".to_owned(),
        })
        .await
        .unwrap();

    let info = validate_session_token(&out.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, out.user.id);
    assert_eq!(info.email, "user@example.com");
    assert_eq!(info.expires_at, out.expires_at);
}

#[tokio::test]
async fn password_login_normalizes_email() {
    let users = MockUserRepo::with_users(vec![password_user("user@example.com", "hunter2hunter2")]);
    let usecase = PasswordLoginUseCase {
        users,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = usecase
        .execute(PasswordLoginInput {
            email: "  USER@Example.COM ".to_owned(),
            password: "hunter2hunter2".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(out.user.email, "user@example.com");
}

#[tokio::test]
async fn password_login_rejects_wrong_password() {
    let users = MockUserRepo::with_users(vec![password_user("user@example.com", "hunter2hunter2")]);
    let usecase = PasswordLoginUseCase {
        users,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let err = usecase
        .execute(PasswordLoginInput {
            email: "user@example.com".to_owned(),
            password: "wrong-password".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidCredentials));
}

#[tokio::test]
async fn password_login_rejects_unknown_email() {
    let usecase = PasswordLoginUseCase {
        users: MockUserRepo::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let err = usecase
        .execute(PasswordLoginInput {
            email: "nobody@example.com".to_owned(),
            password: "hunter2hunter2".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidCredentials));
}

#[tokio::test]
async fn password_login_rejects_identity_provider_account() {
    // No local hash to verify against; must look like any other bad login.
    let users = MockUserRepo::with_users(vec![idp_user("sso@example.com")]);
    let usecase = PasswordLoginUseCase {
        users,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let err = usecase
        .execute(PasswordLoginInput {
            email: "sso@example.com".to_owned(),
            password: "any-password-at-all".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidCredentials));
}

// ── Identity-provider login ──────────────────────────────────────────────────

#[tokio::test]
async fn google_login_finds_existing_account() {
    let existing = idp_user("sso@example.com");
    let existing_id = existing.id;
    let users = MockUserRepo::with_users(vec![existing]);
    let usecase = GoogleLoginUseCase {
        users: users.clone(),
        provider: MockIdentityProvider::accepting("google-subject-1", "sso@example.com"),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = usecase
        .execute(GoogleLoginInput {
            credential: "opaque-id-token".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(out.user.id, existing_id);
    assert_eq!(users.snapshot().len(), 1);
}

#[tokio::test]
async fn google_login_creates_account_on_first_signin() {
    let users = MockUserRepo::default();
    let usecase = GoogleLoginUseCase {
        users: users.clone(),
        provider: MockIdentityProvider::accepting("google-subject-9", "new@example.com"),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = usecase
        .execute(GoogleLoginInput {
            credential: "opaque-id-token".to_owned(),
        })
        .await
        .unwrap();

    let created = &users.snapshot()[0];
    assert_eq!(created.id, out.user.id);
    assert_eq!(created.email, "new@example.com");
    assert_eq!(created.role, 0);
    assert_eq!(created.external_id.as_deref(), Some("google-subject-9"));
    assert!(created.password_hash.is_none());
}

#[tokio::test]
async fn google_login_propagates_provider_rejection() {
    let users = MockUserRepo::default();
    let usecase = GoogleLoginUseCase {
        users: users.clone(),
        provider: MockIdentityProvider::rejecting(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let err = usecase
        .execute(GoogleLoginInput {
            credential: "forged-id-token".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidCredentials));
    assert!(users.snapshot().is_empty());
}
