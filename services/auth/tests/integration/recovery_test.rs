//! The full request → verify → complete recovery flow against the mocks.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use shieldher_auth::domain::repository::UserRepository;
use shieldher_auth::domain::types::Identity;
use shieldher_auth::error::AuthServiceError;
use shieldher_auth::usecase::password::verify_password;
use shieldher_auth::usecase::recovery::{
    CompleteResetInput, CompleteResetUseCase, RequestResetInput, RequestResetUseCase,
    VerifyResetInput, VerifyResetUseCase,
};

use crate::helpers::{MockMailer, MockUserRepo, idp_user, otp_user, password_user};

// ── RequestReset ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn request_reset_stores_code_and_mails_it() {
    let users = MockUserRepo::with_users(vec![password_user("user@example.com", "old-password-1")]);
    let mailer = MockMailer::default();
    let usecase = RequestResetUseCase {
        users: users.clone(),
        mailer: mailer.clone(),
    };

    usecase
        .execute(RequestResetInput {
            email: "user@example.com".to_owned(),
        })
        .await
        .unwrap();

    let user = &users.snapshot()[0];
    let code = user.otp_code.as_deref().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.bytes().all(|b| b.is_ascii_digit()));

    let expires_at = user.otp_expires_at.unwrap();
    let expected = Utc::now() + Duration::seconds(900);
    assert!((expires_at - expected).num_seconds().abs() < 5);

    assert_eq!(mailer.sent(), vec![("user@example.com".to_owned(), code.to_owned())]);
}

#[tokio::test]
async fn request_reset_overwrites_previous_code() {
    let users = MockUserRepo::with_users(vec![password_user("user@example.com", "old-password-1")]);
    let mailer = MockMailer::default();
    let usecase = RequestResetUseCase {
        users: users.clone(),
        mailer: mailer.clone(),
    };
    let input = || RequestResetInput {
        email: "user@example.com".to_owned(),
    };

    usecase.execute(input()).await.unwrap();
    usecase.execute(input()).await.unwrap();

    // One live challenge per user; only the last mailed code is stored.
    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    let user = &users.snapshot()[0];
    assert_eq!(user.otp_code.as_deref(), Some(sent[1].1.as_str()));
}

#[tokio::test]
async fn request_reset_is_silent_for_unknown_email() {
    let users = MockUserRepo::default();
    let mailer = MockMailer::default();
    let usecase = RequestResetUseCase {
        users,
        mailer: mailer.clone(),
    };

    usecase
        .execute(RequestResetInput {
            email: "nobody@example.com".to_owned(),
        })
        .await
        .unwrap();
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn request_reset_rejects_identity_provider_account() {
    let users = MockUserRepo::with_users(vec![idp_user("sso@example.com")]);
    let mailer = MockMailer::default();
    let usecase = RequestResetUseCase {
        users: users.clone(),
        mailer: mailer.clone(),
    };

    let err = usecase
        .execute(RequestResetInput {
            email: "sso@example.com".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::IdentityProviderAccount));
    assert!(users.snapshot()[0].otp_code.is_none());
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn request_reset_keeps_code_when_mail_fails() {
    let users = MockUserRepo::with_users(vec![password_user("user@example.com", "old-password-1")]);
    let usecase = RequestResetUseCase {
        users: users.clone(),
        mailer: MockMailer::failing(),
    };

    let err = usecase
        .execute(RequestResetInput {
            email: "user@example.com".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::MailDelivery(_)));
    // No rollback: the next request overwrites the code anyway.
    assert!(users.snapshot()[0].otp_code.is_some());
}

// ── VerifyReset ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn verify_reset_accepts_valid_code_without_consuming_it() {
    let users = MockUserRepo::with_users(vec![otp_user("user@example.com", "123456", 900)]);
    let usecase = VerifyResetUseCase {
        users: users.clone(),
    };
    let input = || VerifyResetInput {
        email: "user@example.com".to_owned(),
        otp: "123456".to_owned(),
    };

    usecase.execute(input()).await.unwrap();
    assert_eq!(users.snapshot()[0].otp_code.as_deref(), Some("123456"));
    // Still valid on a second check.
    usecase.execute(input()).await.unwrap();
}

#[tokio::test]
async fn verify_reset_rejects_wrong_code() {
    let usecase = VerifyResetUseCase {
        users: MockUserRepo::with_users(vec![otp_user("user@example.com", "123456", 900)]),
    };

    let err = usecase
        .execute(VerifyResetInput {
            email: "user@example.com".to_owned(),
            otp: "000000".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::OtpInvalid));
}

#[tokio::test]
async fn verify_reset_reports_expired_code() {
    let usecase = VerifyResetUseCase {
        users: MockUserRepo::with_users(vec![otp_user("user@example.com", "123456", -120)]),
    };

    let err = usecase
        .execute(VerifyResetInput {
            email: "user@example.com".to_owned(),
            otp: "123456".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::OtpExpired));
}

#[tokio::test]
async fn verify_reset_treats_unknown_email_as_invalid() {
    let usecase = VerifyResetUseCase {
        users: MockUserRepo::default(),
    };

    let err = usecase
        .execute(VerifyResetInput {
            email: "nobody@example.com".to_owned(),
            otp: "123456".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::OtpInvalid));
}

// ── CompleteReset ────────────────────────────────────────────────────────────

#[tokio::test]
async fn complete_reset_sets_password_and_consumes_code() {
    let users = MockUserRepo::with_users(vec![otp_user("user@example.com", "123456", 900)]);
    let usecase = CompleteResetUseCase {
        users: users.clone(),
    };

    usecase
        .execute(CompleteResetInput {
            email: "user@example.com".to_owned(),
            otp: "123456".to_owned(),
            new_password: "brand-new-password".to_owned(),
        })
        .await
        .unwrap();

    let user = &users.snapshot()[0];
    assert!(verify_password(
        "brand-new-password",
        user.password_hash.as_deref().unwrap()
    ));
    assert!(user.otp_code.is_none());
    assert!(user.otp_expires_at.is_none());

    // Consumed code no longer verifies.
    let verify = VerifyResetUseCase { users };
    let err = verify
        .execute(VerifyResetInput {
            email: "user@example.com".to_owned(),
            otp: "123456".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::OtpInvalid));
}

#[tokio::test]
async fn complete_reset_rejects_weak_password_without_mutation() {
    let users = MockUserRepo::with_users(vec![otp_user("user@example.com", "123456", 900)]);
    let usecase = CompleteResetUseCase {
        users: users.clone(),
    };

    let err = usecase
        .execute(CompleteResetInput {
            email: "user@example.com".to_owned(),
            otp: "123456".to_owned(),
            new_password: "short".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::WeakPassword));

    let user = &users.snapshot()[0];
    assert!(user.password_hash.is_none());
    assert_eq!(user.otp_code.as_deref(), Some("123456"));
}

#[tokio::test]
async fn complete_reset_rejects_wrong_code() {
    let users = MockUserRepo::with_users(vec![otp_user("user@example.com", "123456", 900)]);
    let usecase = CompleteResetUseCase {
        users: users.clone(),
    };

    let err = usecase
        .execute(CompleteResetInput {
            email: "user@example.com".to_owned(),
            otp: "654321".to_owned(),
            new_password: "brand-new-password".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::OtpInvalid));
    assert!(users.snapshot()[0].password_hash.is_none());
}

#[tokio::test]
async fn complete_reset_rejects_expired_code() {
    let usecase = CompleteResetUseCase {
        users: MockUserRepo::with_users(vec![otp_user("user@example.com", "123456", -120)]),
    };

    let err = usecase
        .execute(CompleteResetInput {
            email: "user@example.com".to_owned(),
            otp: "123456".to_owned(),
            new_password: "brand-new-password".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::OtpExpired));
}

/// Delegates to the inner mock but clears the stored OTP right after every
/// read, simulating a concurrent completion landing between the usecase's
/// lookup and its conditional write.
#[derive(Clone)]
struct ConsumeAfterReadRepo {
    inner: MockUserRepo,
}

impl UserRepository for ConsumeAfterReadRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, AuthServiceError> {
        let found = self.inner.find_by_email(email).await?;
        if let Some(user) = &found {
            self.inner.clear_otp(user.id).await?;
        }
        Ok(found)
    }

    async fn create(&self, user: &Identity) -> Result<(), AuthServiceError> {
        self.inner.create(user).await
    }

    async fn store_otp(
        &self,
        user_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        self.inner.store_otp(user_id, code, expires_at).await
    }

    async fn clear_otp(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        self.inner.clear_otp(user_id).await
    }

    async fn update_password_consume_otp(
        &self,
        user_id: Uuid,
        password_hash: &str,
        otp_code: &str,
    ) -> Result<bool, AuthServiceError> {
        self.inner
            .update_password_consume_otp(user_id, password_hash, otp_code)
            .await
    }
}

#[tokio::test]
async fn complete_reset_detects_concurrently_consumed_code() {
    let inner = MockUserRepo::with_users(vec![otp_user("user@example.com", "123456", 900)]);
    let usecase = CompleteResetUseCase {
        users: ConsumeAfterReadRepo {
            inner: inner.clone(),
        },
    };

    let err = usecase
        .execute(CompleteResetInput {
            email: "user@example.com".to_owned(),
            otp: "123456".to_owned(),
            new_password: "brand-new-password".to_owned(),
        })
        .await
        .unwrap_err();
    // Zero rows matched the conditional write.
    assert!(matches!(err, AuthServiceError::OtpInvalid));
    assert!(inner.snapshot()[0].password_hash.is_none());
}
