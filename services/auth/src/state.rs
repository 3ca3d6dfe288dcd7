use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::infra::db::DbUserRepository;
use crate::infra::mailer::AppMailer;
use crate::infra::oauth::GoogleVerifier;
use crate::rate_limit::FixedWindowQuota;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: AppMailer,
    pub google: GoogleVerifier,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub reset_quota: Arc<FixedWindowQuota>,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn mailer(&self) -> AppMailer {
        self.mailer.clone()
    }
}
