use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use shieldher_auth::config::AuthConfig;
use shieldher_auth::domain::types::{RESET_QUOTA_MAX, RESET_QUOTA_WINDOW_SECS};
use shieldher_auth::infra::mailer::{AppMailer, ConsoleMailer, SmtpMailer};
use shieldher_auth::infra::oauth::GoogleVerifier;
use shieldher_auth::rate_limit::FixedWindowQuota;
use shieldher_auth::router::build_router;
use shieldher_auth::state::AppState;

#[tokio::main]
async fn main() {
    shieldher_core::tracing::init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = match &config.smtp {
        Some(settings) => {
            AppMailer::Smtp(SmtpMailer::new(settings).expect("invalid SMTP configuration"))
        }
        None => {
            tracing::warn!("SMTP not configured; OTP codes will be logged, not emailed");
            AppMailer::Console(ConsoleMailer)
        }
    };

    let state = AppState {
        db,
        mailer,
        google: GoogleVerifier::new(config.google_client_id),
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        reset_quota: Arc::new(FixedWindowQuota::new(
            RESET_QUOTA_MAX,
            Duration::from_secs(RESET_QUOTA_WINDOW_SECS),
        )),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    // Peer addresses feed the recovery quota when no forwarded header is set.
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
