use anyhow::anyhow;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpSettings;
use crate::domain::repository::Mailer;
use crate::error::AuthServiceError;

/// SMTP-backed OTP delivery.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, AuthServiceError> {
        let from = settings
            .from_email
            .parse::<Mailbox>()
            .map_err(|e| AuthServiceError::Internal(anyhow!("invalid SMTP_FROM_EMAIL: {e}")))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| AuthServiceError::Internal(anyhow!("smtp transport: {e}")))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| AuthServiceError::MailDelivery(anyhow!("invalid recipient: {e}")))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Your verification code")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Your verification code is {code}.\n\nIt expires in 15 minutes. \
                 If you did not request a password reset, you can ignore this email.\n"
            ))
            .map_err(|e| AuthServiceError::MailDelivery(anyhow!("build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthServiceError::MailDelivery(anyhow!("smtp send: {e}")))?;
        Ok(())
    }
}

/// Development fallback: logs the code instead of sending mail. Selected at
/// startup when SMTP settings are absent.
#[derive(Clone, Default)]
pub struct ConsoleMailer;

impl Mailer for ConsoleMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        tracing::info!(recipient = %to, %code, "console mailer: otp issued");
        Ok(())
    }
}

/// Mailer selected from configuration at startup.
#[derive(Clone)]
pub enum AppMailer {
    Smtp(SmtpMailer),
    Console(ConsoleMailer),
}

impl Mailer for AppMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), AuthServiceError> {
        match self {
            Self::Smtp(mailer) => mailer.send_otp(to, code).await,
            Self::Console(mailer) => mailer.send_otp(to, code).await,
        }
    }
}
