use crate::app_config::SmtpConfig;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use marquee_core::notify::Notifier;
use marquee_core::{CoreError, CoreResult};
use tracing::info;

/// SMTP-backed notifier. Builds a fresh transport per message; callers treat
/// delivery as best-effort.
pub struct SmtpNotifier {
    host: String,
    port: u16,
    credentials: Credentials,
    from: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            credentials: Credentials::new(config.username.clone(), config.password.clone()),
            from: format!("{} <{}>", config.from_name, config.from_email),
        }
    }

    fn build_transport(&self) -> CoreResult<SmtpTransport> {
        Ok(SmtpTransport::relay(&self.host)
            .map_err(|e| CoreError::Internal(format!("smtp relay error: {e}")))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> CoreResult<()> {
        let email = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| CoreError::Internal(format!("invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| CoreError::Validation(format!("invalid to address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| CoreError::Internal(format!("failed to build email: {e}")))?;

        let mailer = self.build_transport()?;

        // lettre's SmtpTransport is blocking; keep it off the runtime threads.
        tokio::task::spawn_blocking(move || {
            mailer
                .send(&email)
                .map(|_| ())
                .map_err(|e| CoreError::Internal(format!("failed to send email: {e}")))
        })
        .await
        .map_err(|e| CoreError::Internal(format!("email task failed: {e}")))?
    }
}

/// Development notifier: logs instead of sending. Wired when SMTP is
/// disabled in configuration.
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> CoreResult<()> {
        info!(to = %to, subject = %subject, "email (console mode)\n{body}");
        Ok(())
    }
}
