//! Outgoing email.
//!
//! [`EmailService`] renders PhysiPro's account messages and hands them to a
//! [`Mailer`]. [`SmtpMailer`] delivers through lettre; [`LogMailer`] is used
//! when SMTP is disabled and only records that a message would have been
//! sent.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use physipro_config::EmailConfig;
use physipro_core::AppError;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError>;
}

pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);
        let to = format!("{} <{}>", email.to_name, email.to_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(email.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))
    }

    fn transport(&self) -> Result<SmtpTransport, AppError> {
        if self.config.smtp_username.is_empty() {
            return Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build());
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::internal_error(format!("Failed to create SMTP relay: {}", e)))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to_email, subject = %email.subject))]
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        let message = self.build_message(&email)?;
        let mailer = self.transport()?;

        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        info!("Email sent");
        Ok(())
    }
}

/// Logs recipient and subject instead of delivering. Bodies are never
/// logged since they may contain reset tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        info!(
            to = %email.to_email,
            subject = %email.subject,
            "SMTP disabled, email not delivered"
        );
        Ok(())
    }
}

/// Keeps every message in memory. Can be switched to fail every send.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: std::sync::Mutex<Vec<OutgoingEmail>>,
    failing: std::sync::atomic::AtomicBool,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn last_to(&self, email: &str) -> Option<OutgoingEmail> {
        self.sent().into_iter().rev().find(|m| m.to_email == email)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::internal_error("Failed to send email: relay refused"));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email);
        }
        Ok(())
    }
}

/// Renders and dispatches account emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    mailer: Arc<dyn Mailer>,
}

impl EmailService {
    pub fn new(config: EmailConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, mailer }
    }

    /// Picks [`SmtpMailer`] when SMTP is enabled, [`LogMailer`] otherwise.
    pub fn from_config(config: EmailConfig) -> Self {
        let mailer: Arc<dyn Mailer> = if config.enabled {
            Arc::new(SmtpMailer::new(config.clone()))
        } else {
            Arc::new(LogMailer)
        };
        Self::new(config, mailer)
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    #[instrument(skip(self))]
    pub async fn send_welcome_email(&self, to_email: &str, to_name: &str) -> Result<(), AppError> {
        let text_body = format!(
            "Hi {},\n\n\
             Your PhysiPro account is ready. You can sign in with this email address.\n\n\
             Best regards,\n\
             PhysiPro Team",
            to_name
        );
        let html_body = layout(
            "Welcome to PhysiPro",
            &format!(
                "<p>Hi {},</p><p>Your PhysiPro account is ready. You can sign in with this email address.</p>",
                escape_html(to_name)
            ),
        );

        self.dispatch(to_email, to_name, "Welcome to PhysiPro", text_body, html_body)
            .await
    }

    #[instrument(skip(self, reset_token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_token: &str,
        ttl_minutes: i64,
    ) -> Result<(), AppError> {
        let reset_link = self.config.reset_password_url(reset_token);

        let text_body = format!(
            "Hi {},\n\n\
             You requested to reset your password.\n\n\
             Open the link below to choose a new one:\n\
             {}\n\n\
             This link will expire in {} minutes.\n\n\
             If you didn't request this, please ignore this email.\n\n\
             Best regards,\n\
             PhysiPro Team",
            to_name, reset_link, ttl_minutes
        );
        let html_body = layout(
            "Password Reset Request",
            &format!(
                "<p>Hi {},</p>\
                 <p>You requested to reset your password.</p>\
                 <p><a href=\"{}\">Reset password</a></p>\
                 <p>This link will expire in {} minutes.</p>\
                 <p>If you didn't request this, please ignore this email.</p>",
                escape_html(to_name),
                escape_html(&reset_link),
                ttl_minutes
            ),
        );

        self.dispatch(to_email, to_name, "Password Reset Request", text_body, html_body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_password_reset_confirmation(
        &self,
        to_email: &str,
        to_name: &str,
    ) -> Result<(), AppError> {
        let text_body = format!(
            "Hi {},\n\n\
             Your password has been successfully reset.\n\n\
             If you didn't make this change, please contact support immediately.\n\n\
             Best regards,\n\
             PhysiPro Team",
            to_name
        );
        let html_body = layout(
            "Password Reset Successful",
            &format!(
                "<p>Hi {},</p>\
                 <p>Your password has been successfully reset.</p>\
                 <p>If you didn't make this change, please contact support immediately.</p>",
                escape_html(to_name)
            ),
        );

        self.dispatch(
            to_email,
            to_name,
            "Password Reset Successful",
            text_body,
            html_body,
        )
        .await
    }

    async fn dispatch(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        text_body: String,
        html_body: String,
    ) -> Result<(), AppError> {
        self.mailer
            .send(OutgoingEmail {
                to_email: to_email.to_string(),
                to_name: to_name.to_string(),
                subject: subject.to_string(),
                text_body,
                html_body,
            })
            .await
    }
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff; border-radius: 8px; overflow: hidden;">
        <div style="background-color: #0F766E; padding: 24px; text-align: center;">
            <h1 style="margin: 0; color: #ffffff; font-size: 26px;">PhysiPro</h1>
        </div>
        <div style="padding: 32px; color: #333333; font-size: 15px; line-height: 1.6;">
            <h2 style="margin-top: 0;">{title}</h2>
            {content}
        </div>
    </div>
</body>
</html>"#
    )
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
