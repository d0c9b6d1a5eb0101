// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # SMTP notifier
//!
//! Implements [`Notifier`] via `lettre`, grounded on `send_email`/
//! `email_PI` in the original driver: one envelope per recipient, BCC
//! recipients looped onto their own envelope rather than placed on the
//! shared one.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use scops_domain::error::ScopsError;
use scops_domain::services::notifier::{Notifier, OrderComplete, OrderStarted, PreprocessingError, StageError};

pub struct LettreNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: Mailbox,
    error_address: String,
    error_bcc: Vec<String>,
}

impl LettreNotifier {
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        from_address: &str,
        error_address: String,
        error_bcc: Vec<String>,
    ) -> Result<Self, ScopsError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| ScopsError::NotificationError(e.to_string()))?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        let from_address = from_address.parse().map_err(|e: lettre::address::AddressError| {
            ScopsError::NotificationError(e.to_string())
        })?;
        Ok(Self { transport, from_address, error_address, error_bcc })
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), ScopsError> {
        let to_mailbox: Mailbox = to.parse().map_err(|e: lettre::address::AddressError| ScopsError::NotificationError(e.to_string()))?;
        let message = Message::builder()
            .from(self.from_address.clone())
            .to(to_mailbox)
            .subject(subject)
            .body(body)
            .map_err(|e| ScopsError::NotificationError(e.to_string()))?;
        self.transport.send(message).await.map_err(|e| ScopsError::NotificationError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for LettreNotifier {
    async fn send_order_started(&self, message: &OrderStarted<'_>) -> Result<(), ScopsError> {
        self.send(
            message.recipient,
            &format!("SCOPS: order {} has started processing", message.project_code),
            format!("Your order {} has been submitted and is now processing.", message.project_code),
        )
        .await
    }

    async fn send_confirmation(&self, recipient: &str, project_code: &str) -> Result<(), ScopsError> {
        self.send(
            recipient,
            &format!("SCOPS: order {project_code} confirmed"),
            format!("Order {project_code} has been confirmed and queued for submission."),
        )
        .await
    }

    async fn send_stage_error(&self, message: &StageError<'_>) -> Result<(), ScopsError> {
        let body = format!("Line {} failed at stage {}: {}", message.line, message.stage, message.detail);
        self.send(&self.error_address, "SCOPS: stage failure", body.clone()).await?;
        for bcc in &self.error_bcc {
            self.send(bcc, "SCOPS: stage failure", body.clone()).await?;
        }
        Ok(())
    }

    async fn send_preprocessing_error(&self, message: &PreprocessingError<'_>) -> Result<(), ScopsError> {
        self.send(
            message.recipient,
            "SCOPS: a pre-processing issue needs your attention",
            format!("Line {}: {}", message.line, message.detail),
        )
        .await
    }

    async fn send_order_complete(&self, message: &OrderComplete<'_>) -> Result<(), ScopsError> {
        self.send(
            message.recipient,
            &format!("SCOPS: order {} is ready for download", message.project_code),
            format!("Your order {} has finished processing. Download it here:\n{}", message.project_code, message.download_link),
        )
        .await
    }
}
