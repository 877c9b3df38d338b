use std::sync::Mutex;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailConfig;
use crate::error::MailError;

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A file attached to an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A plain-text email with optional attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
}

/// Assemble the MIME message for `email`.
pub fn build_message(from: &str, email: &OutgoingEmail) -> Result<Message, MailError> {
    let builder = Message::builder()
        .from(from.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject.clone());

    if email.attachments.is_empty() {
        return builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| MailError::Build(e.to_string()));
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(email.body.clone()));
    for attachment in &email.attachments {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| MailError::Build(format!("{}: {e}", attachment.content_type)))?;
        parts = parts.singlepart(
            MimeAttachment::new(attachment.file_name.clone())
                .body(attachment.data.clone(), content_type),
        );
    }

    builder
        .multipart(parts)
        .map_err(|e| MailError::Build(e.to_string()))
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Something that can send an [`OutgoingEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Delivers mail over SMTP with STARTTLS.
pub struct SmtpMailer {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(&self.config.from_address, &email)?;
        self.transport.send(message).await?;
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            attachments = email.attachments.len(),
            "Email sent"
        );
        Ok(())
    }
}

/// Logs mail instead of sending it. Used when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        tracing::warn!(
            to = %email.to,
            subject = %email.subject,
            attachments = email.attachments.len(),
            "SMTP not configured, email not delivered"
        );
        Ok(())
    }
}

/// Records sent mail in memory. Can be told to fail every send.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail_with: Option<String>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    /// Snapshot of every successfully sent email.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if let Some(reason) = &self.fail_with {
            return Err(MailError::Rejected(reason.clone()));
        }
        build_message("noreply@backoffice.local", &email)?;
        self.sent
            .lock()
            .map_err(|_| MailError::Rejected("mailbox lock poisoned".to_string()))?
            .push(email);
        Ok(())
    }
}
