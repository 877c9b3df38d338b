//! Outgoing email behind a small [`Mailer`] seam.
//!
//! [`SmtpMailer`] delivers through `lettre`'s async SMTP transport. When SMTP
//! is not configured the API falls back to [`LogMailer`], and tests use
//! [`MemoryMailer`] to inspect what would have been sent.

mod config;
mod error;
mod mailer;

pub use config::EmailConfig;
pub use error::MailError;
pub use mailer::{build_message, Attachment, LogMailer, Mailer, MemoryMailer, OutgoingEmail, SmtpMailer};
