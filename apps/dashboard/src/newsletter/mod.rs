//! Monthly newsletter: subscriber list, content generation, and batch sending.
//!
//! Sending is one message per recipient over a single authenticated relay
//! connection. A failed recipient is recorded and the batch carries on; a relay
//! that refuses the first delivery aborts the batch.

pub mod handlers;
pub mod logo;
pub mod mailer;
pub mod monthly;
pub mod prompts;
pub mod render;
pub mod subscribers;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Please set SENDER_EMAIL and SENDER_PASSWORD in .env file first.")]
    MissingCredentials,

    #[error("No subscribers to send to.")]
    NoRecipients,

    /// The relay could not be reached or refused the login.
    #[error("Mail relay unavailable: {0}")]
    Relay(String),

    #[error("Invalid email address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}
