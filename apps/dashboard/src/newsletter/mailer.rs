//! Batch delivery: one personalized message per subscriber.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::PoolConfig;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{SenderCredentials, SmtpConfig};
use crate::newsletter::logo::Logo;
use crate::newsletter::render::{email_html, LOGO_CID};
use crate::newsletter::MailError;

/// Anything that can deliver a built message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), MailError>;
}

/// Authenticated STARTTLS relay holding a single pooled connection for the batch.
/// The connection opens and logs in on the first delivery.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpRelay {
    pub fn new(config: &SmtpConfig, credentials: &SenderCredentials) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Relay(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                credentials.email.clone(),
                credentials.password.clone(),
            ))
            .pool_config(PoolConfig::new().max_size(1))
            .build();
        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(classify_smtp_error)
    }
}

fn classify_smtp_error(e: lettre::transport::smtp::Error) -> MailError {
    let reply_code = e.status().map(|code| code.to_string());
    let got_reply = e.is_response() || e.is_transient() || e.is_permanent();
    if is_relay_failure(reply_code.as_deref(), got_reply || e.is_client()) {
        MailError::Relay(e.to_string())
    } else {
        MailError::Smtp(e.to_string())
    }
}

/// 53x replies are authentication failures; no reply at all means the connection
/// or TLS handshake failed. Both hit every recipient alike.
fn is_relay_failure(reply_code: Option<&str>, got_reply: bool) -> bool {
    match reply_code {
        Some(code) => code.starts_with("53"),
        None => !got_reply,
    }
}

/// Outcome of a batch send.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendReport {
    pub sent: usize,
    pub failed: Vec<String>,
}

impl SendReport {
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!("Emails sent individually to {} recipients.", self.sent)
        } else {
            format!(
                "Sent individually to {} recipients. Failed: {}",
                self.sent,
                self.failed.join(", ")
            )
        }
    }
}

/// The parts of a newsletter shared by every message in a batch.
#[derive(Debug, Clone)]
pub struct Newsletter<'a> {
    pub subject: &'a str,
    pub markdown: &'a str,
    pub logo: Option<&'a Logo>,
}

/// Builds one `multipart/related` message: plain/HTML alternatives plus the inline
/// logo when present.
pub fn build_message(
    sender: &str,
    recipient: &str,
    newsletter: &Newsletter<'_>,
    html: &str,
) -> Result<Message, MailError> {
    let from = parse_mailbox(sender)?;
    let to = parse_mailbox(recipient)?;

    let alternative =
        MultiPart::alternative_plain_html(newsletter.markdown.to_string(), html.to_string());
    let mut related = MultiPart::related().multipart(alternative);
    if let Some(logo) = newsletter.logo {
        let content_type =
            ContentType::parse(logo.content_type).map_err(|e| MailError::Build(e.to_string()))?;
        related = related.singlepart(
            Attachment::new_inline(LOGO_CID.to_string()).body(logo.data.clone(), content_type),
        );
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(newsletter.subject)
        .multipart(related)
        .map_err(|e| MailError::Build(e.to_string()))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Sends the newsletter to each recipient individually. A recipient that cannot be
/// addressed or delivered to is recorded in the report; the batch continues. A
/// relay failure before anything was delivered aborts the batch.
pub async fn send_newsletter(
    transport: &dyn MailTransport,
    sender: &str,
    recipients: &[String],
    newsletter: &Newsletter<'_>,
) -> Result<SendReport, MailError> {
    if recipients.is_empty() {
        return Err(MailError::NoRecipients);
    }
    // A bad sender address would fail every message; reject it once.
    parse_mailbox(sender)?;

    let html = email_html(newsletter.markdown, newsletter.logo.is_some());
    let mut report = SendReport::default();

    for recipient in recipients {
        let result = match build_message(sender, recipient, newsletter, &html) {
            Ok(message) => transport.send(message).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => report.sent += 1,
            Err(e @ MailError::Relay(_)) if report.sent == 0 => {
                warn!("Relay failed on the first delivery, aborting batch: {e}");
                return Err(e);
            }
            Err(e) => {
                warn!("Failed to send to {recipient}: {e}");
                report.failed.push(recipient.clone());
            }
        }
    }

    info!("{}", report.summary());
    Ok(report)
}

/// Sends the batch through the configured relay.
pub async fn send_via_smtp(
    config: &SmtpConfig,
    credentials: &SenderCredentials,
    recipients: &[String],
    newsletter: &Newsletter<'_>,
) -> Result<SendReport, MailError> {
    if recipients.is_empty() {
        return Err(MailError::NoRecipients);
    }
    let relay = SmtpRelay::new(config, credentials)?;
    info!("Sending through {}:{}", config.host, config.port);
    send_newsletter(&relay, &credentials.email, recipients, newsletter).await
}
