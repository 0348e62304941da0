//! Scheduled monthly newsletter: generates every grade section and mails it to all
//! subscribers without review. Meant to run from cron once a month.

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dashboard::config::{Config, SenderCredentials};
use dashboard::llm_client::GeminiClient;
use dashboard::newsletter::logo::load_logo;
use dashboard::newsletter::mailer::{send_via_smtp, Newsletter};
use dashboard::newsletter::monthly::{compose_newsletter, current_month};
use dashboard::newsletter::subscribers::SubscriberStore;
use dashboard::newsletter::MailError;

/// Gap between grade sections to stay under the API rate limit.
const SECTION_PAUSE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("dashboard={0},auto_sender={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Automated newsletter sender started at {}", Local::now());

    let Some(credentials) = SenderCredentials::from_env() else {
        error!("Email credentials (SENDER_EMAIL, SENDER_PASSWORD) are missing");
        return Err(MailError::MissingCredentials.into());
    };

    let recipients = SubscriberStore::new(&config.subscribers_file).load();
    if recipients.is_empty() {
        warn!("No subscribers found. Exiting.");
        return Ok(());
    }
    info!("Found {} subscribers", recipients.len());

    let gemini = GeminiClient::new(config.google_api_key.clone())?;
    let month = current_month();
    info!("Generating content for {month}");
    let draft = compose_newsletter(&gemini, &config.model_flash, &month, SECTION_PAUSE).await;
    if !draft.failed_grades.is_empty() {
        warn!("Sections failed: {}", draft.failed_grades.join(", "));
    }

    let logo = load_logo(&config.logo_path);
    let newsletter = Newsletter {
        subject: &draft.subject,
        markdown: &draft.body,
        logo: logo.as_ref(),
    };

    info!("Sending '{}'", draft.subject);
    match send_via_smtp(&config.smtp, &credentials, &recipients, &newsletter).await {
        Ok(report) => info!("Success: {}", report.summary()),
        Err(e) => {
            error!("Failed: {e}");
            return Err(e.into());
        }
    }

    info!("Done");
    Ok(())
}
