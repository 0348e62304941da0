use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_MODEL_PRO: &str = "gemini-3-pro-preview";
pub const DEFAULT_MODEL_FLASH: &str = "gemini-3-flash-preview";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or blank.
#[derive(Clone)]
pub struct Config {
    pub google_api_key: String,
    /// Used for the master plan.
    pub model_pro: String,
    /// Used for chat and the newsletter.
    pub model_flash: String,
    pub data_file: PathBuf,
    pub docs_dir: PathBuf,
    pub subscribers_file: PathBuf,
    pub logo_path: PathBuf,
    pub smtp: SmtpConfig,
    pub port: u16,
    pub rust_log: String,
    /// Re-read before each newsletter send for fresh sender credentials.
    pub env_file: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("google_api_key", &"<redacted>")
            .field("model_pro", &self.model_pro)
            .field("model_flash", &self.model_flash)
            .field("data_file", &self.data_file)
            .field("docs_dir", &self.docs_dir)
            .field("subscribers_file", &self.subscribers_file)
            .field("logo_path", &self.logo_path)
            .field("smtp", &self.smtp)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field("env_file", &self.env_file)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

/// Sender address and app password for the mail relay.
#[derive(Clone)]
pub struct SenderCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SenderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            model_pro: env_or("MODEL_PRO", DEFAULT_MODEL_PRO),
            model_flash: env_or("MODEL_FLASH", DEFAULT_MODEL_FLASH),
            data_file: env_or("DATA_FILE", "students_data.json").into(),
            docs_dir: env_or("DOCS_DIR", "student_docs").into(),
            subscribers_file: env_or("SUBSCRIBERS_FILE", "newsletter_subscribers.csv").into(),
            logo_path: env_or("LOGO_PATH", "logo.png").into(),
            smtp: SmtpConfig {
                host: env_or("SMTP_HOST", "smtp.gmail.com"),
                port: env_or("SMTP_PORT", "587")
                    .parse::<u16>()
                    .context("SMTP_PORT must be a valid port number")?,
            },
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            env_file: env_or("ENV_FILE", ".env").into(),
        })
    }
}

impl SenderCredentials {
    /// Re-reads `env_file` (overriding the process environment) and returns the
    /// sender credentials, or `None` when either is missing or blank.
    pub fn reload(env_file: &Path) -> Option<Self> {
        if env_file.exists() {
            if let Err(e) = dotenvy::from_path_override(env_file) {
                tracing::warn!("Could not reload {}: {e}", env_file.display());
            }
        }
        Self::from_env()
    }

    pub fn from_env() -> Option<Self> {
        let email = non_blank_env("SENDER_EMAIL")?;
        let password = non_blank_env("SENDER_PASSWORD")?;
        Some(Self { email, password })
    }
}

fn require_env(key: &str) -> Result<String> {
    non_blank_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
