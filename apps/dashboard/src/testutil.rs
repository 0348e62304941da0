//! Shared test helpers: stub model backend and stub mail transport.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use lettre::Message;

use crate::config::{Config, SmtpConfig};
use crate::llm_client::{Content, LlmError, TextGenerator};
use crate::newsletter::mailer::MailTransport;
use crate::newsletter::MailError;
use crate::state::AppState;

/// Serializes tests that touch process environment variables.
pub fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Config with every path inside `dir`.
pub fn test_config(dir: &tempfile::TempDir) -> Config {
    Config {
        google_api_key: "test-key".to_string(),
        model_pro: "test-pro".to_string(),
        model_flash: "test-flash".to_string(),
        data_file: dir.path().join("students_data.json"),
        docs_dir: dir.path().join("student_docs"),
        subscribers_file: dir.path().join("newsletter_subscribers.csv"),
        logo_path: dir.path().join("logo.png"),
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
        },
        port: 0,
        rust_log: "debug".to_string(),
        env_file: dir.path().join(".env"),
    }
}

/// App state rooted in `dir`, answering with `generator`.
pub fn test_state(dir: &tempfile::TempDir, generator: StubGenerator) -> AppState {
    AppState::new(test_config(dir), Arc::new(generator))
}

/// Records every call and answers with a fixed reply (or fails).
#[derive(Debug, Clone, Default)]
pub struct StubGenerator {
    reply: Option<String>,
    /// Calls whose prompt text contains one of these fail.
    fail_when_prompt_contains: Vec<String>,
    calls: Arc<Mutex<Vec<(String, Vec<Content>)>>>,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn failing_when(mut self, needle: &str) -> Self {
        self.fail_when_prompt_contains.push(needle.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<Content>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, model: &str, contents: &[Content]) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), contents.to_vec()));

        let prompt_text: String = contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| match p {
                crate::llm_client::Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        if self
            .fail_when_prompt_contains
            .iter()
            .any(|n| prompt_text.contains(n.as_str()))
        {
            return Err(LlmError::EmptyContent);
        }

        self.reply.clone().ok_or(LlmError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        })
    }
}

/// Collects messages instead of sending them; rejects listed recipients.
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    rejected: HashSet<String>,
    refuse_login: bool,
    attempts: Arc<AtomicUsize>,
    pub sent: Arc<Mutex<Vec<Message>>>,
}

impl StubTransport {
    pub fn rejecting(addresses: &[&str]) -> Self {
        Self {
            rejected: addresses.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Every delivery fails as if the relay refused the password.
    pub fn refusing_login() -> Self {
        Self {
            refuse_login: true,
            ..Default::default()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for StubTransport {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.refuse_login {
            return Err(MailError::Relay(
                "535 5.7.8 Username and Password not accepted".to_string(),
            ));
        }
        let to: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(|a| a.to_string())
            .collect();
        if to.iter().any(|a| self.rejected.contains(a)) {
            return Err(MailError::Smtp(format!("550 mailbox unavailable: {}", to.join(", "))));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}
