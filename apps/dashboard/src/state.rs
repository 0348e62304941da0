use std::sync::Arc;

use crate::config::Config;
use crate::documents::DocumentStore;
use crate::llm_client::TextGenerator;
use crate::newsletter::subscribers::SubscriberStore;
use crate::profiles::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileStore,
    pub documents: DocumentStore,
    pub subscribers: SubscriberStore,
    /// Model backend. Gemini in production, a stub in tests.
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            profiles: ProfileStore::new(&config.data_file),
            documents: DocumentStore::new(&config.docs_dir),
            subscribers: SubscriberStore::new(&config.subscribers_file),
            generator,
            config,
        }
    }
}
