use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm_client::CompletionOracle;
use crate::session::credentials::CredentialStore;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Completion oracle. `LlmClient` in production, scripted in tests.
    pub oracle: Arc<dyn CompletionOracle>,
    pub sessions: Arc<SessionStore>,
    /// Hashed once at startup; every new session gets its own copy.
    pub seed_users: Arc<CredentialStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        oracle: Arc<dyn CompletionOracle>,
        seed_users: CredentialStore,
    ) -> Self {
        let idle_ttl = Duration::from_secs(config.session_idle_secs);
        Self {
            config,
            oracle,
            sessions: Arc::new(SessionStore::new(idle_ttl)),
            seed_users: Arc::new(seed_users),
        }
    }
}
