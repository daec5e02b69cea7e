use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `LlmClient` in production, a scripted model in tests.
    pub llm: Arc<dyn ChatModel>,
    pub config: Config,
    pub sessions: SessionStore,
}
