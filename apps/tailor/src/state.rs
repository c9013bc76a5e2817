use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Default: `LlmClient` built from config. Tests inject a fake.
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}
