use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmBackend;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable completion backend. `GeminiClient` in production.
    pub llm: Arc<dyn LlmBackend>,
    pub config: Config,
}
