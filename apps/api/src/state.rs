use std::sync::Arc;

use crate::config::Config;
use crate::generation::generator::ContentGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Drafting backend. Default: RemoteGenerator. Swap via LLM_BACKEND=mock.
    pub generator: Arc<dyn ContentGenerator>,
}
