use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable analyzer. Default: GeminiAnalyzer.
    pub analyzer: Arc<dyn Analyzer>,
    /// Per-browser view state for the HTML flow.
    pub sessions: Arc<SessionStore>,
}
