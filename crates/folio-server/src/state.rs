//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use folio_site::Site;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Document site (loading, rendering, navigation).
    pub(crate) site: Arc<Site>,
    /// Enable verbose output (log render warnings).
    pub(crate) verbose: bool,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}
