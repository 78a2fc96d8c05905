//! Navigation API endpoint.
//!
//! Returns the navigation tree for the document site.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use folio_site::{NavNode, Site};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::with_site;
use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Navigation tree items.
    items: Vec<NavNode>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NavigationResponse>, ServerError> {
    let items = with_site(&state, Site::navigation).await?;
    Ok(Json(NavigationResponse { items }))
}
