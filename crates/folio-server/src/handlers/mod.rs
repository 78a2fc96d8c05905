//! HTTP request handlers.

pub(crate) mod html;
pub(crate) mod navigation;
pub(crate) mod pages;

use std::sync::Arc;

use axum::http::{HeaderMap, header};
use folio_site::{Page, Site};
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::state::AppState;

/// Header set by htmx on partial navigation requests.
const HX_REQUEST: &str = "hx-request";

/// Convert a page path (without leading slash, "" for home) to its URL.
pub(crate) fn to_url_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_owned()
    } else {
        format!("/posts/{path}")
    }
}

/// Run a site operation on the blocking thread pool.
///
/// Loading documents reads the filesystem, so it stays off the async
/// workers. A panicking task surfaces as [`ServerError::Internal`].
pub(crate) async fn with_site<T, F>(state: &AppState, f: F) -> Result<T, ServerError>
where
    F: FnOnce(&Site) -> T + Send + 'static,
    T: Send + 'static,
{
    let site = Arc::clone(&state.site);
    Ok(tokio::task::spawn_blocking(move || f(&site)).await?)
}

/// Log render warnings in verbose mode.
pub(crate) fn log_warnings(state: &AppState, page: &Page) {
    if state.verbose {
        for warning in &page.warnings {
            tracing::warn!(path = %page.path, warning = %warning, "Page render warning");
        }
    }
}

/// Whether the request came from htmx.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
pub(crate) fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

/// Whether `If-None-Match` matches the current `ETag`.
pub(crate) fn is_not_modified(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|value| value.as_bytes() == etag.as_bytes())
}
