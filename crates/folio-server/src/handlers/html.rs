//! HTML page routes.
//!
//! Full pages for regular requests, partial pages for htmx navigation.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use folio_site::{Home, NavNode, Site};

use crate::error::ServerError;
use crate::handlers::{
    compute_etag, is_htmx, is_not_modified, log_warnings, to_url_path, with_site,
};
use crate::shell::{ShellPage, full_page, partial_page};
use crate::state::AppState;

/// Responses differ between htmx and regular requests.
const VARY: &str = "HX-Request";

/// Handle GET /.
pub(crate) async fn get_home(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let htmx = is_htmx(&headers);
    let (home, nav) = with_site(&state, move |site| {
        let nav = if htmx { Vec::new() } else { site.navigation() };
        (site.render_home(), nav)
    })
    .await?;

    let (status, page) = match home {
        Ok(Home::Document(page)) => {
            log_warnings(&state, &page);
            (StatusCode::OK, ShellPage::document(page))
        }
        Ok(Home::Welcome { title }) => (StatusCode::OK, ShellPage::welcome(&title)),
        Err(e) => {
            tracing::debug!(error = %e, "Home document disappeared");
            (StatusCode::NOT_FOUND, ShellPage::not_found("/"))
        }
    };

    Ok(html_response(&state, &headers, status, &page, &nav))
}

/// Handle GET /posts/{path}.
pub(crate) async fn get_post(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let htmx = is_htmx(&headers);
    let lookup = path.clone();
    let (result, nav) = with_site(&state, move |site| {
        let nav = if htmx { Vec::new() } else { site.navigation() };
        (site.render_page(&lookup), nav)
    })
    .await?;

    let (status, page) = match result {
        Ok(page) => {
            log_warnings(&state, &page);
            (StatusCode::OK, ShellPage::document(page))
        }
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "Page lookup failed");
            (StatusCode::NOT_FOUND, ShellPage::not_found(&to_url_path(&path)))
        }
    };

    Ok(html_response(&state, &headers, status, &page, &nav))
}

/// Fallback for unknown routes.
pub(crate) async fn not_found(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let nav = if is_htmx(&headers) {
        Vec::new()
    } else {
        with_site(&state, Site::navigation).await?
    };
    let page = ShellPage::not_found(uri.path());

    Ok(html_response(&state, &headers, StatusCode::NOT_FOUND, &page, &nav))
}

fn html_response(
    state: &AppState,
    headers: &HeaderMap,
    status: StatusCode,
    page: &ShellPage,
    nav: &[NavNode],
) -> Response {
    let body = if is_htmx(headers) {
        partial_page(page, state.site.title())
    } else {
        full_page(page, state.site.title(), nav)
    };

    if status != StatusCode::OK {
        return (status, [(header::VARY, VARY)], Html(body)).into_response();
    }

    let etag = compute_etag(&state.version, &body);
    if is_not_modified(headers, &etag) {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
            (header::VARY, VARY.to_owned()),
        ],
        Html(body),
    )
        .into_response()
}
