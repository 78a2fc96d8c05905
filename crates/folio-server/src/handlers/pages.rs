//! Pages API endpoint.
//!
//! Handles page rendering and returns JSON responses with metadata,
//! table of contents, and HTML content.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use folio_renderer::TocEntry;
use folio_site::{Home, Metadata, Page, Site};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::{compute_etag, is_not_modified, log_warnings, to_url_path, with_site};
use crate::shell::ShellPage;
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    /// Page metadata.
    meta: PageMeta,
    /// Table of contents entries.
    toc: Vec<TocEntry>,
    /// Rendered HTML content.
    content: String,
}

/// Page metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    /// Page title (from metadata or the file name).
    title: String,
    /// URL path.
    path: String,
    /// Front matter fields.
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    front_matter: Metadata,
}

impl From<Page> for PageResponse {
    fn from(page: Page) -> Self {
        Self {
            meta: PageMeta {
                title: page.title,
                path: to_url_path(&page.path),
                front_matter: page.metadata,
            },
            toc: page.toc,
            content: page.html,
        }
    }
}

/// Handle GET /api/pages/ (home page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let response = match with_site(&state, Site::render_home).await? {
        Ok(Home::Document(page)) => {
            log_warnings(&state, &page);
            PageResponse::from(page)
        }
        Ok(Home::Welcome { title }) => PageResponse {
            meta: PageMeta {
                title: title.clone(),
                path: to_url_path(""),
                front_matter: Metadata::default(),
            },
            toc: Vec::new(),
            content: ShellPage::welcome(&title).main,
        },
        Err(_) => return Err(ServerError::PageNotFound(String::new())),
    };

    Ok(page_response(&state, &headers, response))
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let lookup = path.clone();
    let page = with_site(&state, move |site| site.render_page(&lookup))
        .await?
        .map_err(|e| {
            tracing::debug!(path = %path, error = %e, "Page lookup failed");
            ServerError::PageNotFound(path)
        })?;

    log_warnings(&state, &page);
    Ok(page_response(&state, &headers, PageResponse::from(page)))
}

/// Build the JSON response, answering 304 when the client copy is current.
fn page_response(state: &AppState, headers: &HeaderMap, response: PageResponse) -> Response {
    let etag = compute_etag(&state.version, &response.content);
    if is_not_modified(headers, &etag) {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        Json(response),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_meta_serialization() {
        let meta = PageMeta {
            title: "Guide".to_owned(),
            path: "/posts/guide".to_owned(),
            front_matter: Metadata::default(),
        };

        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["title"], "Guide");
        assert_eq!(json["path"], "/posts/guide");
        assert!(json.get("frontMatter").is_none());
    }

    #[test]
    fn test_page_response_from_page() {
        let page = Page {
            title: "Rust".to_owned(),
            path: "notes/rust".to_owned(),
            html: "<p>x</p>".to_owned(),
            toc: vec![TocEntry {
                level: 2,
                title: "Intro".to_owned(),
                id: "intro".to_owned(),
            }],
            metadata: Metadata::default(),
            warnings: Vec::new(),
        };

        let json = serde_json::to_value(PageResponse::from(page)).unwrap();

        assert_eq!(json["meta"]["path"], "/posts/notes/rust");
        assert_eq!(json["toc"][0]["id"], "intro");
        assert_eq!(json["content"], "<p>x</p>");
    }
}
