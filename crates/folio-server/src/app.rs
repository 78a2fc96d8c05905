//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/pages/", get(handlers::pages::get_root_page))
        .route("/api/pages/{*path}", get(handlers::pages::get_page));

    // HTML pages
    let page_routes = Router::new()
        .route("/", get(handlers::html::get_home))
        .route("/posts/{*path}", get(handlers::html::get_post))
        .fallback(handlers::html::not_found);

    Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(security::referrer_policy_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use folio_renderer::RenderOptions;
    use folio_site::{DocumentSource, MockSource, Site, SiteConfig};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    fn router_for(source: Arc<dyn DocumentSource>) -> Router {
        let site = Site::new(
            source,
            SiteConfig {
                title: "Notes".to_owned(),
                render_options: RenderOptions::default(),
            },
        );
        create_router(Arc::new(AppState {
            site: Arc::new(site),
            verbose: true,
            version: "test".to_owned(),
        }))
    }

    fn router(source: MockSource) -> Router {
        router_for(Arc::new(source))
    }

    fn sample() -> MockSource {
        MockSource::new()
            .with_file("README.md", "---\ntitle: Start Here\n---\nHello.")
            .with_file(
                "notes/rust-tips.md",
                "## Ownership\n\nBorrow[^1] [it](/posts/other).\n\n[^1]: Not move.",
            )
            .with_file("other.md", "# Other")
    }

    async fn get(
        router: Router,
        uri: &str,
        headers: &[(&str, &str)],
    ) -> (StatusCode, HeaderMap, String) {
        let mut request = Request::builder().uri(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_home_renders_readme() {
        let (status, headers, body) = get(router(sample()), "/", &[]).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains("<title>Start Here - Notes</title>"));
        assert!(body.contains(r#"<h1 class="page-title">Start Here</h1><p>Hello.</p>"#));
        // Home document is not listed in the navigation.
        assert!(!body.contains("/posts/README"));
        assert!(body.contains(r#"<a href="/posts/other""#));
        assert!(headers.contains_key(header::ETAG));
    }

    #[tokio::test]
    async fn test_home_welcome_without_home_document() {
        let (status, _, body) = get(router(MockSource::new().with_file("a.md", "")), "/", &[]).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Welcome to Notes!"));
        assert!(body.contains("<title>Home - Notes</title>"));
    }

    #[tokio::test]
    async fn test_post_full_page() {
        let (status, _, body) = get(router(sample()), "/posts/notes/rust-tips", &[]).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<h1 class="page-title">Rust Tips</h1>"#));
        assert!(body.contains(r#"<h2 id="ownership">Ownership</h2>"#));
        assert!(body.contains(r#"class="sidenote">Not move.</span>"#));
        assert!(body.contains(r##"<a href="#ownership">Ownership</a>"##));
        assert!(body.contains(r#"<summary>Notes</summary>"#));
        assert!(body.contains(r#"hx-get="/posts/other""#));
    }

    #[tokio::test]
    async fn test_post_partial_page_for_htmx() {
        let (status, headers, body) = get(
            router(sample()),
            "/posts/notes/rust-tips",
            &[("HX-Request", "true")],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<title>Rust Tips - Notes</title>"));
        assert!(body.contains(r#"<main id="main-content""#));
        assert!(body.contains(r#"<aside id="toc-sidebar" class="toc-sidebar" hx-swap-oob="true">"#));
        assert!(!body.contains("<!DOCTYPE html>"));
        assert!(!body.contains("posts-sidebar"));
        assert_eq!(headers.get(header::VARY).unwrap(), "HX-Request");
    }

    #[tokio::test]
    async fn test_missing_post_is_404_page() {
        let (status, _, body) = get(router(sample()), "/posts/missing", &[]).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page Not Found"));
        assert!(body.contains("/posts/missing"));
    }

    #[tokio::test]
    async fn test_traversal_is_404() {
        let (status, _, _) = get(router(sample()), "/posts/..%2FREADME", &[]).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get(router(sample()), "/posts/.hidden/a", &[]).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_page() {
        let (status, _, body) = get(router(sample()), "/nope", &[]).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page Not Found"));
    }

    #[tokio::test]
    async fn test_etag_not_modified() {
        let router = router(sample());
        let (_, headers, _) = get(router.clone(), "/posts/other", &[]).await;
        let etag = headers.get(header::ETAG).unwrap().to_str().unwrap().to_owned();

        let (status, _, body) = get(router, "/posts/other", &[("If-None-Match", &etag)]).await;

        assert_eq!(status, StatusCode::NOT_MODIFIED);
        assert_eq!(body, "");
    }

    #[tokio::test]
    async fn test_edits_are_served() {
        let source = Arc::new(sample());
        let router = router_for(Arc::clone(&source) as Arc<dyn DocumentSource>);

        let (_, _, before) = get(router.clone(), "/posts/other", &[("HX-Request", "true")]).await;
        assert!(before.contains("Other"));

        source.set_file("other.md", "# Changed", 10);
        let (_, _, after) = get(router, "/posts/other", &[("HX-Request", "true")]).await;
        assert!(after.contains(r#"<h1 id="changed">Changed</h1>"#));
    }

    #[tokio::test]
    async fn test_security_headers() {
        let (_, headers, _) = get(router(sample()), "/", &[]).await;

        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert!(headers.contains_key("referrer-policy"));
    }

    #[tokio::test]
    async fn test_api_navigation() {
        let (status, _, body) = get(router(sample()), "/api/navigation", &[]).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [
                    {
                        "kind": "folder",
                        "name": "notes",
                        "title": "Notes",
                        "children": [{
                            "kind": "document",
                            "name": "rust-tips.md",
                            "title": "Rust Tips",
                            "route": "/posts/notes/rust-tips"
                        }]
                    },
                    {"kind": "document", "name": "other.md", "title": "Other", "route": "/posts/other"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_api_page() {
        let (status, headers, body) = get(router(sample()), "/api/pages/notes/rust-tips", &[]).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key(header::ETAG));

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["meta"]["title"], "Rust Tips");
        assert_eq!(json["meta"]["path"], "/posts/notes/rust-tips");
        assert_eq!(
            json["toc"],
            serde_json::json!([{"level": 2, "title": "Ownership", "id": "ownership"}])
        );
        assert!(json["content"].as_str().unwrap().contains("sidenote"));
    }

    #[tokio::test]
    async fn test_api_root_page() {
        let (status, _, body) = get(router(sample()), "/api/pages/", &[]).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["meta"]["title"], "Start Here");
        assert_eq!(json["meta"]["path"], "/");
        assert_eq!(json["meta"]["frontMatter"]["title"], "Start Here");
    }

    #[tokio::test]
    async fn test_api_page_not_found() {
        let (status, _, body) = get(router(sample()), "/api/pages/missing", &[]).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Page not found");
        assert_eq!(json["path"], "missing");
    }

    #[tokio::test]
    async fn test_filesystem_site() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("guide.md"), "Read me.").unwrap();
        let router = router_for(Arc::new(folio_site::FsSource::new(temp_dir.path())));

        let (status, _, body) = get(router, "/posts/guide", &[("HX-Request", "true")]).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<p>Read me.</p>"));
    }
}
