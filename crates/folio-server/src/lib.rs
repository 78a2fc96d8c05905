//! HTTP server for folio document sites.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - HTML pages: `/` (home) and `/posts/{path}`, as full pages or as htmx
//!   partials when the request carries `HX-Request: true`
//! - API endpoints for page rendering and navigation
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use folio_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         root: PathBuf::from("notes"),
//!         title: "Notes".to_owned(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (folio-server)
//!                        │
//!                        ├─► HTML routes ──► shell (layout, htmx partials)
//!                        │
//!                        └─► API routes
//!                                │
//!                                └─► spawn_blocking ──► Site (load + render)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod shell;
mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use folio_renderer::{DEFAULT_DIAGRAM_LANGUAGE, DEFAULT_IMAGE_DIR, RenderOptions, slug_to_title};
use folio_site::{Site, SiteConfig};
use state::AppState;

/// Site title used when neither the config nor the root directory name
/// provides one.
const FALLBACK_TITLE: &str = "Folio";

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Document root directory.
    pub root: PathBuf,
    /// Site title.
    pub title: String,
    /// Prefix for relative image sources (`None` keeps them as written).
    pub image_dir: Option<String>,
    /// Fence language rendered as a diagram.
    pub diagram_language: String,
    /// Enable verbose output.
    pub verbose: bool,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5001,
            root: PathBuf::from("."),
            title: FALLBACK_TITLE.to_owned(),
            image_dir: Some(DEFAULT_IMAGE_DIR.to_owned()),
            diagram_language: DEFAULT_DIAGRAM_LANGUAGE.to_owned(),
            verbose: false,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let site_config = SiteConfig {
        title: config.title.clone(),
        render_options: RenderOptions {
            image_dir: config.image_dir.clone(),
            diagram_language: config.diagram_language.clone(),
            ..RenderOptions::default()
        },
    };
    let site = Arc::new(Site::open(config.root.clone(), site_config));

    let state = Arc::new(AppState {
        site,
        verbose: config.verbose,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    // Bind by (host, port) so host names like "localhost" resolve
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(address = %listener.local_addr()?, root = %config.root.display(), "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from folio config.
///
/// # Arguments
///
/// * `config` - Loaded folio configuration
/// * `version` - Application version
/// * `verbose` - Enable verbose output
#[must_use]
pub fn server_config_from_config(
    config: &folio_config::Config,
    version: String,
    verbose: bool,
) -> ServerConfig {
    let site = &config.site_resolved;
    let title = site
        .title
        .clone()
        .unwrap_or_else(|| default_title(&site.root));

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root: site.root.clone(),
        title,
        image_dir: (!site.image_dir.is_empty()).then(|| site.image_dir.clone()),
        diagram_language: site.diagram_language.clone(),
        verbose,
        version,
    }
}

/// Title derived from the root directory name, e.g. `my-notes` -> `My Notes`.
fn default_title(root: &Path) -> String {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    root.file_name()
        .map(|name| slug_to_title(&name.to_string_lossy()))
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_title_from_directory_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("my-notes");
        std::fs::create_dir(&root).unwrap();

        assert_eq!(default_title(&root), "My Notes");
    }

    #[test]
    fn test_default_title_fallback() {
        assert_eq!(default_title(Path::new("/")), "Folio");
    }

    #[test]
    fn test_server_config_from_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("field_notes");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(
            temp_dir.path().join("folio.toml"),
            "[server]\nport = 8080\n\n[site]\nroot = \"field_notes\"\nimage_dir = \"\"\n",
        )
        .unwrap();

        let config =
            folio_config::Config::load(Some(&temp_dir.path().join("folio.toml")), None).unwrap();
        let server = server_config_from_config(&config, "1.2.3".to_owned(), true);

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 8080);
        assert_eq!(server.title, "Field Notes");
        assert_eq!(server.image_dir, None);
        assert_eq!(server.diagram_language, "mermaid");
        assert_eq!(server.version, "1.2.3");
        assert!(server.verbose);
    }

    #[test]
    fn test_server_config_keeps_configured_title() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("folio.toml"),
            "[site]\ntitle = \"Handbook\"\n",
        )
        .unwrap();

        let config =
            folio_config::Config::load(Some(&temp_dir.path().join("folio.toml")), None).unwrap();
        let server = server_config_from_config(&config, String::new(), false);

        assert_eq!(server.title, "Handbook");
        assert_eq!(server.image_dir.as_deref(), Some("/static/images"));
    }
}
