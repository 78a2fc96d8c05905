//! `folio serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args, Debug)]
pub(crate) struct ServeArgs {
    /// Document root directory (overrides config).
    #[arg(value_name = "DIR", env = "FOLIO_ROOT")]
    dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "FOLIO_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "FOLIO_PORT")]
    port: Option<u16>,

    /// Site title (overrides config).
    #[arg(short, long)]
    title: Option<String>,

    /// Enable verbose output (log render warnings and requests).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the document root is
    /// missing, or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;

        let root = &config.site_resolved.root;
        if !root.is_dir() {
            return Err(CliError::Validation(format!(
                "Document root is not a directory: {}",
                root.display()
            )));
        }

        let server_config = server_config_from_config(&config, version.to_owned(), self.verbose);

        output.highlight(&format!(
            "Serving {} at http://{}:{}",
            server_config.title, server_config.host, server_config.port
        ));
        output.info(&format!("Document root: {}", root.display()));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config file: {}", path.display()));
        }
        output.info("Press Ctrl+C to stop");

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// CLI overrides applied on top of the config file.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            root: self.dir.clone(),
            title: self.title.clone(),
        }
    }
}
