//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::services::Notifier;
use crate::utils::error::{DocflowError, Result};
use std::sync::Arc;
use tracing::info;

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the default log-only notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| DocflowError::config("Configuration is required"))?;

        match self.notifier {
            Some(notifier) => HttpServer::with_notifier(&config, notifier).await,
            None => HttpServer::new(&config).await,
        }
    }
}

/// Build and run the server until a shutdown signal arrives
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting docflow {}", crate::VERSION);

    let server = ServerBuilder::new().with_config(config).build().await?;
    info!(
        "Server starting at: http://{}",
        server.config().address()
    );

    server.start().await
}
