//! HTTP server utility methods

use crate::server::server::HttpServer;
use crate::utils::error::DocflowError;
use tracing::{info, warn};

impl HttpServer {
    /// Resolves on Ctrl+C or SIGTERM
    pub async fn shutdown_signal() {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal, shutting down gracefully"),
                Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                    info!("Received terminate signal, shutting down gracefully");
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    /// Turn a bind failure into an actionable configuration error
    pub(crate) fn format_bind_error(
        error: std::io::Error,
        bind_addr: &str,
        port: u16,
    ) -> DocflowError {
        match error.kind() {
            std::io::ErrorKind::AddrInUse => DocflowError::config(format!(
                "Port {} is already in use; set server.port, --port or DOCFLOW_PORT (e.g. {})",
                port,
                port.saturating_add(1)
            )),
            std::io::ErrorKind::PermissionDenied => DocflowError::config(format!(
                "Permission denied for port {}; use a port >= 1024",
                port
            )),
            _ => DocflowError::config(format!("Failed to bind to {}: {}", bind_addr, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_format_bind_error_address_in_use() {
        let error = Error::new(ErrorKind::AddrInUse, "Address already in use");
        let result = HttpServer::format_bind_error(error, "0.0.0.0:8080", 8080);

        let message = result.to_string();
        assert!(message.contains("8080"));
        assert!(message.contains("already in use"));
        assert!(message.contains("8081"));
    }

    #[test]
    fn test_format_bind_error_permission_denied() {
        let error = Error::new(ErrorKind::PermissionDenied, "Permission denied");
        let result = HttpServer::format_bind_error(error, "0.0.0.0:80", 80);

        let message = result.to_string();
        assert!(message.contains("Permission denied for port 80"));
        assert!(message.contains("1024"));
    }

    #[test]
    fn test_format_bind_error_generic() {
        let error = Error::other("Network unreachable");
        let result = HttpServer::format_bind_error(error, "192.168.1.1:8080", 8080);

        let message = result.to_string();
        assert!(message.contains("Failed to bind"));
        assert!(message.contains("192.168.1.1:8080"));
        assert!(message.contains("Network unreachable"));
        assert!(matches!(result, DocflowError::Config(_)));
    }
}
