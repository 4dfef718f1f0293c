//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};

use crate::error::{Result, SubnetgateError};
use crate::ratelimit::RateLimiter;

use super::service::build_router;

/// HTTP server for the request gate.
pub struct HttpServer {
    /// Address to bind to
    addr: SocketAddr,
    /// The rate limiter instance
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a new HTTP server fronted by the given rate limiter.
    pub fn new(addr: SocketAddr, limiter: Arc<RateLimiter>) -> Self {
        Self { addr, limiter }
    }

    /// Start the HTTP server.
    ///
    /// This method will block until the server is shut down.
    pub async fn serve(self) -> Result<()> {
        let router = build_router(self.limiter);

        info!(addr = %self.addr, "Starting HTTP server for request gate");

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, router).await.map_err(|e| {
            error!(error = %e, "HTTP server failed");
            SubnetgateError::Io(e)
        })
    }

    /// Start the HTTP server with graceful shutdown.
    ///
    /// The server will shut down when the provided signal resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = build_router(self.limiter);

        info!(
            addr = %self.addr,
            "Starting HTTP server for request gate with graceful shutdown"
        );

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP server failed");
                SubnetgateError::Io(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::LimiterConfig;
    use std::time::Duration;

    #[test]
    fn test_server_creation() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let config = LimiterConfig::new(24, 100, Duration::from_secs(1)).unwrap();
        let limiter = Arc::new(RateLimiter::new(config));
        let _server = HttpServer::new(addr, limiter);
    }
}
