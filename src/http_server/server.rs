//! # HTTP Server
//!
//! Main HTTP server combining the envelope and transfer routers around a
//! shared ledger store.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::observability::Logger;
use crate::store::LedgerStore;

use super::config::HttpServerConfig;
use super::envelope_routes::envelope_routes;
use super::transfer_routes::transfer_routes;

/// HTTP server for the envelope API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self::with_config(store, HttpServerConfig::default())
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(store: Arc<LedgerStore>, config: HttpServerConfig) -> Self {
        let router = Self::build_router(store, &config);
        Self { config, router }
    }

    /// Build the combined router
    fn build_router(store: Arc<LedgerStore>, config: &HttpServerConfig) -> Router {
        // Permissive CORS when no origins are configured
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/health", get(health_handler))
            .nest("/api/v1/envelopes", envelope_routes(store.clone()))
            .nest("/api/v1/transfers", transfer_routes(store))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;

        let bound = addr.to_string();
        Logger::info("http_server_started", &[("addr", bound.as_str())]);

        axum::serve(listener, self.router).await
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr_follows_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = LedgerStore::initialize(&dir.path().join("envelopes.json")).unwrap();

        let server = HttpServer::with_config(Arc::new(store), HttpServerConfig::with_port(8099));
        assert_eq!(server.socket_addr(), "127.0.0.1:8099");
    }
}
