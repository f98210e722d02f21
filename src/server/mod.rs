//! HTTP API: upload a PDF for a study pack, chat about its text.
//!
//! Backend clients are built once from [`AppConfig`] and shared read-only by
//! every request through [`AppState`].

mod handlers;
mod routes;

pub use routes::create_router;

use crate::config::AppConfig;
use crate::error::QuizCraftError;
use crate::provider::ProviderGateway;
use std::sync::Arc;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ProviderGateway>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(gateway: ProviderGateway, config: AppConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config: Arc::new(config),
        }
    }

    /// Build the two-backend gateway described by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, QuizCraftError> {
        let gateway = ProviderGateway::from_config(&config)?;
        Ok(Self::new(gateway, config))
    }
}

/// Start the web server and run until the listener fails.
pub async fn serve(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
