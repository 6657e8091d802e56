//! Router assembly and server run loop.

use std::sync::Arc;

use axum::Router;
use mockidp_auth::{
    AuthorizationService, IdpError, IdpState, InMemoryCodeStorage, SigningKeyPair, TokenIssuer,
};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Builds the application router.
///
/// Generates the process-lifetime signing key here, so a failure aborts
/// startup before the listener binds.
///
/// # Errors
/// Returns an error if key generation fails.
pub fn build_router(config: &AppConfig) -> Result<Router, IdpError> {
    let keys = Arc::new(SigningKeyPair::generate()?);
    tracing::info!(kid = %keys.kid, "signing key generated");

    let storage = Arc::new(InMemoryCodeStorage::new());
    let token_issuer = Arc::new(TokenIssuer::new(keys.clone(), config.idp.clone()));
    let service = Arc::new(AuthorizationService::new(
        storage,
        token_issuer,
        config.idp.clone(),
    ));

    let state = IdpState::new(service, keys, config.idp.clone());
    Ok(mockidp_auth::router(state).layer(TraceLayer::new_for_http()))
}

/// Binds the listener and serves until shutdown.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(&config)?;
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        issuer = %config.idp.issuer,
        "mockidp listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
