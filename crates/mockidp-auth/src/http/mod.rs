//! Axum HTTP handlers for the provider endpoints.
//!
//! Five routes make up the wire surface:
//!
//! - `GET /.well-known/openid-configuration` - discovery metadata
//! - `GET /authorize` - login prompt
//! - `POST /login` - code issuance + redirect
//! - `GET /jwks` - verification keys
//! - `POST /token` - code redemption

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::config::IdpConfig;
use crate::keys::SigningKeyPair;
use crate::oauth::AuthorizationService;

pub mod authorize;
pub mod discovery;
pub mod jwks;
pub mod login;
pub mod templates;
pub mod token;

pub use authorize::{AuthorizeParams, authorize_handler};
pub use discovery::{ProviderMetadata, discovery_handler};
pub use jwks::jwks_handler;
pub use login::{LoginForm, login_handler};
pub use token::{TokenErrorBody, TokenRequest, token_handler};

/// Shared state for all provider endpoints.
#[derive(Clone)]
pub struct IdpState {
    /// The authorization flow service.
    pub service: Arc<AuthorizationService>,
    /// The provider's signing key pair.
    pub keys: Arc<SigningKeyPair>,
    /// Provider configuration.
    pub config: IdpConfig,
}

impl IdpState {
    /// Creates new endpoint state.
    #[must_use]
    pub fn new(
        service: Arc<AuthorizationService>,
        keys: Arc<SigningKeyPair>,
        config: IdpConfig,
    ) -> Self {
        Self {
            service,
            keys,
            config,
        }
    }
}

/// Builds the provider router with all five endpoints.
#[must_use]
pub fn router(state: IdpState) -> Router {
    Router::new()
        .route(
            "/.well-known/openid-configuration",
            get(discovery_handler),
        )
        .route("/authorize", get(authorize_handler))
        .route("/login", post(login_handler))
        .route("/jwks", get(jwks_handler))
        .route("/token", post(token_handler))
        .with_state(state)
}
