//! OpenID Connect discovery HTTP handler.
//!
//! Provides the `/.well-known/openid-configuration` endpoint. The document
//! is derived entirely from static capabilities and the configured issuer,
//! so it is identical on every call.

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::config::IdpConfig;
use crate::http::IdpState;
use crate::keys::SIGNING_ALG;

/// OpenID Connect provider metadata document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Issuer URL.
    pub issuer: String,
    /// Authorization endpoint URL.
    pub authorization_endpoint: String,
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// JWKS URL.
    pub jwks_uri: String,
    /// Supported response types.
    pub response_types_supported: Vec<String>,
    /// Supported grant types.
    pub grant_types_supported: Vec<String>,
    /// Supported ID token signing algorithms.
    pub id_token_signing_alg_values_supported: Vec<String>,
    /// Supported subject identifier types.
    pub subject_types_supported: Vec<String>,
    /// Supported scopes.
    pub scopes_supported: Vec<String>,
    /// Supported token endpoint authentication methods.
    pub token_endpoint_auth_methods_supported: Vec<String>,
}

impl ProviderMetadata {
    /// Builds the metadata document for the given configuration.
    #[must_use]
    pub fn build(config: &IdpConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            authorization_endpoint: config.authorization_endpoint(),
            token_endpoint: config.token_endpoint(),
            jwks_uri: config.jwks_uri(),
            response_types_supported: vec!["code".to_string()],
            grant_types_supported: vec!["authorization_code".to_string()],
            id_token_signing_alg_values_supported: vec![SIGNING_ALG.to_string()],
            subject_types_supported: vec!["public".to_string()],
            scopes_supported: vec!["openid".to_string()],
            token_endpoint_auth_methods_supported: vec!["client_secret_post".to_string()],
        }
    }
}

/// Handler for `GET /.well-known/openid-configuration`.
///
/// Idempotent and side-effect-free.
pub async fn discovery_handler(State(state): State<IdpState>) -> impl IntoResponse {
    let doc = ProviderMetadata::build(&state.config);
    ([(header::CONTENT_TYPE, "application/json")], Json(doc))
}
