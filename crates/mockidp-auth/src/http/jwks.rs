//! JWKS endpoint HTTP handler.
//!
//! Publishes the provider's verification key so Relying Parties can check
//! ID token signatures. Stateless and independent of any flow state.

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::http::IdpState;

/// Handler for `GET /jwks`.
///
/// Returns the single signing key wrapped in a `{ "keys": [...] }` envelope.
/// The key never changes within a process lifetime, so the response carries
/// a cache header.
pub async fn jwks_handler(State(state): State<IdpState>) -> impl IntoResponse {
    let jwks = state.keys.jwks();
    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        Json(jwks),
    )
}
