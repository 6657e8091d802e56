//! Login endpoint handler.
//!
//! `POST /login` accepts the claimed identity plus the three values the
//! authorization endpoint carried forward, mints an authorization code, and
//! redirects back to the Relying Party.

use axum::Form;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::warn;

use crate::http::IdpState;

/// Form data for the login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// The claimed identity. Accepted without any credential check.
    #[serde(default)]
    pub username: Option<String>,
    /// Pass-through from the authorization request.
    #[serde(default)]
    pub redirect_uri: Option<String>,
    /// Pass-through from the authorization request.
    #[serde(default)]
    pub state: Option<String>,
    /// Pass-through from the authorization request.
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Handler for `POST /login`.
///
/// Responds 302 with a `Location` of `redirect_uri?code=...&state=...`
/// (`state` omitted when absent). Client mistakes (missing username, bad
/// `redirect_uri`) come back as 400 plain text.
pub async fn login_handler(State(state): State<IdpState>, Form(form): Form<LoginForm>) -> Response {
    let result = state
        .service
        .login(
            form.username.as_deref().unwrap_or_default(),
            form.redirect_uri.as_deref().unwrap_or_default(),
            form.state.as_deref(),
            form.nonce.as_deref(),
        )
        .await;

    match result {
        Ok(url) => (
            StatusCode::FOUND,
            [(header::LOCATION, url.to_string())],
        )
            .into_response(),
        Err(e) if e.is_client_error() => {
            warn!(error = %e, "login rejected");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            warn!(error = %e, "login failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
