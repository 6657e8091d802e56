//! Authorization endpoint handler.
//!
//! `GET /authorize` validates the request and renders the login prompt.
//! `state` and `nonce` are not interpreted here; they are carried into the
//! form as hidden fields and travel back via `POST /login`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use tracing::debug;

use crate::http::IdpState;
use crate::http::templates::render_login_form;
use crate::oauth::AuthorizationService;

/// Query parameters for the authorization endpoint.
#[derive(Debug, Deserialize)]
pub struct AuthorizeParams {
    /// Where to send the user (and code) after login.
    #[serde(default)]
    pub redirect_uri: Option<String>,
    /// Opaque Relying Party state, threaded through untouched.
    #[serde(default)]
    pub state: Option<String>,
    /// OpenID Connect nonce, threaded through untouched.
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Handler for `GET /authorize`.
///
/// Responds 400 plain text when `redirect_uri` is missing or empty; no code
/// is issued on that path. Otherwise renders the login form with the three
/// pass-through values as hidden fields.
pub async fn authorize_handler(
    State(_state): State<IdpState>,
    Query(params): Query<AuthorizeParams>,
) -> Response {
    if let Err(e) = AuthorizationService::validate_authorize(params.redirect_uri.as_deref()) {
        debug!(error = %e, "rejecting authorization request");
        return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
    }

    let redirect_uri = params.redirect_uri.as_deref().unwrap_or_default();
    Html(render_login_form(
        redirect_uri,
        params.state.as_deref(),
        params.nonce.as_deref(),
    ))
    .into_response()
}
