//! Token endpoint handler.
//!
//! `POST /token` redeems an authorization code for a signed ID token. The
//! body may be form-encoded or JSON; both carry the same fields.

use axum::extract::{FromRequest, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::IdpError;
use crate::http::IdpState;
use crate::token::TokenResponse;

/// Token request parameters.
///
/// Only `code` matters to this provider. `grant_type` is checked when
/// present so misconfigured clients get a proper OAuth error instead of a
/// confusing `invalid_grant`. Anything else a Relying Party library sends
/// (`redirect_uri`, `client_secret`, ...) is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// The authorization code to redeem.
    #[serde(default)]
    pub code: Option<String>,

    /// OAuth 2.0 grant type; must be "authorization_code" when present.
    #[serde(default)]
    pub grant_type: Option<String>,
}

impl<S> FromRequest<S> for TokenRequest
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(request) = Json::<TokenRequest>::from_request(req, state)
                .await
                .map_err(|e| {
                    token_error_response(&IdpError::invalid_request(format!(
                        "malformed token request: {e}"
                    )))
                })?;
            Ok(request)
        } else {
            let Form(request) = Form::<TokenRequest>::from_request(req, state)
                .await
                .map_err(|e| {
                    token_error_response(&IdpError::invalid_request(format!(
                        "malformed token request: {e}"
                    )))
                })?;
            Ok(request)
        }
    }
}

/// Token error response body, per RFC 6749 §5.2.
#[derive(Debug, Clone, Serialize)]
pub struct TokenErrorBody {
    /// OAuth 2.0 error code.
    pub error: String,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

/// Handler for `POST /token`.
///
/// Resolves the code through the authorization service and returns the token
/// response. Unknown or consumed codes come back as `invalid_grant`; signing
/// failures surface as `server_error` with a 500 status, never as an
/// unsigned token.
pub async fn token_handler(State(state): State<IdpState>, request: TokenRequest) -> Response {
    debug!(grant_type = ?request.grant_type, "processing token request");

    if let Some(grant_type) = request.grant_type.as_deref()
        && grant_type != "authorization_code"
    {
        warn!(grant_type, "unsupported grant type");
        return token_error_response(&IdpError::unsupported_grant_type(grant_type));
    }

    let Some(code) = request.code.as_deref().filter(|c| !c.is_empty()) else {
        return token_error_response(&IdpError::invalid_request("missing code parameter"));
    };

    match state.service.redeem(code).await {
        Ok(response) => token_success_response(response),
        Err(e) => {
            warn!(error = %e, "token request failed");
            token_error_response(&e)
        }
    }
}

/// Builds a successful token response.
fn token_success_response(response: TokenResponse) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(response),
    )
        .into_response()
}

/// Builds an error response for the token endpoint.
fn token_error_response(error: &IdpError) -> Response {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let body = TokenErrorBody {
        error: error.oauth_error_code().to_string(),
        error_description: Some(error.to_string()),
    };

    (
        status,
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
        .into_response()
}
