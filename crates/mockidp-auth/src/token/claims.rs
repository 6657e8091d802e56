//! ID token claims.

use serde::{Deserialize, Serialize};

/// ID token claims for OpenID Connect.
///
/// In this mock, `sub`, `name`, and `email` all carry the claimed username;
/// there is no user directory to look anything else up in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdTokenClaims {
    /// Issuer (the provider's configured issuer URL).
    pub iss: String,

    /// Subject (the claimed username).
    pub sub: String,

    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Nonce from the authorization request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    /// Audience (the registered client id).
    pub aud: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}
