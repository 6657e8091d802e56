//! ID token construction and signing.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::IdpConfig;
use crate::error::IdpError;
use crate::keys::SigningKeyPair;
use crate::token::claims::IdTokenClaims;

/// Successful token response.
///
/// # Example Response
///
/// ```json
/// {
///   "access_token": "wJmMv...",
///   "id_token": "eyJhbG...",
///   "token_type": "Bearer",
///   "expires_in": 300
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque placeholder access token. Not a JWT and not introspectable;
    /// nothing in this provider accepts it.
    pub access_token: String,

    /// The signed ID token.
    pub id_token: String,

    /// Token type, always "Bearer".
    pub token_type: String,

    /// ID token lifetime in seconds.
    pub expires_in: u64,
}

/// Service that builds and signs ID tokens.
///
/// Holds the provider's only signing key and the issuer/audience
/// configuration. Thread-safe; share it via `Arc`.
pub struct TokenIssuer {
    keys: Arc<SigningKeyPair>,
    config: IdpConfig,
}

impl TokenIssuer {
    /// Creates a new token issuer.
    #[must_use]
    pub fn new(keys: Arc<SigningKeyPair>, config: IdpConfig) -> Self {
        Self { keys, config }
    }

    /// The signing key pair used by this issuer.
    #[must_use]
    pub fn keys(&self) -> &Arc<SigningKeyPair> {
        &self.keys
    }

    /// Builds, signs, and packages an ID token for the given identity.
    ///
    /// # Errors
    /// Returns a `Signing` error if token encoding fails. Signing failures
    /// are never downgraded to an unsigned token.
    pub fn issue(&self, subject: &str, nonce: Option<&str>) -> Result<TokenResponse, IdpError> {
        let now = OffsetDateTime::now_utc();
        let lifetime_secs = self.config.id_token_lifetime.as_secs();

        let claims = IdTokenClaims {
            iss: self.config.issuer.clone(),
            sub: subject.to_string(),
            name: subject.to_string(),
            email: subject.to_string(),
            nonce: nonce.map(ToString::to_string),
            aud: self.config.client_id.clone(),
            iat: now.unix_timestamp(),
            exp: now.unix_timestamp() + lifetime_secs as i64,
        };

        let mut header = Header::new(self.keys.algorithm());
        header.kid = Some(self.keys.kid.clone());

        let id_token = encode(&header, &claims, self.keys.encoding_key())
            .map_err(|e| IdpError::signing(e.to_string()))?;

        Ok(TokenResponse {
            access_token: generate_access_token(),
            id_token,
            token_type: "Bearer".to_string(),
            expires_in: lifetime_secs,
        })
    }

    /// Decodes and validates an ID token issued by this provider.
    ///
    /// Verifies the signature, the `exp` claim, and the issuer. Useful for
    /// tests and for embedders that play both sides of the flow.
    ///
    /// # Errors
    /// Returns an `InvalidGrant` error if the token fails validation.
    pub fn decode(&self, token: &str) -> Result<IdTokenClaims, IdpError> {
        let mut validation = Validation::new(self.keys.algorithm());
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_exp = true;
        // The audience is fixed to the one registered client; asserting it
        // here keeps decode usable for that client only.
        validation.set_audience(&[&self.config.client_id]);

        decode::<IdTokenClaims>(token, self.keys.decoding_key(), &validation)
            .map(|data| data.claims)
            .map_err(|e| IdpError::invalid_grant(format!("invalid id_token: {e}")))
    }
}

/// Generates the opaque access-token placeholder.
///
/// Random so responses are not confused with each other, but deliberately
/// not a verifiable credential.
fn generate_access_token() -> String {
    let mut bytes = [0u8; 32];
    rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
