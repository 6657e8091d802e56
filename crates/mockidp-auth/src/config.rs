//! Identity provider configuration.
//!
//! Configuration for the mock identity provider: the issuer URL used in
//! token claims and discovery metadata, the single registered client, and
//! token/code lifecycle knobs.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::IdpError;

/// Identity provider configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [idp]
/// issuer = "https://idp.test"
/// client_id = "cid-1"
/// id_token_lifetime = "5m"
/// single_use_codes = true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdpConfig {
    /// Issuer URL (used in the token `iss` claim and to build endpoint URLs).
    pub issuer: String,

    /// The single registered client. Used as the ID token `aud` claim.
    pub client_id: String,

    /// ID token lifetime. Also reported as `expires_in` in token responses.
    #[serde(with = "humantime_serde")]
    pub id_token_lifetime: Duration,

    /// Enforce single-use authorization codes.
    ///
    /// When `false`, a code stays redeemable after its first exchange. That
    /// matches the permissive behavior some test harnesses rely on; leave it
    /// enabled everywhere else.
    pub single_use_codes: bool,
}

impl Default for IdpConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost:3000".to_string(),
            client_id: "dummy-client-id".to_string(),
            id_token_lifetime: Duration::from_secs(300),
            single_use_codes: true,
        }
    }
}

impl IdpConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns a `Configuration` error if the issuer is not a valid URL or
    /// the client id is empty.
    pub fn validate(&self) -> Result<(), IdpError> {
        Url::parse(&self.issuer)
            .map_err(|e| IdpError::configuration(format!("issuer is not a valid URL: {e}")))?;
        if self.client_id.is_empty() {
            return Err(IdpError::configuration("client_id must not be empty"));
        }
        if self.id_token_lifetime.as_secs() == 0 {
            return Err(IdpError::configuration("id_token_lifetime must be > 0"));
        }
        Ok(())
    }

    /// Issuer URL without a trailing slash, for endpoint construction.
    #[must_use]
    pub fn issuer_base(&self) -> &str {
        self.issuer.trim_end_matches('/')
    }

    /// The advertised authorization endpoint URL.
    #[must_use]
    pub fn authorization_endpoint(&self) -> String {
        format!("{}/authorize", self.issuer_base())
    }

    /// The advertised token endpoint URL.
    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!("{}/token", self.issuer_base())
    }

    /// The advertised JWKS URL.
    #[must_use]
    pub fn jwks_uri(&self) -> String {
        format!("{}/jwks", self.issuer_base())
    }
}
