//! Authorization flow orchestration.
//!
//! [`AuthorizationService`] drives one authorization attempt end to end:
//! validate the incoming request, mint and store a code at login, and redeem
//! the code for a signed token response. HTTP handlers stay thin and call
//! into this service.

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::config::IdpConfig;
use crate::error::IdpError;
use crate::oauth::code::CodeGrant;
use crate::storage::CodeStorage;
use crate::token::{TokenIssuer, TokenResponse};

/// Orchestrates code issuance and redemption.
pub struct AuthorizationService {
    storage: Arc<dyn CodeStorage>,
    token_issuer: Arc<TokenIssuer>,
    config: IdpConfig,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        storage: Arc<dyn CodeStorage>,
        token_issuer: Arc<TokenIssuer>,
        config: IdpConfig,
    ) -> Self {
        Self {
            storage,
            token_issuer,
            config,
        }
    }

    /// The token issuer backing this service.
    #[must_use]
    pub fn token_issuer(&self) -> &Arc<TokenIssuer> {
        &self.token_issuer
    }

    /// Validates an authorization request's `redirect_uri`.
    ///
    /// The value must be present and non-empty. `state` and `nonce` are
    /// threaded through opaquely and never validated.
    ///
    /// # Errors
    /// Returns an `InvalidRequest` error when the value is missing or empty.
    pub fn validate_authorize(redirect_uri: Option<&str>) -> Result<(), IdpError> {
        match redirect_uri {
            Some(uri) if !uri.is_empty() => Ok(()),
            _ => Err(IdpError::invalid_request("missing redirect_uri")),
        }
    }

    /// Completes a login: mints a code bound to the claimed identity and
    /// builds the redirect back to the Relying Party.
    ///
    /// No credential verification happens here; any non-empty username is
    /// accepted. The returned URL carries `code` and, when present, `state`
    /// as query parameters.
    ///
    /// # Errors
    /// Returns an `InvalidRequest` error for an empty username or an
    /// unparseable `redirect_uri`, and a `Storage` error if the grant cannot
    /// be persisted.
    pub async fn login(
        &self,
        username: &str,
        redirect_uri: &str,
        state: Option<&str>,
        nonce: Option<&str>,
    ) -> Result<Url, IdpError> {
        if username.is_empty() {
            return Err(IdpError::invalid_request("missing username"));
        }
        let mut url = Url::parse(redirect_uri)
            .map_err(|e| IdpError::invalid_request(format!("invalid redirect_uri: {e}")))?;

        let grant = CodeGrant::new(username, nonce.filter(|n| !n.is_empty()).map(String::from));
        self.storage.create(&grant).await?;

        url.query_pairs_mut().append_pair("code", &grant.code);
        if let Some(state) = state.filter(|s| !s.is_empty()) {
            url.query_pairs_mut().append_pair("state", state);
        }

        info!(subject = %username, "authorization code issued");
        Ok(url)
    }

    /// Redeems an authorization code for a signed token response.
    ///
    /// With `single_use_codes` enabled (the default) the code is consumed
    /// atomically and a second redemption fails. When disabled, the grant is
    /// read without being removed and the code stays redeemable, which some
    /// test harnesses rely on.
    ///
    /// # Errors
    /// Returns an `InvalidGrant` error for an unknown or already-consumed
    /// code, and a `Signing` error if the token cannot be signed.
    pub async fn redeem(&self, code: &str) -> Result<TokenResponse, IdpError> {
        let grant = if self.config.single_use_codes {
            self.storage.consume(code).await?
        } else {
            self.storage.find_by_code(code).await?
        };

        let grant = grant
            .ok_or_else(|| IdpError::invalid_grant("unknown or already used authorization code"))?;

        debug!(subject = %grant.subject, "redeeming authorization code");
        self.token_issuer.issue(&grant.subject, grant.nonce.as_deref())
    }
}
